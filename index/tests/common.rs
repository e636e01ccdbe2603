#![allow(unused)]

use std::str::FromStr;
use std::sync::Arc;

use tilebase_core::indexing::{IndexMetadata, IndexMethod, KeySpec};
use tilebase_core::{Column, DataTable, Index, Schema, TableConfig, Tuple, Value, ValueType};
use tilebase_proto::Oid;
use tracing::Level;

#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        tracing_subscriber::fmt().with_max_level(Level::from_str(&level).unwrap()).with_test_writer().init();
    } else {
        tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
    }
}

pub const TABLE_OID: Oid = Oid(100);

pub fn orders_schema() -> Schema {
    Schema::new(vec![
        Column::new("id", ValueType::I64).not_null(),
        Column::new("customer", ValueType::String),
        Column::new("amount", ValueType::F64),
    ])
}

pub fn orders_table(capacity: u32) -> DataTable { DataTable::new(TABLE_OID, Oid(1), "orders", orders_schema(), TableConfig::row(capacity)).unwrap() }

pub fn order(id: i64, customer: &str, amount: f64) -> Tuple { Tuple::from_values(vec![Value::I64(id), Value::from(customer), Value::F64(amount)]) }

pub fn index_on(table: &DataTable, oid: u32, name: &str, columns: &[u32], method: IndexMethod) -> Arc<dyn Index> {
    let spec = KeySpec::from_schema(table.schema(), columns).unwrap();
    tilebase_index::build_index(IndexMetadata::new(Oid(oid), name, table.oid(), spec).method(method))
}
