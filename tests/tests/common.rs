#![allow(unused)]

use std::str::FromStr;
use std::sync::Arc;

use tilebase_core::indexing::{IndexMetadata, IndexMethod, KeySpec, NullKeyPolicy};
use tilebase_core::{Column, DataTable, LayoutConfig, MemoryCatalog, Schema, TableConfig, Tuple, Value, ValueType};
use tilebase_proto::{Datum, IndexScan, IndexScanState, Oid, ScanDirection, ScanKey, ScanStateHeader, StrategyNumber, TypeId};
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

pub const DB: Oid = Oid(16384);
pub const ACCOUNTS: Oid = Oid(24576);
pub const ACCOUNTS_PKEY: Oid = Oid(24580);
pub const ACCOUNTS_EMAIL: Oid = Oid(24581);
pub const ACCOUNTS_REGION_BALANCE: Oid = Oid(24582);

pub fn accounts_schema() -> Schema {
    Schema::new(vec![
        Column::new("id", ValueType::I64).not_null(),
        Column::new("email", ValueType::String),
        Column::new("region", ValueType::String).not_null(),
        Column::new("balance", ValueType::F64),
    ])
}

/// Empty `accounts` table with a unique ordered primary key, a unique hash index
/// on `email` that indexes NULLs, and an ordered `(region, balance)` index.
pub fn accounts(catalog: &MemoryCatalog, capacity: u32) -> Arc<DataTable> {
    let table = catalog
        .create_table(DB, ACCOUNTS, "accounts", accounts_schema(), TableConfig::new(capacity, LayoutConfig::Groups(vec![vec![0, 2], vec![1, 3]])))
        .unwrap();
    let key = |columns: &[u32]| KeySpec::from_schema(table.schema(), columns).unwrap();
    table.add_index(tilebase_index::build_index(IndexMetadata::new(ACCOUNTS_PKEY, "accounts_pkey", ACCOUNTS, key(&[0])).unique(true))).unwrap();
    table
        .add_index(tilebase_index::build_index(
            IndexMetadata::new(ACCOUNTS_EMAIL, "accounts_email", ACCOUNTS, key(&[1]))
                .unique(true)
                .method(IndexMethod::Hash)
                .null_keys(NullKeyPolicy::Include),
        ))
        .unwrap();
    table.add_index(tilebase_index::build_index(IndexMetadata::new(ACCOUNTS_REGION_BALANCE, "accounts_region_balance", ACCOUNTS, key(&[2, 3])))).unwrap();
    table
}

pub fn account(id: i64, email: Option<&str>, region: &str, balance: f64) -> Tuple {
    Tuple::new(vec![Some(Value::I64(id)), email.map(Value::from), Some(Value::from(region)), Some(Value::F64(balance))])
}

pub fn region_for(id: i64) -> &'static str { ["emea", "apac", "amer"][(id % 3) as usize] }

pub fn key(attno: i16, strategy: StrategyNumber, argument: Datum, subtype: TypeId) -> ScanKey { ScanKey::new(attno, strategy, argument, subtype) }

pub fn index_scan(index_oid: Oid, scan_keys: Vec<ScanKey>) -> IndexScanState {
    IndexScanState { header: ScanStateHeader::new(DB, ACCOUNTS), plan: IndexScan { index_oid, order_direction: ScanDirection::Forward }, scan_keys }
}
