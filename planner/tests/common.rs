#![allow(unused)]

use std::str::FromStr;
use std::sync::Arc;

use tilebase_core::indexing::{IndexMetadata, KeySpec};
use tilebase_core::{Column, DataTable, MemoryCatalog, Schema, TableConfig, Tuple, Value, ValueType};
use tilebase_proto::{
    BitmapHeapScanState, BitmapIndexScan, BitmapIndexScanState, Datum, IndexOnlyScan, IndexOnlyScanState, IndexScan, IndexScanState, Oid,
    PlanState, ScanDirection, ScanKey, ScanStateHeader, StrategyNumber, TypeId,
};
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

pub const DB: Oid = Oid(1);
pub const ITEMS: Oid = Oid(100);
pub const ITEMS_PKEY: Oid = Oid(200);
pub const ITEMS_QTY: Oid = Oid(201);

/// `items(id int8 not null, name text, qty int4)` with an ordered index on `id`
/// and one on `qty`, holding ids 1..=20 with `qty = id % 5`.
pub fn catalog() -> MemoryCatalog {
    let catalog = MemoryCatalog::new();
    let schema = Schema::new(vec![
        Column::new("id", ValueType::I64).not_null(),
        Column::new("name", ValueType::String),
        Column::new("qty", ValueType::I32),
    ]);
    let table = catalog.create_table(DB, ITEMS, "items", schema, TableConfig::row(8)).unwrap();
    for (oid, name, column) in [(ITEMS_PKEY, "items_pkey", 0), (ITEMS_QTY, "items_qty", 2)] {
        let spec = KeySpec::from_schema(table.schema(), &[column]).unwrap();
        table.add_index(tilebase_index::build_index(IndexMetadata::new(oid, name, ITEMS, spec).unique(oid == ITEMS_PKEY))).unwrap();
    }
    for id in 1..=20i64 {
        table.insert_tuple(&Tuple::from_values(vec![Value::I64(id), Value::String(format!("item{}", id)), Value::I32((id % 5) as i32)])).unwrap();
    }
    catalog
}

pub fn int8_key(attno: i16, strategy: StrategyNumber, value: i64) -> ScanKey { ScanKey::new(attno, strategy, Datum::from_i64(value), TypeId::INT8) }

pub fn int4_key(attno: i16, strategy: StrategyNumber, value: i32) -> ScanKey { ScanKey::new(attno, strategy, Datum::from_i32(value), TypeId::INT4) }

pub fn header() -> ScanStateHeader { ScanStateHeader::new(DB, ITEMS) }

pub fn index_scan(index_oid: Oid, scan_keys: Vec<ScanKey>) -> IndexScanState {
    IndexScanState { header: header(), plan: IndexScan { index_oid, order_direction: ScanDirection::Forward }, scan_keys }
}

pub fn index_only_scan(index_oid: Oid, scan_keys: Vec<ScanKey>) -> IndexOnlyScanState {
    IndexOnlyScanState { header: header(), plan: IndexOnlyScan { index_oid, order_direction: ScanDirection::Forward }, scan_keys }
}

pub fn bitmap_heap_scan(index_oid: Oid, scan_keys: Vec<ScanKey>) -> BitmapHeapScanState {
    let outer = PlanState::BitmapIndexScan(BitmapIndexScanState { plan: BitmapIndexScan { index_oid }, scan_keys });
    BitmapHeapScanState { header: header(), outer: Box::new(outer) }
}
