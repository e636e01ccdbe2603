mod common;

use std::sync::Arc;

use anyhow::Result;
use common::*;
use tilebase_core::{Catalog, IndexError, MemoryCatalog, TableError, Tuple, Value};
use tilebase_planner::{PlanError, PlanTransformer, TranslationError};
use tilebase_proto::{Datum, IndexScanState, StrategyNumber, TypeId};

#[test]
fn test_load_translate_execute() -> Result<()> {
    let catalog = MemoryCatalog::new();
    let table = accounts(&catalog, 16);
    for id in 0..60 {
        table.insert_tuple(&account(id, Some(&format!("user{}@example.com", id)), region_for(id), id as f64 * 10.0))?;
    }
    assert_eq!(table.tile_group_count(), 4);

    let transformer = PlanTransformer::new(&catalog);

    // region = 'apac' AND balance >= 100 AND balance < 300, on the composite index
    let state = index_scan(ACCOUNTS_REGION_BALANCE, vec![
        key(3, StrategyNumber::EQUAL, Datum::from_text("apac"), TypeId::VARCHAR),
        key(4, StrategyNumber::GREATER_EQUAL, Datum::from_f64(100.0), TypeId::FLOAT8),
        key(4, StrategyNumber::LESS, Datum::from_i32(300), TypeId::INT4),
    ]);
    let plan = transformer.transform_index_scan(&state)?;
    let scan = plan.as_index_scan().unwrap();
    assert_eq!(scan.descriptor.key_column_ids(), &[2, 3, 3]);
    let ids: Vec<i64> = scan.fetch_tuples()?.into_iter().filter_map(|(_, t)| t.get(0).and_then(Value::as_i64)).collect();
    assert_eq!(ids, vec![10, 13, 16, 19, 22, 25, 28]);

    // point lookup through the hash index
    let state = index_scan(ACCOUNTS_EMAIL, vec![key(2, StrategyNumber::EQUAL, Datum::from_text("user42@example.com"), TypeId::TEXT)]);
    let plan = transformer.transform_index_scan(&state)?;
    let rows = plan.as_index_scan().unwrap().fetch_tuples()?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1.get(0), Some(&Value::I64(42)));
    Ok(())
}

#[test]
fn test_scan_state_from_json() -> Result<()> {
    let catalog = MemoryCatalog::new();
    let table = accounts(&catalog, 8);
    for id in 0..10 {
        table.insert_tuple(&account(id, None, region_for(id), 0.0))?;
    }

    let state = index_scan(ACCOUNTS_PKEY, vec![key(1, StrategyNumber::GREATER, Datum::from_i64(6), TypeId::INT8)]);
    let json = serde_json::to_string(&state)?;
    let decoded: IndexScanState = serde_json::from_str(&json)?;
    assert_eq!(decoded, state);

    let plan = PlanTransformer::new(&catalog).transform_index_scan(&decoded)?;
    assert_eq!(plan.as_index_scan().unwrap().fetch_tuples()?.len(), 3);
    Ok(())
}

#[test]
fn test_constraint_failures_leave_no_trace() -> Result<()> {
    let catalog = MemoryCatalog::new();
    let table = accounts(&catalog, 8);
    table.insert_tuple_atomic(&account(1, Some("a@example.com"), "emea", 1.0))?;

    // NOT NULL region
    let bad = Tuple::new(vec![Some(Value::I64(2)), Some(Value::from("b@example.com")), None, Some(Value::F64(1.0))]);
    assert!(matches!(table.insert_tuple(&bad), Err(TableError::NotNull { column: 2, .. })));

    // duplicate email fails on the second index after the primary key took an entry
    let err = table.insert_tuple_atomic(&account(3, Some("a@example.com"), "emea", 1.0)).unwrap_err();
    assert!(matches!(err, TableError::Index { source: IndexError::UniqueViolation { .. }, .. }));

    assert_eq!(table.tuple_count(), 1);
    for (_, index) in table.indexes() {
        assert_eq!(index.entry_count(), 1, "{}", index.name());
    }

    // NULL emails do not collide in the unique index
    table.insert_tuple_atomic(&account(4, None, "amer", 1.0))?;
    table.insert_tuple_atomic(&account(5, None, "amer", 1.0))?;
    assert_eq!(table.index_with_oid(ACCOUNTS_EMAIL).unwrap().entry_count(), 3);
    Ok(())
}

#[test]
fn test_dropped_index_and_table() -> Result<()> {
    let catalog = MemoryCatalog::new();
    let table = accounts(&catalog, 8);
    let transformer = PlanTransformer::new(&catalog);
    let state = index_scan(ACCOUNTS_EMAIL, vec![key(2, StrategyNumber::EQUAL, Datum::from_text("x"), TypeId::TEXT)]);

    table.drop_index(ACCOUNTS_EMAIL)?;
    let plan = transformer.transform_index_scan(&state)?;
    assert!(matches!(plan.as_index_scan().unwrap().fetch_tuples(), Err(PlanError::IndexNotFound(ACCOUNTS_EMAIL))));

    catalog.drop_table(DB, ACCOUNTS);
    assert!(catalog.table(DB, ACCOUNTS).is_none());
    assert!(matches!(transformer.transform_index_scan(&state), Err(TranslationError::TableNotFound { .. })));
    Ok(())
}

#[test]
fn test_translate_while_writing() -> Result<()> {
    let catalog = Arc::new(MemoryCatalog::new());
    let table = accounts(&catalog, 32);
    let transformer = PlanTransformer::new(catalog.clone());

    std::thread::scope(|scope| {
        for worker in 0..4i64 {
            let table = &table;
            scope.spawn(move || {
                for i in 0..250 {
                    let id = worker * 10_000 + i;
                    table.insert_tuple(&account(id, Some(&format!("{}@example.com", id)), region_for(id), i as f64)).unwrap();
                }
            });
        }
        for _ in 0..2 {
            let transformer = &transformer;
            scope.spawn(move || {
                for _ in 0..50 {
                    let state = index_scan(ACCOUNTS_PKEY, vec![key(1, StrategyNumber::LESS, Datum::from_i64(100), TypeId::INT8)]);
                    let plan = transformer.transform_index_scan(&state).unwrap();
                    assert!(plan.as_index_scan().unwrap().fetch_tuples().unwrap().len() <= 100);
                }
            });
        }
    });

    assert_eq!(table.tuple_count(), 1000);
    for (_, index) in table.indexes() {
        assert_eq!(index.entry_count(), 1000, "{}", index.name());
    }
    Ok(())
}
