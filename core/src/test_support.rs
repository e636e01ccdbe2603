//! A linear-scan index used by this crate's unit tests.

use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::Level;

use tilebase_proto::{ColumnId, ItemPointer, Oid};

use crate::error::IndexError;
use crate::indexing::{ExpressionType, Index, IndexKey, IndexMetadata, KeyPredicates, KeySpec};
use crate::schema::Schema;
use crate::value::Value;

#[ctor::ctor]
fn init_tracing() {
    let level = std::env::var("LOG_LEVEL").ok().and_then(|level| Level::from_str(&level).ok()).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).with_test_writer().init();
}

#[derive(Debug)]
pub struct ListIndex {
    metadata: IndexMetadata,
    entries: Mutex<Vec<(IndexKey, ItemPointer)>>,
}

impl ListIndex {
    pub fn new(metadata: IndexMetadata) -> Self { Self { metadata, entries: Mutex::new(Vec::new()) } }

    pub fn on(schema: &Schema, table_oid: Oid, oid: u32, name: &str, columns: &[ColumnId]) -> Self {
        let spec = KeySpec::from_schema(schema, columns).expect("key columns exist");
        Self::new(IndexMetadata::new(Oid(oid), name, table_oid, spec))
    }

    pub fn unique(mut self) -> Self {
        self.metadata.unique = true;
        self
    }

    pub fn shared(self) -> Arc<dyn Index> { Arc::new(self) }
}

impl Index for ListIndex {
    fn metadata(&self) -> &IndexMetadata { &self.metadata }

    fn insert_entry(&self, key: &IndexKey, location: ItemPointer) -> Result<(), IndexError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.iter().any(|(k, l)| k == key && *l == location) {
            return Ok(());
        }
        if self.metadata.unique && !key.has_null() && entries.iter().any(|(k, _)| k == key) {
            return Err(IndexError::UniqueViolation { index: self.metadata.name.clone(), key: key.to_string() });
        }
        entries.push((key.clone(), location));
        Ok(())
    }

    fn delete_entry(&self, key: &IndexKey, location: ItemPointer) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(k, l)| !(k == key && *l == location));
        entries.len() != before
    }

    fn scan_key(&self, key: &IndexKey) -> Vec<ItemPointer> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).iter().filter(|(k, _)| k == key).map(|(_, l)| *l).collect()
    }

    fn scan(&self, key_column_ids: &[ColumnId], expr_types: &[ExpressionType], values: &[Value]) -> Result<Vec<ItemPointer>, IndexError> {
        let predicates = KeyPredicates::compile(&self.metadata.key_spec, key_column_ids, expr_types, values)?;
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.iter().filter(|(k, _)| predicates.matches(k)).map(|(_, l)| *l).collect())
    }

    fn entry_count(&self) -> usize { self.entries.lock().unwrap_or_else(PoisonError::into_inner).len() }
}
