use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use tilebase_core::indexing::{ExpressionType, Index, IndexKey, IndexMetadata, KeyPredicates};
use tilebase_core::{IndexError, Value};
use tilebase_proto::{ColumnId, ItemPointer};
use tracing::{debug, trace};

use crate::coerce_key;

#[derive(Debug)]
struct Bucket {
    key: IndexKey,
    locations: Vec<ItemPointer>,
}

/// Hash index. A scan pinning every key column with `=` is a single lookup;
/// anything else is a filtered pass over all buckets.
#[derive(Debug)]
pub struct HashIndex {
    metadata: IndexMetadata,
    buckets: DashMap<Vec<u8>, Bucket>,
    entries: AtomicUsize,
}

impl HashIndex {
    pub fn new(metadata: IndexMetadata) -> Self { Self { metadata, buckets: DashMap::new(), entries: AtomicUsize::new(0) } }

    fn encode(&self, key: &IndexKey) -> Result<Vec<u8>, IndexError> {
        if key.len() != self.metadata.key_spec.len() {
            return Err(IndexError::KeyArity { expected: self.metadata.key_spec.len(), actual: key.len() });
        }
        Ok(coerce_key(&self.metadata.key_spec, key).unwrap_or_else(|| key.clone()).encode())
    }
}

impl Index for HashIndex {
    fn metadata(&self) -> &IndexMetadata { &self.metadata }

    fn insert_entry(&self, key: &IndexKey, location: ItemPointer) -> Result<(), IndexError> {
        let encoded = self.encode(key)?;
        let mut bucket = self.buckets.entry(encoded).or_insert_with(|| Bucket { key: key.clone(), locations: Vec::new() });
        if bucket.locations.contains(&location) {
            return Ok(());
        }
        if self.metadata.unique && !key.has_null() && !bucket.locations.is_empty() {
            debug!("index {}: duplicate key {}", self.metadata.name, key);
            return Err(IndexError::UniqueViolation { index: self.metadata.name.clone(), key: key.to_string() });
        }
        bucket.locations.push(location);
        self.entries.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn delete_entry(&self, key: &IndexKey, location: ItemPointer) -> bool {
        let Ok(encoded) = self.encode(key) else { return false };
        let removed = match self.buckets.get_mut(&encoded) {
            Some(mut bucket) => match bucket.locations.iter().position(|l| *l == location) {
                Some(position) => {
                    bucket.locations.swap_remove(position);
                    true
                }
                None => false,
            },
            None => false,
        };
        if removed {
            self.buckets.remove_if(&encoded, |_, bucket| bucket.locations.is_empty());
            self.entries.fetch_sub(1, Ordering::AcqRel);
        }
        removed
    }

    fn scan_key(&self, key: &IndexKey) -> Vec<ItemPointer> {
        if key.len() != self.metadata.key_spec.len() {
            return Vec::new();
        }
        // a probe with no equal in the key types matches nothing
        let Some(probe) = coerce_key(&self.metadata.key_spec, key) else { return Vec::new() };
        let encoded = probe.encode();
        self.buckets.get(&encoded).map(|bucket| bucket.locations.clone()).unwrap_or_default()
    }

    fn scan(&self, key_column_ids: &[ColumnId], expr_types: &[ExpressionType], values: &[Value]) -> Result<Vec<ItemPointer>, IndexError> {
        let predicates = KeyPredicates::compile(&self.metadata.key_spec, key_column_ids, expr_types, values)?;
        if let Some(key) = predicates.equality_key(self.metadata.key_spec.len()) {
            trace!("index {}: point lookup {}", self.metadata.name, key);
            return Ok(self.scan_key(&key));
        }
        trace!("index {}: full pass for {} terms", self.metadata.name, predicates.terms().len());
        let mut result = Vec::new();
        for bucket in self.buckets.iter() {
            if predicates.matches(&bucket.key) {
                result.extend_from_slice(&bucket.locations);
            }
        }
        Ok(result)
    }

    fn entry_count(&self) -> usize { self.entries.load(Ordering::Acquire) }
}
