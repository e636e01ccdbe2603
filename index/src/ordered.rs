use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use tilebase_core::collation::RangeBound;
use tilebase_core::indexing::{encode_component, ExpressionType, Index, IndexKey, IndexMetadata, KeyPredicates};
use tilebase_core::{IndexError, Value};
use tilebase_proto::{ColumnId, ItemPointer};
use tracing::{debug, trace};

use crate::{coerce_key, coerce_probe};

#[derive(Debug)]
struct Entry {
    key: IndexKey,
    locations: Vec<ItemPointer>,
}

/// Ordered index over encoded keys. Range scans seek to the tightest lower bound
/// on the leading key column and stop once past the upper bound.
#[derive(Debug)]
pub struct OrderedIndex {
    metadata: IndexMetadata,
    tree: RwLock<BTreeMap<Vec<u8>, Entry>>,
    entries: AtomicUsize,
}

impl OrderedIndex {
    pub fn new(metadata: IndexMetadata) -> Self { Self { metadata, tree: RwLock::new(BTreeMap::new()), entries: AtomicUsize::new(0) } }

    fn encode(&self, key: &IndexKey) -> Result<Vec<u8>, IndexError> {
        if key.len() != self.metadata.key_spec.len() {
            return Err(IndexError::KeyArity { expected: self.metadata.key_spec.len(), actual: key.len() });
        }
        Ok(coerce_key(&self.metadata.key_spec, key).unwrap_or_else(|| key.clone()).encode())
    }

    /// Encoded prefix where keys whose leading component is `bound` begin.
    fn seek_prefix(&self, bound: RangeBound<&Value>) -> Option<Vec<u8>> {
        let (RangeBound::Included(value) | RangeBound::Excluded(value)) = bound else { return None };
        let probe = coerce_probe(value, self.metadata.key_spec.keyparts.first()?.value_type)?;
        let mut prefix = Vec::new();
        encode_component(Some(&probe), &mut prefix);
        Some(prefix)
    }
}

/// True once `leading` sorts beyond `upper`, so no later key can match.
fn past_upper(leading: Option<&Value>, upper: &RangeBound<&Value>) -> bool {
    let Some(leading) = leading else { return false };
    match upper {
        RangeBound::Included(u) => leading.collate(u) == Some(std::cmp::Ordering::Greater),
        RangeBound::Excluded(u) => matches!(leading.collate(u), Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)),
        RangeBound::Unbounded => false,
    }
}

impl Index for OrderedIndex {
    fn metadata(&self) -> &IndexMetadata { &self.metadata }

    fn insert_entry(&self, key: &IndexKey, location: ItemPointer) -> Result<(), IndexError> {
        let encoded = self.encode(key)?;
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        let entry = tree.entry(encoded).or_insert_with(|| Entry { key: key.clone(), locations: Vec::new() });
        if entry.locations.contains(&location) {
            return Ok(());
        }
        if self.metadata.unique && !key.has_null() && !entry.locations.is_empty() {
            debug!("index {}: duplicate key {} (held by {})", self.metadata.name, key, entry.locations[0]);
            return Err(IndexError::UniqueViolation { index: self.metadata.name.clone(), key: key.to_string() });
        }
        entry.locations.push(location);
        self.entries.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn delete_entry(&self, key: &IndexKey, location: ItemPointer) -> bool {
        let Ok(encoded) = self.encode(key) else { return false };
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = tree.get_mut(&encoded) else { return false };
        let Some(position) = entry.locations.iter().position(|l| *l == location) else { return false };
        entry.locations.swap_remove(position);
        if entry.locations.is_empty() {
            tree.remove(&encoded);
        }
        self.entries.fetch_sub(1, Ordering::AcqRel);
        true
    }

    fn scan_key(&self, key: &IndexKey) -> Vec<ItemPointer> {
        if key.len() != self.metadata.key_spec.len() {
            return Vec::new();
        }
        // a probe with no equal in the key types matches nothing
        let Some(probe) = coerce_key(&self.metadata.key_spec, key) else { return Vec::new() };
        let encoded = probe.encode();
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        tree.get(&encoded).map(|entry| entry.locations.clone()).unwrap_or_default()
    }

    fn scan(&self, key_column_ids: &[ColumnId], expr_types: &[ExpressionType], values: &[Value]) -> Result<Vec<ItemPointer>, IndexError> {
        let predicates = KeyPredicates::compile(&self.metadata.key_spec, key_column_ids, expr_types, values)?;
        let start = match self.seek_prefix(predicates.leading_lower()) {
            Some(prefix) => Bound::Included(prefix),
            None => Bound::Unbounded,
        };
        let upper = predicates.leading_upper();

        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        let mut result = Vec::new();
        let mut visited = 0usize;
        for (_, entry) in tree.range((start, Bound::Unbounded)) {
            if past_upper(entry.key.get(0), &upper) {
                break;
            }
            visited += 1;
            if predicates.matches(&entry.key) {
                result.extend_from_slice(&entry.locations);
            }
        }
        trace!("index {}: scan visited {} keys, {} locations", self.metadata.name, visited, result.len());
        Ok(result)
    }

    fn entry_count(&self) -> usize { self.entries.load(Ordering::Acquire) }
}
