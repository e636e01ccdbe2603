//! Per-table collection of secondary indexes and the tuple → index entry
//! synchronization used by `DataTable`.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tilebase_proto::{ItemPointer, Oid};
use tracing::{debug, warn};

use crate::error::{IndexError, TableError};
use crate::indexing::{Index, IndexKey, NullKeyPolicy};
use crate::tuple::Tuple;

/// Table-local index identifier. Assigned in creation order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexId(pub u32);

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexEntryStatus {
    Inserted,
    /// NULL key under `NullKeyPolicy::Skip`.
    Skipped,
}

#[derive(Debug)]
pub struct IndexInsertFailure {
    pub index_id: IndexId,
    pub index_oid: Oid,
    pub error: IndexError,
}

/// Per-index result of `try_insert`. Indexes are visited in order and the
/// first failure ends the pass, so indexes after it were not attempted.
#[derive(Debug, Default)]
pub struct IndexInsertOutcome {
    pub applied: Vec<(IndexId, IndexEntryStatus)>,
    pub failure: Option<IndexInsertFailure>,
}

impl IndexInsertOutcome {
    pub fn is_success(&self) -> bool { self.failure.is_none() }

    /// Indexes that received an entry.
    pub fn inserted(&self) -> impl Iterator<Item = IndexId> + '_ {
        self.applied.iter().filter(|(_, status)| *status == IndexEntryStatus::Inserted).map(|(id, _)| *id)
    }
}

#[derive(Debug, Default)]
struct IndexSetInner {
    entries: Vec<(IndexId, Arc<dyn Index>)>,
    next_id: u32,
}

#[derive(Debug, Default)]
pub struct IndexSet {
    inner: RwLock<IndexSetInner>,
}

impl IndexSet {
    pub fn new() -> Self { Self::default() }

    /// Register an index. Oids and names must be unique within the set.
    pub fn add(&self, index: Arc<dyn Index>) -> Result<IndexId, TableError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.entries.iter().any(|(_, existing)| existing.oid() == index.oid() || existing.name() == index.name()) {
            return Err(TableError::DuplicateIndex(index.name().to_string()));
        }
        let id = IndexId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push((id, index));
        Ok(id)
    }

    pub fn remove_by_oid(&self, oid: Oid) -> Option<Arc<dyn Index>> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let position = inner.entries.iter().position(|(_, index)| index.oid() == oid)?;
        Some(inner.entries.remove(position).1)
    }

    pub fn get(&self, id: IndexId) -> Option<Arc<dyn Index>> { self.find(|(entry_id, _)| *entry_id == id) }

    pub fn get_by_oid(&self, oid: Oid) -> Option<Arc<dyn Index>> { self.find(|(_, index)| index.oid() == oid) }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn Index>> { self.find(|(_, index)| index.name() == name) }

    fn find(&self, pred: impl Fn(&(IndexId, Arc<dyn Index>)) -> bool) -> Option<Arc<dyn Index>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.iter().find(|entry| pred(entry)).map(|(_, index)| index.clone())
    }

    pub fn len(&self) -> usize { self.inner.read().unwrap_or_else(PoisonError::into_inner).entries.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Point-in-time copy of the registered indexes, in creation order.
    pub fn snapshot(&self) -> Vec<(IndexId, Arc<dyn Index>)> { self.inner.read().unwrap_or_else(PoisonError::into_inner).entries.clone() }

    /// The key `tuple` contributes to `index`, or None if the null policy leaves it out.
    pub fn key_for(index: &dyn Index, tuple: &Tuple) -> Option<IndexKey> {
        let metadata = index.metadata();
        let key = tuple.key(metadata.key_spec.columns());
        if key.has_null() && metadata.null_keys == NullKeyPolicy::Skip {
            return None;
        }
        Some(key)
    }

    /// Insert `tuple` into every index, stopping at the first failure.
    /// Entries already added to earlier indexes stay in place.
    pub fn insert(&self, tuple: &Tuple, location: ItemPointer) -> Result<(), TableError> {
        for (_, index) in self.snapshot() {
            if let Some(key) = Self::key_for(index.as_ref(), tuple) {
                index.insert_entry(&key, location).map_err(|source| TableError::Index { index: index.name().to_string(), source })?;
            }
        }
        Ok(())
    }

    /// Insert `tuple` into every index, reporting each index's outcome.
    pub fn try_insert(&self, tuple: &Tuple, location: ItemPointer) -> IndexInsertOutcome {
        let mut outcome = IndexInsertOutcome::default();
        for (index_id, index) in self.snapshot() {
            let Some(key) = Self::key_for(index.as_ref(), tuple) else {
                outcome.applied.push((index_id, IndexEntryStatus::Skipped));
                continue;
            };
            match index.insert_entry(&key, location) {
                Ok(()) => outcome.applied.push((index_id, IndexEntryStatus::Inserted)),
                Err(error) => {
                    debug!("index {} rejected {} at {}: {}", index.name(), key, location, error);
                    outcome.failure = Some(IndexInsertFailure { index_id, index_oid: index.oid(), error });
                    break;
                }
            }
        }
        outcome
    }

    /// Remove `tuple`'s entries from every index. Returns the number removed.
    pub fn delete(&self, tuple: &Tuple, location: ItemPointer) -> usize {
        let mut removed = 0;
        for (_, index) in self.snapshot() {
            if let Some(key) = Self::key_for(index.as_ref(), tuple) {
                if index.delete_entry(&key, location) {
                    removed += 1;
                } else {
                    warn!("index {} had no entry {} -> {}", index.name(), key, location);
                }
            }
        }
        removed
    }

    /// Remove whatever entries point at `location` for `tuple`, in every index
    /// registered now. Indexes without such an entry are passed over silently.
    pub fn purge(&self, tuple: &Tuple, location: ItemPointer) -> usize {
        self.snapshot()
            .into_iter()
            .filter_map(|(_, index)| Self::key_for(index.as_ref(), tuple).map(|key| index.delete_entry(&key, location)))
            .filter(|removed| *removed)
            .count()
    }

    /// Undo entries reported as inserted by `outcome`.
    pub fn rollback(&self, tuple: &Tuple, location: ItemPointer, outcome: &IndexInsertOutcome) {
        for index_id in outcome.inserted() {
            if let Some(index) = self.get(index_id) {
                if let Some(key) = Self::key_for(index.as_ref(), tuple) {
                    index.delete_entry(&key, location);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::NullKeyPolicy;
    use crate::schema::{Column, Schema};
    use crate::test_support::ListIndex;
    use crate::value::{Value, ValueType};
    use tilebase_proto::TileGroupId;

    fn schema() -> Schema { Schema::new(vec![Column::new("id", ValueType::I32), Column::new("name", ValueType::String)]) }

    fn at(offset: u32) -> ItemPointer { ItemPointer::new(TileGroupId(0), offset) }

    fn row(id: i32, name: Option<&str>) -> Tuple { Tuple::new(vec![Some(Value::I32(id)), name.map(Value::from)]) }

    #[test]
    fn test_add_rejects_duplicates() {
        let set = IndexSet::new();
        assert_eq!(set.add(ListIndex::on(&schema(), Oid(1), 10, "by_id", &[0]).shared()).unwrap(), IndexId(0));
        assert!(matches!(set.add(ListIndex::on(&schema(), Oid(1), 10, "other", &[1]).shared()), Err(TableError::DuplicateIndex(_))));
        assert!(matches!(set.add(ListIndex::on(&schema(), Oid(1), 11, "by_id", &[1]).shared()), Err(TableError::DuplicateIndex(_))));
        assert_eq!(set.add(ListIndex::on(&schema(), Oid(1), 11, "by_name", &[1]).shared()).unwrap(), IndexId(1));

        assert!(set.remove_by_oid(Oid(10)).is_some());
        // ids are never reused
        assert_eq!(set.add(ListIndex::on(&schema(), Oid(1), 12, "again", &[0]).shared()).unwrap(), IndexId(2));
        assert_eq!(set.len(), 2);
        assert_eq!(set.get_by_name("by_name").map(|i| i.oid()), Some(Oid(11)));
    }

    #[test]
    fn test_null_keys_follow_policy() {
        let set = IndexSet::new();
        set.add(ListIndex::on(&schema(), Oid(1), 10, "skip", &[1]).shared()).unwrap();
        let mut include = ListIndex::on(&schema(), Oid(1), 11, "include", &[1]);
        include = ListIndex::new(include.metadata().clone().null_keys(NullKeyPolicy::Include));
        set.add(include.shared()).unwrap();

        let outcome = set.try_insert(&row(1, None), at(0));
        assert!(outcome.is_success());
        assert_eq!(outcome.applied, vec![(IndexId(0), IndexEntryStatus::Skipped), (IndexId(1), IndexEntryStatus::Inserted)]);
        assert_eq!(set.get(IndexId(0)).unwrap().entry_count(), 0);
        assert_eq!(set.get(IndexId(1)).unwrap().entry_count(), 1);
    }

    #[test]
    fn test_try_insert_stops_at_first_failure() {
        let set = IndexSet::new();
        set.add(ListIndex::on(&schema(), Oid(1), 10, "by_id", &[0]).shared()).unwrap();
        set.add(ListIndex::on(&schema(), Oid(1), 11, "unique_name", &[1]).unique().shared()).unwrap();
        set.add(ListIndex::on(&schema(), Oid(1), 12, "by_both", &[0, 1]).shared()).unwrap();

        assert!(set.try_insert(&row(1, Some("a")), at(0)).is_success());
        let outcome = set.try_insert(&row(2, Some("a")), at(1));
        let failure = outcome.failure.as_ref().unwrap();
        assert_eq!(failure.index_oid, Oid(11));
        assert!(matches!(failure.error, IndexError::UniqueViolation { .. }));
        assert_eq!(outcome.inserted().collect::<Vec<_>>(), vec![IndexId(0)]);
        assert_eq!(set.get(IndexId(2)).unwrap().entry_count(), 1);

        set.rollback(&row(2, Some("a")), at(1), &outcome);
        assert_eq!(set.get(IndexId(0)).unwrap().entry_count(), 1);
    }

    #[test]
    fn test_insert_and_delete() {
        let set = IndexSet::new();
        set.add(ListIndex::on(&schema(), Oid(1), 10, "by_id", &[0]).shared()).unwrap();
        set.add(ListIndex::on(&schema(), Oid(1), 11, "by_name", &[1]).shared()).unwrap();

        set.insert(&row(1, Some("a")), at(0)).unwrap();
        set.insert(&row(2, None), at(1)).unwrap();
        assert_eq!(set.delete(&row(1, Some("a")), at(0)), 2);
        assert_eq!(set.delete(&row(2, None), at(1)), 1);
        assert_eq!(set.delete(&row(2, None), at(1)), 0);
    }

    #[test]
    fn test_purge_reaches_every_current_index() {
        let set = IndexSet::new();
        set.add(ListIndex::on(&schema(), Oid(1), 10, "by_id", &[0]).shared()).unwrap();
        let outcome = set.try_insert(&row(1, Some("a")), at(0));

        // registered after the insert and given the entry directly
        let late = ListIndex::on(&schema(), Oid(1), 11, "late", &[1]).shared();
        set.add(late.clone()).unwrap();
        late.insert_entry(&IndexKey::from(vec![Value::from("a")]), at(0)).unwrap();
        assert_eq!(outcome.inserted().count(), 1);

        assert_eq!(set.purge(&row(1, Some("a")), at(0)), 2);
        assert_eq!(late.entry_count(), 0);
        assert_eq!(set.purge(&row(1, Some("a")), at(0)), 0);
    }
}
