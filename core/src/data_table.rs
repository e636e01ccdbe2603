use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use append_only_vec::AppendOnlyVec;
use tilebase_proto::{ItemPointer, Oid, TileGroupId};
use tracing::{debug, info, warn};

use crate::config::TableConfig;
use crate::error::TableError;
use crate::index_set::{IndexId, IndexInsertOutcome, IndexSet};
use crate::indexing::Index;
use crate::schema::Schema;
use crate::tile_group::{TileGroup, TileGroupLayout};
use crate::tuple::Tuple;

/// A logical table: an append-only sequence of tile groups plus its secondary indexes.
///
/// ```text
/// <Tile Group 0>
/// <Tile Group 1>
/// ...
/// <Tile Group n>   <- inserts land here until it fills
/// ```
///
/// Every live tuple has an entry in each index, except where the index's null
/// policy skips a NULL key. Index maintenance is per index; there is no
/// atomicity across indexes at this layer.
pub struct DataTable {
    oid: Oid,
    database_oid: Oid,
    name: String,
    schema: Schema,
    config: TableConfig,
    layout: TileGroupLayout,
    tile_groups: AppendOnlyVec<Arc<TileGroup>>,
    grow_lock: Mutex<()>,
    indexes: IndexSet,
}

impl DataTable {
    pub fn new(oid: Oid, database_oid: Oid, name: impl Into<String>, schema: Schema, config: TableConfig) -> Result<Self, TableError> {
        let layout = TileGroupLayout::from_config(&config.layout, schema.column_count())?;
        let table = Self {
            oid,
            database_oid,
            name: name.into(),
            schema,
            config,
            layout,
            tile_groups: AppendOnlyVec::new(),
            grow_lock: Mutex::new(()),
            indexes: IndexSet::new(),
        };
        table.append_tile_group();
        Ok(table)
    }

    pub fn oid(&self) -> Oid { self.oid }

    pub fn database_oid(&self) -> Oid { self.database_oid }

    pub fn name(&self) -> &str { &self.name }

    pub fn schema(&self) -> &Schema { &self.schema }

    pub fn config(&self) -> &TableConfig { &self.config }

    //===--------------------------------------------------------------------===//
    // Tile groups
    //===--------------------------------------------------------------------===//

    pub fn tile_group_count(&self) -> usize { self.tile_groups.len() }

    pub fn tile_group(&self, id: TileGroupId) -> Option<Arc<TileGroup>> {
        let position = id.0 as usize;
        (position < self.tile_groups.len()).then(|| self.tile_groups[position].clone())
    }

    fn last_tile_group(&self) -> Arc<TileGroup> {
        // the constructor appends the first group, so len() >= 1
        self.tile_groups[self.tile_groups.len() - 1].clone()
    }

    fn append_tile_group(&self) -> TileGroupId {
        let id = TileGroupId(self.tile_groups.len() as u32);
        self.tile_groups.push(Arc::new(TileGroup::new(id, self.layout.clone(), self.config.tile_group_capacity)));
        debug!("table {}: appended tile group {}", self.name, id);
        id
    }

    /// Append a new tile group unless another writer already replaced `full` as the last one.
    fn grow(&self, full: TileGroupId) {
        let _guard = self.grow_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.last_tile_group().id() == full {
            self.append_tile_group();
        }
    }

    fn insert_into_tile_group(&self, tuple: &Tuple) -> ItemPointer {
        loop {
            let group = self.last_tile_group();
            if let Some(offset) = group.insert_tuple(tuple) {
                return ItemPointer::new(group.id(), offset);
            }
            self.grow(group.id());
        }
    }

    pub fn get_tuple(&self, location: ItemPointer) -> Option<Tuple> { self.tile_group(location.tile_group)?.get_tuple(location.offset) }

    /// Live tuples in tile-group then slot order.
    pub fn scan_tuples(&self) -> Vec<(ItemPointer, Tuple)> {
        self.tile_groups
            .iter()
            .flat_map(|group| group.tuples().into_iter().map(move |(offset, tuple)| (ItemPointer::new(group.id(), offset), tuple)))
            .collect()
    }

    pub fn tuple_count(&self) -> usize { self.tile_groups.iter().map(|g| g.live_tuple_count()).sum() }

    //===--------------------------------------------------------------------===//
    // Tuples
    //===--------------------------------------------------------------------===//

    /// Reject a tuple with NULL in a NOT NULL column.
    pub fn check_nulls(&self, tuple: &Tuple) -> Result<(), TableError> { self.schema.check_nulls(tuple) }

    fn prepare(&self, tuple: &Tuple) -> Result<Tuple, TableError> {
        self.schema.validate(tuple)?;
        self.check_nulls(tuple)?;
        Ok(self.schema.coerce(tuple))
    }

    /// Store `tuple` and add it to every index.
    ///
    /// Constraint checks run before anything is written. If an index insert fails the
    /// tuple and the entries already added remain; use `insert_tuple_atomic` to undo them.
    pub fn insert_tuple(&self, tuple: &Tuple) -> Result<ItemPointer, TableError> {
        let tuple = self.prepare(tuple)?;
        let location = self.insert_into_tile_group(&tuple);
        self.insert_in_indexes(&tuple, location)?;
        Ok(location)
    }

    /// Like `insert_tuple`, but on an index failure frees the tuple's slot and removes
    /// its entries from every index registered by then before returning the error.
    pub fn insert_tuple_atomic(&self, tuple: &Tuple) -> Result<ItemPointer, TableError> {
        let tuple = self.prepare(tuple)?;
        let location = self.insert_into_tile_group(&tuple);
        let mut outcome = self.try_insert_in_indexes(&tuple, location);
        let Some(failure) = outcome.failure.take() else {
            return Ok(location);
        };

        // slot before entries: a backfill that sees the slot dead removes its own entry
        if let Some(group) = self.tile_group(location.tile_group) {
            group.delete_tuple(location.offset);
        }
        let removed = self.indexes.purge(&tuple, location);
        debug!("table {}: removed {} entries for {} (outcome listed {})", self.name, removed, location, outcome.inserted().count());
        let index = self.indexes.get(failure.index_id).map(|i| i.name().to_string()).unwrap_or_else(|| failure.index_oid.to_string());
        warn!("table {}: insert at {} rolled back, index {} failed", self.name, location, index);
        Err(TableError::Index { index, source: failure.error })
    }

    /// Remove the tuple at `location` and its index entries.
    pub fn delete_tuple(&self, location: ItemPointer) -> Result<Tuple, TableError> {
        let group = self.tile_group(location.tile_group).ok_or(TableError::TupleNotFound(location))?;
        let tuple = group.delete_tuple(location.offset).ok_or(TableError::TupleNotFound(location))?;
        self.delete_in_indexes(&tuple, location);
        Ok(tuple)
    }

    //===--------------------------------------------------------------------===//
    // Indexes
    //===--------------------------------------------------------------------===//

    /// Register `index` and backfill it from the tuples already stored.
    pub fn add_index(&self, index: Arc<dyn Index>) -> Result<IndexId, TableError> {
        self.validate_index(index.as_ref())?;
        let id = self.indexes.add(index.clone())?;

        // Writers snapshot the index set after placing their tuple, so anything
        // they miss is already visible to this scan.
        let mut backfilled = 0;
        for (location, tuple) in self.scan_tuples() {
            let Some(key) = IndexSet::key_for(index.as_ref(), &tuple) else { continue };
            if let Err(source) = index.insert_entry(&key, location) {
                self.indexes.remove_by_oid(index.oid());
                return Err(TableError::Index { index: index.name().to_string(), source });
            }
            // a concurrent delete may have run between the scan and the insert
            if self.get_tuple(location).is_none() {
                index.delete_entry(&key, location);
            } else {
                backfilled += 1;
            }
        }
        info!("table {}: added index {} ({} entries backfilled)", self.name, index.metadata(), backfilled);
        Ok(id)
    }

    fn validate_index(&self, index: &dyn Index) -> Result<(), TableError> {
        let metadata = index.metadata();
        let invalid = |reason: String| TableError::IndexDefinition { index: metadata.name.clone(), reason };
        if metadata.table_oid != self.oid {
            return Err(invalid(format!("built for table {}", metadata.table_oid)));
        }
        if metadata.key_spec.is_empty() {
            return Err(invalid("empty key".to_string()));
        }
        for part in &metadata.key_spec.keyparts {
            let column = self.schema.column(part.column).ok_or_else(|| invalid(format!("no column {}", part.column)))?;
            if column.value_type != part.value_type {
                return Err(invalid(format!("column {} is {:?}, key expects {:?}", part.column, column.value_type, part.value_type)));
            }
        }
        Ok(())
    }

    pub fn drop_index(&self, oid: Oid) -> Result<Arc<dyn Index>, TableError> { self.indexes.remove_by_oid(oid).ok_or(TableError::IndexNotFound(oid)) }

    pub fn index_count(&self) -> usize { self.indexes.len() }

    pub fn index(&self, id: IndexId) -> Option<Arc<dyn Index>> { self.indexes.get(id) }

    pub fn index_with_oid(&self, oid: Oid) -> Option<Arc<dyn Index>> { self.indexes.get_by_oid(oid) }

    pub fn index_with_name(&self, name: &str) -> Option<Arc<dyn Index>> { self.indexes.get_by_name(name) }

    pub fn indexes(&self) -> Vec<(IndexId, Arc<dyn Index>)> { self.indexes.snapshot() }

    pub fn insert_in_indexes(&self, tuple: &Tuple, location: ItemPointer) -> Result<(), TableError> { self.indexes.insert(tuple, location) }

    pub fn try_insert_in_indexes(&self, tuple: &Tuple, location: ItemPointer) -> IndexInsertOutcome { self.indexes.try_insert(tuple, location) }

    pub fn delete_in_indexes(&self, tuple: &Tuple, location: ItemPointer) -> usize { self.indexes.delete(tuple, location) }
}

impl fmt::Debug for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("oid", &self.oid)
            .field("database_oid", &self.database_oid)
            .field("name", &self.name)
            .field("tile_groups", &self.tile_group_count())
            .field("indexes", &self.index_count())
            .finish()
    }
}

impl fmt::Display for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table {} (oid {}, database {})", self.name, self.oid, self.database_oid)?;
        writeln!(f, "  tile groups: {} x {} slots, {} live tuples", self.tile_group_count(), self.config.tile_group_capacity, self.tuple_count())?;
        for (id, index) in self.indexes() {
            writeln!(f, "  index {}: {}", id, index.metadata())?;
        }
        Ok(())
    }
}
