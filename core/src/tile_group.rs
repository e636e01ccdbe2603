//! Fixed-capacity storage units. A tile group holds `capacity` tuple slots and
//! splits each tuple's columns across tiles according to its layout.

use std::sync::atomic::{AtomicU32, AtomicU8, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use tilebase_proto::{ColumnId, TileGroupId};

use crate::config::LayoutConfig;
use crate::error::TableError;
use crate::tuple::Tuple;
use crate::value::Value;

const SLOT_FREE: u8 = 0;
const SLOT_OCCUPIED: u8 = 1;
const SLOT_DELETED: u8 = 2;

/// Partition of a table's columns into column groups, one tile per group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGroupLayout {
    groups: Vec<Vec<ColumnId>>,
    // column -> (tile, offset within tile)
    locations: Vec<(usize, usize)>,
}

impl TileGroupLayout {
    pub fn new(groups: Vec<Vec<ColumnId>>, column_count: usize) -> Result<Self, TableError> {
        let mut locations = vec![None; column_count];
        for (tile, group) in groups.iter().enumerate() {
            if group.is_empty() {
                return Err(TableError::Layout(format!("column group {} is empty", tile)));
            }
            for (offset, &column) in group.iter().enumerate() {
                let slot = locations
                    .get_mut(column as usize)
                    .ok_or_else(|| TableError::Layout(format!("column {} is outside the schema", column)))?;
                if slot.is_some() {
                    return Err(TableError::Layout(format!("column {} appears in more than one group", column)));
                }
                *slot = Some((tile, offset));
            }
        }
        let locations = locations
            .into_iter()
            .enumerate()
            .map(|(column, loc)| loc.ok_or_else(|| TableError::Layout(format!("column {} is not in any group", column))))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { groups, locations })
    }

    pub fn row(column_count: usize) -> Self {
        let all = (0..column_count as ColumnId).collect::<Vec<_>>();
        Self { groups: if all.is_empty() { vec![] } else { vec![all] }, locations: (0..column_count).map(|c| (0, c)).collect() }
    }

    pub fn columnar(column_count: usize) -> Self {
        Self { groups: (0..column_count as ColumnId).map(|c| vec![c]).collect(), locations: (0..column_count).map(|c| (c, 0)).collect() }
    }

    pub fn from_config(config: &LayoutConfig, column_count: usize) -> Result<Self, TableError> {
        match config {
            LayoutConfig::Row => Ok(Self::row(column_count)),
            LayoutConfig::Columnar => Ok(Self::columnar(column_count)),
            LayoutConfig::Groups(groups) => Self::new(groups.clone(), column_count),
        }
    }

    pub fn groups(&self) -> &[Vec<ColumnId>] { &self.groups }

    pub fn column_count(&self) -> usize { self.locations.len() }

    /// (tile index, offset within tile) holding `column`.
    pub fn locate(&self, column: ColumnId) -> Option<(usize, usize)> { self.locations.get(column as usize).copied() }
}

/// Values of one column group for every slot of the tile group.
#[derive(Debug)]
struct Tile {
    rows: RwLock<Vec<Vec<Option<Value>>>>,
}

impl Tile {
    fn new(capacity: usize) -> Self { Self { rows: RwLock::new(vec![Vec::new(); capacity]) } }
}

#[derive(Debug)]
pub struct TileGroup {
    id: TileGroupId,
    layout: TileGroupLayout,
    capacity: u32,
    next_slot: AtomicU32,
    slots: Box<[AtomicU8]>,
    tiles: Vec<Tile>,
    live: AtomicUsize,
}

impl TileGroup {
    pub fn new(id: TileGroupId, layout: TileGroupLayout, capacity: u32) -> Self {
        let tiles = layout.groups().iter().map(|_| Tile::new(capacity as usize)).collect();
        let slots = (0..capacity).map(|_| AtomicU8::new(SLOT_FREE)).collect();
        Self { id, layout, capacity, next_slot: AtomicU32::new(0), slots, tiles, live: AtomicUsize::new(0) }
    }

    pub fn id(&self) -> TileGroupId { self.id }

    pub fn capacity(&self) -> u32 { self.capacity }

    pub fn layout(&self) -> &TileGroupLayout { &self.layout }

    pub fn tile_count(&self) -> usize { self.tiles.len() }

    /// Slots handed out so far, including deleted ones.
    pub fn allocated_slots(&self) -> u32 { self.next_slot.load(Ordering::Acquire).min(self.capacity) }

    pub fn is_full(&self) -> bool { self.next_slot.load(Ordering::Acquire) >= self.capacity }

    pub fn live_tuple_count(&self) -> usize { self.live.load(Ordering::Acquire) }

    /// Claim a slot and write `tuple` into it. Returns None when the group is full.
    /// Slots are never reused once handed out.
    pub fn insert_tuple(&self, tuple: &Tuple) -> Option<u32> {
        let offset = self.next_slot.fetch_add(1, Ordering::AcqRel);
        if offset >= self.capacity {
            return None;
        }
        for (tile, group) in self.tiles.iter().zip(self.layout.groups()) {
            let values = group.iter().map(|c| tuple.get(*c).cloned()).collect();
            tile.rows.write().unwrap_or_else(PoisonError::into_inner)[offset as usize] = values;
        }
        self.live.fetch_add(1, Ordering::AcqRel);
        self.slots[offset as usize].store(SLOT_OCCUPIED, Ordering::Release);
        Some(offset)
    }

    /// Reassemble the tuple at `offset` from its tiles, if the slot is live.
    pub fn get_tuple(&self, offset: u32) -> Option<Tuple> {
        if self.slots.get(offset as usize)?.load(Ordering::Acquire) != SLOT_OCCUPIED {
            return None;
        }
        let mut values = vec![None; self.layout.column_count()];
        for (tile, group) in self.tiles.iter().zip(self.layout.groups()) {
            let rows = tile.rows.read().unwrap_or_else(PoisonError::into_inner);
            for (column, value) in group.iter().zip(&rows[offset as usize]) {
                values[*column as usize] = value.clone();
            }
        }
        Some(Tuple::new(values))
    }

    /// Read a single column without assembling the whole tuple.
    pub fn get_value(&self, offset: u32, column: ColumnId) -> Option<Value> {
        if self.slots.get(offset as usize)?.load(Ordering::Acquire) != SLOT_OCCUPIED {
            return None;
        }
        let (tile, position) = self.layout.locate(column)?;
        let rows = self.tiles[tile].rows.read().unwrap_or_else(PoisonError::into_inner);
        rows[offset as usize].get(position).cloned().flatten()
    }

    /// Mark the slot deleted and return the tuple it held. Only one caller wins.
    pub fn delete_tuple(&self, offset: u32) -> Option<Tuple> {
        let tuple = self.get_tuple(offset)?;
        self.slots[offset as usize].compare_exchange(SLOT_OCCUPIED, SLOT_DELETED, Ordering::AcqRel, Ordering::Acquire).ok()?;
        for tile in &self.tiles {
            tile.rows.write().unwrap_or_else(PoisonError::into_inner)[offset as usize] = Vec::new();
        }
        self.live.fetch_sub(1, Ordering::AcqRel);
        Some(tuple)
    }

    /// Live tuples with their offsets, in slot order.
    pub fn tuples(&self) -> Vec<(u32, Tuple)> { (0..self.allocated_slots()).filter_map(|offset| self.get_tuple(offset).map(|t| (offset, t))).collect() }
}
