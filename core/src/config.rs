use serde::{Deserialize, Serialize};

pub const DEFAULT_TILE_GROUP_CAPACITY: u32 = 1000;

/// How a table's columns are split into tiles within each tile group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutConfig {
    /// One tile holding every column.
    #[default]
    Row,
    /// One tile per column.
    Columnar,
    /// Explicit column groups; every column must appear exactly once.
    Groups(Vec<Vec<u32>>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Tuple slots per tile group.
    pub tile_group_capacity: u32,
    pub layout: LayoutConfig,
}

impl Default for TableConfig {
    fn default() -> Self { Self { tile_group_capacity: DEFAULT_TILE_GROUP_CAPACITY, layout: LayoutConfig::Row } }
}

impl TableConfig {
    pub fn new(tile_group_capacity: u32, layout: LayoutConfig) -> Self { Self { tile_group_capacity: tile_group_capacity.max(1), layout } }

    /// Row-oriented tile groups
    pub fn row(tile_group_capacity: u32) -> Self { Self::new(tile_group_capacity, LayoutConfig::Row) }

    /// Column-per-tile layout
    pub fn columnar(tile_group_capacity: u32) -> Self { Self::new(tile_group_capacity, LayoutConfig::Columnar) }
}
