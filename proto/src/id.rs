use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog object identifier, as handed to us by the upstream planner.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Oid(pub u32);

impl Oid {
    pub const INVALID: Oid = Oid(0);

    pub fn is_valid(&self) -> bool { self.0 != 0 }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Oid({})", self.0) }
}

impl From<u32> for Oid {
    fn from(value: u32) -> Self { Oid(value) }
}

/// Zero-indexed column position inside a table.
pub type ColumnId = u32;

/// One-indexed attribute number used by the upstream planner.
pub type AttrNumber = i16;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Ord, PartialOrd, Debug, Serialize, Deserialize)]
pub struct TileGroupId(pub u32);

impl fmt::Display for TileGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Physical location of a tuple: tile group plus slot offset within it.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Ord, PartialOrd, Debug, Serialize, Deserialize)]
pub struct ItemPointer {
    pub tile_group: TileGroupId,
    pub offset: u32,
}

impl ItemPointer {
    pub fn new(tile_group: TileGroupId, offset: u32) -> Self { Self { tile_group, offset } }
}

impl fmt::Display for ItemPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "({}, {})", self.tile_group, self.offset) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_pointer_ordering() {
        let a = ItemPointer::new(TileGroupId(0), 7);
        let b = ItemPointer::new(TileGroupId(1), 0);
        assert!(a < b);
        assert_eq!(a.to_string(), "(0, 7)");
    }

    #[test]
    fn test_oid_serde() {
        let oid = Oid(16384);
        let json = serde_json::to_string(&oid).unwrap();
        assert_eq!(json, "16384");
        assert!(oid.is_valid());
        assert!(!Oid::INVALID.is_valid());
    }
}
