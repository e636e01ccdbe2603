use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

use crate::{AttrNumber, Datum, TypeId};

/// B-tree operator strategy attached to a scan key.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StrategyNumber(pub u16);

impl StrategyNumber {
    pub const LESS: StrategyNumber = StrategyNumber(1);
    pub const LESS_EQUAL: StrategyNumber = StrategyNumber(2);
    pub const EQUAL: StrategyNumber = StrategyNumber(3);
    pub const GREATER_EQUAL: StrategyNumber = StrategyNumber(4);
    pub const GREATER: StrategyNumber = StrategyNumber(5);
}

impl fmt::Display for StrategyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Flag bits carried on a scan key.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScanKeyFlags(u32);

impl ScanKeyFlags {
    /// The argument is NULL.
    pub const ISNULL: ScanKeyFlags = ScanKeyFlags(0x0001);
    pub const UNARY: ScanKeyFlags = ScanKeyFlags(0x0002);
    /// First key of a row comparison.
    pub const ROW_HEADER: ScanKeyFlags = ScanKeyFlags(0x0004);
    pub const ROW_MEMBER: ScanKeyFlags = ScanKeyFlags(0x0008);
    pub const ROW_END: ScanKeyFlags = ScanKeyFlags(0x0010);
    /// `indexkey op ANY (array)`
    pub const SEARCHARRAY: ScanKeyFlags = ScanKeyFlags(0x0020);
    /// `indexkey IS NULL`
    pub const SEARCHNULL: ScanKeyFlags = ScanKeyFlags(0x0040);
    /// `indexkey IS NOT NULL`
    pub const SEARCHNOTNULL: ScanKeyFlags = ScanKeyFlags(0x0080);
    pub const ORDER_BY: ScanKeyFlags = ScanKeyFlags(0x0100);

    pub const fn empty() -> Self { ScanKeyFlags(0) }

    pub const fn from_bits(bits: u32) -> Self { ScanKeyFlags(bits) }

    pub const fn bits(&self) -> u32 { self.0 }

    pub const fn is_empty(&self) -> bool { self.0 == 0 }

    pub const fn contains(&self, other: ScanKeyFlags) -> bool { self.0 & other.0 == other.0 && other.0 != 0 }

    /// Names of the known flags that are set, in bit order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        FLAG_NAMES.iter().filter(move |(flag, _)| self.contains(*flag)).map(|(_, name)| *name)
    }
}

impl BitOr for ScanKeyFlags {
    type Output = ScanKeyFlags;
    fn bitor(self, rhs: Self) -> Self::Output { ScanKeyFlags(self.0 | rhs.0) }
}

impl fmt::Debug for ScanKeyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "ScanKeyFlags(empty)");
        }
        write!(f, "ScanKeyFlags({})", self.names().collect::<Vec<_>>().join(" | "))
    }
}

static FLAG_NAMES: [(ScanKeyFlags, &str); 9] = [
    (ScanKeyFlags::ISNULL, "ISNULL"),
    (ScanKeyFlags::UNARY, "UNARY"),
    (ScanKeyFlags::ROW_HEADER, "ROW_HEADER"),
    (ScanKeyFlags::ROW_MEMBER, "ROW_MEMBER"),
    (ScanKeyFlags::ROW_END, "ROW_END"),
    (ScanKeyFlags::SEARCHARRAY, "SEARCHARRAY"),
    (ScanKeyFlags::SEARCHNULL, "SEARCHNULL"),
    (ScanKeyFlags::SEARCHNOTNULL, "SEARCHNOTNULL"),
    (ScanKeyFlags::ORDER_BY, "ORDER_BY"),
];

/// One `column op constant` qualifier as produced by the upstream planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanKey {
    /// One-indexed column number.
    pub attno: AttrNumber,
    pub strategy: StrategyNumber,
    /// Type of `argument`.
    pub subtype: TypeId,
    pub argument: Datum,
    pub flags: ScanKeyFlags,
}

impl ScanKey {
    pub fn new(attno: AttrNumber, strategy: StrategyNumber, argument: Datum, subtype: TypeId) -> Self {
        Self { attno, strategy, subtype, argument, flags: ScanKeyFlags::empty() }
    }

    pub fn with_flags(mut self, flags: ScanKeyFlags) -> Self {
        self.flags = flags;
        self
    }
}
