pub mod datum;
pub mod id;
pub mod predicate;
pub mod scan_key;
pub mod scan_state;

pub use datum::{Datum, TypeId};
pub use id::{AttrNumber, ColumnId, ItemPointer, Oid, TileGroupId};
pub use predicate::{ComparisonOperator, Predicate};
pub use scan_key::{ScanKey, ScanKeyFlags, StrategyNumber};
pub use scan_state::{
    BitmapHeapScanState, BitmapIndexScan, BitmapIndexScanState, IndexOnlyScan, IndexOnlyScanState, IndexScan, IndexScanState, PlanState,
    ProjectionInfo, ScanDirection, ScanStateHeader, TargetEntry,
};
