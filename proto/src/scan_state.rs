//! Scan-state objects handed over by the upstream executor. Only the fields the
//! index-scan translation reads are modelled.

use serde::{Deserialize, Serialize};

use crate::{AttrNumber, Oid, Predicate, ScanKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScanDirection {
    Backward,
    NoMovement,
    #[default]
    Forward,
}

/// One output column of a scan's projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetEntry {
    /// Plain reference to a one-indexed column.
    Column(AttrNumber),
    /// Computed output that needs the listed input columns.
    Computed { name: String, inputs: Vec<AttrNumber> },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectionInfo {
    pub targets: Vec<TargetEntry>,
}

impl ProjectionInfo {
    pub fn new(targets: Vec<TargetEntry>) -> Self { Self { targets } }

    pub fn columns(attnos: impl IntoIterator<Item = AttrNumber>) -> Self {
        Self { targets: attnos.into_iter().map(TargetEntry::Column).collect() }
    }

    /// True when every target is a plain column reference.
    pub fn is_simple(&self) -> bool { self.targets.iter().all(|t| matches!(t, TargetEntry::Column(_))) }
}

/// Fields shared by every scan state: target relation, residual qual and projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanStateHeader {
    pub database_oid: Oid,
    pub table_oid: Oid,
    pub qual: Option<Predicate>,
    pub projection: Option<ProjectionInfo>,
}

impl ScanStateHeader {
    pub fn new(database_oid: Oid, table_oid: Oid) -> Self { Self { database_oid, table_oid, qual: None, projection: None } }

    pub fn with_qual(mut self, qual: Predicate) -> Self {
        self.qual = Some(qual);
        self
    }

    pub fn with_projection(mut self, projection: ProjectionInfo) -> Self {
        self.projection = Some(projection);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexScan {
    pub index_oid: Oid,
    pub order_direction: ScanDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexScanState {
    pub header: ScanStateHeader,
    pub plan: IndexScan,
    pub scan_keys: Vec<ScanKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexOnlyScan {
    pub index_oid: Oid,
    pub order_direction: ScanDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexOnlyScanState {
    pub header: ScanStateHeader,
    pub plan: IndexOnlyScan,
    pub scan_keys: Vec<ScanKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitmapIndexScan {
    pub index_oid: Oid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitmapIndexScanState {
    pub plan: BitmapIndexScan,
    pub scan_keys: Vec<ScanKey>,
}

/// Child plan states that can sit below a bitmap heap scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanState {
    BitmapIndexScan(BitmapIndexScanState),
    BitmapAnd(Vec<PlanState>),
    BitmapOr(Vec<PlanState>),
}

impl PlanState {
    pub fn name(&self) -> &'static str {
        match self {
            PlanState::BitmapIndexScan(_) => "BitmapIndexScan",
            PlanState::BitmapAnd(_) => "BitmapAnd",
            PlanState::BitmapOr(_) => "BitmapOr",
        }
    }
}

/// Heap scan driven by a bitmap built from the outer (child) plan state.
/// The index and its scan keys live on the child, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitmapHeapScanState {
    pub header: ScanStateHeader,
    pub outer: Box<PlanState>,
}

impl BitmapHeapScanState {
    pub fn outer_plan_state(&self) -> &PlanState { &self.outer }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_simplicity() {
        assert!(ProjectionInfo::columns([1, 2, 3]).is_simple());
        let computed = ProjectionInfo::new(vec![TargetEntry::Column(1), TargetEntry::Computed { name: "a_plus_b".into(), inputs: vec![1, 2] }]);
        assert!(!computed.is_simple());
    }
}
