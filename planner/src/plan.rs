//! Plan tree produced by translation. Parents own their children; scan nodes hold
//! shared references to the table and index they read.

use std::fmt;
use std::sync::Arc;

use tilebase_core::{DataTable, Tuple};
use tilebase_proto::{ColumnId, ItemPointer, Predicate, ScanDirection, TargetEntry};

use crate::descriptor::IndexScanDescriptor;
use crate::error::PlanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexScanKind {
    Plain,
    IndexOnly,
    BitmapHeap,
}

impl fmt::Display for IndexScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexScanKind::Plain => write!(f, "IndexScan"),
            IndexScanKind::IndexOnly => write!(f, "IndexOnlyScan"),
            IndexScanKind::BitmapHeap => write!(f, "BitmapHeapScan"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndexScanPlan {
    pub kind: IndexScanKind,
    /// Residual qual, evaluated by the executor on fetched tuples.
    pub predicate: Option<Predicate>,
    pub column_ids: Vec<ColumnId>,
    pub table: Arc<DataTable>,
    pub descriptor: IndexScanDescriptor,
    pub direction: ScanDirection,
}

impl IndexScanPlan {
    /// Locations from the index, in index order. `direction` is not applied here.
    pub fn locations(&self) -> Result<Vec<ItemPointer>, PlanError> { self.descriptor.scan() }

    /// Fetch the matching live tuples, projected to `column_ids`.
    pub fn fetch_tuples(&self) -> Result<Vec<(ItemPointer, Tuple)>, PlanError> {
        Ok(self
            .locations()?
            .into_iter()
            .filter_map(|location| self.table.get_tuple(location).map(|tuple| (location, tuple.project(&self.column_ids))))
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionPlan {
    pub targets: Vec<TargetEntry>,
}

#[derive(Debug, Clone)]
pub enum PlanKind {
    IndexScan(IndexScanPlan),
    Projection(ProjectionPlan),
}

#[derive(Debug, Clone)]
pub struct PlanNode {
    kind: PlanKind,
    children: Vec<PlanNode>,
}

impl PlanNode {
    pub fn new(kind: PlanKind) -> Self { Self { kind, children: Vec::new() } }

    pub fn kind(&self) -> &PlanKind { &self.kind }

    pub fn children(&self) -> &[PlanNode] { &self.children }

    pub fn add_child(&mut self, child: PlanNode) { self.children.push(child); }

    pub fn name(&self) -> String {
        match &self.kind {
            PlanKind::IndexScan(scan) => scan.kind.to_string(),
            PlanKind::Projection(_) => "Projection".to_string(),
        }
    }

    pub fn as_index_scan(&self) -> Option<&IndexScanPlan> {
        match &self.kind {
            PlanKind::IndexScan(scan) => Some(scan),
            _ => None,
        }
    }

    /// First index scan in depth-first order, this node included.
    pub fn find_index_scan(&self) -> Option<&IndexScanPlan> {
        self.as_index_scan().or_else(|| self.children.iter().find_map(PlanNode::find_index_scan))
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        match &self.kind {
            PlanKind::IndexScan(scan) => {
                write!(f, "{} on {} using {} columns {:?}", scan.kind, scan.table.name(), scan.descriptor, scan.column_ids)?;
                if let Some(predicate) = &scan.predicate {
                    write!(f, " filter {}", predicate)?;
                }
                if scan.direction != ScanDirection::Forward {
                    write!(f, " {:?}", scan.direction)?;
                }
            }
            PlanKind::Projection(projection) => write!(f, "Projection ({} targets)", projection.targets.len())?,
        }
        writeln!(f)?;
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.fmt_indented(f, 0) }
}
