//! Generic scan information shared by every scan translation: the residual
//! predicate, the output columns and an optional parent node.

use tilebase_core::DataTable;
use tilebase_proto::{ColumnId, Predicate, ScanStateHeader, TargetEntry};

use crate::config::TransformOptions;
use crate::plan::{PlanKind, PlanNode, ProjectionPlan};

#[derive(Debug, Clone)]
pub struct GenericScanInfo {
    pub parent: Option<PlanNode>,
    pub predicate: Option<Predicate>,
    pub column_ids: Vec<ColumnId>,
}

pub trait ScanInfoExtractor: Send + Sync {
    fn extract(&self, header: &ScanStateHeader, table: &DataTable, options: TransformOptions) -> GenericScanInfo;
}

/// Takes the qual as the residual predicate and derives output columns from the
/// projection: its column references, one-indexed, become zero-indexed ids.
/// A projection with computed targets gets a `Projection` parent that consumes them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultScanInfo;

impl ScanInfoExtractor for DefaultScanInfo {
    fn extract(&self, header: &ScanStateHeader, table: &DataTable, options: TransformOptions) -> GenericScanInfo {
        let all_columns = || (0..table.schema().column_count() as ColumnId).collect::<Vec<_>>();
        let predicate = header.qual.clone();

        let Some(projection) = header.projection.as_ref().filter(|_| options.use_projection_info) else {
            return GenericScanInfo { parent: None, predicate, column_ids: all_columns() };
        };

        let mut column_ids: Vec<ColumnId> = Vec::new();
        for attno in projection.targets.iter().flat_map(|target| match target {
            TargetEntry::Column(attno) => std::slice::from_ref(attno),
            TargetEntry::Computed { inputs, .. } => inputs.as_slice(),
        }) {
            if *attno < 1 {
                continue;
            }
            let column = (*attno - 1) as ColumnId;
            if !column_ids.contains(&column) {
                column_ids.push(column);
            }
        }
        if column_ids.is_empty() {
            column_ids = all_columns();
        }

        let parent = (!projection.is_simple()).then(|| PlanNode::new(PlanKind::Projection(ProjectionPlan { targets: projection.targets.clone() })));
        GenericScanInfo { parent, predicate, column_ids }
    }
}
