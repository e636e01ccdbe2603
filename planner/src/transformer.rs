//! Entry points that turn upstream scan states into `IndexScanPlan` nodes.
//!
//! All three share one path: resolve the table (fatal if missing), resolve the
//! index (a missing index yields a descriptor that refuses to execute), build the
//! descriptor from the scan keys, extract the generic scan info, then hang the
//! new scan node under the extracted parent when there is one.

use std::sync::Arc;

use tilebase_core::{Catalog, DataTable};
use tilebase_proto::{BitmapHeapScanState, IndexOnlyScanState, IndexScanState, Oid, PlanState, ScanDirection, ScanKey, ScanStateHeader};
use tracing::{error, info};

use crate::config::TransformOptions;
use crate::descriptor::IndexRef;
use crate::error::TranslationError;
use crate::plan::{IndexScanKind, IndexScanPlan, PlanKind, PlanNode};
use crate::scan_info::{DefaultScanInfo, ScanInfoExtractor};
use crate::scan_key::ScanKeyBuilder;

/// What one scan state contributes to translation.
struct ScanSource<'a> {
    kind: IndexScanKind,
    header: &'a ScanStateHeader,
    index_oid: Oid,
    direction: ScanDirection,
    scan_keys: &'a [ScanKey],
}

pub struct PlanTransformer<C: Catalog, E: ScanInfoExtractor = DefaultScanInfo> {
    catalog: C,
    scan_info: E,
    options: TransformOptions,
}

impl<C: Catalog> PlanTransformer<C> {
    pub fn new(catalog: C) -> Self { Self { catalog, scan_info: DefaultScanInfo, options: TransformOptions::default() } }
}

impl<C: Catalog, E: ScanInfoExtractor> PlanTransformer<C, E> {
    pub fn with_scan_info<E2: ScanInfoExtractor>(self, scan_info: E2) -> PlanTransformer<C, E2> {
        PlanTransformer { catalog: self.catalog, scan_info, options: self.options }
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> TransformOptions { self.options }

    pub fn catalog(&self) -> &C { &self.catalog }

    pub fn transform_index_scan(&self, state: &IndexScanState) -> Result<PlanNode, TranslationError> {
        self.transform_scan(ScanSource {
            kind: IndexScanKind::Plain,
            header: &state.header,
            index_oid: state.plan.index_oid,
            direction: state.plan.order_direction,
            scan_keys: &state.scan_keys,
        })
    }

    /// Same resolution as `transform_index_scan`; only the node kind differs.
    pub fn transform_index_only_scan(&self, state: &IndexOnlyScanState) -> Result<PlanNode, TranslationError> {
        info!("Index Only Scan :: DB OID :: {} Table OID :: {}", state.header.database_oid, state.header.table_oid);
        self.transform_scan(ScanSource {
            kind: IndexScanKind::IndexOnly,
            header: &state.header,
            index_oid: state.plan.index_oid,
            direction: state.plan.order_direction,
            scan_keys: &state.scan_keys,
        })
    }

    /// The index and scan keys come from the outer bitmap index scan, which must be
    /// the direct child; `BitmapAnd`/`BitmapOr` children are rejected.
    pub fn transform_bitmap_heap_scan(&self, state: &BitmapHeapScanState) -> Result<PlanNode, TranslationError> {
        let outer = match state.outer_plan_state() {
            PlanState::BitmapIndexScan(outer) => outer,
            other => return Err(TranslationError::UnsupportedOuterPlan(other.name())),
        };
        self.transform_scan(ScanSource {
            kind: IndexScanKind::BitmapHeap,
            header: &state.header,
            index_oid: outer.plan.index_oid,
            direction: ScanDirection::Forward,
            scan_keys: &outer.scan_keys,
        })
    }

    fn resolve_table(&self, header: &ScanStateHeader) -> Result<Arc<DataTable>, TranslationError> {
        self.catalog
            .table(header.database_oid, header.table_oid)
            .ok_or(TranslationError::TableNotFound { database_oid: header.database_oid, table_oid: header.table_oid })
    }

    fn resolve_index(table: &DataTable, index_oid: Oid) -> IndexRef {
        match table.index_with_oid(index_oid) {
            Some(index) => {
                info!("Index scan on oid {}, index name: {}", index_oid, index.name());
                IndexRef::Resolved(index)
            }
            None => {
                error!("Can't find index oid {} on table {}", index_oid, table.name());
                IndexRef::NotFound(index_oid)
            }
        }
    }

    fn transform_scan(&self, source: ScanSource<'_>) -> Result<PlanNode, TranslationError> {
        let table = self.resolve_table(source.header)?;
        info!("Scan from: database oid {} table oid {}", source.header.database_oid, source.header.table_oid);
        let index = Self::resolve_index(&table, source.index_oid);

        info!("Scan order: {:?}", source.direction);

        info!("num of scan keys = {}", source.scan_keys.len());
        let descriptor = ScanKeyBuilder::build(source.scan_keys, index)?;

        let info = self.scan_info.extract(source.header, &table, self.options);
        let scan = PlanNode::new(PlanKind::IndexScan(IndexScanPlan {
            kind: source.kind,
            predicate: info.predicate,
            column_ids: info.column_ids,
            table,
            descriptor,
            direction: source.direction,
        }));

        Ok(match info.parent {
            Some(mut parent) => {
                parent.add_child(scan);
                parent
            }
            None => scan,
        })
    }
}
