pub mod config;
pub mod descriptor;
pub mod error;
pub mod plan;
pub mod scan_info;
pub mod scan_key;
pub mod transformer;

pub use config::TransformOptions;
pub use descriptor::{IndexRef, IndexScanDescriptor};
pub use error::{PlanError, TranslationError};
pub use plan::{IndexScanKind, IndexScanPlan, PlanKind, PlanNode, ProjectionPlan};
pub use scan_info::{DefaultScanInfo, GenericScanInfo, ScanInfoExtractor};
pub use scan_key::{strategy_to_expression, ScanKeyBuilder};
pub use tilebase_core::ExpressionType;
pub use transformer::PlanTransformer;
