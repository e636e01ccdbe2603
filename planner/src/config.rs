use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Build a `Projection` parent for computed output columns.
    /// When false every scan outputs all table columns.
    pub use_projection_info: bool,
}

impl TransformOptions {
    pub fn new(use_projection_info: bool) -> Self { Self { use_projection_info } }

    /// Scan all columns; the executor projects.
    pub fn without_projection() -> Self { Self::new(false) }
}

impl Default for TransformOptions {
    fn default() -> Self { Self::new(true) }
}
