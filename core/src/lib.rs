pub mod catalog;
pub mod collation;
pub mod config;
pub mod data_table;
pub mod error;
pub mod index_set;
pub mod indexing;
pub mod schema;
pub mod tile_group;
pub mod tuple;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{Catalog, MemoryCatalog};
pub use config::{LayoutConfig, TableConfig};
pub use data_table::DataTable;
pub use error::{CatalogError, IndexError, TableError};
pub use index_set::{IndexEntryStatus, IndexId, IndexInsertFailure, IndexInsertOutcome, IndexSet};
pub use indexing::{ExpressionType, Index, IndexKey, IndexKeyPart, IndexMetadata, IndexMethod, KeySpec, NullKeyPolicy};
pub use schema::{Column, Schema};
pub use tile_group::{TileGroup, TileGroupLayout};
pub use tuple::Tuple;
pub use value::{DecodeError, Value, ValueType};

pub use tilebase_proto as proto;
