//! Secondary index contract shared by every index implementation.
//!
//! Implementations own their concurrency control: a single `insert_entry` or
//! `delete_entry` call is atomic with respect to other calls on the same index.
//! Nothing here coordinates across indexes.

pub mod encoding;
pub mod expression;
pub mod key_spec;
pub mod predicate;

pub use encoding::{encode_component, IndexKey};
pub use expression::ExpressionType;
pub use key_spec::{IndexKeyPart, KeySpec};
pub use predicate::{KeyPredicate, KeyPredicates};

use serde::{Deserialize, Serialize};
use std::fmt;
use tilebase_proto::{ColumnId, ItemPointer, Oid};

use crate::error::IndexError;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexMethod {
    /// Ordered map; supports range scans.
    Ordered,
    /// Hash map; point lookups, range predicates fall back to a filtered full pass.
    Hash,
}

/// What to do with tuples whose key contains a NULL component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NullKeyPolicy {
    /// Leave such tuples out of the index.
    #[default]
    Skip,
    /// Index them; NULL sorts first and never conflicts on uniqueness.
    Include,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub oid: Oid,
    pub name: String,
    pub table_oid: Oid,
    pub key_spec: KeySpec,
    pub unique: bool,
    pub method: IndexMethod,
    pub null_keys: NullKeyPolicy,
}

impl IndexMetadata {
    pub fn new(oid: Oid, name: impl Into<String>, table_oid: Oid, key_spec: KeySpec) -> Self {
        Self { oid, name: name.into(), table_oid, key_spec, unique: false, method: IndexMethod::Ordered, null_keys: NullKeyPolicy::Skip }
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn method(mut self, method: IndexMethod) -> Self {
        self.method = method;
        self
    }

    pub fn null_keys(mut self, policy: NullKeyPolicy) -> Self {
        self.null_keys = policy;
        self
    }

    pub fn key_columns(&self) -> Vec<ColumnId> { self.key_spec.columns().collect() }
}

impl fmt::Display for IndexMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = self.key_spec.columns().map(|c| c.to_string()).collect();
        write!(
            f,
            "{} (oid {}) {:?}{} on ({})",
            self.name,
            self.oid,
            self.method,
            if self.unique { " unique" } else { "" },
            columns.join(", ")
        )
    }
}

pub trait Index: Send + Sync + fmt::Debug {
    fn metadata(&self) -> &IndexMetadata;

    fn oid(&self) -> Oid { self.metadata().oid }

    fn name(&self) -> &str { &self.metadata().name }

    /// Map `key` to `location`. Re-inserting an existing pair is a no-op.
    /// A unique index rejects a non-NULL key already mapped to another location.
    fn insert_entry(&self, key: &IndexKey, location: ItemPointer) -> Result<(), IndexError>;

    /// Remove the `key` → `location` pair. Returns false if it was not present.
    fn delete_entry(&self, key: &IndexKey, location: ItemPointer) -> bool;

    /// Locations stored under exactly `key`.
    fn scan_key(&self, key: &IndexKey) -> Vec<ItemPointer>;

    /// Locations whose key satisfies every `key_column_ids[i] expr_types[i] values[i]` term.
    /// Column ids are table columns and must belong to this index's key.
    fn scan(&self, key_column_ids: &[ColumnId], expr_types: &[ExpressionType], values: &[Value]) -> Result<Vec<ItemPointer>, IndexError>;

    /// Number of (key, location) pairs held.
    fn entry_count(&self) -> usize;
}
