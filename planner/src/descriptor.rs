use std::fmt;
use std::sync::Arc;

use tilebase_core::{ExpressionType, Index, Value};
use tilebase_proto::{ColumnId, ItemPointer, Oid};

use crate::error::PlanError;

/// Outcome of resolving a scan's index on its table.
#[derive(Clone)]
pub enum IndexRef {
    Resolved(Arc<dyn Index>),
    NotFound(Oid),
}

impl IndexRef {
    pub fn oid(&self) -> Oid {
        match self {
            IndexRef::Resolved(index) => index.oid(),
            IndexRef::NotFound(oid) => *oid,
        }
    }

    pub fn is_resolved(&self) -> bool { matches!(self, IndexRef::Resolved(_)) }

    pub fn resolved(&self) -> Result<&Arc<dyn Index>, PlanError> {
        match self {
            IndexRef::Resolved(index) => Ok(index),
            IndexRef::NotFound(oid) => Err(PlanError::IndexNotFound(*oid)),
        }
    }
}

impl fmt::Debug for IndexRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexRef::Resolved(index) => write!(f, "Resolved({} {})", index.oid(), index.name()),
            IndexRef::NotFound(oid) => write!(f, "NotFound({})", oid),
        }
    }
}

/// Canonical index-scan descriptor: an index plus aligned per-column comparisons.
///
/// Position `i` reads "`key_column_ids[i]` `expr_types[i]` `values[i]`". The three
/// vectors always have the same length; they are only appended to together.
#[derive(Debug, Clone)]
pub struct IndexScanDescriptor {
    index: IndexRef,
    key_column_ids: Vec<ColumnId>,
    expr_types: Vec<ExpressionType>,
    values: Vec<Value>,
}

impl IndexScanDescriptor {
    pub fn new(index: IndexRef) -> Self { Self { index, key_column_ids: Vec::new(), expr_types: Vec::new(), values: Vec::new() } }

    pub fn push(&mut self, column: ColumnId, expr_type: ExpressionType, value: Value) {
        self.key_column_ids.push(column);
        self.expr_types.push(expr_type);
        self.values.push(value);
    }

    pub fn index_ref(&self) -> &IndexRef { &self.index }

    /// The resolved index, or `PlanError::IndexNotFound`.
    pub fn index(&self) -> Result<&Arc<dyn Index>, PlanError> { self.index.resolved() }

    pub fn key_column_ids(&self) -> &[ColumnId] { &self.key_column_ids }

    pub fn expr_types(&self) -> &[ExpressionType] { &self.expr_types }

    pub fn values(&self) -> &[Value] { &self.values }

    pub fn len(&self) -> usize { self.key_column_ids.len() }

    pub fn is_empty(&self) -> bool { self.key_column_ids.is_empty() }

    /// Aligned `(column, expression, value)` triples.
    pub fn predicates(&self) -> impl Iterator<Item = (ColumnId, ExpressionType, &Value)> + '_ {
        self.key_column_ids.iter().zip(&self.expr_types).zip(&self.values).map(|((c, e), v)| (*c, *e, v))
    }

    /// False when the index is missing or any term carries `ExpressionType::Invalid`.
    pub fn is_executable(&self) -> bool { self.index.is_resolved() && self.expr_types.iter().all(ExpressionType::is_valid) }

    /// Run the scan against the resolved index.
    pub fn scan(&self) -> Result<Vec<ItemPointer>, PlanError> {
        let index = self.index()?;
        if let Some(position) = self.expr_types.iter().position(|e| !e.is_valid()) {
            return Err(PlanError::InvalidExpression { position });
        }
        Ok(index.scan(&self.key_column_ids, &self.expr_types, &self.values)?)
    }
}

impl fmt::Display for IndexScanDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.index {
            IndexRef::Resolved(index) => write!(f, "{}", index.name())?,
            IndexRef::NotFound(oid) => write!(f, "<missing index {}>", oid)?,
        }
        write!(f, " [")?;
        for (i, (column, expr, value)) in self.predicates().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "#{} {} {}", column, expr, value)?;
        }
        write!(f, "]")
    }
}
