use serde::{Deserialize, Serialize};
use tilebase_proto::ColumnId;

use crate::indexing::IndexKey;
use crate::value::Value;

/// A row of column values; `None` is SQL NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
    values: Vec<Option<Value>>,
}

impl Tuple {
    pub fn new(values: Vec<Option<Value>>) -> Self { Self { values } }

    /// Tuple with no NULLs.
    pub fn from_values(values: Vec<Value>) -> Self { Self { values: values.into_iter().map(Some).collect() } }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn values(&self) -> &[Option<Value>] { &self.values }

    pub fn get(&self, column: ColumnId) -> Option<&Value> { self.values.get(column as usize).and_then(Option::as_ref) }

    /// Values of `columns`, in that order. Out-of-range columns read as NULL.
    pub fn project(&self, columns: &[ColumnId]) -> Tuple { Tuple::new(columns.iter().map(|c| self.get(*c).cloned()).collect()) }

    pub fn key(&self, columns: impl IntoIterator<Item = ColumnId>) -> IndexKey { IndexKey::new(columns.into_iter().map(|c| self.get(c).cloned()).collect()) }
}
