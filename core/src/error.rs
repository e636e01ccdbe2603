use thiserror::Error;
use tilebase_proto::{ColumnId, ItemPointer, Oid};

use crate::value::ValueType;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("duplicate key {key} violates unique index {index}")]
    UniqueViolation { index: String, key: String },
    #[error("column {column} is not part of the index key")]
    ColumnNotInKey { column: ColumnId },
    #[error("scan term {position} has an invalid expression type")]
    InvalidExpression { position: usize },
    #[error("misaligned scan: {columns} columns, {expressions} expressions, {values} values")]
    MisalignedScan { columns: usize, expressions: usize, values: usize },
    #[error("key has {actual} components, index expects {expected}")]
    KeyArity { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("NOT NULL constraint violated on column {name} ({column})")]
    NotNull { column: ColumnId, name: String },
    #[error("tuple has {actual} values, table has {expected} columns")]
    Arity { expected: usize, actual: usize },
    #[error("column {column} expects {expected:?}, got {actual:?}")]
    TypeMismatch { column: ColumnId, expected: ValueType, actual: ValueType },
    #[error("no live tuple at {0}")]
    TupleNotFound(ItemPointer),
    #[error("index {0} already exists")]
    DuplicateIndex(String),
    #[error("index not found: {0}")]
    IndexNotFound(Oid),
    #[error("index {index} does not fit table: {reason}")]
    IndexDefinition { index: String, reason: String },
    #[error("invalid tile group layout: {0}")]
    Layout(String),
    #[error("index {index}: {source}")]
    Index {
        index: String,
        #[source]
        source: IndexError,
    },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("table {table_oid} already exists in database {database_oid}")]
    TableExists { database_oid: Oid, table_oid: Oid },
    #[error("table: {0}")]
    Table(#[from] TableError),
}
