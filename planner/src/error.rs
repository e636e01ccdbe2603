use thiserror::Error;
use tilebase_core::{DecodeError, IndexError, TableError};
use tilebase_proto::Oid;

/// Failures that abort translation of a scan state. No plan is produced.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("index scan has no scan keys")]
    NoScanKeys,
    #[error("scan key {position} has unsupported flag {flag}")]
    UnsupportedScanKey { position: usize, flag: &'static str },
    #[error("scan key {position} has attribute number {attno}")]
    InvalidAttribute { position: usize, attno: i16 },
    #[error("table {table_oid} not found in database {database_oid}")]
    TableNotFound { database_oid: Oid, table_oid: Oid },
    #[error("scan key {position}: {source}")]
    Decode {
        position: usize,
        #[source]
        source: DecodeError,
    },
    #[error("bitmap heap scan over {0} is not supported")]
    UnsupportedOuterPlan(&'static str),
}

/// Failures from using a translated plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("index not found: {0}")]
    IndexNotFound(Oid),
    #[error("descriptor term {position} has an invalid expression type")]
    InvalidExpression { position: usize },
    #[error("index: {0}")]
    Index(#[from] IndexError),
    #[error("table: {0}")]
    Table(#[from] TableError),
}
