//! Normalizes upstream scan keys into an `IndexScanDescriptor`.
//!
//! Only `column op constant` keys with one of the five B-tree strategies are
//! understood. Anything else aborts the translation, except an unknown strategy,
//! which is kept as `ExpressionType::Invalid` so the descriptor is refused at
//! execution time. Keys are passed through in input order; redundant terms such as
//! `a > 4 AND a > 3` are not simplified.

use tilebase_core::{ExpressionType, Value};
use tilebase_proto::{ScanKey, ScanKeyFlags, StrategyNumber};
use tracing::{debug, error};

use crate::descriptor::{IndexRef, IndexScanDescriptor};
use crate::error::TranslationError;

/// Flags that describe key shapes the builder cannot express, in check order.
const UNSUPPORTED_FLAGS: [(ScanKeyFlags, &str); 9] = [
    (ScanKeyFlags::ISNULL, "ISNULL"),
    (ScanKeyFlags::ORDER_BY, "ORDER_BY"),
    (ScanKeyFlags::UNARY, "UNARY"),
    (ScanKeyFlags::ROW_HEADER, "ROW_HEADER"),
    (ScanKeyFlags::ROW_MEMBER, "ROW_MEMBER"),
    (ScanKeyFlags::ROW_END, "ROW_END"),
    (ScanKeyFlags::SEARCHNULL, "SEARCHNULL"),
    (ScanKeyFlags::SEARCHNOTNULL, "SEARCHNOTNULL"),
    (ScanKeyFlags::SEARCHARRAY, "SEARCHARRAY"),
];

pub struct ScanKeyBuilder;

impl ScanKeyBuilder {
    /// Build a descriptor over `index` with one aligned entry per scan key.
    pub fn build(scan_keys: &[ScanKey], index: IndexRef) -> Result<IndexScanDescriptor, TranslationError> {
        if scan_keys.is_empty() {
            return Err(TranslationError::NoScanKeys);
        }

        let mut descriptor = IndexScanDescriptor::new(index);
        for (position, key) in scan_keys.iter().enumerate() {
            if let Some(flag) = UNSUPPORTED_FLAGS.iter().find(|(flag, _)| key.flags.contains(*flag)).map(|(_, name)| *name) {
                error!("scan key {} (key no: {}) has unsupported flag {}", position, key.attno, flag);
                return Err(TranslationError::UnsupportedScanKey { position, flag });
            }
            if key.attno < 1 {
                return Err(TranslationError::InvalidAttribute { position, attno: key.attno });
            }

            let value = Value::from_datum(&key.argument, key.subtype).map_err(|source| TranslationError::Decode { position, source })?;
            let expr_type = strategy_to_expression(key.strategy);
            if expr_type.is_valid() {
                debug!("key no: {} {} {}", key.attno, expr_type, value);
            } else {
                error!("Invalid strategy num {} on key no: {}", key.strategy, key.attno);
            }
            // attribute numbers are one-indexed
            descriptor.push((key.attno - 1) as u32, expr_type, value);
        }
        Ok(descriptor)
    }
}

pub fn strategy_to_expression(strategy: StrategyNumber) -> ExpressionType {
    match strategy {
        StrategyNumber::LESS => ExpressionType::LessThan,
        StrategyNumber::LESS_EQUAL => ExpressionType::LessEqual,
        StrategyNumber::EQUAL => ExpressionType::Equal,
        StrategyNumber::GREATER_EQUAL => ExpressionType::GreaterEqual,
        StrategyNumber::GREATER => ExpressionType::GreaterThan,
        _ => ExpressionType::Invalid,
    }
}
