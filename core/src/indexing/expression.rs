use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Comparison applied between an index key column and a scan value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpressionType {
    LessThan,
    LessEqual,
    Equal,
    GreaterEqual,
    GreaterThan,
    /// Produced for an unrecognized strategy; a scan carrying it cannot execute.
    Invalid,
}

impl ExpressionType {
    pub fn is_valid(&self) -> bool { !matches!(self, ExpressionType::Invalid) }

    /// Whether `key <op> value` holds given `key.cmp(value)`.
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            ExpressionType::LessThan => ordering == Ordering::Less,
            ExpressionType::LessEqual => ordering != Ordering::Greater,
            ExpressionType::Equal => ordering == Ordering::Equal,
            ExpressionType::GreaterEqual => ordering != Ordering::Less,
            ExpressionType::GreaterThan => ordering == Ordering::Greater,
            ExpressionType::Invalid => false,
        }
    }

    /// Bounds the key from below (`>`, `>=`, `=`).
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, ExpressionType::GreaterThan | ExpressionType::GreaterEqual | ExpressionType::Equal)
    }

    /// Bounds the key from above (`<`, `<=`, `=`).
    pub fn is_upper_bound(&self) -> bool { matches!(self, ExpressionType::LessThan | ExpressionType::LessEqual | ExpressionType::Equal) }
}

impl fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            ExpressionType::LessThan => "<",
            ExpressionType::LessEqual => "<=",
            ExpressionType::Equal => "=",
            ExpressionType::GreaterEqual => ">=",
            ExpressionType::GreaterThan => ">",
            ExpressionType::Invalid => "INVALID",
        };
        write!(f, "{}", op)
    }
}
