use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AttrNumber, Datum, TypeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "<>",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
        };
        write!(f, "{}", op)
    }
}

/// Residual qualifier attached to a scan state. Evaluation belongs to the executor;
/// this layer only carries it into the plan node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Comparison { attno: AttrNumber, operator: ComparisonOperator, argument: Datum, type_id: TypeId },
    IsNull(AttrNumber),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    True,
    False,
}

impl Predicate {
    pub fn comparison(attno: AttrNumber, operator: ComparisonOperator, argument: Datum, type_id: TypeId) -> Self {
        Predicate::Comparison { attno, operator, argument, type_id }
    }

    pub fn and(self, other: Predicate) -> Self { Predicate::And(Box::new(self), Box::new(other)) }

    pub fn or(self, other: Predicate) -> Self { Predicate::Or(Box::new(self), Box::new(other)) }

    /// Attribute numbers referenced anywhere in the tree, in order of first appearance.
    pub fn referenced_attributes(&self) -> Vec<AttrNumber> {
        let mut out = Vec::new();
        self.collect_attributes(&mut out);
        out
    }

    fn collect_attributes(&self, out: &mut Vec<AttrNumber>) {
        match self {
            Predicate::Comparison { attno, .. } | Predicate::IsNull(attno) => {
                if !out.contains(attno) {
                    out.push(*attno);
                }
            }
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.collect_attributes(out);
                right.collect_attributes(out);
            }
            Predicate::Not(inner) => inner.collect_attributes(out),
            Predicate::True | Predicate::False => {}
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Comparison { attno, operator, argument, type_id } => {
                write!(f, "${} {} <{} bytes of type {}>", attno, operator, argument.len(), type_id)
            }
            Predicate::IsNull(attno) => write!(f, "${} IS NULL", attno),
            Predicate::And(left, right) => write!(f, "({} AND {})", left, right),
            Predicate::Or(left, right) => write!(f, "({} OR {})", left, right),
            Predicate::Not(inner) => write!(f, "NOT {}", inner),
            Predicate::True => write!(f, "TRUE"),
            Predicate::False => write!(f, "FALSE"),
        }
    }
}
