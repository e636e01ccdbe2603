use std::cmp::Ordering;

use tilebase_proto::ColumnId;

use super::{ExpressionType, IndexKey, KeySpec};
use crate::collation::{Collatable, RangeBound};
use crate::error::IndexError;
use crate::value::Value;

/// One `key[position] <op> value` term.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPredicate {
    pub position: usize,
    pub expr_type: ExpressionType,
    pub value: Value,
}

/// Conjunction of key terms compiled from a scan descriptor's aligned
/// `(column, expression, value)` arrays against one index's key spec.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPredicates {
    terms: Vec<KeyPredicate>,
}

impl KeyPredicates {
    pub fn compile(spec: &KeySpec, key_column_ids: &[ColumnId], expr_types: &[ExpressionType], values: &[Value]) -> Result<Self, IndexError> {
        if key_column_ids.len() != expr_types.len() || key_column_ids.len() != values.len() {
            return Err(IndexError::MisalignedScan { columns: key_column_ids.len(), expressions: expr_types.len(), values: values.len() });
        }

        let mut terms = Vec::with_capacity(key_column_ids.len());
        for (i, ((column, expr_type), value)) in key_column_ids.iter().zip(expr_types).zip(values).enumerate() {
            if !expr_type.is_valid() {
                return Err(IndexError::InvalidExpression { position: i });
            }
            let position = spec.position_of(*column).ok_or(IndexError::ColumnNotInKey { column: *column })?;
            terms.push(KeyPredicate { position, expr_type: *expr_type, value: value.clone() });
        }
        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[KeyPredicate] { &self.terms }

    /// True if every term holds. NULL key components satisfy nothing.
    pub fn matches(&self, key: &IndexKey) -> bool {
        self.terms.iter().all(|term| match key.get(term.position).and_then(|k| k.collate(&term.value)) {
            Some(ordering) => term.expr_type.accepts(ordering),
            None => false,
        })
    }

    /// Tightest lower bound the terms place on the leading key column.
    pub fn leading_lower(&self) -> RangeBound<&Value> {
        self.leading_bound(ExpressionType::is_lower_bound, ExpressionType::GreaterThan, Ordering::Greater)
    }

    /// Tightest upper bound the terms place on the leading key column.
    pub fn leading_upper(&self) -> RangeBound<&Value> { self.leading_bound(ExpressionType::is_upper_bound, ExpressionType::LessThan, Ordering::Less) }

    fn leading_bound(&self, applies: fn(&ExpressionType) -> bool, strict: ExpressionType, tighter: Ordering) -> RangeBound<&Value> {
        let mut bound = RangeBound::Unbounded;
        for term in self.terms.iter().filter(|t| t.position == 0 && applies(&t.expr_type)) {
            let candidate = if term.expr_type == strict { RangeBound::Excluded(&term.value) } else { RangeBound::Included(&term.value) };
            bound = match bound {
                RangeBound::Unbounded => candidate,
                RangeBound::Included(current) | RangeBound::Excluded(current) => match term.value.compare(current) {
                    o if o == tighter => candidate,
                    Ordering::Equal if term.expr_type == strict => candidate,
                    _ => bound,
                },
            };
        }
        bound
    }

    /// Full key when every position of a `width`-column key is pinned by `=`.
    pub fn equality_key(&self, width: usize) -> Option<IndexKey> {
        let mut key: Vec<Option<Value>> = vec![None; width];
        for term in &self.terms {
            if term.expr_type != ExpressionType::Equal {
                return None;
            }
            let slot = key.get_mut(term.position)?;
            match slot {
                Some(existing) if existing.collate(&term.value) != Some(Ordering::Equal) => return None,
                _ => *slot = Some(term.value.clone()),
            }
        }
        key.iter().all(Option::is_some).then(|| IndexKey::new(key))
    }
}
