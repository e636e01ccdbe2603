use std::cmp::Ordering;

use crate::value::Value;

/// Represents a bound in a range query
#[derive(Debug, Clone, PartialEq)]
pub enum RangeBound<T> {
    Included(T),
    Excluded(T),
    Unbounded,
}

/// Trait for types that support collation operations
pub trait Collatable {
    /// Convert the value to its binary representation for collation.
    /// Within one collation class, byte order of the output agrees with `compare`.
    fn to_bytes(&self) -> Vec<u8>;

    /// Compare two values in the collation order
    fn compare(&self, other: &Self) -> Ordering { self.to_bytes().cmp(&other.to_bytes()) }

    fn is_in_range(&self, lower: RangeBound<&Self>, upper: RangeBound<&Self>) -> bool {
        let above = match lower {
            RangeBound::Included(l) => self.compare(l) != Ordering::Less,
            RangeBound::Excluded(l) => self.compare(l) == Ordering::Greater,
            RangeBound::Unbounded => true,
        };
        let below = match upper {
            RangeBound::Included(u) => self.compare(u) != Ordering::Greater,
            RangeBound::Excluded(u) => self.compare(u) == Ordering::Less,
            RangeBound::Unbounded => true,
        };
        above && below
    }
}

/// Coarse grouping of value types that are mutually comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CollationClass {
    Integer,
    Float,
    Bool,
    String,
    Binary,
}

impl Value {
    pub fn collation_class(&self) -> CollationClass {
        match self {
            Value::I16(_) | Value::I32(_) | Value::I64(_) => CollationClass::Integer,
            Value::F64(_) => CollationClass::Float,
            Value::Bool(_) => CollationClass::Bool,
            Value::String(_) => CollationClass::String,
            Value::Binary(_) => CollationClass::Binary,
        }
    }

    /// Compare two values, widening across numeric types.
    /// Returns None when the values are not comparable (e.g. string vs integer).
    pub fn collate(&self, other: &Value) -> Option<Ordering> {
        match (self.collation_class(), other.collation_class()) {
            (CollationClass::Integer, CollationClass::Integer) => Some(self.as_i64()?.cmp(&other.as_i64()?)),
            (CollationClass::Integer | CollationClass::Float, CollationClass::Integer | CollationClass::Float) => {
                Some(float_bits(self.as_f64()?).cmp(&float_bits(other.as_f64()?)))
            }
            (a, b) if a == b => Some(self.to_bytes().cmp(&other.to_bytes())),
            _ => None,
        }
    }
}

/// Order-preserving bit pattern for an f64. NaN sorts last; `-0.0` and `0.0` share a pattern.
pub(crate) fn float_bits(f: f64) -> u64 {
    let f = if f == 0.0 { 0.0 } else { f };
    if f.is_nan() {
        u64::MAX
    } else {
        let bits = f.to_bits();
        if f >= 0.0 {
            bits ^ (1 << 63) // Flip sign bit for positive numbers
        } else {
            !bits // Flip all bits for negative numbers
        }
    }
}

/// Order-preserving bit pattern for an integer of any width.
pub(crate) fn integer_bits(i: i64) -> u64 { (i as u64) ^ (1 << 63) }

impl Collatable for Value {
    fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::I16(_) | Value::I32(_) | Value::I64(_) => {
                // as_i64 is always Some for integers
                integer_bits(self.as_i64().unwrap_or_default()).to_be_bytes().to_vec()
            }
            Value::F64(f) => float_bits(*f).to_be_bytes().to_vec(),
            Value::Bool(b) => vec![*b as u8],
            Value::String(s) => s.as_bytes().to_vec(),
            Value::Binary(bytes) => bytes.clone(),
        }
    }

    /// Total order: numeric widening within comparable values, otherwise by collation class.
    fn compare(&self, other: &Self) -> Ordering {
        self.collate(other).unwrap_or_else(|| self.collation_class().cmp(&other.collation_class()))
    }
}
