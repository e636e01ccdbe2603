use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;
use tilebase_proto::{Datum, TypeId};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, PartialOrd)]
pub enum Value {
    // Numbers
    I16(i16),
    I32(i32),
    I64(i64),
    F64(f64),

    Bool(bool),
    String(String),
    Binary(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    I16,
    I32,
    I64,
    F64,
    Bool,
    String,
    Binary,
}

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("unsupported type id {0}")]
    UnsupportedType(TypeId),
    #[error("datum of type {type_id} has {actual} bytes, expected {expected}")]
    InvalidWidth { type_id: TypeId, expected: usize, actual: usize },
    #[error("invalid UTF-8 in text datum: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl Value {
    /// Decode a raw planner datum according to its type id.
    pub fn from_datum(datum: &Datum, type_id: TypeId) -> Result<Self, DecodeError> {
        let bytes = datum.as_bytes();
        match type_id {
            TypeId::BOOL => Ok(Value::Bool(fixed::<1>(bytes, type_id)?[0] != 0)),
            TypeId::INT2 => Ok(Value::I16(i16::from_be_bytes(fixed(bytes, type_id)?))),
            TypeId::INT4 => Ok(Value::I32(i32::from_be_bytes(fixed(bytes, type_id)?))),
            // timestamps travel as microseconds
            TypeId::INT8 | TypeId::TIMESTAMP => Ok(Value::I64(i64::from_be_bytes(fixed(bytes, type_id)?))),
            TypeId::FLOAT4 => Ok(Value::F64(f32::from_be_bytes(fixed(bytes, type_id)?) as f64)),
            TypeId::FLOAT8 => Ok(Value::F64(f64::from_be_bytes(fixed(bytes, type_id)?))),
            TypeId::TEXT | TypeId::VARCHAR => Ok(Value::String(String::from_utf8(bytes.to_vec())?)),
            TypeId::BPCHAR => {
                let s = String::from_utf8(bytes.to_vec())?;
                Ok(Value::String(s.trim_end_matches(' ').to_string()))
            }
            TypeId::BYTEA => Ok(Value::Binary(bytes.to_vec())),
            other => Err(DecodeError::UnsupportedType(other)),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I16(i) => Some(*i as i64),
            Value::I32(i) => Some(*i as i64),
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            other => other.as_i64().map(|i| i as f64),
        }
    }
}

fn fixed<const N: usize>(bytes: &[u8], type_id: TypeId) -> Result<[u8; N], DecodeError> {
    bytes.try_into().map_err(|_| DecodeError::InvalidWidth { type_id, expected: N, actual: bytes.len() })
}

impl ValueType {
    pub fn of(v: &Value) -> Self {
        match v {
            Value::I16(_) => ValueType::I16,
            Value::I32(_) => ValueType::I32,
            Value::I64(_) => ValueType::I64,
            Value::F64(_) => ValueType::F64,
            Value::Bool(_) => ValueType::Bool,
            Value::String(_) => ValueType::String,
            Value::Binary(_) => ValueType::Binary,
        }
    }

    pub fn is_integer(&self) -> bool { matches!(self, ValueType::I16 | ValueType::I32 | ValueType::I64) }

    pub fn is_numeric(&self) -> bool { self.is_integer() || matches!(self, ValueType::F64) }

    /// Whether a value of type `other` may be stored in a column of this type.
    /// Integers widen; everything else must match exactly.
    pub fn accepts(&self, other: ValueType) -> bool {
        match (self, other) {
            (ValueType::I64, ValueType::I16 | ValueType::I32) | (ValueType::I32, ValueType::I16) => true,
            (ValueType::F64, t) if t.is_integer() => true,
            (a, b) => *a == b,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::I16(int) => write!(f, "{:?}", int),
            Value::I32(int) => write!(f, "{:?}", int),
            Value::I64(int) => write!(f, "{:?}", int),
            Value::F64(float) => write!(f, "{:?}", float),
            Value::Bool(bool) => write!(f, "{:?}", bool),
            Value::String(string) => write!(f, "{:?}", string),
            Value::Binary(binary) => write!(f, "{:?}", binary),
        }
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self { Value::I16(value) }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self { Value::I32(value) }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self { Value::I64(value) }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self { Value::F64(value) }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self { Value::Bool(value) }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self { Value::String(value.to_string()) }
}

impl From<String> for Value {
    fn from(value: String) -> Self { Value::String(value) }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self { Value::Binary(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_integers() {
        assert_eq!(Value::from_datum(&Datum::from_i16(-3), TypeId::INT2), Ok(Value::I16(-3)));
        assert_eq!(Value::from_datum(&Datum::from_i32(42), TypeId::INT4), Ok(Value::I32(42)));
        assert_eq!(Value::from_datum(&Datum::from_i64(1 << 40), TypeId::INT8), Ok(Value::I64(1 << 40)));
        assert_eq!(Value::from_datum(&Datum::from_timestamp_micros(99), TypeId::TIMESTAMP), Ok(Value::I64(99)));
    }

    #[test]
    fn test_decode_floats_and_bools() {
        assert_eq!(Value::from_datum(&Datum::from_f32(1.5), TypeId::FLOAT4), Ok(Value::F64(1.5)));
        assert_eq!(Value::from_datum(&Datum::from_f64(-0.25), TypeId::FLOAT8), Ok(Value::F64(-0.25)));
        assert_eq!(Value::from_datum(&Datum::from_bool(true), TypeId::BOOL), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(Value::from_datum(&Datum::from_text("abc"), TypeId::VARCHAR), Ok(Value::String("abc".into())));
        assert_eq!(Value::from_datum(&Datum::from_text("ab  "), TypeId::BPCHAR), Ok(Value::String("ab".into())));
        assert_eq!(Value::from_datum(&Datum::from(vec![0, 1]), TypeId::BYTEA), Ok(Value::Binary(vec![0, 1])));
        assert!(matches!(Value::from_datum(&Datum::from(vec![0xFF, 0xFE]), TypeId::TEXT), Err(DecodeError::InvalidUtf8(_))));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            Value::from_datum(&Datum::from_i16(1), TypeId::INT4),
            Err(DecodeError::InvalidWidth { type_id: TypeId::INT4, expected: 4, actual: 2 })
        );
        assert_eq!(Value::from_datum(&Datum::from_i32(1), TypeId(2950)), Err(DecodeError::UnsupportedType(TypeId(2950))));
    }

    #[test]
    fn test_accepts() {
        assert!(ValueType::I64.accepts(ValueType::I32));
        assert!(ValueType::F64.accepts(ValueType::I16));
        assert!(!ValueType::I16.accepts(ValueType::I64));
        assert!(!ValueType::String.accepts(ValueType::Binary));
    }
}
