use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type identifier attached to a raw datum by the upstream planner.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const BOOL: TypeId = TypeId(16);
    pub const BYTEA: TypeId = TypeId(17);
    pub const INT8: TypeId = TypeId(20);
    pub const INT2: TypeId = TypeId(21);
    pub const INT4: TypeId = TypeId(23);
    pub const TEXT: TypeId = TypeId(25);
    pub const FLOAT4: TypeId = TypeId(700);
    pub const FLOAT8: TypeId = TypeId(701);
    pub const BPCHAR: TypeId = TypeId(1042);
    pub const VARCHAR: TypeId = TypeId(1043);
    pub const TIMESTAMP: TypeId = TypeId(1114);
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Untyped argument bytes. Fixed-width numerics are big-endian, text is UTF-8.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Datum(Bytes);

impl Datum {
    pub fn new(bytes: impl Into<Bytes>) -> Self { Datum(bytes.into()) }

    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn from_bool(value: bool) -> Self { Datum(Bytes::copy_from_slice(&[value as u8])) }

    pub fn from_i16(value: i16) -> Self { Datum(Bytes::copy_from_slice(&value.to_be_bytes())) }

    pub fn from_i32(value: i32) -> Self { Datum(Bytes::copy_from_slice(&value.to_be_bytes())) }

    pub fn from_i64(value: i64) -> Self { Datum(Bytes::copy_from_slice(&value.to_be_bytes())) }

    pub fn from_f32(value: f32) -> Self { Datum(Bytes::copy_from_slice(&value.to_be_bytes())) }

    pub fn from_f64(value: f64) -> Self { Datum(Bytes::copy_from_slice(&value.to_be_bytes())) }

    pub fn from_text(value: &str) -> Self { Datum(Bytes::copy_from_slice(value.as_bytes())) }

    /// Microseconds since the epoch.
    pub fn from_timestamp_micros(value: i64) -> Self { Self::from_i64(value) }
}

impl From<Vec<u8>> for Datum {
    fn from(bytes: Vec<u8>) -> Self { Datum(Bytes::from(bytes)) }
}
