use serde::{Deserialize, Serialize};
use std::fmt;

use crate::collation::{float_bits, integer_bits};
use crate::value::Value;

const NULL_TAG: u8 = 0x00;
const VALUE_TAG: u8 = 0x01;

/// Projection of a tuple onto an index's key columns. Components may be NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexKey(pub Vec<Option<Value>>);

impl IndexKey {
    pub fn new(values: Vec<Option<Value>>) -> Self { IndexKey(values) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn has_null(&self) -> bool { self.0.iter().any(Option::is_none) }

    pub fn get(&self, position: usize) -> Option<&Value> { self.0.get(position).and_then(Option::as_ref) }

    /// Order-preserving byte encoding of the whole key.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for component in &self.0 {
            encode_component(component.as_ref(), &mut out);
        }
        out
    }
}

impl From<Vec<Value>> for IndexKey {
    fn from(values: Vec<Value>) -> Self { IndexKey(values.into_iter().map(Some).collect()) }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match component {
                Some(v) => write!(f, "{}", v)?,
                None => write!(f, "NULL")?,
            }
        }
        write!(f, ")")
    }
}

/// Encode one key component, appending to `out`.
///
/// NULL sorts before every value. Integers of all widths share one encoding, so
/// a key written as I32 is found by an I64 probe.
pub fn encode_component(value: Option<&Value>, out: &mut Vec<u8>) {
    let Some(value) = value else {
        out.push(NULL_TAG);
        return;
    };
    out.push(VALUE_TAG);
    match value {
        Value::I16(_) | Value::I32(_) | Value::I64(_) => {
            out.extend_from_slice(&integer_bits(value.as_i64().unwrap_or_default()).to_be_bytes());
        }
        Value::F64(f) => out.extend_from_slice(&float_bits(*f).to_be_bytes()),
        Value::Bool(b) => out.push(*b as u8),
        // [escaped bytes][0x00]; 0x00 in the payload becomes 0x00 0xFF
        Value::String(s) => encode_escaped(s.as_bytes(), out),
        Value::Binary(bytes) => encode_escaped(bytes, out),
    }
}

fn encode_escaped(bytes: &[u8], out: &mut Vec<u8>) {
    out.reserve(bytes.len() + 1);
    for &b in bytes {
        if b == 0x00 {
            out.push(0x00);
            out.push(0xFF);
        } else {
            out.push(b);
        }
    }
    out.push(0x00);
}
