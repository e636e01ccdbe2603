//! Concrete `Index` implementations.
//!
//! Both index kinds store keys under their order-preserving byte encoding, so
//! integer keys of any width probe each other and NULL sorts first.

mod hash;
mod ordered;

pub use hash::HashIndex;
pub use ordered::OrderedIndex;

use std::sync::Arc;

use tilebase_core::indexing::{Index, IndexKey, IndexMetadata, IndexMethod, KeySpec};
use tilebase_core::{Value, ValueType};

/// Build an empty index of the kind `metadata.method` names.
pub fn build_index(metadata: IndexMetadata) -> Arc<dyn Index> {
    match metadata.method {
        IndexMethod::Ordered => Arc::new(OrderedIndex::new(metadata)),
        IndexMethod::Hash => Arc::new(HashIndex::new(metadata)),
    }
}

/// Convert a probe value to the key column's type so it encodes like stored keys.
/// None when the two are not comparable, or when a float has no integer equal to it.
pub(crate) fn coerce_probe(value: &Value, value_type: ValueType) -> Option<Value> {
    match (value_type, value) {
        (ValueType::I16 | ValueType::I32 | ValueType::I64, Value::F64(f)) => integral(*f).map(Value::I64),
        (ValueType::I16 | ValueType::I32 | ValueType::I64, _) => value.as_i64().map(Value::I64),
        (ValueType::F64, _) => value.as_f64().map(Value::F64),
        (ValueType::Bool, Value::Bool(_)) | (ValueType::String, Value::String(_)) | (ValueType::Binary, Value::Binary(_)) => Some(value.clone()),
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

/// `key` with every component coerced to its key part's type.
pub(crate) fn coerce_key(spec: &KeySpec, key: &IndexKey) -> Option<IndexKey> {
    if key.len() != spec.len() {
        return None;
    }
    let components = spec
        .keyparts
        .iter()
        .zip(&key.0)
        .map(|(part, component)| match component {
            Some(value) => coerce_probe(value, part.value_type).map(Some),
            None => Some(None),
        })
        .collect::<Option<Vec<_>>>()?;
    Some(IndexKey::new(components))
}
