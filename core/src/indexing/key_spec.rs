use serde::{Deserialize, Serialize};
use tilebase_proto::ColumnId;

use crate::schema::Schema;
use crate::value::ValueType;

/// Ordered list of table columns forming an index key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeySpec {
    pub keyparts: Vec<IndexKeyPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexKeyPart {
    pub column: ColumnId,
    pub value_type: ValueType, // Expected type for this key component
}

impl IndexKeyPart {
    pub fn new(column: ColumnId, value_type: ValueType) -> Self { Self { column, value_type } }
}

impl KeySpec {
    pub fn new(keyparts: Vec<IndexKeyPart>) -> Self { Self { keyparts } }

    /// Key spec over `columns`, taking each part's type from the schema.
    /// Returns None if any column is outside the schema.
    pub fn from_schema(schema: &Schema, columns: &[ColumnId]) -> Option<Self> {
        let keyparts = columns
            .iter()
            .map(|&column| schema.column(column).map(|c| IndexKeyPart::new(column, c.value_type)))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { keyparts })
    }

    pub fn len(&self) -> usize { self.keyparts.len() }

    pub fn is_empty(&self) -> bool { self.keyparts.is_empty() }

    pub fn columns(&self) -> impl Iterator<Item = ColumnId> + '_ { self.keyparts.iter().map(|k| k.column) }

    /// Position of a table column within the key, if it is part of it.
    pub fn position_of(&self, column: ColumnId) -> Option<usize> { self.keyparts.iter().position(|k| k.column == column) }

    /// Simple name generator, e.g. `idx__c0__c2`.
    pub fn name_with(&self, prefix: &str, delim: &str) -> String {
        let fields: Vec<String> = self.keyparts.iter().map(|k| format!("c{}", k.column)).collect();
        if prefix.is_empty() { fields.join(delim) } else { format!("{}{}{}", prefix, delim, fields.join(delim)) }
    }
}
