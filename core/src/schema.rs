use serde::{Deserialize, Serialize};
use tilebase_proto::ColumnId;

use crate::error::TableError;
use crate::tuple::Tuple;
use crate::value::{Value, ValueType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub value_type: ValueType,
    pub not_null: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self { Self { name: name.into(), value_type, not_null: false } }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self { Self { columns } }

    pub fn columns(&self) -> &[Column] { &self.columns }

    pub fn column(&self, id: ColumnId) -> Option<&Column> { self.columns.get(id as usize) }

    pub fn column_count(&self) -> usize { self.columns.len() }

    pub fn column_id(&self, name: &str) -> Option<ColumnId> { self.columns.iter().position(|c| c.name == name).map(|p| p as ColumnId) }

    /// Arity and per-column type check. NULLs pass here; see `check_nulls`.
    pub fn validate(&self, tuple: &Tuple) -> Result<(), TableError> {
        if tuple.len() != self.columns.len() {
            return Err(TableError::Arity { expected: self.columns.len(), actual: tuple.len() });
        }
        for (id, (column, value)) in self.columns.iter().zip(tuple.values()).enumerate() {
            if let Some(value) = value {
                let actual = ValueType::of(value);
                if !column.value_type.accepts(actual) {
                    return Err(TableError::TypeMismatch { column: id as ColumnId, expected: column.value_type, actual });
                }
            }
        }
        Ok(())
    }

    /// First NOT NULL column holding a NULL in `tuple`.
    pub fn check_nulls(&self, tuple: &Tuple) -> Result<(), TableError> {
        for (id, column) in self.columns.iter().enumerate() {
            if column.not_null && tuple.get(id as ColumnId).is_none() {
                return Err(TableError::NotNull { column: id as ColumnId, name: column.name.clone() });
            }
        }
        Ok(())
    }

    /// Widen integer values to the declared column type so stored tuples are uniform.
    pub(crate) fn coerce(&self, tuple: &Tuple) -> Tuple {
        let values = self
            .columns
            .iter()
            .zip(tuple.values())
            .map(|(column, value)| match (column.value_type, value) {
                (ValueType::I64, Some(v @ (Value::I16(_) | Value::I32(_)))) => v.as_i64().map(Value::I64),
                (ValueType::I32, Some(Value::I16(i))) => Some(Value::I32(*i as i32)),
                (ValueType::F64, Some(v)) if ValueType::of(v).is_integer() => v.as_f64().map(Value::F64),
                (_, v) => v.clone(),
            })
            .collect();
        Tuple::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(vec![Column::new("id", ValueType::I64).not_null(), Column::new("name", ValueType::String), Column::new("score", ValueType::F64)])
    }

    #[test]
    fn test_validate() {
        let schema = schema();
        assert!(schema.validate(&Tuple::new(vec![Some(1i32.into()), None, Some(2.5.into())])).is_ok());
        assert!(matches!(schema.validate(&Tuple::from_values(vec![1i64.into()])), Err(TableError::Arity { expected: 3, actual: 1 })));
        assert!(matches!(
            schema.validate(&Tuple::new(vec![Some("x".into()), None, None])),
            Err(TableError::TypeMismatch { column: 0, expected: ValueType::I64, actual: ValueType::String })
        ));
    }

    #[test]
    fn test_check_nulls() {
        let schema = schema();
        assert!(schema.check_nulls(&Tuple::new(vec![Some(1i64.into()), None, None])).is_ok());
        let err = schema.check_nulls(&Tuple::new(vec![None, Some("a".into()), None])).unwrap_err();
        assert!(matches!(err, TableError::NotNull { column: 0, ref name } if name == "id"));
    }

    #[test]
    fn test_coerce_widens_integers() {
        let schema = schema();
        let coerced = schema.coerce(&Tuple::new(vec![Some(Value::I16(3)), None, Some(Value::I32(2))]));
        assert_eq!(coerced.values(), &[Some(Value::I64(3)), None, Some(Value::F64(2.0))]);
    }

    #[test]
    fn test_column_lookup() {
        let schema = schema();
        assert_eq!(schema.column_id("score"), Some(2));
        assert_eq!(schema.column_id("missing"), None);
        assert_eq!(schema.column(1).map(|c| c.name.as_str()), Some("name"));
    }
}
