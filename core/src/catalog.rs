//! Table lookup service. Translation and DML code receive a `Catalog` explicitly
//! instead of reaching for a process-wide manager.

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use tilebase_proto::Oid;
use tracing::info;

use crate::config::TableConfig;
use crate::data_table::DataTable;
use crate::error::CatalogError;
use crate::schema::Schema;

pub trait Catalog: Send + Sync {
    fn table(&self, database_oid: Oid, table_oid: Oid) -> Option<Arc<DataTable>>;
}

impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    fn table(&self, database_oid: Oid, table_oid: Oid) -> Option<Arc<DataTable>> { (**self).table(database_oid, table_oid) }
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn table(&self, database_oid: Oid, table_oid: Oid) -> Option<Arc<DataTable>> { (**self).table(database_oid, table_oid) }
}

/// In-memory catalog keyed by `(database_oid, table_oid)`.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: DashMap<(Oid, Oid), Arc<DataTable>>,
}

impl MemoryCatalog {
    pub fn new() -> Self { Self::default() }

    pub fn create_table(
        &self,
        database_oid: Oid,
        table_oid: Oid,
        name: &str,
        schema: Schema,
        config: TableConfig,
    ) -> Result<Arc<DataTable>, CatalogError> {
        let table = Arc::new(DataTable::new(table_oid, database_oid, name, schema, config)?);
        self.register_table(table.clone())?;
        Ok(table)
    }

    pub fn register_table(&self, table: Arc<DataTable>) -> Result<(), CatalogError> {
        let key = (table.database_oid(), table.oid());
        match self.tables.entry(key) {
            Entry::Occupied(_) => Err(CatalogError::TableExists { database_oid: key.0, table_oid: key.1 }),
            Entry::Vacant(entry) => {
                info!("catalog: registered table {} ({}/{})", table.name(), key.0, key.1);
                entry.insert(table);
                Ok(())
            }
        }
    }

    pub fn drop_table(&self, database_oid: Oid, table_oid: Oid) -> Option<Arc<DataTable>> {
        self.tables.remove(&(database_oid, table_oid)).map(|(_, table)| table)
    }

    pub fn table_by_name(&self, database_oid: Oid, name: &str) -> Option<Arc<DataTable>> {
        self.tables.iter().find(|entry| entry.key().0 == database_oid && entry.name() == name).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize { self.tables.len() }

    pub fn is_empty(&self) -> bool { self.tables.is_empty() }
}

impl Catalog for MemoryCatalog {
    fn table(&self, database_oid: Oid, table_oid: Oid) -> Option<Arc<DataTable>> {
        self.tables.get(&(database_oid, table_oid)).map(|entry| entry.value().clone())
    }
}
