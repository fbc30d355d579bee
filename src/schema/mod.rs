//! Declarative schema model
//!
//! The [`SchemaTable`] maps table names to [`TableDefinition`]s in declaration order.
//! It is built once (from code, see [`itinerary`], or from a JSON/TOML document, see
//! [`document`]) and only read afterwards.

pub mod column;
pub mod document;
pub mod index;
pub mod itinerary;
pub mod ordering;
pub mod table;
pub mod validate;

pub use column::{ColumnDefinition, ColumnType, ForeignKey, ReferentialAction, TypeSize};
pub use index::{IndexDefinition, IndexMethod};
pub use table::TableDefinition;

/// Key of a table definition that carries its index list
pub const INDEXES_KEY: &str = "indexes";

/// Ordered mapping from table name to table definition
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaTable {
    tables: Vec<(String, TableDefinition)>,
}

impl SchemaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table. Duplicate names are kept and reported by validation.
    pub fn table(mut self, name: impl Into<String>, definition: TableDefinition) -> Self {
        self.tables.push((name.into(), definition));
        self
    }

    pub fn get(&self, name: &str) -> Option<&TableDefinition> {
        self.tables
            .iter()
            .find(|(table, _)| table == name)
            .map(|(_, def)| def)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableDefinition)> {
        self.tables.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
