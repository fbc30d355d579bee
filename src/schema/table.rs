//! Table definition metadata.

use super::{ColumnDefinition, IndexDefinition};

/// Table definition metadata
///
/// Columns keep their declaration order, which is the order they are emitted in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableDefinition {
    pub columns: Vec<(String, ColumnDefinition)>,
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: impl Into<String>, definition: ColumnDefinition) -> Self {
        self.columns.push((name.into(), definition));
        self
    }

    pub fn index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, def)| def)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }
}
