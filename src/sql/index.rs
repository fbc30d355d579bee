//! `CREATE INDEX` statement generation.

use super::column::quote_ident;
use crate::schema::{IndexDefinition, TableDefinition};

/// Resolved index name: the explicit name, or `idx_<table>_<col1>_<col2>…`
pub fn index_name(table: &str, index: &IndexDefinition) -> String {
    match index.name {
        Some(ref name) => name.clone(),
        None => format!("idx_{}_{}", table, index.columns.join("_")),
    }
}

/// Generate the statement for one index, or `None` when it has no columns
pub fn compile_index(table: &str, index: &IndexDefinition) -> Option<String> {
    if index.columns.is_empty() {
        log::debug!("Skipping index without columns on table '{}'", table);
        return None;
    }

    let mut index_sql = String::new();

    if index.unique {
        index_sql.push_str("CREATE UNIQUE INDEX IF NOT EXISTS ");
    } else {
        index_sql.push_str("CREATE INDEX IF NOT EXISTS ");
    }

    let columns: Vec<String> = index.columns.iter().map(|c| quote_ident(c)).collect();

    index_sql.push_str(&quote_ident(&index_name(table, index)));
    index_sql.push_str(" ON ");
    index_sql.push_str(&quote_ident(table));
    index_sql.push_str(&format!(" USING {} (", index.method));
    index_sql.push_str(&columns.join(", "));
    index_sql.push_str(");");

    Some(index_sql)
}

/// Generate every index statement declared on a table, in declaration order
pub fn compile_indexes(table: &str, def: &TableDefinition) -> Vec<String> {
    def.indexes
        .iter()
        .filter_map(|index| compile_index(table, index))
        .collect()
}
