//! `CREATE TABLE` statement generation.

use super::column::{compile_column, quote_ident};
use crate::schema::TableDefinition;

/// Generate the `CREATE TABLE IF NOT EXISTS` statement for one table
///
/// Columns are emitted in declaration order, one per line. A table without any
/// emittable column still produces a statement with an empty column list; the
/// database rejects it, or validation catches it beforehand.
pub fn compile_table(name: &str, def: &TableDefinition) -> String {
    let column_defs: Vec<String> = def
        .columns
        .iter()
        .filter_map(|(column, column_def)| compile_column(column, column_def))
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n);",
        quote_ident(name),
        column_defs.join(",\n  ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDefinition, ColumnType};

    #[test]
    fn test_users_table() {
        let def = TableDefinition::new()
            .column("id", ColumnDefinition::of_type("serial").primary_key())
            .column(
                "email",
                ColumnDefinition::new(ColumnType::sized("varchar", 255))
                    .not_null()
                    .unique(),
            );

        assert_eq!(
            compile_table("users", &def),
            "CREATE TABLE IF NOT EXISTS \"users\" (\n  \"id\" serial PRIMARY KEY,\n  \"email\" varchar(255) NOT NULL UNIQUE\n);"
        );
    }

    #[test]
    fn test_indexes_column_is_skipped() {
        let def = TableDefinition::new()
            .column("id", ColumnDefinition::serial())
            .column("indexes", ColumnDefinition::text());

        let sql = compile_table("odd", &def);
        assert_eq!(sql, "CREATE TABLE IF NOT EXISTS \"odd\" (\n  \"id\" SERIAL\n);");
        assert!(!sql.contains("\"indexes\""));
    }

    #[test]
    fn test_empty_table_passes_through() {
        assert_eq!(
            compile_table("nothing", &TableDefinition::new()),
            "CREATE TABLE IF NOT EXISTS \"nothing\" (\n  \n);"
        );
    }
}
