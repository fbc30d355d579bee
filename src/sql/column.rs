//! Column clause generation.

use crate::schema::{ColumnDefinition, INDEXES_KEY};

/// Double-quote an identifier, doubling any embedded quote
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Generate the SQL column clause for one column
///
/// Clauses are emitted in a fixed order: name, type with sizing, `NOT NULL`,
/// `DEFAULT`, `PRIMARY KEY`, `UNIQUE`, `REFERENCES … ON DELETE …`, `CHECK`.
/// Default values and check expressions are inserted verbatim.
///
/// Returns `None` for the reserved `indexes` key.
pub fn compile_column(name: &str, def: &ColumnDefinition) -> Option<String> {
    if name == INDEXES_KEY {
        return None;
    }

    let mut col_sql = format!("{} {}", quote_ident(name), def.column_type);

    if def.is_not_null() {
        col_sql.push_str(" NOT NULL");
    }

    if let Some(ref default) = def.default {
        col_sql.push_str(&format!(" DEFAULT {}", default));
    }

    if def.primary_key {
        col_sql.push_str(" PRIMARY KEY");
    }

    if def.unique {
        col_sql.push_str(" UNIQUE");
    }

    if let Some(ref fk) = def.references {
        col_sql.push_str(&format!(
            " REFERENCES {}({})",
            quote_ident(&fk.table),
            quote_ident(&fk.column)
        ));
        if let Some(action) = fk.on_delete {
            col_sql.push_str(&format!(" ON DELETE {}", action));
        }
    }

    if let Some(ref check) = def.check {
        col_sql.push_str(&format!(" CHECK ({})", check));
    }

    Some(col_sql)
}
