//! Error type shared by the schema model, the compilers and script file handling.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised while loading, validating or persisting a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A column definition violates a structural rule
    #[error("table '{table}', column '{column}': {reason}")]
    InvalidColumn {
        table: String,
        column: String,
        reason: String,
    },

    #[error("table '{0}' has no columns")]
    EmptyTable(String),

    /// `indexes` is the key that carries index definitions, never a column
    #[error("table '{0}' declares a column named 'indexes', which is reserved for index definitions")]
    ReservedColumnName(String),

    #[error("table '{0}' is declared more than once")]
    DuplicateTable(String),

    #[error("table '{table}' declares column '{column}' more than once")]
    DuplicateColumn { table: String, column: String },

    #[error("index '{index}' on table '{table}' names unknown column '{column}'")]
    UnknownIndexColumn {
        table: String,
        index: String,
        column: String,
    },

    #[error("index name '{index}' is used on both table '{first}' and table '{second}'")]
    DuplicateIndexName {
        index: String,
        first: String,
        second: String,
    },

    #[error("index '{index}' on table '{table}' uses invalid access method '{method}'")]
    InvalidIndexMethod {
        table: String,
        index: String,
        method: String,
    },

    #[error(
        "table '{table}', column '{column}' references table '{referenced}' which does not exist in this schema"
    )]
    UnknownReference {
        table: String,
        column: String,
        referenced: String,
    },

    #[error(
        "table '{table}', column '{column}' references '{referenced_table}.{referenced_column}' which is not declared"
    )]
    UnknownReferenceColumn {
        table: String,
        column: String,
        referenced_table: String,
        referenced_column: String,
    },

    #[error("circular foreign key dependency between tables: {}", tables.join(", "))]
    CircularDependency { tables: Vec<String> },

    /// The schema document is not valid JSON/TOML or has the wrong shape
    #[error("failed to parse schema document: {0}")]
    Parse(String),

    /// Script names become part of a file name in the output directory
    #[error("invalid script name '{0}': use ASCII letters, digits, '_' or '-'")]
    InvalidScriptName(String),

    #[error("script file name '{0}' does not match expected pattern: {{YYYYMMDDHHMMSS}}_{{name}}.sql")]
    InvalidFileName(String),

    #[error(
        "script {} has been modified.\n\
         Stored checksum: {stored}\n\
         Current checksum: {current}",
        path.display()
    )]
    ChecksumMismatch {
        path: PathBuf,
        stored: String,
        current: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    pub(crate) fn invalid_column(
        table: &str,
        column: &str,
        reason: impl Into<String>,
    ) -> Self {
        SchemaError::InvalidColumn {
            table: table.to_string(),
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SchemaError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_column_names_table_and_column() {
        let err = SchemaError::invalid_column("users", "email", "length must be positive");
        assert_eq!(
            err.to_string(),
            "table 'users', column 'email': length must be positive"
        );
    }

    #[test]
    fn test_circular_dependency_lists_tables() {
        let err = SchemaError::CircularDependency {
            tables: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "circular foreign key dependency between tables: a, b"
        );
    }
}
