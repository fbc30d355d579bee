//! Loading a [`SchemaTable`] from a JSON or TOML document.
//!
//! Documents use the same keys as the planner's schema module: one object per
//! table, one object per column, and an optional `indexes` array per table.
//!
//! ```json
//! {
//!   "users": {
//!     "id": { "type": "SERIAL", "primaryKey": true },
//!     "email": { "type": "VARCHAR", "length": 100, "nullable": false, "unique": true },
//!     "indexes": [ { "columns": ["email"], "type": "btree" } ]
//!   }
//! }
//! ```
//!
//! Table and column order follow the document. `onDelete` is accepted either inside
//! `references` or next to it on the column.

use super::{
    ColumnDefinition, ColumnType, ForeignKey, IndexDefinition, IndexMethod, ReferentialAction,
    SchemaTable, TableDefinition, TypeSize, INDEXES_KEY,
};
use crate::error::{Result, SchemaError};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawColumn {
    #[serde(rename = "type")]
    column_type: String,
    length: Option<u32>,
    precision: Option<u32>,
    scale: Option<u32>,
    nullable: Option<bool>,
    default: Option<Value>,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    unique: bool,
    references: Option<RawReference>,
    on_delete: Option<ReferentialAction>,
    check: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawReference {
    table: String,
    #[serde(default = "default_reference_column")]
    column: String,
    on_delete: Option<ReferentialAction>,
}

fn default_reference_column() -> String {
    "id".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIndex {
    #[serde(default)]
    columns: Vec<String>,
    name: Option<String>,
    #[serde(rename = "type", default)]
    method: IndexMethod,
    #[serde(default)]
    unique: bool,
}

impl RawColumn {
    fn into_definition(self, table: &str, column: &str) -> Result<ColumnDefinition> {
        let size = match (self.length, self.precision, self.scale) {
            (None, None, None) => TypeSize::Plain,
            (Some(length), None, None) => TypeSize::Length(length),
            (None, Some(precision), Some(scale)) => TypeSize::Scaled { precision, scale },
            (Some(_), _, _) => {
                return Err(SchemaError::invalid_column(
                    table,
                    column,
                    "length and precision/scale are mutually exclusive",
                ))
            }
            (None, _, _) => {
                return Err(SchemaError::invalid_column(
                    table,
                    column,
                    "precision and scale must be given together",
                ))
            }
        };

        let default = match self.default {
            None | Some(Value::Null) => None,
            Some(Value::String(expr)) => Some(expr),
            Some(Value::Bool(flag)) => Some(flag.to_string()),
            Some(Value::Number(number)) => Some(number.to_string()),
            Some(_) => {
                return Err(SchemaError::invalid_column(
                    table,
                    column,
                    "default must be a string, number or boolean",
                ))
            }
        };

        let references = match (self.references, self.on_delete) {
            (Some(reference), column_on_delete) => Some(ForeignKey {
                table: reference.table,
                column: reference.column,
                on_delete: reference.on_delete.or(column_on_delete),
            }),
            (None, Some(_)) => {
                return Err(SchemaError::invalid_column(
                    table,
                    column,
                    "onDelete given without references",
                ))
            }
            (None, None) => None,
        };

        Ok(ColumnDefinition {
            column_type: ColumnType {
                name: self.column_type,
                size,
            },
            nullable: self.nullable,
            default,
            primary_key: self.primary_key,
            unique: self.unique,
            references,
            check: self.check,
        })
    }
}

impl From<RawIndex> for IndexDefinition {
    fn from(raw: RawIndex) -> Self {
        IndexDefinition {
            columns: raw.columns,
            name: raw.name,
            method: raw.method,
            unique: raw.unique,
        }
    }
}

/// Parse a schema from a JSON document
pub fn from_json_str(source: &str) -> Result<SchemaTable> {
    let value: Value =
        serde_json::from_str(source).map_err(|e| SchemaError::Parse(e.to_string()))?;
    from_value(value)
}

/// Parse a schema from a TOML document
pub fn from_toml_str(source: &str) -> Result<SchemaTable> {
    let value: toml::Value = toml::from_str(source).map_err(|e| SchemaError::Parse(e.to_string()))?;
    let value = serde_json::to_value(value).map_err(|e| SchemaError::Parse(e.to_string()))?;
    from_value(value)
}

/// Load a schema document, picking the format from the file extension
pub fn from_path(path: &Path) -> Result<SchemaTable> {
    let source = fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => from_json_str(&source),
        Some("toml") => from_toml_str(&source),
        _ => Err(SchemaError::Parse(format!(
            "unsupported schema file {}: expected a .json or .toml extension",
            path.display()
        ))),
    }
}

/// Build a schema from an already parsed document
pub fn from_value(value: Value) -> Result<SchemaTable> {
    let Value::Object(tables) = value else {
        return Err(SchemaError::Parse(
            "schema document must be an object of tables".to_string(),
        ));
    };

    let mut schema = SchemaTable::new();
    for (table_name, table_value) in tables {
        let definition = parse_table(&table_name, table_value)?;
        schema = schema.table(table_name, definition);
    }

    log::debug!("Loaded schema document with {} table(s)", schema.len());
    Ok(schema)
}

fn parse_table(table: &str, value: Value) -> Result<TableDefinition> {
    let Value::Object(entries) = value else {
        return Err(SchemaError::Parse(format!(
            "table '{}' must be an object of columns",
            table
        )));
    };

    let mut definition = TableDefinition::new();
    for (key, entry) in entries {
        if key == INDEXES_KEY {
            let indexes: Vec<RawIndex> = serde_json::from_value(entry).map_err(|e| {
                SchemaError::Parse(format!("table '{}': invalid indexes: {}", table, e))
            })?;
            definition.indexes.extend(indexes.into_iter().map(IndexDefinition::from));
            continue;
        }

        let raw: RawColumn = serde_json::from_value(entry)
            .map_err(|e| SchemaError::invalid_column(table, &key, e.to_string()))?;
        let column = raw.into_definition(table, &key)?;
        definition = definition.column(key, column);
    }

    Ok(definition)
}
