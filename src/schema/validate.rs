//! Pre-flight validation of a [`SchemaTable`].
//!
//! The compilers trust their input; anything malformed would only surface when the
//! database rejects the script. Validation catches structural problems up front and
//! names the offending table and column.

use super::{SchemaTable, TableDefinition, TypeSize, INDEXES_KEY};
use crate::error::{Result, SchemaError};
use crate::sql::index::index_name;
use std::collections::{HashMap, HashSet};

/// Validate `schema`, returning the first problem found
pub fn validate_schema(schema: &SchemaTable) -> Result<()> {
    match collect_problems(schema).into_iter().next() {
        Some(problem) => Err(problem),
        None => Ok(()),
    }
}

/// Every structural problem in `schema`, in declaration order
pub fn collect_problems(schema: &SchemaTable) -> Vec<SchemaError> {
    let mut problems = Vec::new();
    let mut seen_tables: HashSet<&str> = HashSet::new();
    // index name -> table that declared it first
    let mut index_names: HashMap<String, &str> = HashMap::new();

    for (table_name, table) in schema.iter() {
        if !seen_tables.insert(table_name) {
            problems.push(SchemaError::DuplicateTable(table_name.to_string()));
        }

        check_columns(table_name, table, &mut problems);
        check_references(schema, table_name, table, &mut problems);

        for index in &table.indexes {
            if index.columns.is_empty() {
                log::warn!("Index on table '{}' has no columns and will be skipped", table_name);
                continue;
            }

            let name = index_name(table_name, index);
            if !index.method.is_keyword() {
                problems.push(SchemaError::InvalidIndexMethod {
                    table: table_name.to_string(),
                    index: name.clone(),
                    method: index.method.to_string(),
                });
            }

            for column in &index.columns {
                if !table.has_column(column) {
                    problems.push(SchemaError::UnknownIndexColumn {
                        table: table_name.to_string(),
                        index: name.clone(),
                        column: column.clone(),
                    });
                }
            }

            if let Some(first) = index_names.get(&name) {
                problems.push(SchemaError::DuplicateIndexName {
                    index: name,
                    first: first.to_string(),
                    second: table_name.to_string(),
                });
            } else {
                index_names.insert(name, table_name);
            }
        }
    }

    problems
}

fn check_columns(table_name: &str, table: &TableDefinition, problems: &mut Vec<SchemaError>) {
    let emittable = table
        .columns
        .iter()
        .filter(|(name, _)| name != INDEXES_KEY)
        .count();
    if emittable == 0 {
        problems.push(SchemaError::EmptyTable(table_name.to_string()));
    }

    let mut seen_columns: HashSet<&str> = HashSet::new();
    for (column_name, column) in &table.columns {
        if column_name == INDEXES_KEY {
            problems.push(SchemaError::ReservedColumnName(table_name.to_string()));
            continue;
        }

        if !seen_columns.insert(column_name.as_str()) {
            problems.push(SchemaError::DuplicateColumn {
                table: table_name.to_string(),
                column: column_name.clone(),
            });
        }

        let invalid = |reason: &str| SchemaError::invalid_column(table_name, column_name, reason);

        if column.column_type.name.trim().is_empty() {
            problems.push(invalid("type must not be empty"));
        }

        match column.column_type.size {
            TypeSize::Plain => {}
            TypeSize::Length(0) => problems.push(invalid("length must be positive")),
            TypeSize::Length(_) => {}
            TypeSize::Scaled { precision: 0, .. } => {
                problems.push(invalid("precision must be positive"))
            }
            TypeSize::Scaled { precision, scale } if scale > precision => {
                problems.push(invalid("scale must not exceed precision"))
            }
            TypeSize::Scaled { .. } => {}
        }
    }
}

fn check_references(
    schema: &SchemaTable,
    table_name: &str,
    table: &TableDefinition,
    problems: &mut Vec<SchemaError>,
) {
    for (column_name, column) in &table.columns {
        let Some(ref fk) = column.references else {
            continue;
        };

        match schema.get(&fk.table) {
            None => problems.push(SchemaError::UnknownReference {
                table: table_name.to_string(),
                column: column_name.clone(),
                referenced: fk.table.clone(),
            }),
            Some(referenced) if !referenced.has_column(&fk.column) => {
                problems.push(SchemaError::UnknownReferenceColumn {
                    table: table_name.to_string(),
                    column: column_name.clone(),
                    referenced_table: fk.table.clone(),
                    referenced_column: fk.column.clone(),
                })
            }
            Some(_) => {}
        }
    }
}
