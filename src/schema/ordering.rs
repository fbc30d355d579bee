//! Dependency ordering for table creation
//!
//! This module provides functionality to:
//! - Extract foreign key dependencies from table definitions
//! - Topologically sort tables by their dependencies
//!
//! The sort is stable: among tables whose dependencies are already created, the one
//! declared first comes first. A schema that is already declared in dependency order
//! is returned unchanged.

use super::{SchemaTable, TableDefinition};
use crate::error::{Result, SchemaError};
use std::collections::{HashMap, HashSet};

/// Table metadata for dependency ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    /// Tables this table depends on, in column order, without duplicates
    pub dependencies: Vec<String>,
}

/// Collect the foreign key dependencies of every table
///
/// Self references are dropped (a table can always reference itself), and so are
/// references to tables outside the schema; validation reports those.
pub fn table_dependencies(schema: &SchemaTable) -> Vec<TableInfo> {
    let known: HashSet<&str> = schema.table_names().collect();

    schema
        .iter()
        .map(|(name, table)| {
            let mut dependencies: Vec<String> = Vec::new();
            for (_, column) in &table.columns {
                let Some(ref fk) = column.references else {
                    continue;
                };
                if fk.table == name || !known.contains(fk.table.as_str()) {
                    continue;
                }
                if !dependencies.contains(&fk.table) {
                    dependencies.push(fk.table.clone());
                }
            }
            TableInfo {
                name: name.to_string(),
                dependencies,
            }
        })
        .collect()
}

/// Topologically sort tables by their dependencies
///
/// Returns table names in order: dependencies first, dependents last.
/// Dependencies on names outside `tables` are treated as already created.
/// Returns `SchemaError::CircularDependency` naming the tables that sit on a cycle;
/// tables merely blocked behind one are left out.
pub fn topological_sort(tables: &[TableInfo]) -> Result<Vec<String>> {
    Ok(sorted_positions(tables)?
        .into_iter()
        .map(|position| tables[position].name.clone())
        .collect())
}

/// Positions into `tables` in creation order
fn sorted_positions(tables: &[TableInfo]) -> Result<Vec<usize>> {
    let known: HashSet<&str> = tables.iter().map(|table| table.name.as_str()).collect();
    let mut created: HashSet<&str> = HashSet::new();
    let mut emitted = vec![false; tables.len()];
    let mut result: Vec<usize> = Vec::with_capacity(tables.len());

    while result.len() < tables.len() {
        let next = tables.iter().enumerate().position(|(position, table)| {
            !emitted[position]
                && table
                    .dependencies
                    .iter()
                    .all(|dep| created.contains(dep.as_str()) || !known.contains(dep.as_str()))
        });

        match next {
            Some(position) => {
                emitted[position] = true;
                created.insert(tables[position].name.as_str());
                result.push(position);
            }
            None => {
                return Err(SchemaError::CircularDependency {
                    tables: cycle_members(tables, &emitted),
                });
            }
        }
    }

    Ok(result)
}

/// Tables not yet emitted that can reach themselves through their dependencies
fn cycle_members(tables: &[TableInfo], emitted: &[bool]) -> Vec<String> {
    let blocked: HashMap<&str, &TableInfo> = tables
        .iter()
        .zip(emitted)
        .filter(|(_, done)| !**done)
        .map(|(table, _)| (table.name.as_str(), table))
        .collect();

    tables
        .iter()
        .zip(emitted)
        .filter(|(table, done)| !**done && reaches_itself(&blocked, table))
        .map(|(table, _)| table.name.clone())
        .collect()
}

fn reaches_itself(blocked: &HashMap<&str, &TableInfo>, start: &TableInfo) -> bool {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = start.dependencies.iter().map(String::as_str).collect();

    while let Some(name) = stack.pop() {
        if name == start.name {
            return true;
        }
        if !seen.insert(name) {
            continue;
        }
        if let Some(table) = blocked.get(name) {
            stack.extend(table.dependencies.iter().map(String::as_str));
        }
    }

    false
}

/// Tables of `schema` in creation order
pub fn creation_order(schema: &SchemaTable) -> Result<Vec<(&str, &TableDefinition)>> {
    let tables: Vec<(&str, &TableDefinition)> = schema.iter().collect();
    let positions = sorted_positions(&table_dependencies(schema))?;

    if positions.iter().enumerate().any(|(i, position)| i != *position) {
        let names: Vec<&str> = positions.iter().map(|p| tables[*p].0).collect();
        log::info!(
            "Reordered tables to satisfy foreign key dependencies: {}",
            names.join(", ")
        );
    }

    Ok(positions.into_iter().map(|position| tables[position]).collect())
}

/// Table names of `schema` in creation order
pub fn dependency_order(schema: &SchemaTable) -> Result<Vec<String>> {
    Ok(creation_order(schema)?
        .into_iter()
        .map(|(name, _)| name.to_string())
        .collect())
}
