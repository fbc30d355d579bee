//! Script assembly and persistence.
//!
//! The assembled script creates every table before any index and wraps everything
//! in a single transaction, so the database applies all statements or none.

use super::{compile_indexes, compile_table};
use crate::config::GeneratorConfig;
use crate::error::{Result, SchemaError};
use crate::migration::{checksum_str, script_file_name, validate_script_name};
use crate::schema::ordering::creation_order;
use crate::schema::validate::validate_schema;
use crate::schema::{SchemaTable, TableDefinition};
use chrono::{NaiveDateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// Give up looking for a free file name after this many same-second collisions
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// A script that has been written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    pub path: PathBuf,
    pub sql: String,
    /// SHA-256 of `sql`
    pub checksum: String,
}

/// Turns a [`SchemaTable`] into one transactional script
#[derive(Debug, Clone, Default)]
pub struct ScriptAssembler {
    config: GeneratorConfig,
}

impl ScriptAssembler {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build the full SQL script for `schema`
    ///
    /// Every `CREATE TABLE` statement comes before every `CREATE INDEX` statement.
    /// The output depends only on the schema and the configuration, so assembling an
    /// unchanged schema twice gives identical text.
    pub fn assemble(&self, schema: &SchemaTable) -> Result<String> {
        if self.config.validate {
            validate_schema(schema)?;
        }

        let tables: Vec<(&str, &TableDefinition)> = if self.config.order_by_dependencies {
            creation_order(schema)?
        } else {
            schema.iter().collect()
        };

        let mut sql = String::new();
        if !self.config.header.is_empty() {
            sql.push_str(&self.config.header);
            sql.push('\n');
        }
        sql.push_str("BEGIN;\n");

        for (name, table) in &tables {
            sql.push('\n');
            sql.push_str(&compile_table(name, table));
            sql.push('\n');
        }

        let indexes: Vec<String> = tables
            .iter()
            .flat_map(|(name, table)| compile_indexes(name, table))
            .collect();
        if !indexes.is_empty() {
            sql.push('\n');
            for index in &indexes {
                sql.push_str(index);
                sql.push('\n');
            }
        }

        sql.push_str("\nCOMMIT;\n");

        log::debug!(
            "Assembled script with {} table(s) and {} index(es)",
            tables.len(),
            indexes.len()
        );

        Ok(sql)
    }

    /// Write `sql` to a new timestamped file in the output directory
    pub fn write(&self, sql: &str) -> Result<PathBuf> {
        self.write_at(sql, Utc::now().naive_utc())
    }

    /// Write `sql` as if created at `created_at`
    ///
    /// The script name must be non-empty ASCII letters, digits, `_` or `-`; anything
    /// else is rejected before the output directory is touched. The output
    /// directory is created on demand. An existing file is never
    /// overwritten: a numeric suffix is added to the script name instead. If the
    /// write fails the partial file is removed.
    pub fn write_at(&self, sql: &str, created_at: NaiveDateTime) -> Result<PathBuf> {
        validate_script_name(&self.config.script_name)?;

        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|e| SchemaError::io(dir, e))?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = dir.join(script_file_name(&created_at, &self.config.script_name, attempt));

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    log::debug!("{} already exists, trying next name", path.display());
                    continue;
                }
                Err(e) => return Err(SchemaError::io(&path, e)),
            };

            if let Err(e) = file.write_all(sql.as_bytes()).and_then(|_| file.sync_all()) {
                drop(file);
                let _ = fs::remove_file(&path);
                return Err(SchemaError::io(&path, e));
            }

            log::info!("Schema script saved to {}", path.display());
            return Ok(path);
        }

        Err(SchemaError::io(
            dir,
            std::io::Error::new(
                ErrorKind::AlreadyExists,
                format!(
                    "no free file name for script '{}' after {} attempts",
                    self.config.script_name, MAX_NAME_ATTEMPTS
                ),
            ),
        ))
    }

    /// Assemble the script for `schema` and write it
    ///
    /// No file is created unless the whole script was assembled.
    pub fn generate(&self, schema: &SchemaTable) -> Result<GeneratedScript> {
        let sql = self.assemble(schema)?;
        let path = self.write(&sql)?;
        let checksum = checksum_str(&sql);
        Ok(GeneratedScript {
            path,
            sql,
            checksum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDefinition, IndexDefinition, ReferentialAction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn small_schema() -> SchemaTable {
        SchemaTable::new()
            .table(
                "users",
                TableDefinition::new()
                    .column("id", ColumnDefinition::serial().primary_key())
                    .column("email", ColumnDefinition::varchar(100).not_null().unique())
                    .index(IndexDefinition::on(["email"])),
            )
            .table(
                "itineraries",
                TableDefinition::new()
                    .column("id", ColumnDefinition::serial().primary_key())
                    .column(
                        "user_id",
                        ColumnDefinition::integer()
                            .references("users")
                            .on_delete(ReferentialAction::SetNull),
                    )
                    .index(IndexDefinition::on(["user_id"])),
            )
    }

    fn config_in(dir: &TempDir) -> GeneratorConfig {
        GeneratorConfig {
            output_dir: dir.path().join("migrations"),
            ..Default::default()
        }
    }

    #[test]
    fn test_assemble_exact_layout() {
        let sql = ScriptAssembler::default().assemble(&small_schema()).unwrap();
        let expected = "\
-- Generated by tripforge. Do not edit by hand.
BEGIN;

CREATE TABLE IF NOT EXISTS \"users\" (
  \"id\" SERIAL PRIMARY KEY,
  \"email\" VARCHAR(100) NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS \"itineraries\" (
  \"id\" SERIAL PRIMARY KEY,
  \"user_id\" INTEGER REFERENCES \"users\"(\"id\") ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS \"idx_users_email\" ON \"users\" USING btree (\"email\");
CREATE INDEX IF NOT EXISTS \"idx_itineraries_user_id\" ON \"itineraries\" USING btree (\"user_id\");

COMMIT;
";
        assert_eq!(sql, expected);
    }

    #[test]
    fn test_assemble_without_header_or_indexes() {
        let assembler = ScriptAssembler::new(GeneratorConfig {
            header: String::new(),
            ..Default::default()
        });
        let schema = SchemaTable::new().table(
            "tags",
            TableDefinition::new().column("label", ColumnDefinition::text()),
        );

        assert_eq!(
            assembler.assemble(&schema).unwrap(),
            "BEGIN;\n\nCREATE TABLE IF NOT EXISTS \"tags\" (\n  \"label\" TEXT\n);\n\nCOMMIT;\n"
        );
    }

    #[test]
    fn test_forward_reference_is_reordered() {
        let schema = SchemaTable::new()
            .table(
                "activities",
                TableDefinition::new()
                    .column("day_id", ColumnDefinition::integer().references("days")),
            )
            .table("days", TableDefinition::new().column("id", ColumnDefinition::serial()));

        let sql = ScriptAssembler::default().assemble(&schema).unwrap();
        let days = sql.find("\"days\" (").unwrap();
        let activities = sql.find("\"activities\" (").unwrap();
        assert!(days < activities);
    }

    #[test]
    fn test_declared_order_is_kept_when_ordering_disabled() {
        let schema = SchemaTable::new()
            .table(
                "activities",
                TableDefinition::new()
                    .column("day_id", ColumnDefinition::integer().references("days")),
            )
            .table("days", TableDefinition::new().column("id", ColumnDefinition::serial()));

        let assembler = ScriptAssembler::new(GeneratorConfig {
            order_by_dependencies: false,
            ..Default::default()
        });
        let sql = assembler.assemble(&schema).unwrap();
        let days = sql.find("\"days\" (").unwrap();
        let activities = sql.find("\"activities\" (").unwrap();
        assert!(activities < days);
    }

    #[test]
    fn test_validation_failure_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let assembler = ScriptAssembler::new(config_in(&temp_dir));
        let schema = SchemaTable::new().table("nothing", TableDefinition::new());

        assert!(matches!(
            assembler.generate(&schema),
            Err(SchemaError::EmptyTable(_))
        ));
        assert!(!temp_dir.path().join("migrations").exists());
    }

    #[test]
    fn test_validation_disabled_passes_empty_table_through() {
        let assembler = ScriptAssembler::new(GeneratorConfig {
            validate: false,
            ..Default::default()
        });
        let schema = SchemaTable::new().table("nothing", TableDefinition::new());

        let sql = assembler.assemble(&schema).unwrap();
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS \"nothing\" (\n  \n);"));
    }

    #[test]
    fn test_cycle_is_reported() {
        let schema = SchemaTable::new()
            .table(
                "a",
                TableDefinition::new()
                    .column("b_id", ColumnDefinition::integer().references("b"))
                    .column("id", ColumnDefinition::serial()),
            )
            .table(
                "b",
                TableDefinition::new()
                    .column("a_id", ColumnDefinition::integer().references("a"))
                    .column("id", ColumnDefinition::serial()),
            )
            .table(
                "c",
                TableDefinition::new()
                    .column("a_id", ColumnDefinition::integer().references("a"))
                    .column("id", ColumnDefinition::serial()),
            );

        match ScriptAssembler::default().assemble(&schema) {
            Err(SchemaError::CircularDependency { tables }) => assert_eq!(tables, vec!["a", "b"]),
            other => panic!("expected circular dependency, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_script_name_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let assembler = ScriptAssembler::new(GeneratorConfig {
            script_name: String::new(),
            ..config_in(&temp_dir)
        });

        assert!(matches!(
            assembler.generate(&small_schema()),
            Err(SchemaError::InvalidScriptName(name)) if name.is_empty()
        ));
        assert!(!temp_dir.path().join("migrations").exists());
    }

    #[test]
    fn test_script_name_cannot_leave_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["../escaped", "nested/name", "dotted.name", "with space"] {
            let assembler = ScriptAssembler::new(GeneratorConfig {
                script_name: name.to_string(),
                ..config_in(&temp_dir)
            });

            assert!(
                matches!(
                    assembler.generate(&small_schema()),
                    Err(SchemaError::InvalidScriptName(rejected)) if rejected == name
                ),
                "{name} should be rejected"
            );
        }
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_at_creates_directory_and_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let assembler = ScriptAssembler::new(config_in(&temp_dir));
        let created_at = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        let path = assembler.write_at("BEGIN;\nCOMMIT;\n", created_at).unwrap();
        assert_eq!(
            path,
            temp_dir.path().join("migrations").join("20250101120000_initial_schema.sql")
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "BEGIN;\nCOMMIT;\n");
    }

    #[test]
    fn test_write_at_same_second_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let assembler = ScriptAssembler::new(config_in(&temp_dir));
        let created_at = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        let first = assembler.write_at("first", created_at).unwrap();
        let second = assembler.write_at("second", created_at).unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("20250101120000_initial_schema_2.sql"));
        assert_eq!(fs::read_to_string(&first).unwrap(), "first");
        assert_eq!(fs::read_to_string(&second).unwrap(), "second");
    }

    #[test]
    fn test_generate_returns_checksum_of_content() {
        let temp_dir = TempDir::new().unwrap();
        let assembler = ScriptAssembler::new(config_in(&temp_dir));

        let generated = assembler.generate(&small_schema()).unwrap();
        assert_eq!(fs::read_to_string(&generated.path).unwrap(), generated.sql);
        assert_eq!(generated.checksum, checksum_str(&generated.sql));
    }
}
