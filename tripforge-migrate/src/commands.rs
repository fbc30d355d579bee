//! Command implementations for `tripforge-migrate`.
//!
//! Each command returns what it produced; printing is left to the binary.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tripforge::migration::{discover_scripts, latest_script, validate_checksum, ScriptFile};
use tripforge::schema::itinerary::itinerary_schema;
use tripforge::schema::document;
use tripforge::schema::validate::collect_problems;
use tripforge::{migration, GeneratedScript, SchemaError, SchemaTable, ScriptAssembler};

/// Load the schema document at `path`, or the built-in itinerary schema
pub fn load_schema(path: Option<&Path>) -> Result<SchemaTable> {
    match path {
        Some(path) => document::from_path(path)
            .with_context(|| format!("Failed to load schema from {}", path.display())),
        None => Ok(itinerary_schema()),
    }
}

/// Assemble and write a new script
pub fn generate(assembler: &ScriptAssembler, schema: &SchemaTable) -> Result<GeneratedScript> {
    assembler
        .generate(schema)
        .context("Failed to generate schema script")
}

/// Assemble the script without writing it
pub fn print(assembler: &ScriptAssembler, schema: &SchemaTable) -> Result<String> {
    assembler
        .assemble(schema)
        .context("Failed to assemble schema script")
}

/// Result of `init`
#[derive(Debug)]
pub enum InitOutcome {
    /// No script existed, a new one was written
    Generated(GeneratedScript),
    /// Scripts already exist; this is the latest one
    AlreadyInitialized(ScriptFile),
}

/// Write the initial script unless the output directory already holds one
pub fn init(assembler: &ScriptAssembler, schema: &SchemaTable) -> Result<InitOutcome> {
    let output_dir = &assembler.config().output_dir;

    if let Some(latest) = latest_script(output_dir)? {
        log::info!("Found existing schema script {}", latest.path.display());
        return Ok(InitOutcome::AlreadyInitialized(latest));
    }

    log::info!("No schema script found in {}, generating one", output_dir.display());
    generate(assembler, schema).map(InitOutcome::Generated)
}

/// All scripts in `dir`, oldest first
pub fn list(dir: &Path) -> Result<Vec<ScriptFile>> {
    discover_scripts(dir).with_context(|| format!("Failed to list scripts in {}", dir.display()))
}

/// Check that the latest script matches what the schema generates today
///
/// Returns the latest script when it is up to date. A stale script fails with
/// `SchemaError::ChecksumMismatch`.
pub fn verify(assembler: &ScriptAssembler, schema: &SchemaTable) -> Result<ScriptFile> {
    let output_dir = &assembler.config().output_dir;

    let Some(latest) = latest_script(output_dir)? else {
        bail!("No schema script found in {}", output_dir.display());
    };

    let expected = migration::checksum_str(&print(assembler, schema)?);
    validate_checksum(&latest.path, &latest.checksum, &expected)?;

    Ok(latest)
}

/// Every structural problem in `schema`
pub fn validate(schema: &SchemaTable) -> Vec<SchemaError> {
    collect_problems(schema)
}
