//! Schema script file naming and discovery

use crate::error::{Result, SchemaError};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// `{YYYYMMDDHHMMSS}_{name}.sql`
static SCRIPT_FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{14})_(.+)\.sql$").expect("script file name pattern is valid")
});

/// Allowed script names: one path component that the file name pattern reads back
static SCRIPT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("script name pattern is valid"));

/// Timestamp format used in script file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Represents a discovered schema script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    pub path: PathBuf,

    /// Creation timestamp (YYYYMMDDHHMMSS)
    pub timestamp: i64,

    /// Script name, e.g. `initial_schema`
    pub name: String,

    /// SHA-256 checksum of the file content
    pub checksum: String,
}

impl ScriptFile {
    /// Parse a script file name into its timestamp and name
    ///
    /// # Example
    /// - `20250101120000_initial_schema.sql` → timestamp: 20250101120000, name: "initial_schema"
    pub fn parse_filename(filename: &str) -> Result<(i64, String)> {
        let caps = SCRIPT_FILE_NAME
            .captures(filename)
            .ok_or_else(|| SchemaError::InvalidFileName(filename.to_string()))?;

        let timestamp = caps[1]
            .parse::<i64>()
            .map_err(|_| SchemaError::InvalidFileName(filename.to_string()))?;

        Ok((timestamp, caps[2].to_string()))
    }

    /// Creation time encoded in the file name, if it is a valid calendar time
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp.to_string(), TIMESTAMP_FORMAT).ok()
    }
}

/// Check that `name` can be used as the name part of a script file
pub fn validate_script_name(name: &str) -> Result<()> {
    if SCRIPT_NAME.is_match(name) {
        Ok(())
    } else {
        Err(SchemaError::InvalidScriptName(name.to_string()))
    }
}

/// File name for a script created at `created_at`
///
/// `attempt` 0 gives `<timestamp>_<name>.sql`; later attempts append `_<attempt + 1>`
/// so that scripts created within the same second never share a name.
pub fn script_file_name(created_at: &NaiveDateTime, name: &str, attempt: u32) -> String {
    let timestamp = created_at.format(TIMESTAMP_FORMAT);
    if attempt == 0 {
        format!("{}_{}.sql", timestamp, name)
    } else {
        format!("{}_{}_{}.sql", timestamp, name, attempt + 1)
    }
}

/// Discover all schema scripts in a directory
///
/// Returns scripts sorted by timestamp, then name (oldest first). Files that do not
/// match the naming pattern are ignored. A missing directory holds no scripts.
pub fn discover_scripts(scripts_dir: &Path) -> Result<Vec<ScriptFile>> {
    if !scripts_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(scripts_dir).map_err(|e| SchemaError::io(scripts_dir, e))?;

    let mut scripts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SchemaError::io(scripts_dir, e))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let (timestamp, name) = match ScriptFile::parse_filename(filename) {
            Ok(parsed) => parsed,
            Err(_) => {
                log::debug!("Ignoring non-script file {}", path.display());
                continue;
            }
        };

        let checksum = crate::migration::calculate_checksum(&path)?;
        scripts.push(ScriptFile {
            path,
            timestamp,
            name,
            checksum,
        });
    }

    scripts.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| name_order_key(&a.name).cmp(&name_order_key(&b.name)))
    });

    Ok(scripts)
}

/// `initial_schema_10` sorts as (`initial_schema`, 10), a bare name as (name, 1)
fn name_order_key(name: &str) -> (&str, u32) {
    name.rsplit_once('_')
        .and_then(|(base, suffix)| {
            let attempt = suffix.parse::<u32>().ok()?;
            (!base.is_empty() && attempt >= 2).then_some((base, attempt))
        })
        .unwrap_or((name, 1))
}

/// Most recent script in a directory
pub fn latest_script(scripts_dir: &Path) -> Result<Option<ScriptFile>> {
    Ok(discover_scripts(scripts_dir)?.pop())
}
