//! Checksum calculation for schema scripts

use crate::error::{Result, SchemaError};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Hexadecimal SHA-256 hash of a script's content
pub fn checksum_str(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Calculate the SHA-256 checksum of a script file
///
/// # Errors
///
/// Returns `SchemaError::Io` if the file cannot be read
pub fn calculate_checksum(script_path: &Path) -> Result<String> {
    let content = fs::read_to_string(script_path).map_err(|e| SchemaError::io(script_path, e))?;
    Ok(checksum_str(&content))
}

/// Validate a stored checksum against the current one
pub fn validate_checksum(script_path: &Path, stored: &str, current: &str) -> Result<()> {
    if stored == current {
        Ok(())
    } else {
        Err(SchemaError::ChecksumMismatch {
            path: script_path.to_path_buf(),
            stored: stored.to_string(),
            current: current.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_checksum_str_is_sha256_hex() {
        assert_eq!(
            checksum_str(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(checksum_str("BEGIN;").len(), 64);
    }

    #[test]
    fn test_calculate_checksum_matches_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("20250101120000_initial_schema.sql");
        fs::write(&path, "BEGIN;\nCOMMIT;\n").unwrap();

        assert_eq!(calculate_checksum(&path).unwrap(), checksum_str("BEGIN;\nCOMMIT;\n"));
    }

    #[test]
    fn test_calculate_checksum_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = calculate_checksum(&temp_dir.path().join("missing.sql"));
        assert!(matches!(result, Err(SchemaError::Io { .. })));
    }

    #[test]
    fn test_validate_checksum() {
        let path = Path::new("x.sql");
        assert!(validate_checksum(path, "abc", "abc").is_ok());
        assert!(matches!(
            validate_checksum(path, "abc", "def"),
            Err(SchemaError::ChecksumMismatch { .. })
        ));
    }
}
