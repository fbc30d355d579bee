//! Schema script files
//!
//! Generated scripts live in one directory as `<YYYYMMDDHHMMSS>_<name>.sql`.
//! The timestamp keeps file names unique; it carries no versioning semantics and
//! nothing records which scripts were applied.

pub mod checksum;
pub mod file;

pub use checksum::{calculate_checksum, checksum_str, validate_checksum};
pub use file::{
    discover_scripts, latest_script, script_file_name, validate_script_name, ScriptFile,
};
