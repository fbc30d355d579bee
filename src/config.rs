//! Generator configuration.
//!
//! [`GeneratorConfig::load`] reads the `[generator]` section of
//! `config/config.toml` and layers `TRIPFORGE__GENERATOR__*` environment
//! variables on top.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config/config.toml";
const ENV_PREFIX: &str = "TRIPFORGE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratorConfig {
    /// Directory the script is written to; created on demand
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Script name, the part after the timestamp in `<timestamp>_<name>.sql`
    #[serde(default = "default_script_name")]
    pub script_name: String,
    /// Run pre-flight validation before compiling
    #[serde(default = "default_true")]
    pub validate: bool,
    /// Emit tables in foreign key dependency order instead of declaration order
    #[serde(default = "default_true")]
    pub order_by_dependencies: bool,
    /// Comment line written above `BEGIN;`
    #[serde(default = "default_header")]
    pub header: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("migrations")
}

fn default_script_name() -> String {
    "initial_schema".to_string()
}

fn default_true() -> bool {
    true
}

fn default_header() -> String {
    "-- Generated by tripforge. Do not edit by hand.".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            script_name: default_script_name(),
            validate: default_true(),
            order_by_dependencies: default_true(),
            header: default_header(),
        }
    }
}

impl GeneratorConfig {
    /// Load the generator configuration from `config/config.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // The file exists but is unreadable: retry with env only
                if std::path::Path::new(CONFIG_FILE).exists() {
                    log::warn!(
                        "Failed to load {}, falling back to env. Error: {}",
                        CONFIG_FILE,
                        err
                    );
                }
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        // A missing section means every default applies
        match settings.get::<GeneratorConfig>("generator") {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(GeneratorConfig::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Generator configuration could not be loaded from file or environment: {}",
                e
            ))),
        }
    }
}
