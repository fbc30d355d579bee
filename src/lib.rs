//! # Tripforge
//!
//! Declarative schema-to-SQL generator for the tripforge travel itinerary planner.
//!
//! A [`SchemaTable`] describes every table of the application (columns, foreign keys,
//! indexes). The compilers in [`sql`] turn it into one transactional PostgreSQL script,
//! and [`ScriptAssembler`] writes that script to a timestamped file.
//!
//! ```rust,no_run
//! use tripforge::{GeneratorConfig, ScriptAssembler};
//! use tripforge::schema::itinerary::itinerary_schema;
//!
//! let assembler = ScriptAssembler::new(GeneratorConfig::default());
//! let generated = assembler.generate(&itinerary_schema())?;
//! println!("{}", generated.path.display());
//! # Ok::<(), tripforge::SchemaError>(())
//! ```

pub mod config;
pub mod error;
pub mod migration;
pub mod schema;
pub mod sql;

pub use config::GeneratorConfig;
pub use error::{Result, SchemaError};
pub use schema::{
    ColumnDefinition, ColumnType, ForeignKey, IndexDefinition, IndexMethod, ReferentialAction,
    SchemaTable, TableDefinition, TypeSize,
};
pub use sql::{compile_column, compile_indexes, compile_table, GeneratedScript, ScriptAssembler};
