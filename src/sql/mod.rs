//! SQL generation
//!
//! Leaves first: [`column`] turns one column into a clause, [`table`] wraps a table's
//! clauses into `CREATE TABLE`, [`index`] emits `CREATE INDEX` statements, and
//! [`script`] puts everything into one transactional script.

pub mod column;
pub mod index;
pub mod script;
pub mod table;

pub use column::{compile_column, quote_ident};
pub use index::{compile_index, compile_indexes, index_name};
pub use script::{GeneratedScript, ScriptAssembler};
pub use table::compile_table;
