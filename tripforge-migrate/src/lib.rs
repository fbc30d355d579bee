//! Tripforge Schema Script Library
//!
//! The CLI tool (main.rs) uses this library.

pub mod commands;
