//! Filterop: opcode registry generator for the filter expression IR of a rule-matching engine.
//!
//! A declarative, ordered table of filter operations is validated and compiled into a registry:
//! an opcode enumeration, a total code-to-name table and a partial code-to-flags table.
//! The registry can be rendered as Rust source or JSON and written atomically.
//!
//! # Architecture
//! - Definition table (operation descriptors, in opcode order)
//! - Validation (operand types, unique names, sentinel)
//! - Compilation to the registry (code assignment, name and flag tables)
//! - Emission (source rendering, atomic file replacement)

mod schema;
mod definitions;
mod validate;
mod compiler;
mod ir;
mod types;
mod config;
mod emit;
mod generator;

pub use schema::*;
pub use definitions::*;
pub use validate::*;
pub use compiler::*;
pub use ir::*;
pub use types::*;
pub use config::*;
pub use emit::*;
pub use generator::*;

use std::path::PathBuf;

/// Unified error type for Filterop operations
#[derive(Debug, thiserror::Error)]
pub enum FilterOpError {
    #[error("Validation failed: {}", format_diagnostics(.0))]
    Validation(Vec<Diagnostic>),
    #[error("Unknown operand type: {0}")]
    UnknownOperandType(String),
    #[error("Emit error: {0}")]
    Emit(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Generated file is out of date: {}", .0.display())]
    Stale(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterOpError {
    /// Diagnostics carried by a validation failure; empty for other errors.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            FilterOpError::Validation(diags) => diags,
            _ => &[],
        }
    }
}

fn format_diagnostics(diags: &[Diagnostic]) -> String {
    diags.iter().map(|d| d.to_string()).collect::<Vec<_>>().join("; ")
}

/// Validates `table` and compiles it into a registry.
pub fn generate(table: &OpTable, strictness: Strictness) -> Result<Registry, FilterOpError> {
    validate(table, strictness)?;
    Ok(DefaultCompiler::compile(table))
}
