//! Config module: emitter settings, loadable from TOML.

use crate::FilterOpError;
use serde::{Serialize, Deserialize};
use std::path::Path;

pub const DEFAULT_HEADER: &str = "// Code generated by filterop-gen; DO NOT EDIT.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitConfig {
    /// Name of the generated opcode newtype.
    pub type_name: String,
    /// Name of the generated code-to-name table.
    pub names_table: String,
    /// Name of the generated code-to-flags table.
    pub flags_table: String,
    /// First line of the generated file.
    pub header: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            type_name: "FilterOp".to_string(),
            names_table: "FILTER_OP_NAMES".to_string(),
            flags_table: "FILTER_OP_FLAGS".to_string(),
            header: DEFAULT_HEADER.to_string(),
        }
    }
}

impl EmitConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, FilterOpError> {
        toml::from_str(s).map_err(|e| FilterOpError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FilterOpError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }
}
