//! Generator module: the end-to-end run from definition table to written artifact.
//!
//! This module provides the Generator type used by the `filterop-gen` binary.

use crate::config::EmitConfig;
use crate::emit::{is_up_to_date, write_atomic, OutputFormat, SourceEmitter, WriteOutcome};
use crate::ir::Registry;
use crate::schema::OpTable;
use crate::validate::Strictness;
use crate::FilterOpError;
use std::path::Path;
use tracing::info;

/// Validates, compiles and emits a definition table.
pub struct Generator {
    emitter: SourceEmitter,
    strictness: Strictness,
    format: OutputFormat,
}

impl Generator {
    pub fn new(config: EmitConfig) -> Self {
        Self {
            emitter: SourceEmitter::new(config),
            strictness: Strictness::Strict,
            format: OutputFormat::Rust,
        }
    }

    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn generate(&self, table: &OpTable) -> Result<Registry, FilterOpError> {
        crate::generate(table, self.strictness)
    }

    /// Generates the artifact text without touching the filesystem.
    pub fn render(&self, table: &OpTable) -> Result<String, FilterOpError> {
        let registry = self.generate(table)?;
        self.emitter.render_as(&registry, self.format)
    }

    /// Generates the artifact and replaces `path` with it. Nothing is written on failure.
    pub fn run(&self, table: &OpTable, path: impl AsRef<Path>) -> Result<WriteOutcome, FilterOpError> {
        let text = self.render(table)?;
        let outcome = write_atomic(path.as_ref(), &text)?;
        info!(path = %path.as_ref().display(), ops = table.len(), ?outcome, "generation finished");
        Ok(outcome)
    }

    /// Fails with `FilterOpError::Stale` if `path` does not hold the current artifact.
    pub fn check(&self, table: &OpTable, path: impl AsRef<Path>) -> Result<(), FilterOpError> {
        let path = path.as_ref();
        let text = self.render(table)?;
        if is_up_to_date(path, &text)? {
            Ok(())
        } else {
            Err(FilterOpError::Stale(path.to_path_buf()))
        }
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(EmitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::filter_op_table;
    use crate::schema::{OpTableBuilder, OperationDescriptor};
    use tempfile::tempdir;

    fn broken_table() -> OpTable {
        OpTableBuilder::new()
            .op("Invalid")
            .push(OperationDescriptor::new("VarPure").doc("m[$Value].Pure"))
            .build()
    }

    #[test]
    fn test_run_then_check() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filter_op.gen.rs");
        let generator = Generator::default();
        assert!(matches!(generator.check(&filter_op_table(), &path), Err(FilterOpError::Stale(_))));
        assert_eq!(generator.run(&filter_op_table(), &path).unwrap(), WriteOutcome::Written);
        generator.check(&filter_op_table(), &path).unwrap();
        assert_eq!(generator.run(&filter_op_table(), &path).unwrap(), WriteOutcome::Unchanged);
    }

    #[test]
    fn test_corrupt_artifact_is_stale_and_regenerated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filter_op.gen.rs");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let generator = Generator::default();
        assert!(matches!(generator.check(&filter_op_table(), &path), Err(FilterOpError::Stale(_))));
        assert_eq!(generator.run(&filter_op_table(), &path).unwrap(), WriteOutcome::Written);
        generator.check(&filter_op_table(), &path).unwrap();
    }

    #[test]
    fn test_failed_validation_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filter_op.gen.rs");
        let err = Generator::default().run(&broken_table(), &path).unwrap_err();
        assert!(err.to_string().contains("VarPure"));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_validation_keeps_previous_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filter_op.gen.rs");
        std::fs::write(&path, "previous").unwrap();
        assert!(Generator::default().run(&broken_table(), &path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn test_lenient_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("filter_op.gen.rs");
        let generator = Generator::default().strictness(Strictness::Lenient);
        assert_eq!(generator.run(&broken_table(), &path).unwrap(), WriteOutcome::Written);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("pub const VAR_PURE: FilterOp = FilterOp(1);"));
    }

    #[test]
    fn test_json_format() {
        let text = Generator::default().format(OutputFormat::Json).render(&filter_op_table()).unwrap();
        let reg: Registry = serde_json::from_str(&text).unwrap();
        assert_eq!(reg.len(), 32);
    }
}
