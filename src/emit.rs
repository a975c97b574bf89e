//! Emit module: renders a registry as source text and persists it.
//!
//! Rendered Rust source is parsed back before it is handed out, and files are replaced atomically,
//! so a failed run never leaves a truncated artifact behind.

use crate::config::EmitConfig;
use crate::ir::Registry;
use crate::types::OpFlag;
use crate::FilterOpError;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Artifact format selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Rust,
    Json,
}

/// Result of writing an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The file already held identical contents and was left alone.
    Unchanged,
}

pub struct SourceEmitter {
    config: EmitConfig,
}

impl SourceEmitter {
    pub fn new(config: EmitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitConfig {
        &self.config
    }

    /// Renders `registry` as Rust source and checks that it parses.
    pub fn render(&self, registry: &Registry) -> Result<String, FilterOpError> {
        let text = self.render_unchecked(registry);
        syn::parse_file(&text).map_err(|e| FilterOpError::Emit(e.to_string()))?;
        debug!(bytes = text.len(), "rendered registry source");
        Ok(text)
    }

    pub fn render_as(&self, registry: &Registry, format: OutputFormat) -> Result<String, FilterOpError> {
        match format {
            OutputFormat::Rust => self.render(registry),
            OutputFormat::Json => self.render_json(registry),
        }
    }

    pub fn render_json(&self, registry: &Registry) -> Result<String, FilterOpError> {
        let mut text = serde_json::to_string_pretty(registry).map_err(|e| FilterOpError::Emit(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }

    fn render_unchecked(&self, registry: &Registry) -> String {
        let EmitConfig { type_name: ty, names_table, flags_table, header } = &self.config;
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "{header}");
        out.push('\n');
        out.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]\n");
        let _ = writeln!(out, "pub struct {ty}(pub u16);");
        out.push('\n');

        let _ = writeln!(out, "impl {ty} {{");
        for (i, c) in registry.constants().iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let doc = c.documentation.as_deref().filter(|d| !d.is_empty());
            if let Some(doc) = doc {
                for line in doc.lines() {
                    if line.is_empty() {
                        out.push_str("    ///\n");
                    } else {
                        let _ = writeln!(out, "    /// `{line}`");
                    }
                }
            }
            if !c.operand_type.is_none() {
                if doc.is_some() {
                    out.push_str("    ///\n");
                }
                let _ = writeln!(out, "    /// `$Value` type: {}", c.operand_type.as_str());
            }
            let _ = writeln!(out, "    pub const {}: {ty} = {ty}({});", c.constant, c.code);
        }
        out.push_str("}\n\n");

        for flag in OpFlag::ALL {
            let _ = writeln!(out, "pub const {}: u64 = 1 << {};", flag.const_name(), flag.shift());
        }
        out.push('\n');

        let _ = writeln!(out, "pub static {names_table}: &[({ty}, &str)] = &[");
        for (code, name) in registry.names() {
            if let Some(c) = registry.constant(code) {
                let _ = writeln!(out, "    ({ty}::{}, {:?}),", c.constant, name);
            }
        }
        out.push_str("];\n\n");

        let _ = writeln!(out, "pub static {flags_table}: &[({ty}, u64)] = &[");
        for (code, flags) in registry.flag_entries() {
            if let Some(c) = registry.constant(code) {
                let _ = writeln!(out, "    ({ty}::{}, {}),", c.constant, flags.symbolic());
            }
        }
        out.push_str("];\n");
        out
    }

    /// Renders `registry` and writes it to `path`.
    pub fn emit(&self, registry: &Registry, path: impl AsRef<Path>) -> Result<WriteOutcome, FilterOpError> {
        let text = self.render(registry)?;
        write_atomic(path, &text)
    }
}

impl Default for SourceEmitter {
    fn default() -> Self {
        Self::new(EmitConfig::default())
    }
}

/// Whether `path` already holds exactly `contents`. A missing file is not up to date.
pub fn is_up_to_date(path: impl AsRef<Path>, contents: &str) -> Result<bool, FilterOpError> {
    match std::fs::read(path.as_ref()) {
        Ok(existing) => Ok(existing == contents.as_bytes()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Mode for artifacts that do not exist yet.
#[cfg(unix)]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    None
}

/// Writes `contents` to a temporary file next to `path` and renames it over `path`.
///
/// A replaced file keeps its permissions; a new one is created `0644` on unix.
pub fn write_atomic(path: impl AsRef<Path>, contents: &str) -> Result<WriteOutcome, FilterOpError> {
    let path = path.as_ref();
    if is_up_to_date(path, contents)? {
        debug!(path = %path.display(), "artifact unchanged");
        return Ok(WriteOutcome::Unchanged);
    }
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let permissions = match std::fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => new_file_permissions(),
        Err(e) => return Err(e.into()),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    if let Some(permissions) = permissions {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    info!(path = %path.display(), bytes = contents.len(), "artifact written");
    Ok(WriteOutcome::Written)
}
