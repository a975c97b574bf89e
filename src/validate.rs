//! Validator module: checks a definition table for internal consistency before codes are assigned.
//!
//! Validation only inspects the table. It reports every violation it finds, in table order.

use crate::ir::OpCode;
use crate::schema::{OpTable, OperationDescriptor};
use crate::FilterOpError;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Name of the operation that must occupy code zero.
pub const SENTINEL_NAME: &str = "Invalid";

static VALUE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$Value\b").unwrap());
static OP_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap());

/// How a missing operand type is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Missing operand types fail generation.
    #[default]
    Strict,
    /// Missing operand types are logged and reported as warnings.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    #[error("missing {name} operand type (documentation reads $Value)")]
    MissingOperandType { name: String },
    #[error("duplicate operation name {name} at index {first} and {second}")]
    DuplicateName { name: String, first: usize, second: usize },
    #[error("invalid operation name {name:?} at index {index}")]
    InvalidName { name: String, index: usize },
    #[error("first operation must be the bare Invalid sentinel, found {}", .found.as_deref().unwrap_or("an empty table"))]
    MissingSentinel { found: Option<String> },
    #[error("table holds {len} operations, opcode space holds {}", OpCode::CAPACITY)]
    TableTooLarge { len: usize },
}

impl Diagnostic {
    /// Name of the operation the diagnostic is about, if any.
    pub fn operation(&self) -> Option<&str> {
        match self {
            Diagnostic::MissingOperandType { name } => Some(name),
            Diagnostic::DuplicateName { name, .. } => Some(name),
            Diagnostic::InvalidName { name, .. } => Some(name),
            Diagnostic::MissingSentinel { found } => found.as_deref(),
            Diagnostic::TableTooLarge { .. } => None,
        }
    }

    fn is_fatal(&self, strictness: Strictness) -> bool {
        match self {
            Diagnostic::MissingOperandType { .. } => strictness == Strictness::Strict,
            _ => true,
        }
    }
}

/// Whether `documentation` references the dynamic `$Value` operand.
pub fn reads_value(documentation: &str) -> bool {
    VALUE_PLACEHOLDER.is_match(documentation)
}

fn is_sentinel(op: &OperationDescriptor) -> bool {
    op.name == SENTINEL_NAME && op.operand_type.is_none() && op.flags.is_empty()
}

/// Checks every rule against `table`.
///
/// Returns the non-fatal diagnostics on success. If any diagnostic is fatal under `strictness`,
/// all diagnostics are returned inside `FilterOpError::Validation`.
pub fn validate(table: &OpTable, strictness: Strictness) -> Result<Vec<Diagnostic>, FilterOpError> {
    let mut diags = Vec::new();

    match table.get(0) {
        Some(op) if is_sentinel(op) => {}
        first => diags.push(Diagnostic::MissingSentinel { found: first.map(|op| op.name.clone()) }),
    }
    if table.len() > OpCode::CAPACITY {
        diags.push(Diagnostic::TableTooLarge { len: table.len() });
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, op) in table.iter().enumerate() {
        if !OP_NAME.is_match(&op.name) {
            diags.push(Diagnostic::InvalidName { name: op.name.clone(), index });
        }
        if let Some(&first) = seen.get(op.name.as_str()) {
            diags.push(Diagnostic::DuplicateName { name: op.name.clone(), first, second: index });
        } else {
            seen.insert(op.name.as_str(), index);
        }
        let reads = op.documentation.as_deref().is_some_and(reads_value);
        if reads && op.operand_type.is_none() {
            diags.push(Diagnostic::MissingOperandType { name: op.name.clone() });
        }
    }

    if diags.iter().any(|d| d.is_fatal(strictness)) {
        return Err(FilterOpError::Validation(diags));
    }
    for diag in &diags {
        warn!(operation = diag.operation(), "{}", diag);
    }
    debug!(ops = table.len(), warnings = diags.len(), "definition table validated");
    Ok(diags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::filter_op_table;
    use crate::schema::{OpTableBuilder, OperationDescriptor};
    use crate::types::{OpFlag, OperandType};

    fn diagnostics(result: Result<Vec<Diagnostic>, FilterOpError>) -> Vec<Diagnostic> {
        match result {
            Err(FilterOpError::Validation(diags)) => diags,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_table_is_valid() {
        let warnings = validate(&filter_op_table(), Strictness::Strict).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_operand_type() {
        let table = OpTableBuilder::new()
            .op("Invalid")
            .push(OperationDescriptor::new("VarPure").doc("m[$Value].Pure"))
            .build();
        let diags = diagnostics(validate(&table, Strictness::Strict));
        assert_eq!(diags, vec![Diagnostic::MissingOperandType { name: "VarPure".into() }]);
        let msg = diags[0].to_string();
        assert!(msg.contains("VarPure"));
        assert!(msg.contains("operand type"));
    }

    #[test]
    fn test_missing_operand_type_lenient() {
        let table = OpTableBuilder::new()
            .op("Invalid")
            .push(OperationDescriptor::new("VarPure").doc("m[$Value].Pure"))
            .build();
        let warnings = validate(&table, Strictness::Lenient).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].operation(), Some("VarPure"));
    }

    #[test]
    fn test_args_placeholder_needs_no_operand() {
        let table = OpTableBuilder::new()
            .op("Invalid")
            .push(OperationDescriptor::new("Not").doc("!$Args[0]"))
            .build();
        assert!(validate(&table, Strictness::Strict).unwrap().is_empty());
    }

    #[test]
    fn test_value_placeholder_is_word_bounded() {
        assert!(reads_value("m[$Value].Pure"));
        assert!(reads_value("$Value holds a function name"));
        assert!(!reads_value("$Values are elsewhere"));
        assert!(!reads_value("$Args[0] && $Args[1]"));
    }

    #[test]
    fn test_duplicate_name() {
        let table = OpTableBuilder::new().op("Invalid").op("Not").op("And").op("Not").build();
        let diags = diagnostics(validate(&table, Strictness::Lenient));
        assert_eq!(diags, vec![Diagnostic::DuplicateName { name: "Not".into(), first: 1, second: 3 }]);
    }

    #[test]
    fn test_duplicate_names_are_case_sensitive() {
        let table = OpTableBuilder::new().op("Invalid").op("Eq").op("EQ").build();
        assert!(validate(&table, Strictness::Strict).is_ok());
    }

    #[test]
    fn test_invalid_names() {
        let table = OpTableBuilder::new().op("Invalid").op("").op("lower").op("Has Space").build();
        let diags = diagnostics(validate(&table, Strictness::Strict));
        let indexes: Vec<_> = diags.iter().map(|d| match d {
            Diagnostic::InvalidName { index, .. } => *index,
            other => panic!("Unexpected diagnostic {:?}", other),
        }).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_sentinel() {
        let table = OpTableBuilder::new().op("Not").build();
        let diags = diagnostics(validate(&table, Strictness::Strict));
        assert_eq!(diags, vec![Diagnostic::MissingSentinel { found: Some("Not".into()) }]);

        let empty = OpTableBuilder::new().build();
        let diags = diagnostics(validate(&empty, Strictness::Strict));
        assert_eq!(diags, vec![Diagnostic::MissingSentinel { found: None }]);
        assert!(diags[0].to_string().contains("empty table"));
    }

    #[test]
    fn test_sentinel_must_be_bare() {
        let table = OpTableBuilder::new()
            .push(OperationDescriptor::new("Invalid").flag(OpFlag::BasicLit))
            .build();
        let diags = diagnostics(validate(&table, Strictness::Strict));
        assert!(matches!(diags[0], Diagnostic::MissingSentinel { .. }));

        let table = OpTableBuilder::new()
            .push(OperationDescriptor::new("Invalid").operand(OperandType::String))
            .build();
        assert!(validate(&table, Strictness::Strict).is_err());
    }

    #[test]
    fn test_collects_all_violations() {
        let table = OpTableBuilder::new()
            .op("Not")
            .push(OperationDescriptor::new("VarText").doc("m[$Value].Text"))
            .op("Not")
            .build();
        let diags = diagnostics(validate(&table, Strictness::Strict));
        assert_eq!(diags.len(), 3);
        assert!(matches!(diags[0], Diagnostic::MissingSentinel { .. }));
        assert!(matches!(diags[1], Diagnostic::MissingOperandType { .. }));
        assert!(matches!(diags[2], Diagnostic::DuplicateName { .. }));
    }
}
