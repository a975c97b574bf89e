//! Compiler module: compiles a validated definition table into the opcode registry.
//!
//! Codes are assigned by table position. The result is a pure function of the table's sequence.

use crate::ir::{OpCode, OpConstant, Registry};
use crate::schema::OpTable;
use std::collections::BTreeMap;
use tracing::debug;

pub struct DefaultCompiler;

impl DefaultCompiler {
    /// Builds the enumeration, name table and flag table for `table`.
    ///
    /// Expects a table that passed validation. Entries past `OpCode::CAPACITY` are not assigned a code.
    pub fn compile(table: &OpTable) -> Registry {
        let mut constants = Vec::with_capacity(table.len());
        let mut names = BTreeMap::new();
        let mut flags = BTreeMap::new();

        for (index, op) in table.iter().enumerate() {
            let Ok(raw) = u16::try_from(index) else { break };
            let code = OpCode(raw);
            constants.push(OpConstant {
                code,
                name: op.name.clone(),
                constant: constant_name(&op.name),
                documentation: op.documentation.clone(),
                operand_type: op.operand_type,
            });
            names.insert(code, op.name.clone());
            if !op.flags.is_empty() {
                flags.insert(code, op.flags);
            }
        }

        debug!(constants = constants.len(), flagged = flags.len(), "registry compiled");
        Registry::from_parts(constants, names, flags)
    }
}

/// Derives the constant identifier for an operation name: `VarTypeIs` becomes `VAR_TYPE_IS`.
///
/// Every uppercase letter after the first starts a new word, so distinct names map to distinct constants.
pub fn constant_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}
