//! Intermediate Representation (IR) opcode registry.
//!
//! This module defines the OpCode type and the Registry that maps opcodes to constants, names and flags.

use crate::types::{OpFlag, OpFlags, OperandType};
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of a filter operation. Equal to its position in the definition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct OpCode(pub u16);

impl OpCode {
    /// Code zero, reserved for the unset sentinel.
    pub const INVALID: OpCode = OpCode(0);
    /// Maximum number of operations a table may hold.
    pub const CAPACITY: usize = u16::MAX as usize + 1;

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One generated enumeration constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpConstant {
    pub code: OpCode,
    pub name: String,
    /// Identifier of the generated constant, e.g. `VAR_TYPE_IS`.
    pub constant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default)]
    pub operand_type: OperandType,
}

/// The generated opcode contract: enumeration, name table and flag table.
///
/// The name table covers every opcode. The flag table only holds opcodes with at least one flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegistryParts")]
pub struct Registry {
    constants: Vec<OpConstant>,
    names: BTreeMap<OpCode, String>,
    flags: BTreeMap<OpCode, OpFlags>,
}

/// Unchecked form of a deserialized registry.
#[derive(Deserialize)]
struct RegistryParts {
    constants: Vec<OpConstant>,
    names: BTreeMap<OpCode, String>,
    flags: BTreeMap<OpCode, OpFlags>,
}

impl TryFrom<RegistryParts> for Registry {
    type Error = String;

    fn try_from(parts: RegistryParts) -> Result<Self, Self::Error> {
        let RegistryParts { constants, names, flags } = parts;
        for (index, c) in constants.iter().enumerate() {
            if c.code.index() != index {
                return Err(format!("constant {} has code {}, expected {}", c.name, c.code, index));
            }
            if names.get(&c.code) != Some(&c.name) {
                return Err(format!("name table entry for code {} does not match {}", c.code, c.name));
            }
        }
        if names.len() != constants.len() {
            return Err(format!("name table has {} entries for {} opcodes", names.len(), constants.len()));
        }
        for (code, set) in &flags {
            if code.index() >= constants.len() {
                return Err(format!("flag table entry for unknown code {}", code));
            }
            if set.is_empty() {
                return Err(format!("flag table entry for code {} is empty", code));
            }
        }
        Ok(Registry { constants, names, flags })
    }
}

impl Registry {
    pub(crate) fn from_parts(constants: Vec<OpConstant>, names: BTreeMap<OpCode, String>, flags: BTreeMap<OpCode, OpFlags>) -> Self {
        Self { constants, names, flags }
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Enumeration constants in opcode order.
    pub fn constants(&self) -> &[OpConstant] {
        &self.constants
    }

    pub fn constant(&self, code: OpCode) -> Option<&OpConstant> {
        self.constants.get(code.index())
    }

    /// Display name for diagnostics.
    pub fn name(&self, code: OpCode) -> Option<&str> {
        self.names.get(&code).map(|s| s.as_str())
    }

    pub fn code_of(&self, name: &str) -> Option<OpCode> {
        self.constants.iter().find(|c| c.name == name).map(|c| c.code)
    }

    /// Flags of an opcode. Opcodes missing from the flag table have none.
    pub fn flags(&self, code: OpCode) -> OpFlags {
        self.flags.get(&code).copied().unwrap_or_default()
    }

    pub fn has_flag(&self, code: OpCode, flag: OpFlag) -> bool {
        self.flags(code).contains(flag)
    }

    pub fn names(&self) -> impl Iterator<Item = (OpCode, &str)> + '_ {
        self.names.iter().map(|(code, name)| (*code, name.as_str()))
    }

    pub fn flag_entries(&self) -> impl Iterator<Item = (OpCode, OpFlags)> + '_ {
        self.flags.iter().map(|(code, flags)| (*code, *flags))
    }

    /// Every opcode in the registry, ascending.
    pub fn opcodes(&self) -> impl Iterator<Item = OpCode> + '_ {
        self.constants.iter().map(|c| c.code)
    }
}
