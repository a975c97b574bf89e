//! Types module: defines operand types and structural flags for filter operations.
//!
//! This module provides the OperandType enum and the OpFlag/OpFlags flag set.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::FilterOpError;

/// Semantic type of the dynamic `$Value` operand an operation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperandType {
    #[default]
    None,
    String,
    Int64,
}

impl OperandType {
    /// Tag used in generated comments; empty for `None`.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperandType::None => "",
            OperandType::String => "string",
            OperandType::Int64 => "int64",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, OperandType::None)
    }
}

impl fmt::Display for OperandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandType::None => f.write_str("none"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for OperandType {
    type Err = FilterOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(OperandType::None),
            "string" => Ok(OperandType::String),
            "int64" => Ok(OperandType::Int64),
            other => Err(FilterOpError::UnknownOperandType(other.to_string())),
        }
    }
}

/// A single structural tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpFlag {
    BinaryExpr,
    BasicLit,
}

impl OpFlag {
    /// Every flag, in bit order.
    pub const ALL: [OpFlag; 2] = [OpFlag::BinaryExpr, OpFlag::BasicLit];

    /// Bit position of this flag in the rendered bitmask.
    pub fn shift(self) -> u32 {
        match self {
            OpFlag::BinaryExpr => 0,
            OpFlag::BasicLit => 1,
        }
    }

    pub fn bit(self) -> u64 {
        1 << self.shift()
    }

    /// Name of the bitmask constant in generated source.
    pub fn const_name(self) -> &'static str {
        match self {
            OpFlag::BinaryExpr => "FLAG_IS_BINARY_EXPR",
            OpFlag::BasicLit => "FLAG_IS_BASIC_LIT",
        }
    }
}

/// A set of structural flags. Only constructible from `OpFlag` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<OpFlag>", into = "Vec<OpFlag>")]
pub struct OpFlags {
    bits: u64,
}

impl OpFlags {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn with(mut self, flag: OpFlag) -> Self {
        self.bits |= flag.bit();
        self
    }

    pub fn union(self, other: OpFlags) -> Self {
        Self { bits: self.bits | other.bits }
    }

    pub fn contains(&self, flag: OpFlag) -> bool {
        self.bits & flag.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Flags in this set, in bit order.
    pub fn iter(&self) -> impl Iterator<Item = OpFlag> + '_ {
        OpFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }

    /// Symbolic form, e.g. `FLAG_IS_BINARY_EXPR | FLAG_IS_BASIC_LIT`.
    pub fn symbolic(&self) -> String {
        self.iter().map(OpFlag::const_name).collect::<Vec<_>>().join(" | ")
    }
}

impl From<OpFlag> for OpFlags {
    fn from(flag: OpFlag) -> Self {
        OpFlags::empty().with(flag)
    }
}

impl From<Vec<OpFlag>> for OpFlags {
    fn from(flags: Vec<OpFlag>) -> Self {
        flags.into_iter().collect()
    }
}

impl From<OpFlags> for Vec<OpFlag> {
    fn from(flags: OpFlags) -> Self {
        flags.iter().collect()
    }
}

impl FromIterator<OpFlag> for OpFlags {
    fn from_iter<I: IntoIterator<Item = OpFlag>>(iter: I) -> Self {
        iter.into_iter().fold(OpFlags::empty(), OpFlags::with)
    }
}

impl std::ops::BitOr for OpFlag {
    type Output = OpFlags;

    fn bitor(self, rhs: OpFlag) -> OpFlags {
        OpFlags::from(self).with(rhs)
    }
}

impl std::ops::BitOr<OpFlag> for OpFlags {
    type Output = OpFlags;

    fn bitor(self, rhs: OpFlag) -> OpFlags {
        self.with(rhs)
    }
}
