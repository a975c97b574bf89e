//! Schema module: defines the ordered definition table of filter operations.
//!
//! This module provides the OperationDescriptor and OpTable types and the builder used to author tables.

use crate::types::{OpFlag, OpFlags, OperandType};
use serde::{Serialize, Deserialize};

/// One entry in the definition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default)]
    pub operand_type: OperandType,
    #[serde(default)]
    pub flags: OpFlags,
}

impl OperationDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            operand_type: OperandType::None,
            flags: OpFlags::empty(),
        }
    }

    pub fn doc(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn operand(mut self, ty: OperandType) -> Self {
        self.operand_type = ty;
        self
    }

    pub fn flag(mut self, flag: OpFlag) -> Self {
        self.flags = self.flags.with(flag);
        self
    }

    pub fn flags(mut self, flags: OpFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }
}

/// Ordered sequence of operation descriptors. Position determines opcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpTable {
    ops: Vec<OperationDescriptor>,
}

impl OpTable {
    pub fn ops(&self) -> &[OperationDescriptor] {
        &self.ops
    }
    pub fn get(&self, index: usize) -> Option<&OperationDescriptor> {
        self.ops.get(index)
    }
    pub fn len(&self) -> usize {
        self.ops.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, OperationDescriptor> {
        self.ops.iter()
    }
    /// Returns a copy of this table with the entries at `a` and `b` swapped.
    pub fn swapped(&self, a: usize, b: usize) -> OpTable {
        let mut ops = self.ops.clone();
        ops.swap(a, b);
        OpTable { ops }
    }
}

impl From<Vec<OperationDescriptor>> for OpTable {
    fn from(ops: Vec<OperationDescriptor>) -> Self {
        Self { ops }
    }
}

impl<'a> IntoIterator for &'a OpTable {
    type Item = &'a OperationDescriptor;
    type IntoIter = std::slice::Iter<'a, OperationDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

#[derive(Debug, Default)]
pub struct OpTableBuilder {
    ops: Vec<OperationDescriptor>,
}

impl OpTableBuilder {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }
    /// Appends a bare operation with no documentation, operand or flags.
    pub fn op(self, name: impl Into<String>) -> Self {
        self.push(OperationDescriptor::new(name))
    }
    pub fn push(mut self, op: OperationDescriptor) -> Self {
        self.ops.push(op);
        self
    }
    pub fn build(self) -> OpTable {
        OpTable { ops: self.ops }
    }
}
