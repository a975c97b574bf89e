//! Definitions module: the authoritative table of filter operations.
//!
//! Opcodes are assigned by position, so reordering entries renumbers them.
//! New operations go at the end unless a renumbering is intended.

use crate::schema::{OpTable, OpTableBuilder, OperationDescriptor};
use crate::types::{OpFlag, OperandType};

fn op(name: &str, documentation: &str) -> OperationDescriptor {
    OperationDescriptor::new(name).doc(documentation)
}

fn binary(name: &str, documentation: &str) -> OperationDescriptor {
    op(name, documentation).flag(OpFlag::BinaryExpr)
}

fn var(name: &str, documentation: &str) -> OperationDescriptor {
    op(name, documentation).operand(OperandType::String)
}

/// The filter operation table consumed by the rule evaluator.
pub fn filter_op_table() -> OpTable {
    OpTableBuilder::new()
        .op("Invalid")
        .push(op("Not", "!$Args[0]"))
        // Binary expressions.
        .push(binary("And", "$Args[0] && $Args[1]"))
        .push(binary("Or", "$Args[0] || $Args[1]"))
        .push(binary("Eq", "$Args[0] == $Args[1]"))
        .push(binary("Neq", "$Args[0] != $Args[1]"))
        .push(binary("Gt", "$Args[0] > $Args[1]"))
        .push(binary("Lt", "$Args[0] < $Args[1]"))
        .push(binary("GtEq", "$Args[0] >= $Args[1]"))
        .push(binary("LtEq", "$Args[0] <= $Args[1]"))
        // Matched variable properties.
        .push(var("VarAddressable", "m[$Value].Addressable"))
        .push(var("VarPure", "m[$Value].Pure"))
        .push(var("VarConst", "m[$Value].Const"))
        .push(var("VarText", "m[$Value].Text"))
        .push(var("VarLine", "m[$Value].Line"))
        .push(var("VarValueInt", "m[$Value].Value.Int()"))
        .push(var("VarTypeSize", "m[$Value].Type.Size"))
        // Matched variable predicates taking an argument.
        .push(var("VarFilter", "m[$Value].Filter($Args[0])"))
        .push(var("VarNodeIs", "m[$Value].Node.Is($Args[0])"))
        .push(var("VarObjectIs", "m[$Value].Object.Is($Args[0])"))
        .push(var("VarTypeIs", "m[$Value].Type.Is($Args[0])"))
        .push(var("VarTypeUnderlyingIs", "m[$Value].Type.Underlying().Is($Args[0])"))
        .push(var("VarTypeConvertibleTo", "m[$Value].Type.ConvertibleTo($Args[0])"))
        .push(var("VarTypeAssignableTo", "m[$Value].Type.AssignableTo($Args[0])"))
        .push(var("VarTypeImplements", "m[$Value].Type.Implements($Args[0])"))
        .push(var("VarTextMatches", "m[$Value].Text.Matches($Args[0])"))
        // File predicates.
        .push(var("FileImports", "m.File.Imports($Value)"))
        .push(var("FilePkgPathMatches", "m.File.PkgPath.Matches($Value)"))
        .push(var("FileNameMatches", "m.File.Name.Matches($Value)"))
        .push(var("FilterFuncRef", "$Value holds a function name"))
        // Basic literals.
        .push(var("String", "$Value holds a string constant").flag(OpFlag::BasicLit))
        .push(op("Int", "$Value holds an int64 constant").operand(OperandType::Int64).flag(OpFlag::BasicLit))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_size() {
        assert_eq!(filter_op_table().len(), 32);
    }

    #[test]
    fn test_sentinel_first() {
        let table = filter_op_table();
        let first = table.get(0).unwrap();
        assert_eq!(first.name, "Invalid");
        assert!(first.documentation.is_none());
        assert!(first.flags.is_empty());
    }

    #[test]
    fn test_value_operations_declare_operand_type() {
        for op in filter_op_table().iter() {
            if op.documentation.as_deref().is_some_and(|d| d.contains("$Value")) {
                assert!(!op.operand_type.is_none(), "{} has no operand type", op.name);
            }
        }
    }

    #[test]
    fn test_literal_flags() {
        let table = filter_op_table();
        let lits: Vec<_> = table.iter().filter(|op| op.flags.contains(OpFlag::BasicLit)).map(|op| op.name.as_str()).collect();
        assert_eq!(lits, vec!["String", "Int"]);
        let binary = table.iter().filter(|op| op.flags.contains(OpFlag::BinaryExpr)).count();
        assert_eq!(binary, 8);
    }
}
