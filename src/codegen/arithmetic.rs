use crate::{
    codegen::{asm, context::ProgramContext},
    common::ArithmeticOp,
};

/// Construct the instructions for one arithmetic command.
///
/// Binary operations pop the top value (`y`) and combine it with the new
/// top (`x`) as `x op y`, a net stack change of -1; unary operations
/// rewrite the top in place, a net change of 0. Comparisons compute
/// `x - y`, default the result to false and branch to a true case that
/// overwrites it with all-ones.
pub fn construct(
    operation: ArithmeticOp,
    program_context: &mut ProgramContext,
) -> Vec<asm::AsmInstruction> {
    let mut instructions = vec![asm::at("SP"), asm::compute("AM=M-1")];

    match operation {
        ArithmeticOp::Neg => instructions.push(asm::compute("M=-M")),
        ArithmeticOp::Not => instructions.push(asm::compute("M=!M")),

        ArithmeticOp::Add | ArithmeticOp::Sub | ArithmeticOp::And | ArithmeticOp::Or => {
            // y in D, then step down to x
            instructions.extend([asm::compute("D=M"), asm::at("SP"), asm::compute("AM=M-1")]);
            instructions.push(asm::compute(match operation {
                ArithmeticOp::Add => "M=M+D",
                ArithmeticOp::Sub => "M=M-D",
                ArithmeticOp::And => "M=M&D",
                ArithmeticOp::Or => "M=M|D",
                _ => unreachable!("operation is one of the four combining forms"),
            }));
        }

        ArithmeticOp::Eq | ArithmeticOp::Gt | ArithmeticOp::Lt => {
            instructions.extend(construct_comparison(operation, program_context));
        }
    }

    instructions.extend([asm::at("SP"), asm::compute("M=M+1")]);

    instructions
}

fn construct_comparison(
    operation: ArithmeticOp,
    program_context: &mut ProgramContext,
) -> Vec<asm::AsmInstruction> {
    let label_suffix = program_context.comparison_labels.next();
    let true_case = format!("TRUE_{label_suffix}");
    let false_case = format!("FALSE_{label_suffix}");

    vec![
        asm::compute("D=M"),
        asm::at("SP"),
        asm::compute("AM=M-1"),
        asm::compute("D=M-D"),
        // false unless the branch below fires
        asm::compute("M=0"),
        asm::at(true_case.clone()),
        asm::compute(match operation {
            ArithmeticOp::Eq => "D;JEQ",
            ArithmeticOp::Gt => "D;JGT",
            ArithmeticOp::Lt => "D;JLT",
            _ => unreachable!("operation is a comparison"),
        }),
        asm::at(false_case.clone()),
        asm::compute("0;JMP"),
        asm::label_declaration(true_case),
        asm::at("SP"),
        asm::compute("A=M"),
        // true is all-ones
        asm::compute("M=-1"),
        asm::label_declaration(false_case),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_operation() {
        let mut program_context = ProgramContext::new();

        let compiled: crate::codegen::asm::AsmInstructionBlock =
            construct(ArithmeticOp::Add, &mut program_context).into();

        assert_eq!(
            compiled.to_string(),
            ["@SP", "AM=M-1", "D=M", "@SP", "AM=M-1", "M=M+D", "@SP", "M=M+1"].join("\n")
        );
    }

    #[test]
    fn test_unary_operation_rewrites_in_place() {
        let mut program_context = ProgramContext::new();

        let compiled: crate::codegen::asm::AsmInstructionBlock =
            construct(ArithmeticOp::Neg, &mut program_context).into();

        assert_eq!(
            compiled.to_string(),
            ["@SP", "AM=M-1", "M=-M", "@SP", "M=M+1"].join("\n")
        );
    }

    #[test]
    fn test_comparison_labels_stay_unique() {
        let mut program_context = ProgramContext::new();

        let first: Vec<String> = construct(ArithmeticOp::Eq, &mut program_context)
            .iter()
            .map(ToString::to_string)
            .collect();
        let second: Vec<String> = construct(ArithmeticOp::Lt, &mut program_context)
            .iter()
            .map(ToString::to_string)
            .collect();

        assert!(first.contains(&String::from("(TRUE_0)")));
        assert!(first.contains(&String::from("D;JEQ")));
        assert!(second.contains(&String::from("(TRUE_1)")));
        assert!(second.contains(&String::from("D;JLT")));
    }
}
