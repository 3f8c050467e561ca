use crate::codegen::{asm, context::FileContext};

/// `label`: declare the function-scoped symbol.
pub fn construct_label(label: &str, file_context: &FileContext) -> Vec<asm::AsmInstruction> {
    vec![asm::label_declaration(file_context.scoped_label(label))]
}

/// `goto`: unconditional jump to the function-scoped symbol.
pub fn construct_goto(label: &str, file_context: &FileContext) -> Vec<asm::AsmInstruction> {
    vec![
        asm::at(file_context.scoped_label(label)),
        asm::compute("0;JMP"),
    ]
}

/// `if-goto`: pop the condition and jump unless it is false (zero).
pub fn construct_if_goto(label: &str, file_context: &FileContext) -> Vec<asm::AsmInstruction> {
    vec![
        asm::at("SP"),
        asm::compute("AM=M-1"),
        asm::compute("D=M"),
        asm::at(file_context.scoped_label(label)),
        asm::compute("D;JNE"),
    ]
}
