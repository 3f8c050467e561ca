//! Function declarations, call sites and the two shared
//! calling-convention routines.
//!
//! Every `call` compiles to a handoff into one shared call routine, and
//! every `return` to a jump into one shared return routine; the per-site
//! state travels through three fixed scratch cells (see below). The
//! saved caller frame has a fixed five-slot layout behind the callee's
//! local base: return address, `LCL`, `ARG`, `THIS`, `THAT`.

use crate::{
    codegen::{
        asm,
        context::{FileContext, ProgramContext},
        reachability,
    },
    common::FunctionName,
};

// region: internal calling convention

// The call-site handoff passes its parameters to the shared call routine
// through three fixed scratch cells. This layout is the routine's binding
// contract; every call site in the program writes all three.
/// Number of arguments the caller has pushed.
const ARGUMENT_COUNT: &str = "R13";
/// Address of the call site's return label.
const RETURN_ADDRESS: &str = "R14";
/// Address of the callee's entry label.
const CALL_TARGET: &str = "R15";

/// Entry labels of the two shared routines.
const CALL_BOOTSTRAP: &str = "__CallBootstrap__";
const RETURN_BOOTSTRAP: &str = "__ReturnBootstrap__";

/// First stack address on the target machine.
const STACK_BASE: u16 = 256;

/// Label of the entry-point call, placed past the shared routines.
const INIT: &str = "SysInit";

// endregion

/// `function f n`: declare the entry label, rebase `LCL` onto the current
/// stack top and zero-initialize the `n` local slots, advancing `SP`.
pub fn construct_function(
    name: &FunctionName,
    variable_count: u16,
    file_context: &mut FileContext,
) -> Vec<asm::AsmInstruction> {
    file_context.current_function = name.clone();

    let mut instructions = vec![
        asm::label_declaration(name.as_str()),
        asm::at("SP"),
        asm::compute("D=M"),
        asm::at("LCL"),
        // LCL tracks the stack top even for zero locals
        asm::compute("M=D"),
        asm::compute("A=M"),
    ];

    for _ in 0..variable_count {
        instructions.extend([asm::compute("M=0"), asm::at("SP"), asm::compute("AM=M+1")]);
    }

    instructions
}

/// `call f n`: load the three scratch cells and hand off to the shared
/// call routine; execution resumes at the return label declared right
/// after the jump.
pub fn construct_call(
    callee: &FunctionName,
    argument_count: u16,
    file_context: &FileContext,
    program_context: &mut ProgramContext,
) -> Vec<asm::AsmInstruction> {
    let sequence_number = program_context.call_sites.next(&file_context.current_function);
    let return_symbol = format!("{}$ret.{sequence_number}", file_context.current_function);

    let mut instructions = if argument_count > 1 {
        vec![
            asm::at_constant(argument_count),
            asm::compute("D=A"),
            asm::at(ARGUMENT_COUNT),
            asm::compute("M=D"),
        ]
    } else {
        vec![
            asm::at(ARGUMENT_COUNT),
            asm::compute(if argument_count == 0 { "M=0" } else { "M=1" }),
        ]
    };

    instructions.extend([
        asm::at(return_symbol.clone()),
        asm::compute("D=A"),
        asm::at(RETURN_ADDRESS),
        asm::compute("M=D"),
        asm::at(callee.as_str()),
        asm::compute("D=A"),
        asm::at(CALL_TARGET),
        asm::compute("M=D"),
        asm::at(CALL_BOOTSTRAP),
        asm::compute("0;JMP"),
        asm::label_declaration(return_symbol),
    ]);

    instructions
}

/// `return`: jump into the shared return routine; no per-site state.
pub fn construct_return() -> Vec<asm::AsmInstruction> {
    vec![asm::at(RETURN_BOOTSTRAP), asm::compute("0;JMP")]
}

/// Program initialization for directory-mode output: set up the stack
/// pointer, lay down the two shared routines, then call the entry point.
pub fn construct_init(program_context: &mut ProgramContext) -> Vec<asm::AsmInstruction> {
    let bootstrap_context = FileContext::new("");

    let mut instructions = vec![
        asm::at_constant(STACK_BASE),
        asm::compute("D=A"),
        asm::at("SP"),
        asm::compute("M=D"),
        asm::at(INIT),
        asm::compute("0;JMP"),
    ];

    instructions.extend(construct_call_bootstrap());
    instructions.extend(construct_return_bootstrap());

    instructions.push(asm::label_declaration(INIT));
    instructions.extend(construct_call(
        &FunctionName::from_literal(reachability::ENTRY_POINT),
        0,
        &bootstrap_context,
        program_context,
    ));

    instructions
}

/// The shared call routine. On entry `SP` points at the slot the return
/// address will occupy, which sits `R13` slots above the callee's
/// argument 0 (for a zero-argument call they are the same slot; the
/// return routine accounts for that). Pushes the return address and the
/// caller's four frame registers, rebases `ARG`, then jumps through
/// `R15` — the indirection that lets one routine serve every call site.
fn construct_call_bootstrap() -> Vec<asm::AsmInstruction> {
    let mut instructions = vec![
        asm::label_declaration(CALL_BOOTSTRAP),
        // callee's argument 0 sits R13 slots below the stack top
        asm::at("SP"),
        asm::compute("A=M"),
        asm::compute("D=A"),
        asm::at(ARGUMENT_COUNT),
        asm::compute("D=D-M"),
        // cannot rebase ARG yet; the caller's value is still unsaved
        asm::compute("M=D"),
        // push the return address
        asm::at(RETURN_ADDRESS),
        asm::compute("D=M"),
        asm::at("SP"),
        asm::compute("A=M"),
        asm::compute("M=D"),
        asm::at("SP"),
        asm::compute("M=M+1"),
    ];

    // save the caller's frame registers, in the layout the return
    // routine restores from
    for register in ["LCL", "ARG", "THIS", "THAT"] {
        instructions.extend([
            asm::at(register),
            asm::compute("D=M"),
            asm::at("SP"),
            asm::compute("M=M+1"),
            asm::compute("A=M-1"),
            asm::compute("M=D"),
        ]);
    }

    instructions.extend([
        asm::at(ARGUMENT_COUNT),
        asm::compute("D=M"),
        asm::at("ARG"),
        asm::compute("M=D"),
        asm::at(CALL_TARGET),
        asm::compute("A=M"),
        asm::compute("0;JMP"),
    ]);

    instructions
}

/// The shared return routine: restore the four saved frame registers
/// reading at fixed offsets behind the callee's `LCL`, relocate the
/// return value onto the caller's argument 0, shrink the stack to just
/// past it and jump to the caller.
fn construct_return_bootstrap() -> Vec<asm::AsmInstruction> {
    vec![
        asm::label_declaration(RETURN_BOOTSTRAP),
        // restore THAT, then THIS
        asm::at("LCL"),
        asm::compute("A=M-1"),
        asm::compute("D=M"),
        asm::at("THAT"),
        asm::compute("M=D"),
        asm::at("LCL"),
        asm::compute("A=M-1"),
        asm::compute("A=A-1"),
        asm::compute("D=M"),
        asm::at("THIS"),
        asm::compute("M=D"),
        // cache the return address now: after a zero-argument call the
        // return value relocation below overwrites its slot
        asm::at_constant(5),
        asm::compute("D=A"),
        asm::at("LCL"),
        asm::compute("A=M-D"),
        asm::compute("D=M"),
        asm::at(RETURN_ADDRESS),
        asm::compute("M=D"),
        // relocate the return value to the caller's argument 0
        asm::at("SP"),
        asm::compute("A=M-1"),
        asm::compute("D=M"),
        asm::at("ARG"),
        asm::compute("A=M"),
        asm::compute("M=D"),
        // the stack shrinks to just past the return value
        asm::compute("D=A+1"),
        asm::at("SP"),
        asm::compute("M=D"),
        // restore ARG, then LCL
        asm::at("LCL"),
        asm::compute("A=M-1"),
        asm::compute("A=A-1"),
        asm::compute("A=A-1"),
        asm::compute("D=M"),
        asm::at("ARG"),
        asm::compute("M=D"),
        asm::at_constant(4),
        asm::compute("D=A"),
        asm::at("LCL"),
        asm::compute("A=M-D"),
        asm::compute("D=M"),
        asm::at("LCL"),
        asm::compute("M=D"),
        asm::at(RETURN_ADDRESS),
        asm::compute("A=M"),
        asm::compute("0;JMP"),
    ]
}
