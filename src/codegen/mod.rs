//! Logic for converting classified VM commands
//! to Hack assembly instructions.

use crate::{common::Command, parser::ParsedFile};

use context::{FileContext, ProgramContext};

mod arithmetic;
mod asm;
mod branching;
pub mod context;
pub mod error;
mod function;
mod memory;
pub mod reachability;

/// How recovered per-instruction problems affect the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Report, suppress the one instruction, keep translating.
    Permissive,
    /// Abort the run on the first recovered problem.
    Strict,
}

#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub strictness: Strictness,
    /// Whether to prepend stack initialization and the shared
    /// call/return routines (directory mode).
    pub bootstrap: bool,
}

/// Translate a whole program, file by file in the given order.
pub fn construct_program(
    files: &[ParsedFile],
    program_context: &mut ProgramContext,
    options: Options,
) -> Result<String, error::Error> {
    let mut sections = Vec::new();

    if options.bootstrap {
        let init: asm::AsmInstructionBlock = function::construct_init(program_context).into();
        sections.push(init.to_string());
    }

    for file in files {
        sections.push(construct_file(file, program_context, options)?);
    }

    Ok(sections.join("\n"))
}

fn construct_file(
    file: &ParsedFile,
    program_context: &mut ProgramContext,
    options: Options,
) -> Result<String, error::Error> {
    let mut file_context = FileContext::new(file.source.name());

    let mut commands = file.commands.iter().peekable();
    while let Some(sourced) = commands.next() {
        if let Command::Function(name, _) = &sourced.command {
            if !program_context.is_function_live(name) {
                log::debug!("suppressing unreachable function {name}");

                // consume and discard the whole body; the next function
                // header delimits it
                while commands
                    .peek()
                    .is_some_and(|next| !matches!(next.command, Command::Function(..)))
                {
                    commands.next();
                }
                continue;
            }
        }

        match construct_command(&sourced.command, &mut file_context, program_context) {
            Ok(instructions) => file_context.output.add_block(instructions.into()),
            Err(error) => match options.strictness {
                Strictness::Strict => return Err(error),
                Strictness::Permissive => log::warn!(
                    "{}.vm:{}: {error}; instruction skipped",
                    file.source.name(),
                    sourced.line
                ),
            },
        }
    }

    Ok(file_context.output.compile())
}

fn construct_command(
    command: &Command,
    file_context: &mut FileContext,
    program_context: &mut ProgramContext,
) -> error::FallableInstructions {
    if let Command::Comment(text) = command {
        return Ok(vec![asm::comment(text.clone())]);
    }

    // each translated block opens with its source form echoed back
    let mut instructions = vec![asm::comment(command.to_string())];

    let translated = match command {
        Command::Arithmetic(operation) => arithmetic::construct(*operation, program_context),
        Command::Push(segment, index) => memory::construct_push(*segment, *index, file_context)?,
        Command::Pop(segment, index) => memory::construct_pop(*segment, *index, file_context)?,
        Command::Label(label) => branching::construct_label(label, file_context),
        Command::Goto(label) => branching::construct_goto(label, file_context),
        Command::IfGoto(label) => branching::construct_if_goto(label, file_context),
        Command::Function(name, variable_count) => {
            function::construct_function(name, *variable_count, file_context)
        }
        Command::Call(callee, argument_count) => {
            function::construct_call(callee, *argument_count, file_context, program_context)
        }
        Command::Return => function::construct_return(),
        Command::Comment(_) => unreachable!("comments are handled above"),
    };

    instructions.extend(translated);

    Ok(instructions)
}
