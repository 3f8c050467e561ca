//! Logic for classifying raw VM source lines
//! into typed [`Command`]s.
//!
//! Classification is line-oriented: comments and blank lines produce no
//! command, and a line that cannot be classified is reported as a
//! [`ParseDiagnostic`] and skipped, leaving the rest of the file intact.

use std::str::FromStr;

use chumsky::prelude::*;

use crate::common::{ArithmeticOp, Command, FunctionName, Segment};
use crate::fileio::input::SourceFile;

/// Associate each classified command with its corresponding
/// source code span (for better error reporting).
pub type Span = std::ops::Range<usize>;

/// A classified command together with its position in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedCommand {
    pub command: Command,
    /// 1-based source line number.
    pub line: usize,
}

/// A recoverable classification problem; the offending line is skipped
/// and the remainder of the file is still processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub message: String,
    pub span: Span,
}

/// One fully classified source file.
#[derive(Debug)]
pub struct ParsedFile {
    pub source: SourceFile,
    pub commands: Vec<SourcedCommand>,
}

impl ParsedFile {
    /// Classify an internally defined source file, which is expected
    /// to be well-formed (as opposed to a loaded one).
    ///
    /// Most commonly used in tests.
    pub fn internal<S: Into<String>>(name: S, content: S) -> Self {
        let (parsed, diagnostics) = parse_file(SourceFile::internal(name, content));
        debug_assert!(
            diagnostics.is_empty(),
            "internal source should be well-formed: {diagnostics:?}"
        );

        parsed
    }
}

/// Classify a whole source file, producing the command stream and
/// any recoverable diagnostics encountered along the way.
pub fn parse_file(source: SourceFile) -> (ParsedFile, Vec<ParseDiagnostic>) {
    let command = command_parser();

    let mut commands = Vec::new();
    let mut diagnostics = Vec::new();

    let mut offset = 0;
    for (line_index, raw_line) in source.content().split('\n').enumerate() {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        let (code, comment) = match line.find("//") {
            Some(position) => (&line[..position], Some(&line[position + 2..])),
            None => (line, None),
        };

        if code.trim().is_empty() {
            // a comment-only line is retained (echoed into the output);
            // a blank line produces nothing at all
            if let Some(text) = comment {
                commands.push(SourcedCommand {
                    command: Command::Comment(text.trim().to_owned()),
                    line: line_index + 1,
                });
            }

            offset += raw_line.len() + 1;
            continue;
        }

        let code_start = offset + (code.len() - code.trim_start().len());

        match command.parse(code.trim()) {
            Ok(parsed) => commands.push(SourcedCommand {
                command: parsed,
                line: line_index + 1,
            }),
            Err(errors) => diagnostics.extend(errors.into_iter().map(|error| {
                let span = error.span();
                ParseDiagnostic {
                    message: error.to_string(),
                    span: (code_start + span.start)..(code_start + span.end),
                }
            })),
        }

        offset += raw_line.len() + 1;
    }

    (ParsedFile { source, commands }, diagnostics)
}

/// Construct the classifier for a single VM command line
/// (comments and surrounding whitespace already removed).
fn command_parser() -> impl Parser<char, Command, Error = Simple<char>> {
    let index = text::int(10)
        .try_map(|digits: String, span| {
            digits.parse::<u16>().map_err(|_| {
                Simple::custom(span, format!("index `{digits}` does not fit a machine word"))
            })
        })
        .padded();

    let name = filter(|c: &char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':'))
        .repeated()
        .at_least(1)
        .map(|characters| characters.into_iter().collect::<String>())
        .padded();

    let segment = text::ident()
        .try_map(|word: String, span| {
            Segment::from_str(&word)
                .map_err(|_| Simple::custom(span, format!("unknown segment `{word}`")))
        })
        .padded();

    let push = text::keyword("push")
        .ignore_then(segment)
        .then(index)
        .map(|(segment, i)| Command::Push(segment, i));

    let pop = text::keyword("pop")
        .ignore_then(segment)
        .then(index)
        .map(|(segment, i)| Command::Pop(segment, i));

    let label = text::keyword("label")
        .ignore_then(name.clone())
        .map(Command::Label);

    // must be tried before `goto`, which it contains as a suffix
    let if_goto = just("if-goto").ignore_then(name.clone()).map(Command::IfGoto);

    let goto = text::keyword("goto")
        .ignore_then(name.clone())
        .map(Command::Goto);

    let function = text::keyword("function")
        .ignore_then(name.clone())
        .then(index)
        .map(|(function_name, variable_count)| {
            Command::Function(FunctionName::from_literal(function_name), variable_count)
        });

    let call = text::keyword("call")
        .ignore_then(name.clone())
        .then(index)
        .map(|(function_name, argument_count)| {
            Command::Call(FunctionName::from_literal(function_name), argument_count)
        });

    let vm_return = text::keyword("return").to(Command::Return);

    let arithmetic = text::ident().try_map(|word: String, span| {
        ArithmeticOp::from_str(&word)
            .map(Command::Arithmetic)
            .map_err(|_| Simple::custom(span, format!("unknown command `{word}`")))
    });

    choice((
        push, pop, label, if_goto, goto, function, call, vm_return, arithmetic,
    ))
    .padded()
    .then_ignore(end())
}
