use std::{path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;

use codegen::{context::ProgramContext, reachability, Options, Strictness};
use fileio::input::{SourceSet, SourceSetKind};

mod codegen;
mod common;
mod fileio;
mod parser;
#[cfg(test)]
mod testing;

/// Translate stack-based VM commands to Hack assembly.
#[derive(Debug, Parser)]
#[command(name = "vmt", version)]
struct Cli {
    /// A single `.vm` file, or a directory holding the program's `.vm` files.
    path: PathBuf,

    /// Treat recovered problems (unknown commands, invalid segment
    /// indices) as fatal instead of skipping the offending instruction.
    #[arg(long)]
    strict: bool,

    /// Keep functions the reachability analysis finds dead
    /// (directory mode only).
    #[arg(long)]
    keep_unreachable: bool,
}

#[derive(Debug, thiserror::Error)]
enum DriverError {
    #[error("unable to access input or output files: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} source line(s) could not be classified")]
    MalformedSource(usize),

    #[error(transparent)]
    Codegen(#[from] codegen::error::Error),
}

fn main() -> ExitCode {
    env_logger::init();

    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), DriverError> {
    let start = Instant::now();

    let source_set = SourceSet::discover(&cli.path)?;
    let is_directory = source_set.kind == SourceSetKind::Directory;

    // classify everything up front; analysis and generation both walk
    // the same command streams
    let mut parsed_files = Vec::new();
    let mut diagnostic_count = 0;
    for source in source_set.files {
        log::info!("classifying {}.vm", source.name());

        let (parsed, diagnostics) = parser::parse_file(source);
        error_report::display(&parsed.source, &diagnostics);
        diagnostic_count += diagnostics.len();
        parsed_files.push(parsed);
    }

    if cli.strict && diagnostic_count > 0 {
        return Err(DriverError::MalformedSource(diagnostic_count));
    }

    let mut program_context = ProgramContext::new();

    if is_directory && !cli.keep_unreachable {
        let (user, library): (Vec<_>, Vec<_>) = parsed_files
            .iter()
            .partition(|file| !file.source.is_library());

        program_context.reachable_functions = Some(reachability::analyze(&user, &library));
    }

    let assembly = codegen::construct_program(
        &parsed_files,
        &mut program_context,
        Options {
            strictness: if cli.strict {
                Strictness::Strict
            } else {
                Strictness::Permissive
            },
            bootstrap: is_directory,
        },
    )?;

    let output_path = fileio::output::derive_path(&cli.path);
    fileio::output::write(&output_path, &assembly)?;

    log::info!(
        "wrote {} in {:.2?}",
        output_path.display(),
        start.elapsed()
    );

    Ok(())
}

mod error_report {
    use ariadne::{Label, Report, ReportKind, Source};

    use crate::{fileio::input::SourceFile, parser::ParseDiagnostic};

    pub fn display(source: &SourceFile, diagnostics: &[ParseDiagnostic]) {
        let file_name = format!("{}.vm", source.name());
        let file_name = file_name.as_str();

        for diagnostic in diagnostics {
            Report::build(ReportKind::Error, file_name, diagnostic.span.start)
                .with_message("Unrecognized command")
                .with_label(
                    Label::new((file_name, diagnostic.span.clone()))
                        .with_message(&diagnostic.message),
                )
                .finish()
                .eprint((file_name, Source::from(source.content())))
                .expect("error report should be valid");
        }
    }
}
