//! Whole-program reachability analysis: determine which functions are
//! live before emission, so dead library (and user) code never reaches
//! the output.

use std::collections::{HashMap, HashSet};

use phf::phf_set;

use crate::{
    common::{Command, FunctionName},
    parser::ParsedFile,
};

/// Program entry point; the bootstrap calls it, so it is live in every
/// directory-mode program.
pub const ENTRY_POINT: &str = "Sys.init";

/// Coercion routines compiled code relies on without a source-level call
/// of its own (string literals expand to a build-up through these);
/// seeded as live so the library scan always keeps them.
static IMPLICIT_RUNTIME_HELPERS: phf::Set<&'static str> = phf_set! {
    "String.new",
    "String.appendChar",
};

// region: Call graph

/// Mapping from each function to the set of functions it calls. Edges
/// are only recorded while the scan is inside an already-live function,
/// so the graph never describes dead code.
#[derive(Debug, Default)]
pub struct CallGraph {
    edges: HashMap<FunctionName, HashSet<FunctionName>>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, caller: &FunctionName, callee: &FunctionName) {
        self.edges
            .entry(caller.clone())
            .or_default()
            .insert(callee.clone());
    }

    pub fn callees(&self, caller: &FunctionName) -> Option<&HashSet<FunctionName>> {
        self.edges.get(caller)
    }
}

// endregion

// region: Reachable set

/// The fixed-point closure of function names transitively called from
/// the program entry point.
#[derive(Debug)]
pub struct ReachableFunctions(HashSet<FunctionName>);

impl ReachableFunctions {
    fn seed() -> Self {
        let mut names: HashSet<_> = IMPLICIT_RUNTIME_HELPERS
            .iter()
            .map(|&helper| FunctionName::from_literal(helper))
            .collect();
        names.insert(FunctionName::from_literal(ENTRY_POINT));

        Self(names)
    }

    pub fn contains(&self, name: &FunctionName) -> bool {
        self.0.contains(name)
    }

    fn insert(&mut self, name: FunctionName) -> bool {
        self.0.insert(name)
    }
}

// endregion

/// Determine which functions are live.
///
/// Phase A walks the user files once, collecting call edges out of
/// functions already known live. Phase B keeps alternating full scans of
/// user and library files — a library edge may depend on a user edge
/// discovered later, and vice versa — until one complete pass adds no
/// new name. The set grows monotonically and is bounded by the number of
/// distinct function names, so the pass count is bounded by the longest
/// call chain.
pub fn analyze(user_files: &[&ParsedFile], library_files: &[&ParsedFile]) -> ReachableFunctions {
    let mut reachable = ReachableFunctions::seed();
    let mut call_graph = CallGraph::new();

    for file in user_files {
        scan(file, &mut reachable, &mut call_graph);
    }

    loop {
        let mut grew = false;

        for file in user_files {
            grew |= scan(file, &mut reachable, &mut call_graph);
        }
        for file in library_files {
            grew |= scan(file, &mut reachable, &mut call_graph);
        }

        if !grew {
            break;
        }
    }

    reachable
}

/// One scan of a file's command stream; returns whether any new function
/// became reachable. The current function extends from its `function`
/// header to the next one — a body may `return` on several branches, so
/// the header, not `return`, delimits it.
fn scan(
    file: &ParsedFile,
    reachable: &mut ReachableFunctions,
    call_graph: &mut CallGraph,
) -> bool {
    let mut grew = false;
    let mut current_function = None;

    for sourced in &file.commands {
        match &sourced.command {
            Command::Function(name, _) => current_function = Some(name.clone()),
            Command::Call(callee, _) => {
                let Some(caller) = &current_function else {
                    continue;
                };
                if !reachable.contains(caller) {
                    continue;
                }

                call_graph.record(caller, callee);
                grew |= reachable.insert(callee.clone());
            }
            _ => {}
        }
    }

    grew
}
