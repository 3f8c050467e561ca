use std::collections::HashMap;

use crate::{codegen::reachability::ReachableFunctions, common::FunctionName};

// region: Context

/// Context information regarding the entire program, across files
/// (label counters and the reachability outcome).
#[derive(Debug)]
pub struct Context {
    pub comparison_labels: ComparisonLabelCounter,
    pub call_sites: CallSiteCounter,
    /// Outcome of the reachability analysis; `None` when the analysis
    /// did not run (single-file mode, or pruning disabled), in which
    /// case every function is emitted.
    pub reachable_functions: Option<ReachableFunctions>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            comparison_labels: ComparisonLabelCounter::new(),
            call_sites: CallSiteCounter::new(),
            reachable_functions: None,
        }
    }

    /// Whether a function's body should be emitted at all.
    pub fn is_function_live(&self, name: &FunctionName) -> bool {
        self.reachable_functions
            .as_ref()
            .is_none_or(|reachable| reachable.contains(name))
    }
}

// endregion

// region: Comparison label counter

/// Program-wide counter suffixing comparison branch labels
/// (`TRUE_n`/`FALSE_n`); incremented once per comparison emitted,
/// which keeps the labels unique across the whole program.
#[derive(Debug)]
pub struct ComparisonLabelCounter {
    count: usize,
}

impl ComparisonLabelCounter {
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    pub fn next(&mut self) -> usize {
        let current = self.count;
        self.count += 1;

        current
    }
}

// endregion

// region: Call site counter

type CallSequenceNumber = usize;

/// Per-function call-site numbering used to manufacture unique
/// return-address labels (`caller$ret.N`). Sequence numbers start at 1
/// and are scoped to the calling function, never reset across files.
#[derive(Debug)]
pub struct CallSiteCounter {
    counts: HashMap<FunctionName, CallSequenceNumber>,
}

impl CallSiteCounter {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    pub fn next(&mut self, caller: &FunctionName) -> CallSequenceNumber {
        *self
            .counts
            .entry(caller.clone())
            .and_modify(|count| *count += 1)
            .or_insert(1)
    }
}

// endregion
