use crate::common::Segment;

use super::asm;

/// List of all recoverable per-instruction problems that can occur during
/// code generation. Each one suppresses the offending instruction's
/// emission; whether the run continues is the driver's strictness policy.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("`{segment}` index {index} is out of range (0..={max})")]
    SegmentIndexOutOfRange {
        segment: Segment,
        index: u16,
        max: u16,
    },

    #[error("cannot pop to the `constant` segment")]
    PopFromConstant,
}

pub type FallableInstructions = Result<Vec<asm::AsmInstruction>, Error>;
