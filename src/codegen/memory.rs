use crate::{
    codegen::{
        asm,
        context::FileContext,
        error::{Error, FallableInstructions},
    },
    common::Segment,
};

/// First RAM address of the `temp` segment.
const TEMP_BASE: u16 = 5;
/// The `temp` segment has a hard bound of eight slots.
const TEMP_SLOTS: u16 = 8;

/// Construct the instructions for a `push` command: resolve the
/// segment+index into an address, read it and grow the stack (net +1).
pub fn construct_push(
    segment: Segment,
    index: u16,
    file_context: &FileContext,
) -> FallableInstructions {
    // small constants are representable directly in a computation
    if segment == Segment::Constant && index <= 1 {
        return Ok(vec![
            asm::at("SP"),
            asm::compute("M=M+1"),
            asm::compute("A=M-1"),
            asm::compute(if index == 0 { "M=0" } else { "M=1" }),
        ]);
    }

    let mut instructions = segment_reference(segment, index, file_context)?;

    instructions.push(if segment == Segment::Constant {
        asm::compute("D=A")
    } else {
        asm::compute("D=M")
    });
    instructions.extend([
        asm::at("SP"),
        asm::compute("M=M+1"),
        asm::compute("A=M-1"),
        asm::compute("M=D"),
    ]);

    Ok(instructions)
}

/// Construct the instructions for a `pop` command: shrink the stack and
/// store the popped value at the resolved address (net -1). The
/// `constant` segment is not writable.
pub fn construct_pop(
    segment: Segment,
    index: u16,
    file_context: &FileContext,
) -> FallableInstructions {
    if segment == Segment::Constant {
        return Err(Error::PopFromConstant);
    }

    if let Some(register) = base_register(segment) {
        if index > 0 {
            // recover the target address arithmetically: fold it into the
            // popped value, peel the address back out of the sum, then
            // subtract it away again (no second scratch register needed)
            return Ok(vec![
                asm::at_constant(index),
                asm::compute("D=A"),
                asm::at(register),
                asm::compute("D=D+M"),
                asm::at("SP"),
                asm::compute("AM=M-1"),
                asm::compute("D=M+D"),
                asm::compute("A=D-M"),
                asm::compute("M=D-A"),
            ]);
        }
    }

    let mut instructions = vec![asm::at("SP"), asm::compute("AM=M-1"), asm::compute("D=M")];
    instructions.extend(segment_reference(segment, index, file_context)?);
    instructions.push(asm::compute("M=D"));

    Ok(instructions)
}

/// Instructions leaving `A` at the referenced address (for `constant`,
/// holding the value itself), per the segment's addressing strategy:
/// immediate value, per-file static cell, fixed offset, register alias,
/// or base register + index.
fn segment_reference(segment: Segment, index: u16, file_context: &FileContext) -> FallableInstructions {
    match segment {
        Segment::Constant => Ok(vec![asm::at_constant(index)]),

        Segment::Static => Ok(vec![asm::at(file_context.static_symbol(index))]),

        Segment::Temp => {
            if index >= TEMP_SLOTS {
                return Err(Error::SegmentIndexOutOfRange {
                    segment,
                    index,
                    max: TEMP_SLOTS - 1,
                });
            }

            Ok(vec![asm::at_constant(TEMP_BASE + index)])
        }

        Segment::Pointer => match index {
            0 => Ok(vec![asm::at("THIS")]),
            1 => Ok(vec![asm::at("THAT")]),
            _ => Err(Error::SegmentIndexOutOfRange {
                segment,
                index,
                max: 1,
            }),
        },

        Segment::Argument | Segment::Local | Segment::This | Segment::That => {
            let register = base_register(segment)
                .expect("indirectly addressed segments should have a base register");

            Ok(match index {
                0 => vec![asm::at(register), asm::compute("A=M")],
                1 => vec![asm::at(register), asm::compute("A=M+1")],
                _ => vec![
                    asm::at_constant(index),
                    asm::compute("D=A"),
                    asm::at(register),
                    asm::compute("A=M+D"),
                ],
            })
        }
    }
}

/// Base register backing the four indirectly addressed segments.
const fn base_register(segment: Segment) -> Option<&'static str> {
    match segment {
        Segment::Local => Some("LCL"),
        Segment::Argument => Some("ARG"),
        Segment::This => Some("THIS"),
        Segment::That => Some("THAT"),
        _ => None,
    }
}
