//! Test-only execution harness: an interpreter for the emitted symbolic
//! assembly, precise enough to observe stack effects and the calling
//! convention without putting an assembler in the loop.
//!
//! Symbols are resolved the way the downstream assembler would resolve
//! them: predefined registers, label declarations, then variables
//! allocated from address 16 up.

use std::collections::HashMap;

const MEMORY_SIZE: usize = 32768;
const FIRST_VARIABLE_ADDRESS: i16 = 16;

#[derive(Debug)]
enum Instruction {
    Address(i16),
    Compute {
        destinations: String,
        computation: String,
        jump: Option<String>,
    },
}

pub struct Emulator {
    instructions: Vec<Instruction>,
    memory: Vec<i16>,
    a: i16,
    d: i16,
    pc: usize,
}

impl Emulator {
    /// Parse and link a symbolic assembly listing.
    ///
    /// Panics on malformed input; the harness only ever runs
    /// generator output.
    pub fn new(assembly: &str) -> Self {
        let mut symbols = predefined_symbols();

        // first pass: strip comments/blanks, bind label declarations
        let mut lines = Vec::new();
        for raw_line in assembly.lines() {
            let line = match raw_line.find("//") {
                Some(position) => &raw_line[..position],
                None => raw_line,
            }
            .trim();

            if line.is_empty() {
                continue;
            }

            if let Some(label) = line.strip_prefix('(') {
                let label = label.strip_suffix(')').expect("unterminated label declaration");
                let address =
                    i16::try_from(lines.len()).expect("program exceeds the address space");
                assert!(
                    symbols.insert(label.to_owned(), address).is_none(),
                    "label `{label}` declared twice"
                );
                continue;
            }

            lines.push(line.to_owned());
        }

        // second pass: resolve address instructions, allocating variables
        let mut next_variable = FIRST_VARIABLE_ADDRESS;
        let instructions = lines
            .iter()
            .map(|line| match line.strip_prefix('@') {
                Some(target) => {
                    let address = target.parse::<u16>().map_or_else(
                        |_| {
                            *symbols.entry(target.to_owned()).or_insert_with(|| {
                                let allocated = next_variable;
                                next_variable += 1;
                                allocated
                            })
                        },
                        |value| value as i16,
                    );

                    Instruction::Address(address)
                }
                None => parse_compute(line),
            })
            .collect();

        Self {
            instructions,
            memory: vec![0; MEMORY_SIZE],
            a: 0,
            d: 0,
            pc: 0,
        }
    }

    /// Execute one instruction; `false` once the program counter runs
    /// off the end of the program.
    pub fn step(&mut self) -> bool {
        let Some(instruction) = self.instructions.get(self.pc) else {
            return false;
        };

        match instruction {
            Instruction::Address(address) => {
                self.a = *address;
                self.pc += 1;
            }
            Instruction::Compute {
                destinations,
                computation,
                jump,
            } => {
                // the memory operand and the jump target both use the
                // A register as it was before this instruction
                let address = (self.a as u16 as usize) % MEMORY_SIZE;
                let value = evaluate(computation, self.a, self.d, self.memory[address]);

                if destinations.contains('M') {
                    self.memory[address] = value;
                }
                if destinations.contains('A') {
                    self.a = value;
                }
                if destinations.contains('D') {
                    self.d = value;
                }

                if jump.as_deref().is_some_and(|condition| jump_taken(condition, value)) {
                    self.pc = address;
                } else {
                    self.pc += 1;
                }
            }
        }

        true
    }

    /// Run until the program counter leaves the program, up to `max_steps`.
    pub fn run(&mut self, max_steps: usize) {
        for _ in 0..max_steps {
            if !self.step() {
                return;
            }
        }
    }

    pub fn memory(&self) -> &[i16] {
        &self.memory
    }

    pub fn set_memory(&mut self, address: usize, value: i16) {
        self.memory[address] = value;
    }
}

fn parse_compute(line: &str) -> Instruction {
    let (destinations, rest) = match line.split_once('=') {
        Some((destinations, rest)) => (destinations.to_owned(), rest),
        None => (String::new(), line),
    };

    let (computation, jump) = match rest.split_once(';') {
        Some((computation, jump)) => (computation.to_owned(), Some(jump.to_owned())),
        None => (rest.to_owned(), None),
    };

    Instruction::Compute {
        destinations,
        computation,
        jump,
    }
}

fn predefined_symbols() -> HashMap<String, i16> {
    let mut symbols: HashMap<String, i16> = [
        ("SP", 0),
        ("LCL", 1),
        ("ARG", 2),
        ("THIS", 3),
        ("THAT", 4),
        ("SCREEN", 16384),
        ("KBD", 24576),
    ]
    .into_iter()
    .map(|(name, address)| (name.to_owned(), address))
    .collect();

    for register in 0..16 {
        symbols.insert(format!("R{register}"), register);
    }

    symbols
}

fn evaluate(computation: &str, a: i16, d: i16, m: i16) -> i16 {
    let operand = |name: char| match name {
        'A' => a,
        'D' => d,
        'M' => m,
        '0' => 0,
        '1' => 1,
        _ => panic!("unsupported operand `{name}`"),
    };

    let characters: Vec<char> = computation.chars().collect();
    match characters.as_slice() {
        [single] => operand(*single),
        ['-', '1'] => -1,
        ['!', x] => !operand(*x),
        ['-', x] => operand(*x).wrapping_neg(),
        [x, op, y] => {
            let (x, y) = (operand(*x), operand(*y));
            match op {
                '+' => x.wrapping_add(y),
                '-' => x.wrapping_sub(y),
                '&' => x & y,
                '|' => x | y,
                _ => panic!("unsupported operator `{op}`"),
            }
        }
        _ => panic!("unsupported computation `{computation}`"),
    }
}

fn jump_taken(condition: &str, value: i16) -> bool {
    match condition {
        "JGT" => value > 0,
        "JEQ" => value == 0,
        "JGE" => value >= 0,
        "JLT" => value < 0,
        "JNE" => value != 0,
        "JLE" => value <= 0,
        "JMP" => true,
        _ => panic!("unsupported jump condition `{condition}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line_arithmetic() {
        // 2 + 3, stored at R0
        let mut emulator = Emulator::new("@2\nD=A\n@3\nD=D+A\n@R0\nM=D");

        emulator.run(100);

        assert_eq!(emulator.memory()[0], 5);
    }

    #[test]
    fn test_labels_jumps_and_variables() {
        // count i from 10 down to 0 into a variable
        let source = [
            "@10", "D=A", "@i", "M=D", // i = 10
            "(LOOP)", "@i", "D=M", "@END", "D;JEQ", "@i", "M=M-1", "@LOOP", "0;JMP",
            "(END)", "@END", "0;JMP",
        ]
        .join("\n");
        let mut emulator = Emulator::new(&source);

        emulator.run(200);

        // variables allocate from 16
        assert_eq!(emulator.memory()[16], 0);
    }

    #[test]
    fn test_paired_destination_uses_prior_address() {
        // AM=M-1 must write through the old A, then retarget A
        let mut emulator = Emulator::new("@3\nAM=M-1");
        emulator.set_memory(3, 7);

        emulator.run(10);

        assert_eq!(emulator.memory()[3], 6);
        // a subsequent M would now address cell 6
    }
}
