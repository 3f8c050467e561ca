// region: AsmModule

#[derive(Debug)]
pub struct AsmModule {
    blocks: Vec<AsmInstructionBlock>,
}

impl AsmModule {
    pub const fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn add_block(&mut self, block: AsmInstructionBlock) {
        self.blocks.push(block);
    }

    pub fn compile(self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for AsmModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.blocks
                .iter()
                .map(|block| format!("{block}"))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}

// endregion

// region: AsmInstructionBlock

/// The instructions translated from one VM command
/// (or one shared routine), emitted as a unit.
#[derive(Debug)]
pub struct AsmInstructionBlock {
    instructions: Vec<AsmInstruction>,
}

impl std::fmt::Display for AsmInstructionBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.instructions
                .iter()
                .map(|instruction| format!("{instruction}"))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}

impl From<Vec<AsmInstruction>> for AsmInstructionBlock {
    fn from(instructions: Vec<AsmInstruction>) -> Self {
        Self { instructions }
    }
}

impl From<&[AsmInstruction]> for AsmInstructionBlock {
    fn from(instructions: &[AsmInstruction]) -> Self {
        Self {
            instructions: instructions.to_vec(),
        }
    }
}

// endregion

// region: AsmInstruction

// region: AsmInstruction utility functions

/// Utility function for an address instruction targeting a symbol
/// (`@SP`, `@Main.run$LOOP`, ...).
pub fn at<S: Into<String>>(symbol: S) -> AsmInstruction {
    AsmInstruction::At(symbol.into())
}

/// Utility function for an address instruction loading a constant (`@7`).
pub fn at_constant(value: u16) -> AsmInstruction {
    AsmInstruction::AtConstant(value)
}

/// Utility function for a register-transfer/jump instruction
/// (`AM=M-1`, `D;JEQ`, `0;JMP`, ...).
pub fn compute(operation: &'static str) -> AsmInstruction {
    AsmInstruction::Compute(operation)
}

/// Utility function for a label declaration (`(symbol)`).
pub fn label_declaration<S: Into<String>>(symbol: S) -> AsmInstruction {
    AsmInstruction::LabelDeclaration(symbol.into())
}

/// Utility function for a comment line.
pub fn comment<S: Into<String>>(text: S) -> AsmInstruction {
    AsmInstruction::Comment(text.into())
}

// endregion

type Symbol = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmInstruction {
    At(Symbol),
    AtConstant(u16),
    Compute(&'static str),
    LabelDeclaration(Symbol),
    Comment(String),
}

impl std::fmt::Display for AsmInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::At(symbol) => write!(f, "@{symbol}"),
            Self::AtConstant(value) => write!(f, "@{value}"),
            Self::Compute(operation) => write!(f, "{operation}"),
            Self::LabelDeclaration(symbol) => write!(f, "({symbol})"),
            Self::Comment(text) => write!(f, "// {text}"),
        }
    }
}

// endregion
