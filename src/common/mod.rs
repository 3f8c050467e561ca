//! Common data shared across the translator
//! (the typed VM command model).

type Index = u16;
type Count = u16;
type Label = String;

/// One classified VM source command.
///
/// A second operand exists only on the variants that carry one
/// (`Push`/`Pop`/`Function`/`Call`); all other commands have none,
/// by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Arithmetic(ArithmeticOp),
    Push(Segment, Index),
    Pop(Segment, Index),
    Label(Label),
    Goto(Label),
    IfGoto(Label),
    Function(FunctionName, Count),
    Call(FunctionName, Count),
    Return,
    Comment(String),
}

impl Command {
    /// Reconstruct the source form of the command
    /// (echoed into the generated assembly as a comment).
    fn as_source(&self) -> String {
        match self {
            Self::Arithmetic(op) => op.to_string(),
            Self::Push(segment, i) => format!("push {segment} {i}"),
            Self::Pop(segment, i) => format!("pop {segment} {i}"),
            Self::Label(label) => format!("label {label}"),
            Self::Goto(label) => format!("goto {label}"),
            Self::IfGoto(label) => format!("if-goto {label}"),
            Self::Function(function_name, variable_count) => {
                format!("function {function_name} {variable_count}")
            }
            Self::Call(function_name, argument_count) => {
                format!("call {function_name} {argument_count}")
            }
            Self::Return => String::from("return"),
            Self::Comment(text) => format!("// {text}"),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_source())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, strum::Display, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

/// Name of a VM function (e.g. `Main.run`), as used for entry labels,
/// call targets and the reachability bookkeeping.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct FunctionName(String);

impl FunctionName {
    pub fn from_literal<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FunctionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
