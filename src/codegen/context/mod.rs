pub mod file;
pub mod program;

pub use file::Context as FileContext;
pub use program::Context as ProgramContext;
