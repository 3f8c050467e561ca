use crate::{codegen::asm, common::FunctionName};

/// Context information regarding the file currently being translated.
#[derive(Debug)]
pub struct Context {
    /// File stem; doubles as the `static` segment namespace.
    pub file_name: String,
    /// Name of the function whose body is being translated
    /// (empty outside any function, e.g. in bootstrap code).
    pub current_function: FunctionName,
    pub output: asm::AsmModule,
}

impl Context {
    pub fn new<S: Into<String>>(file_name: S) -> Self {
        Self {
            file_name: file_name.into(),
            current_function: FunctionName::from_literal(""),
            output: asm::AsmModule::new(),
        }
    }

    /// Scope a user-visible label to the enclosing function
    /// (`function$label`), so identical label text in different
    /// functions never collides.
    pub fn scoped_label(&self, label: &str) -> String {
        format!("{}${label}", self.current_function)
    }

    /// Symbol backing `static <index>` for this file.
    pub fn static_symbol(&self, index: u16) -> String {
        format!("{}.{index}", self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_scoping() {
        let mut context = Context::new("Main");
        context.current_function = FunctionName::from_literal("Main.run");

        assert_eq!(context.scoped_label("LOOP"), "Main.run$LOOP");
        assert_eq!(context.static_symbol(3), "Main.3");
    }
}
