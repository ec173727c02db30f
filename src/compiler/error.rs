use miette::{Diagnostic, ErrReport, SourceSpan};
use thiserror::Error;

#[derive(Debug)]
pub enum CompilerError {
    DuplicateBinding(DuplicateBinding),
    MisplacedSplat(MisplacedSplat),
    MalformedPattern(MalformedPattern),
}

impl CompilerError {
    pub fn into_err_report(self) -> ErrReport {
        self.into()
    }
}

impl From<CompilerError> for ErrReport {
    fn from(error: CompilerError) -> Self {
        match error {
            CompilerError::DuplicateBinding(e) => ErrReport::from(e),
            CompilerError::MisplacedSplat(e) => ErrReport::from(e),
            CompilerError::MalformedPattern(e) => ErrReport::from(e),
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
#[error("duplicate-binding")]
#[diagnostic(
	code(compiler::duplicate_binding),
	help("[{}] Rename one of the `{}` captures, a name can only be bound once per pattern", self.dbg_line, self.name),
)]
pub struct DuplicateBinding {
    pub dbg_line: String,
    pub name: String,
    #[source_code]
    pub src: String,
    #[label("First bound here")]
    pub first: SourceSpan,
    #[label("Bound again here")]
    pub second: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("misplaced-splat")]
#[diagnostic(
	code(compiler::misplaced_splat),
	help("[{}] A pattern may hold one splat per array and it has to come last", self.dbg_line),
)]
pub struct MisplacedSplat {
    pub dbg_line: String,
    #[source_code]
    pub src: String,
    #[label("Splat cannot be compiled here")]
    pub position: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("malformed-pattern")]
#[diagnostic(
	code(compiler::malformed_pattern),
	help("[{}] Expected {}, got {} instead", self.dbg_line, self.expected, self.actual),
)]
pub struct MalformedPattern {
    pub dbg_line: String,
    pub expected: String,
    pub actual: String,
    #[source_code]
    pub src: String,
    #[label("Malformed {}", self.actual)]
    pub position: SourceSpan,
}
