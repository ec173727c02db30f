use miette::{Diagnostic, ErrReport, SourceSpan};
use thiserror::Error;

#[derive(Debug)]
pub enum ParserError {
    UnexpectedToken(UnexpectedToken),
    UnexpectedEndOfFile(UnexpectedEndOfFile),
    TrailingInput(TrailingInput),
    MisplacedSplat(MisplacedSplat),
    InvalidNumber(InvalidNumber),
    NestingTooDeep(NestingTooDeep),
}

impl ParserError {
    pub fn into_err_report(self) -> ErrReport {
        self.into()
    }
}

impl From<ParserError> for ErrReport {
    fn from(error: ParserError) -> Self {
        match error {
            ParserError::UnexpectedToken(e) => ErrReport::from(e),
            ParserError::UnexpectedEndOfFile(e) => ErrReport::from(e),
            ParserError::TrailingInput(e) => ErrReport::from(e),
            ParserError::MisplacedSplat(e) => ErrReport::from(e),
            ParserError::InvalidNumber(e) => ErrReport::from(e),
            ParserError::NestingTooDeep(e) => ErrReport::from(e),
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
#[error("unexpected-token")]
#[diagnostic(
	code(parser::unexpected_token),
	help("[{}] Expected {}, got {} instead", self.dbg_line, self.expected, self.actual),
)]
pub struct UnexpectedToken {
    pub dbg_line: String,
    pub expected: String,
    pub actual: String,
    #[source_code]
    pub src: String,
    #[label("Unexpected token: {}", self.actual)]
    pub position: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("unexpected-eof")]
#[diagnostic(
	code(parser::unexpected_eof),
	help("[{}] Expected {}, got end of input instead", self.dbg_line, self.expected),
)]
pub struct UnexpectedEndOfFile {
    pub dbg_line: String,
    pub expected: String,
    #[source_code]
    pub src: String,
    #[label("Unexpected end of input")]
    pub position: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("trailing-input")]
#[diagnostic(
	code(parser::trailing_input),
	help("[{}] A pattern is a single element, remove everything after it", self.dbg_line),
)]
pub struct TrailingInput {
    pub dbg_line: String,
    #[source_code]
    pub src: String,
    #[label("Input continues after a complete pattern")]
    pub position: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("misplaced-splat")]
#[diagnostic(
	code(parser::misplaced_splat),
	help("[{}] {}", self.dbg_line, self.reason),
)]
pub struct MisplacedSplat {
    pub dbg_line: String,
    pub reason: String,
    #[source_code]
    pub src: String,
    #[label("Splat is not allowed here")]
    pub position: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("invalid-number")]
#[diagnostic(
	code(parser::invalid_number),
	help("[{}] {:?} does not fit a {}", self.dbg_line, self.number, self.kind),
)]
pub struct InvalidNumber {
    pub dbg_line: String,
    pub number: String,
    pub kind: String,
    #[source_code]
    pub src: String,
    #[label("Invalid number")]
    pub position: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("nesting-too-deep")]
#[diagnostic(
	code(parser::nesting_too_deep),
	help("[{}] Arrays may be nested at most {} levels deep", self.dbg_line, self.limit),
)]
pub struct NestingTooDeep {
    pub dbg_line: String,
    pub limit: usize,
    #[source_code]
    pub src: String,
    #[label("Array opened past the nesting limit")]
    pub position: SourceSpan,
}
