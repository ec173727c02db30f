use miette::{Diagnostic, ErrReport, SourceSpan};
use thiserror::Error;

#[derive(Debug)]
pub enum LexerError {
    UnexpectedCharacter(UnexpectedCharacter),
    UnterminatedString(UnterminatedString),
    MalformedNumber(MalformedNumber),
}

impl LexerError {
    pub fn into_err_report(self) -> ErrReport {
        self.into()
    }
}

impl From<LexerError> for ErrReport {
    fn from(error: LexerError) -> Self {
        match error {
            LexerError::UnexpectedCharacter(e) => ErrReport::from(e),
            LexerError::UnterminatedString(e) => ErrReport::from(e),
            LexerError::MalformedNumber(e) => ErrReport::from(e),
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
#[error("unexpected-character")]
#[diagnostic(
	code(lexer::unexpected_character),
	help("[{}] {:?} is not part of the pattern syntax", self.dbg_line, self.actual),
)]
pub struct UnexpectedCharacter {
    pub dbg_line: String,
    pub actual: char,
    #[source_code]
    pub src: String,
    #[label("Unexpected character: {:?}", self.actual)]
    pub position: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("unterminated-string")]
#[diagnostic(
	code(lexer::unterminated_string),
	help("[{}] Close the string with {}", self.dbg_line, self.quote),
)]
pub struct UnterminatedString {
    pub dbg_line: String,
    pub quote: char,
    #[source_code]
    pub src: String,
    #[label("String starts here and never ends")]
    pub position: SourceSpan,
}

#[derive(Error, Debug, Diagnostic)]
#[error("malformed-number")]
#[diagnostic(
	code(lexer::malformed_number),
	help("[{}] Separate {:?} from what follows it", self.dbg_line, self.number),
)]
pub struct MalformedNumber {
    pub dbg_line: String,
    pub number: String,
    #[source_code]
    pub src: String,
    #[label("Number runs into {:?}", self.next)]
    pub position: SourceSpan,
    pub next: char,
}
