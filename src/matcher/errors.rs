use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("no-match")]
#[diagnostic(
	code(matcher::no_match),
	help("[{}] {} is not matched by\n{}", self.dbg_line, self.candidate, self.caret),
)]
pub struct NoMatch {
    pub dbg_line: String,
    pub candidate: String,
    pub caret: String,
    #[source_code]
    pub src: String,
    #[label("Pattern does not match {}", self.candidate)]
    pub position: SourceSpan,
}
