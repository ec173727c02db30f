use miette::Result;
use tracing::debug;

use extractor::{Pattern, Value};

/// Prints the bindings on a match. A non-match is reported with its diagnostic
/// and yields `Ok(false)`.
pub fn run_match(pattern: &str, candidate: &str) -> Result<bool> {
    let pattern = Pattern::new(pattern)?;
    debug!(root = pattern.ast().name(), matcher = %pattern.matcher(), "compiled");

    let candidate = Value::parse(candidate)?;
    debug!(%candidate, "candidate");

    match pattern.extract(&candidate) {
        Ok(bindings) => {
            println!("{bindings}");
            Ok(true)
        }
        Err(error) => {
            eprintln!("{error:?}");
            Ok(false)
        }
    }
}

pub fn run_check(pattern: &str) -> Result<bool> {
    let pattern = Pattern::new(pattern)?;
    debug!(root = pattern.ast().name(), "compiled");
    println!("{}", pattern.matcher());
    Ok(true)
}
