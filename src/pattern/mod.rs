mod cache;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use miette::Result;
use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::{
    compiler::compile,
    lexer::Lexer,
    matcher::{Bindings, Matcher},
    parser::{Node, Parser},
    value::Value,
};
pub use cache::PatternCache;

/// Most distinct pattern texts [`Pattern::cached`] keeps compiled at once.
pub const CACHE_CAPACITY: usize = 256;

static CACHE: Lazy<Mutex<PatternCache>> = Lazy::new(|| Mutex::new(PatternCache::new(CACHE_CAPACITY)));

/// A pattern compiled from source text: its syntax tree and the matcher built from it.
#[derive(Debug, PartialEq)]
pub struct Pattern {
    ast: Node,
    matcher: Matcher,
}

impl Pattern {
    /// Lexes, parses and compiles `code`.
    pub fn new(code: &str) -> Result<Pattern> {
        let tokens = Lexer::new(code).lex()?;
        let ast = Parser::new(code, tokens).parse_pattern()?;
        let matcher = compile(&ast)?;
        Ok(Pattern { ast, matcher })
    }

    /// Same as [`Pattern::new`], but compiled patterns are shared process-wide.
    ///
    /// Up to [`CACHE_CAPACITY`] texts stay cached, the least recently used one is
    /// dropped first. Failed compiles are not cached.
    pub fn cached(code: &str) -> Result<Arc<Pattern>> {
        if let Some(pattern) = lock_cache().get(code) {
            trace!(pattern = code, "cache hit");
            return Ok(pattern);
        }

        // compiled outside the lock, a racing thread may compile the same text
        let pattern = Arc::new(Pattern::new(code)?);
        let mut cache = lock_cache();
        let pattern = cache.insert(code, pattern);
        debug!(pattern = code, cached = cache.len(), "cache miss");
        Ok(pattern)
    }

    /// Drops every pattern held by [`Pattern::cached`].
    pub fn clear_cache() {
        lock_cache().clear();
    }

    pub fn source(&self) -> &str {
        self.ast.interval.source()
    }

    pub fn ast(&self) -> &Node {
        &self.ast
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn is_defined_at(&self, candidate: &Value) -> bool {
        self.matcher.is_defined_at(candidate)
    }

    /// See [`Matcher::bindings`]; only valid after [`Pattern::is_defined_at`] held.
    pub fn bindings(&self, candidate: &Value) -> Bindings {
        self.matcher.bindings(candidate)
    }

    /// Bindings of `candidate`, or a `NoMatch` diagnostic pointing at the whole pattern.
    pub fn extract(&self, candidate: &Value) -> Result<Bindings> {
        self.matcher.extract_at(candidate, &self.ast.interval)
    }
}

fn lock_cache() -> MutexGuard<'static, PatternCache> {
    CACHE.lock().unwrap_or_else(PoisonError::into_inner)
}
