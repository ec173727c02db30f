mod bindings;
pub mod errors;

pub use bindings::Bindings;

use std::fmt::Display;

use miette::{bail, Result};
use tracing::trace;

use crate::{
    dbg_line,
    shared::span::Interval,
    value::{Number, Value},
};

/// Name that captures anything without binding it.
pub const ANONYMOUS: &str = "_";

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(Number),
    String(String),
}

impl Literal {
    /// Numbers compare by numeric value across integer and float, strings compare exactly.
    pub fn matches(&self, candidate: &Value) -> bool {
        match (self, candidate) {
            (Literal::Number(number), candidate) => candidate
                .as_number()
                .is_some_and(|other| number.numeric_eq(&other)),
            (Literal::String(string), Value::String(other)) => string == other,
            (Literal::String(_), _) => false,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Number(number) => number.fmt(f),
            Literal::String(string) => write!(f, "{string:?}"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum MatcherKind {
    /// Captures the candidate under `name`.
    Identifier(String),
    Literal(Literal),
    /// Sequence has no elements from `index` on.
    EmptyList {
        index: usize,
    },
    /// `head` matches the element at `index`, `tail` matches the same sequence.
    ArrayList {
        head: Box<Matcher>,
        tail: Box<Matcher>,
        index: usize,
    },
    /// `element` matches the element at `index`, which must be the last one.
    ArrayHead {
        element: Box<Matcher>,
        index: usize,
    },
    /// `inner` matches the suffix starting at `index` as a single array.
    Splat {
        inner: Box<Matcher>,
        index: usize,
    },
    /// Any suffix starting at `index`, captured by nothing.
    AnonymousSplat {
        index: usize,
    },
}

/// Compiled pattern tree. Immutable once built, evaluated any number of times.
///
/// `interval` points back at the pattern text the matcher was compiled from and
/// is only used for diagnostics.
///
/// An array compiles to a chain of `ArrayList` links, one per element. Evaluation
/// walks that chain in a loop and only recurses into nested arrays.
#[derive(Debug, PartialEq)]
pub struct Matcher {
    pub kind: MatcherKind,
    pub interval: Interval,
}

impl Matcher {
    pub fn new(kind: MatcherKind, interval: Interval) -> Self {
        Matcher { kind, interval }
    }

    pub fn is_defined_at(&self, candidate: &Value) -> bool {
        let mut matcher = self;
        loop {
            match &matcher.kind {
                MatcherKind::ArrayList { head, tail, index } => {
                    let holds = candidate
                        .as_array()
                        .and_then(|seq| seq.get(*index))
                        .is_some_and(|element| head.is_defined_at(element));
                    if !holds {
                        return false;
                    }
                    matcher = tail;
                }
                MatcherKind::Identifier(_) => return true,
                MatcherKind::Literal(literal) => return literal.matches(candidate),
                MatcherKind::EmptyList { index } => {
                    return candidate.as_array().is_some_and(|seq| seq.len() == *index)
                }
                MatcherKind::ArrayHead { element, index } => {
                    return candidate.as_array().is_some_and(|seq| {
                        index + 1 == seq.len() && element.is_defined_at(&seq[*index])
                    })
                }
                MatcherKind::Splat { inner, index } => {
                    return candidate
                        .as_array()
                        .and_then(|seq| seq.get(*index..))
                        .is_some_and(|suffix| {
                            inner.captures_anything()
                                || inner.is_defined_at(&Value::Array(suffix.to_vec()))
                        })
                }
                MatcherKind::AnonymousSplat { index } => {
                    return candidate
                        .as_array()
                        .is_some_and(|seq| *index <= seq.len())
                }
            }
        }
    }

    /// Extracts bindings without checking the match first.
    ///
    /// Only meaningful once [`Matcher::is_defined_at`] held for the same candidate,
    /// otherwise the result is whatever could be collected and must be discarded.
    pub fn bindings(&self, candidate: &Value) -> Bindings {
        let seq = candidate.as_array();
        let mut bindings = Bindings::default();
        let mut matcher = self;
        loop {
            let last = match &matcher.kind {
                MatcherKind::ArrayList { head, tail, index } => {
                    if let Some(element) = seq.and_then(|seq| seq.get(*index)) {
                        bindings = bindings.merge(head.bindings(element));
                    }
                    matcher = tail;
                    continue;
                }
                MatcherKind::Identifier(name) if name == ANONYMOUS => Bindings::default(),
                MatcherKind::Identifier(name) => Bindings::single(name, candidate.clone()),
                MatcherKind::Literal(_)
                | MatcherKind::EmptyList { .. }
                | MatcherKind::AnonymousSplat { .. } => Bindings::default(),
                MatcherKind::ArrayHead { element, index } => {
                    match seq.and_then(|seq| seq.get(*index)) {
                        Some(value) => element.bindings(value),
                        None => Bindings::default(),
                    }
                }
                MatcherKind::Splat { inner, index } => {
                    match seq.and_then(|seq| seq.get(*index..)) {
                        Some(suffix) => inner.bindings(&Value::Array(suffix.to_vec())),
                        None => Bindings::default(),
                    }
                }
            };
            return bindings.merge(last);
        }
    }

    /// Checked extraction: bindings on a match, a `NoMatch` diagnostic at this matcher otherwise.
    pub fn extract(&self, candidate: &Value) -> Result<Bindings> {
        self.extract_at(candidate, &self.interval)
    }

    /// Same as [`Matcher::extract`], with the diagnostic pointing at `interval`.
    pub fn extract_at(&self, candidate: &Value, interval: &Interval) -> Result<Bindings> {
        if !self.is_defined_at(candidate) {
            trace!(%candidate, pattern = interval.source(), "no match");
            bail!(errors::NoMatch {
                dbg_line: dbg_line!(),
                candidate: candidate.to_string(),
                caret: interval.show_position(),
                src: interval.source().to_string(),
                position: interval.into(),
            })
        }

        let bindings = self.bindings(candidate);
        trace!(%candidate, %bindings, pattern = interval.source(), "matched");
        Ok(bindings)
    }

    fn captures_anything(&self) -> bool {
        matches!(self.kind, MatcherKind::Identifier(_))
    }
}

impl Drop for Matcher {
    fn drop(&mut self) {
        let leaf = || MatcherKind::AnonymousSplat { index: 0 };
        let mut kind = std::mem::replace(&mut self.kind, leaf());
        while let MatcherKind::ArrayList { head, mut tail, .. } = kind {
            drop(head);
            kind = std::mem::replace(&mut tail.kind, leaf());
        }
    }
}

impl Display for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut open = 0;
        let mut matcher = self;
        loop {
            match &matcher.kind {
                MatcherKind::ArrayList { head, tail, index } => {
                    write!(f, "ArrayList[{index}]({head}, ")?;
                    open += 1;
                    matcher = tail;
                    continue;
                }
                MatcherKind::Identifier(name) => write!(f, "{name}")?,
                MatcherKind::Literal(literal) => literal.fmt(f)?,
                MatcherKind::EmptyList { index } => write!(f, "EmptyList[{index}]")?,
                MatcherKind::ArrayHead { element, index } => {
                    write!(f, "ArrayHead[{index}]({element})")?
                }
                MatcherKind::Splat { inner, index } => write!(f, "Splat[{index}]({inner})")?,
                MatcherKind::AnonymousSplat { index } => write!(f, "AnonymousSplat[{index}]")?,
            }
            break;
        }
        write!(f, "{}", ")".repeat(open))
    }
}
