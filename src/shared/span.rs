use std::{fmt::Debug, ops::Range, sync::Arc};

use miette::SourceSpan;

/// Span of pattern source text, together with the text it was cut from.
///
/// `start` and `end` are byte offsets into `source`, `end` being exclusive.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
    source: Arc<str>,
}

impl Interval {
    pub fn new(source: Arc<str>, start: usize, end: usize) -> Self {
        Interval { start, end, source }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn text(&self) -> &str {
        self.source.get(self.start..self.end).unwrap_or_default()
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Smallest interval containing both `self` and `other`.
    pub fn cover(&self, other: &Interval) -> Interval {
        Interval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            source: self.source.clone(),
        }
    }

    /// Column of `start`, counted in characters rather than bytes.
    pub fn column(&self) -> usize {
        self.source
            .get(..self.start)
            .map_or(self.start, |prefix| prefix.chars().count())
    }

    /// Two line caret diagnostic: the pattern, then `~` up to the start column and a `^`.
    pub fn show_position(&self) -> String {
        format!("{}\n{}^", self.source, "~".repeat(self.column()))
    }
}

impl Debug for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({}..{})", self.start, self.end)
    }
}

impl From<&Interval> for SourceSpan {
    fn from(interval: &Interval) -> Self {
        interval.range().into()
    }
}
