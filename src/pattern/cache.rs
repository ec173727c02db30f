use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::Pattern;

/// Compiled patterns keyed by their source text, evicting the least recently used
/// entry once `capacity` is reached.
pub struct PatternCache {
    capacity: usize,
    entries: FxHashMap<String, (Arc<Pattern>, u64)>,
    clock: u64,
}

impl PatternCache {
    pub fn new(capacity: usize) -> Self {
        PatternCache {
            capacity,
            entries: FxHashMap::default(),
            clock: 0,
        }
    }

    pub fn get(&mut self, code: &str) -> Option<Arc<Pattern>> {
        self.clock += 1;
        let (pattern, used) = self.entries.get_mut(code)?;
        *used = self.clock;
        Some(pattern.clone())
    }

    /// Keeps the entry already cached for `code` if a racing caller got there first.
    pub fn insert(&mut self, code: &str, pattern: Arc<Pattern>) -> Arc<Pattern> {
        if let Some(cached) = self.get(code) {
            return cached;
        }

        if self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, (_, used))| *used)
                .map(|(code, _)| code.clone());
            if let Some(oldest) = oldest {
                self.entries.remove(&oldest);
            }
        }

        if self.capacity > 0 {
            self.entries
                .insert(code.to_string(), (pattern.clone(), self.clock));
        }
        pattern
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.clock = 0;
    }
}
