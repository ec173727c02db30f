use std::fmt::Display;

use rustc_hash::FxHashMap;

use crate::value::Value;

/// Names captured by a successful match, mapped to the sub-values they captured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings(FxHashMap<String, Value>);

impl Bindings {
    pub fn single(name: &str, value: Value) -> Self {
        let mut map = FxHashMap::default();
        map.insert(name.to_string(), value);
        Bindings(map)
    }

    /// Union of both maps. On a name collision the binding already in `self` wins.
    ///
    /// Compilation rejects patterns binding a name twice, so a collision here
    /// means the matcher tree was assembled by hand.
    pub fn merge(mut self, other: Bindings) -> Self {
        if self.0.is_empty() {
            return other;
        }
        for (name, value) in other.0 {
            debug_assert!(!self.0.contains_key(&name), "`{name}` bound twice");
            self.0.entry(name).or_insert(value);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Bindings ordered by name.
    pub fn sorted(&self) -> Vec<(&str, &Value)> {
        let mut bindings: Vec<_> = self.iter().collect();
        bindings.sort_unstable_by_key(|(name, _)| *name);
        bindings
    }
}

impl<N: Into<String>> FromIterator<(N, Value)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (N, Value)>>(iter: T) -> Self {
        Bindings(iter.into_iter().map(|(name, value)| (name.into(), value)).collect())
    }
}

impl Display for Bindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}
