//! Named constant registry.

use std::collections::HashMap;
use std::f64::consts::{E, PI};

/// Mapping from symbolic names to numeric values, consulted by the
/// normalizer when it substitutes letter runs.
///
/// Seeded with `e`, `pi`, `π` and `∞`; callers may register further names.
/// Lookup is exact and case-sensitive, so `E` in `1.5E2` never collides
/// with the constant `e`.
#[derive(Debug, Clone)]
pub struct Constants {
    map: HashMap<String, f64>,
}

impl Default for Constants {
    fn default() -> Self {
        let mut map = HashMap::new();
        map.insert("e".to_string(), E);
        map.insert("pi".to_string(), PI);
        map.insert("π".to_string(), PI);
        map.insert("∞".to_string(), f64::INFINITY);
        Self { map }
    }
}

impl Constants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or overwrite a constant.
    pub fn define(&mut self, name: impl Into<String>, value: f64) {
        self.map.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.map.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.map.iter().map(|(name, value)| (name.as_str(), *value))
    }
}
