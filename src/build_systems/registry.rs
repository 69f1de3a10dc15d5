//! Builder registry

use super::Builder;
use std::collections::HashMap;

/// Ordered list of builders; position is priority, lower index wins
#[derive(Debug, Clone)]
pub struct BuilderRegistry {
    builders: Vec<Builder>,
    signature_index: HashMap<&'static str, usize>,
}

impl BuilderRegistry {
    pub fn new() -> Self {
        Self {
            builders: Vec::new(),
            signature_index: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for builder in Builder::all() {
            registry.register(*builder);
        }
        registry
    }

    /// Appends `builder` at the lowest priority. Registering the same
    /// builder twice keeps the first position.
    pub fn register(&mut self, builder: Builder) {
        if self.builders.contains(&builder) {
            return;
        }
        let idx = self.builders.len();
        self.signature_index
            .entry(builder.signature_file())
            .or_insert(idx);
        self.builders.push(builder);
    }

    /// True when any name in `file_names` is a known signature file
    pub fn any_matches<I, S>(&self, file_names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        file_names
            .into_iter()
            .any(|name| self.is_signature(name.as_ref()))
    }

    /// Highest-priority builder matching any of `file_names`
    pub fn best_match<I, S>(&self, file_names: I) -> Option<Builder>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        file_names
            .into_iter()
            .filter_map(|name| self.signature_index.get(name.as_ref()).copied())
            .min()
            .map(|idx| self.builders[idx])
    }

    pub fn is_signature(&self, file_name: &str) -> bool {
        self.signature_index.contains_key(file_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = Builder> + '_ {
        self.builders.iter().copied()
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
