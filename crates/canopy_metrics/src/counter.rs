//! Named counters for tracking engine events

use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
pub struct Counter {
    counters: BTreeMap<&'static str, usize>,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            counters: BTreeMap::new(),
        }
    }

    pub fn increment(&mut self, name: &'static str, value: usize) {
        *self.counters.entry(name).or_insert(0) += value;
    }

    pub fn get(&self, name: &str) -> usize {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn reset_all(&mut self) {
        self.counters.clear();
    }

    /// Counters sorted by name.
    pub fn snapshot(&self) -> Vec<(&'static str, usize)> {
        self.counters.iter().map(|(&name, &value)| (name, value)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_accumulate() {
        let mut counter = Counter::new();
        counter.increment("mesh_dirty", 1);
        counter.increment("mesh_dirty", 2);
        counter.increment("rechecks", 1);
        assert_eq!(counter.get("mesh_dirty"), 3);
        assert_eq!(counter.snapshot(), vec![("mesh_dirty", 3), ("rechecks", 1)]);
    }
}
