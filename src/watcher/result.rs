use std::collections::BTreeMap;

use crate::domain::{QueueState, StateLevel};

/// Outcome of a lookup pass: every known queue mapped to its classified
/// state. The severity buckets are groupings derived from this one map on
/// read, so a queue can only ever sit in a single bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LookupResult {
    states: BTreeMap<String, QueueState>,
}

impl LookupResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the classified state of a queue, replacing any previous
    /// classification of the same queue.
    pub fn record(&mut self, state: QueueState) {
        self.states.insert(state.queue_name().to_string(), state);
    }

    pub fn get(&self, queue_name: &str) -> Option<&QueueState> {
        self.states.get(queue_name)
    }

    pub fn level_of(&self, queue_name: &str) -> Option<StateLevel> {
        self.states.get(queue_name).map(QueueState::state_level)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All states, ordered by queue name.
    pub fn iter(&self) -> impl Iterator<Item = &QueueState> {
        self.states.values()
    }

    /// States currently classified at the given level.
    pub fn states_at(&self, level: StateLevel) -> Vec<&QueueState> {
        self.states
            .values()
            .filter(|state| state.state_level() == level)
            .collect()
    }

    pub fn sane(&self) -> Vec<&QueueState> {
        self.states_at(StateLevel::Sane)
    }

    pub fn warning(&self) -> Vec<&QueueState> {
        self.states_at(StateLevel::Warning)
    }

    pub fn critical(&self) -> Vec<&QueueState> {
        self.states_at(StateLevel::Critical)
    }

    pub fn undefined(&self) -> Vec<&QueueState> {
        self.states_at(StateLevel::Undefined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(name: &str, num: u64, level: StateLevel) -> QueueState {
        let mut state = QueueState::new(name, num);
        state.set_state_level(level);
        state
    }

    #[test]
    fn a_queue_sits_in_exactly_one_bucket() {
        let mut result = LookupResult::new();
        result.record(classified("mail", 25, StateLevel::Critical));
        result.record(classified("orders", 2, StateLevel::Sane));

        let buckets = [
            result.sane().len(),
            result.warning().len(),
            result.critical().len(),
            result.undefined().len(),
        ];
        assert_eq!(buckets.iter().sum::<usize>(), result.len());
        assert_eq!(result.level_of("mail"), Some(StateLevel::Critical));
    }

    #[test]
    fn reclassification_replaces_the_previous_bucket() {
        let mut result = LookupResult::new();
        result.record(classified("mail", 25, StateLevel::Critical));
        result.record(classified("mail", 3, StateLevel::Sane));

        assert!(result.critical().is_empty());
        assert_eq!(result.sane().len(), 1);
        assert_eq!(result.get("mail").map(QueueState::num_items), Some(3));
    }
}
