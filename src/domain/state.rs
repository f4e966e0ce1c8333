use std::fmt;

/// Severity assigned to a queue during a lookup pass.
///
/// Starts out as `Undefined` and is set exactly once per pass by the
/// classifier. The level is never persisted; it is recomputed on every
/// lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateLevel {
    Undefined,
    Sane,
    Warning,
    Critical,
}

impl StateLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateLevel::Undefined => "undefined",
            StateLevel::Sane => "sane",
            StateLevel::Warning => "warning",
            StateLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for StateLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The observed state of one queue: its name, current item count and the
/// level assigned by the most recent lookup pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueState {
    queue_name: String,
    num_items: u64,
    state_level: StateLevel,
}

impl QueueState {
    pub fn new(queue_name: impl Into<String>, num_items: u64) -> Self {
        Self {
            queue_name: queue_name.into(),
            num_items,
            state_level: StateLevel::Undefined,
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    pub fn num_items(&self) -> u64 {
        self.num_items
    }

    /// Usually called by the state container during a refresh.
    pub fn set_num_items(&mut self, num: u64) {
        self.num_items = num;
    }

    pub fn state_level(&self) -> StateLevel {
        self.state_level
    }

    pub fn set_state_level(&mut self, level: StateLevel) {
        self.state_level = level;
    }

    /// True if the current item count exceeds the given limit. Callers skip
    /// the comparison entirely for queues without a configured limit.
    pub fn exceeds(&self, limit: u64) -> bool {
        self.num_items > limit
    }
}
