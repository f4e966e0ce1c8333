/// A configured watch-list entry. A missing limit means the corresponding
/// severity tier is unreachable for that queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    pub queue_name: String,
    pub size_limit_warning: Option<u64>,
    pub size_limit_critical: Option<u64>,
}

impl WatchEntry {
    pub fn new(
        queue_name: impl Into<String>,
        size_limit_warning: Option<u64>,
        size_limit_critical: Option<u64>,
    ) -> Self {
        Self {
            queue_name: queue_name.into(),
            size_limit_warning,
            size_limit_critical,
        }
    }
}
