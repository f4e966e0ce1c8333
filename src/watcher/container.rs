use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::db::queue_size::{QueueSizeRow, QueueSizeSource, SizeSourceError};
use crate::domain::QueueState;

/// Process-local cache of queue states, backed by the grouped size query.
///
/// A container is rebuilt for every watcher invocation and never outlives a
/// single lookup-and-report cycle. Entries are updated in place on refresh
/// and never dropped within a run.
pub struct QueueStateContainer {
    source: Arc<dyn QueueSizeSource>,
    states: BTreeMap<String, QueueState>,
}

impl QueueStateContainer {
    pub fn new(source: Arc<dyn QueueSizeSource>) -> Self {
        Self {
            source,
            states: BTreeMap::new(),
        }
    }

    /// Re-runs the size query and reconciles the cache with the result.
    ///
    /// Without a target queue the full grouped query runs: existing entries
    /// are updated in place, new names are inserted, and any cached queue
    /// missing from the result set is reset to zero items (the grouping
    /// query does not return drained queues). With a target queue the query
    /// is filtered to that name, and the reset-to-zero rule applies only
    /// when the filtered query itself came back empty.
    pub async fn refresh(&mut self, queue_name: Option<&str>) -> Result<(), SizeSourceError> {
        let rows = self.source.fetch_counts(queue_name).await?;
        match queue_name {
            None => {
                let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
                for row in rows {
                    seen.insert(row.queue_name.clone());
                    self.upsert(row);
                }
                for (name, state) in self.states.iter_mut() {
                    if !seen.contains(name) {
                        state.set_num_items(0);
                    }
                }
            }
            Some(name) => {
                if rows.is_empty() {
                    if let Some(state) = self.states.get_mut(name) {
                        state.set_num_items(0);
                    }
                } else {
                    for row in rows {
                        self.upsert(row);
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns the state for the given queue, querying it lazily on a miss.
    /// Always yields a state, possibly with a zero count.
    pub async fn state(&mut self, queue_name: &str) -> Result<&QueueState, SizeSourceError> {
        if !self.states.contains_key(queue_name) {
            self.refresh(Some(queue_name)).await?;
        }
        let state = self
            .states
            .entry(queue_name.to_string())
            .or_insert_with(|| QueueState::new(queue_name, 0));
        Ok(state)
    }

    /// Runs a full refresh and returns every tracked state. The set of live
    /// queue names is not knowable without querying, so there is no cache
    /// short-circuit here.
    pub async fn all_states(&mut self) -> Result<&BTreeMap<String, QueueState>, SizeSourceError> {
        self.refresh(None).await?;
        Ok(&self.states)
    }

    /// Inserts a zero-count entry unless the name is already tracked.
    pub fn add_empty_state(&mut self, queue_name: &str) {
        self.states
            .entry(queue_name.to_string())
            .or_insert_with(|| QueueState::new(queue_name, 0));
    }

    fn upsert(&mut self, row: QueueSizeRow) {
        match self.states.get_mut(&row.queue_name) {
            Some(state) => state.set_num_items(row.num_items),
            None => {
                let state = QueueState::new(row.queue_name.clone(), row.num_items);
                self.states.insert(row.queue_name, state);
            }
        }
    }
}
