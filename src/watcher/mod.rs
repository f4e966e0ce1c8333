mod container;
mod queue_watcher;
mod result;
#[cfg(test)]
pub(crate) mod testing;

pub use container::QueueStateContainer;
pub use queue_watcher::{QueueWatcher, SiteDirectory};
pub use result::LookupResult;
