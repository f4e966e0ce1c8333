pub mod state;
pub mod watch;

pub use state::{QueueState, StateLevel};
pub use watch::WatchEntry;
