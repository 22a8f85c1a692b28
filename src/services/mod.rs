pub mod debouncer;
pub mod window_manager;
pub mod workspace_updater;

pub use debouncer::{forward_events, DebouncedLoop, EVENT_QUEUE_CAPACITY};
pub use window_manager::create_window_manager;
pub use workspace_updater::WorkspaceUpdater;
