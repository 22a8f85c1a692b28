//! WindowManager service: the only place that talks to sway/i3.
//!
//! The label updater sees the compositor exclusively through the
//! `WindowManager` trait (tree snapshot + text commands); the event
//! subscription lives on `SwayIpc` directly because only `main` drives it.

pub mod codec;
mod dry_run;
mod sway_ipc;
mod r#trait;

#[cfg(test)]
pub mod testing;

pub use self::r#trait::{create_window_manager, WindowManager};
pub use self::sway_ipc::EventStream;
