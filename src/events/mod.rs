pub mod tree;
pub mod wm_event;

pub use tree::{Node, NodeType};
pub use wm_event::{EventKind, WmEvent};
