use serde::{Deserialize, Serialize};
use std::fmt;

/// Вид события, на которое можно подписаться
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Workspace,
    Window,
}

impl EventKind {
    /// Имя события в запросе SUBSCRIBE
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Workspace => "workspace",
            EventKind::Window => "window",
        }
    }
}

/// Уведомление об изменении рабочих столов или окон
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmEvent {
    pub kind: EventKind,
    /// Поле `change` из полезной нагрузки ("new", "focus", "close", ...)
    pub change: String,
    pub timestamp: std::time::Instant,
}

impl WmEvent {
    pub fn new(kind: EventKind, change: impl Into<String>) -> Self {
        Self {
            kind,
            change: change.into(),
            timestamp: std::time::Instant::now(),
        }
    }
}

impl fmt::Display for WmEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{} ({}ms ago)",
            self.kind.as_str(),
            self.change,
            self.timestamp.elapsed().as_millis()
        )
    }
}
