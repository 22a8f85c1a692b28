//! In-memory window manager for tests: keeps a tree, records commands and
//! applies workspace renames to the stored tree.

use crate::error::{AutolabelError, Result};
use crate::events::Node;
use crate::naming::workspace_number;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::r#trait::WindowManager;

#[derive(Default)]
struct FakeState {
    tree: Node,
    commands: Vec<String>,
    fetches: usize,
    fetch_delay: Duration,
    fetches_in_flight: usize,
    max_fetches_in_flight: usize,
    fail_fetch: bool,
    reject_command: Option<usize>,
}

#[derive(Clone, Default)]
pub struct FakeWindowManager {
    state: Arc<Mutex<FakeState>>,
}

impl FakeWindowManager {
    pub fn new(tree: Node) -> Self {
        let fake = Self::default();
        fake.state.lock().tree = tree;
        fake
    }

    pub fn commands(&self) -> Vec<String> {
        self.state.lock().commands.clone()
    }

    pub fn fetches(&self) -> usize {
        self.state.lock().fetches
    }

    /// Наибольшее число одновременно выполнявшихся `fetch_tree`
    pub fn max_concurrent_fetches(&self) -> usize {
        self.state.lock().max_fetches_in_flight
    }

    /// Каждый `fetch_tree` будет спать столько (по часам tokio)
    pub fn set_fetch_delay(&self, delay: Duration) {
        self.state.lock().fetch_delay = delay;
    }

    pub fn tree(&self) -> Node {
        self.state.lock().tree.clone()
    }

    pub fn set_tree(&self, tree: Node) {
        self.state.lock().tree = tree;
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.state.lock().fail_fetch = fail;
    }

    /// Reject the command with this zero-based index (counted over all commands)
    pub fn reject_command(&self, index: usize) {
        self.state.lock().reject_command = Some(index);
    }
}

fn parse_rename(command: &str) -> Option<(u32, String)> {
    let rest = command.strip_prefix("rename workspace number ")?;
    let (number, label) = rest.split_once(" to ")?;
    let label = label.strip_prefix('"')?.strip_suffix('"')?;
    Some((
        number.parse().ok()?,
        label.replace("\\\"", "\"").replace("\\\\", "\\"),
    ))
}

#[async_trait::async_trait]
impl WindowManager for FakeWindowManager {
    async fn fetch_tree(&self) -> Result<Node> {
        let delay = {
            let mut state = self.state.lock();
            state.fetches += 1;
            state.fetches_in_flight += 1;
            state.max_fetches_in_flight = state.max_fetches_in_flight.max(state.fetches_in_flight);
            state.fetch_delay
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        state.fetches_in_flight -= 1;
        if state.fail_fetch {
            return Err(AutolabelError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "fake fetch failure",
            )));
        }
        Ok(state.tree.clone())
    }

    async fn run_command(&self, command: &str) -> Result<()> {
        let mut state = self.state.lock();
        let index = state.commands.len();
        state.commands.push(command.to_string());

        if state.reject_command == Some(index) {
            return Err(AutolabelError::CommandRejected(command.to_string()));
        }

        let (number, label) = parse_rename(command)
            .ok_or_else(|| AutolabelError::CommandRejected(format!("unknown command: {}", command)))?;
        for workspace in state.tree.workspaces_mut() {
            if workspace_number(workspace.display_name()) == Some(number) {
                workspace.name = Some(label.clone());
            }
        }
        Ok(())
    }
}
