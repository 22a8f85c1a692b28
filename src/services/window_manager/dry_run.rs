use crate::error::Result;
use crate::events::Node;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, info};

use super::r#trait::WindowManager;

/// Читает настоящее дерево, но команды только логирует.
///
/// Так как переименования не применяются, каждый проход видит старые подписи и
/// строит те же команды; повторы логируются на уровне debug. Помним только
/// последнюю команду для каждого номера стола.
pub struct DryRunWindowManager<W> {
    inner: W,
    announced: Mutex<HashMap<u32, String>>,
}

impl<W: WindowManager> DryRunWindowManager<W> {
    pub fn new(inner: W) -> Self {
        info!("Dry-run режим - команды оконному менеджеру не отправляются");
        Self {
            inner,
            announced: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl<W: WindowManager> WindowManager for DryRunWindowManager<W> {
    async fn fetch_tree(&self) -> Result<Node> {
        self.inner.fetch_tree().await
    }

    async fn run_command(&self, command: &str) -> Result<()> {
        let repeated = match renamed_workspace(command) {
            Some(number) => {
                let previous = self.announced.lock().insert(number, command.to_string());
                previous.as_deref() == Some(command)
            }
            None => false,
        };

        if repeated {
            debug!("[DRY RUN] повтор: {}", command);
        } else {
            info!("[DRY RUN] {}", command);
        }
        Ok(())
    }
}

/// Номер стола из `rename workspace number N to ...`
fn renamed_workspace(command: &str) -> Option<u32> {
    let rest = command.strip_prefix("rename workspace number ")?;
    let (number, _) = rest.split_once(' ')?;
    number.parse().ok()
}
