use crate::config::Config;
use crate::error::Result;
use crate::events::Node;
use std::sync::Arc;

use super::dry_run::DryRunWindowManager;
use super::sway_ipc::SwayIpc;

/// Trait for the window-manager session the label updater talks to
#[async_trait::async_trait]
pub trait WindowManager: Send + Sync {
    /// Fetch a fresh snapshot of the layout tree
    async fn fetch_tree(&self) -> Result<Node>;

    /// Execute one textual command (e.g. a workspace rename)
    async fn run_command(&self, command: &str) -> Result<()>;
}

/// Factory function to create an appropriate window manager session based on the dry_run flag
pub async fn create_window_manager(
    config: &Config,
    dry_run: bool,
) -> Result<(Arc<dyn WindowManager>, SwayIpc)> {
    let ipc = SwayIpc::connect(config.ipc.socket_path.as_deref()).await?;
    let session: Arc<dyn WindowManager> = if dry_run {
        Arc::new(DryRunWindowManager::new(ipc.clone()))
    } else {
        Arc::new(ipc.clone())
    };
    Ok((session, ipc))
}
