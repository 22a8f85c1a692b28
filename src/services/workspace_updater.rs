use crate::error::Result;
use crate::naming::desired_label;
use crate::services::window_manager::WindowManager;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Итог одного прохода
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub renamed: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

/// Один проход сверки: дерево -> подписи -> переименования
pub struct WorkspaceUpdater {
    window_manager: Arc<dyn WindowManager>,
}

impl WorkspaceUpdater {
    pub fn new(window_manager: Arc<dyn WindowManager>) -> Self {
        Self { window_manager }
    }

    /// Переименовать все нумерованные рабочие столы, подпись которых устарела.
    ///
    /// Первая же отклонённая команда прерывает проход; уже выполненные
    /// переименования остаются в силе.
    pub async fn update_workspace_labels(&self) -> Result<PassSummary> {
        let tree = self.window_manager.fetch_tree().await?;
        let mut summary = PassSummary::default();

        for workspace in tree.workspaces() {
            let current = workspace.display_name();

            let Some((number, label)) = desired_label(workspace) else {
                trace!("Рабочий стол \"{}\" без номера - пропускаем", current);
                summary.skipped += 1;
                continue;
            };

            if label == current {
                trace!("Рабочий стол {} уже подписан: \"{}\"", number, current);
                summary.unchanged += 1;
                continue;
            }

            self.window_manager
                .run_command(&rename_command(number, &label))
                .await?;
            info!("Рабочий стол {}: \"{}\" -> \"{}\"", number, current, label);
            summary.renamed += 1;
        }

        debug!(
            "Проход завершён: переименовано {}, без изменений {}, пропущено {}",
            summary.renamed, summary.unchanged, summary.skipped
        );
        Ok(summary)
    }
}

/// `rename workspace number N to "label"`
pub fn rename_command(number: u32, label: &str) -> String {
    format!("rename workspace number {} to {}", number, quote(label))
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
