use crate::error::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Переменные окружения с путём к IPC сокету, в порядке приоритета
const SOCKET_ENV_VARS: [&str; 2] = ["SWAYSOCK", "I3SOCK"];

pub struct SocketFinder;

impl SocketFinder {
    /// Найти IPC сокет оконного менеджера
    pub fn find_socket(socket_path: Option<&str>) -> Result<PathBuf> {
        Self::find_with(socket_path, |var| std::env::var(var).ok())
    }

    fn find_with(
        socket_path: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<PathBuf> {
        if let Some(path) = socket_path {
            let path = PathBuf::from(path);
            return if path.exists() {
                info!("Используется указанный сокет: {:?}", path);
                Ok(path)
            } else {
                Err(crate::autolabel_error!(
                    socket_not_found,
                    "Указанный сокет не найден: {:?}",
                    path
                ))
            };
        }

        for var in SOCKET_ENV_VARS {
            match lookup(var).filter(|value| !value.is_empty()) {
                Some(value) => {
                    info!("Сокет IPC взят из ${}: {}", var, value);
                    return Ok(PathBuf::from(value));
                }
                None => debug!("${} не задана", var),
            }
        }

        Err(crate::autolabel_error!(
            socket_not_found,
            "не заданы ни ipc.socket_path, ни {}. Запущен ли sway/i3?",
            SOCKET_ENV_VARS.join(", ")
        ))
    }
}
