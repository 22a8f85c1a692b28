use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutolabelError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка разбора JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Нарушение протокола IPC: {0}")]
    Protocol(String),

    #[error("Команда отклонена оконным менеджером: {0}")]
    CommandRejected(String),

    #[error("Ошибка подписки на события: {0}")]
    Subscription(String),

    #[error("Сокет IPC не найден: {0}")]
    SocketNotFound(String),
}

impl AutolabelError {
    pub fn protocol<T>(msg: impl Into<String>) -> Result<T> {
        Err(AutolabelError::Protocol(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, AutolabelError>;

#[macro_export]
macro_rules! autolabel_error {
    (protocol, $($arg:tt)*) => {
        $crate::error::AutolabelError::Protocol(format!($($arg)*))
    };
    (rejected, $($arg:tt)*) => {
        $crate::error::AutolabelError::CommandRejected(format!($($arg)*))
    };
    (subscription, $($arg:tt)*) => {
        $crate::error::AutolabelError::Subscription(format!($($arg)*))
    };
    (socket_not_found, $($arg:tt)*) => {
        $crate::error::AutolabelError::SocketNotFound(format!($($arg)*))
    };
}
