use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub ipc: IpcConfig,
    pub debounce: DebounceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IpcConfig {
    /// Явный путь к сокету; если не задан, берётся из $SWAYSOCK / $I3SOCK
    #[serde(default)]
    pub socket_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DebounceConfig {
    pub quiet_period_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
            ipc: IpcConfig::default(),
            debounce: DebounceConfig {
                quiet_period_ms: 100,
            },
        }
    }
}

impl Config {
    /// Загрузка: значения по умолчанию <- TOML файл (может отсутствовать) <- переменные AUTOLABEL_*
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("AUTOLABEL_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.debounce.quiet_period_ms == 0 {
            anyhow::bail!("quiet_period_ms должно быть больше 0");
        }

        if let Some(path) = &self.ipc.socket_path {
            if path.trim().is_empty() {
                anyhow::bail!("ipc.socket_path задан, но пуст");
            }
        }

        Ok(())
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce.quiet_period_ms)
    }
}
