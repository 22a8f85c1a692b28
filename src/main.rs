use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod naming;
mod services;
mod utils;

use config::Config;
use events::EventKind;
use services::{
    create_window_manager, forward_events, DebouncedLoop, WorkspaceUpdater, EVENT_QUEUE_CAPACITY,
};

#[derive(Parser, Debug)]
#[command(name = "sway-autolabel")]
#[command(about = "Подписывает рабочие столы sway/i3 именами запущенных в них приложений")]
struct Args {
    /// Путь к файлу конфигурации (может отсутствовать)
    #[arg(short, long, default_value = "sway-autolabel.toml")]
    config: String,

    /// Режим сухого запуска: команды переименования только логируются
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает конфигурацию)
    #[arg(long)]
    log_level: Option<String>,

    /// Выполнить один проход и выйти
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск sway-autolabel v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - рабочие столы не переименовываются");
    }

    let (window_manager, ipc) = create_window_manager(&config, args.dry_run)
        .await
        .context("Не удалось подключиться к оконному менеджеру")?;
    let updater = WorkspaceUpdater::new(window_manager);

    if args.once {
        let summary = updater.update_workspace_labels().await?;
        info!(
            "Готово: переименовано {}, без изменений {}, пропущено {}",
            summary.renamed, summary.unchanged, summary.skipped
        );
        return Ok(());
    }

    // Без потока событий работать нечем - ошибка подписки фатальна
    let events = ipc
        .subscribe(&[EventKind::Workspace, EventKind::Window])
        .await
        .context("Не удалось подписаться на события")?;

    let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let mut forward_handle = tokio::spawn(forward_events(events, tx));
    let loop_handle = tokio::spawn(DebouncedLoop::new(updater, config.quiet_period()).run(rx));

    info!("Все сервисы запущены");

    let outcome = tokio::select! {
        forwarded = &mut forward_handle => match forwarded {
            Ok(Ok(())) => {
                warn!("Цикл обновления завершился раньше подписки");
                Ok(())
            }
            Ok(Err(e)) => {
                error!("Подписка на события потеряна: {}", e);
                Err(e).context("Подписка на события потеряна")
            }
            Err(e) => Err(e).context("Задача подписки аварийно завершилась"),
        },
        received = signal::ctrl_c() => {
            match received {
                Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
            Ok(())
        }
    };

    info!("Завершение работы...");
    forward_handle.abort();
    loop_handle.abort();

    outcome
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let pretty = format == "pretty";

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty.then(|| tracing_subscriber::fmt::layer().pretty()))
        .with((!pretty).then(|| tracing_subscriber::fmt::layer().compact()))
        .init();

    Ok(())
}
