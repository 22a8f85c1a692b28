//! Событийный цикл с подавлением дребезга.
//!
//! Два состояния: `Idle` (таймер не взведён) и `Armed` (идёт отсчёт тихого
//! периода). Любое событие перевзводит таймер на полный период; срабатывание
//! таймера переводит цикл в `Idle` и запускает ровно один проход обновления.
//! Проход выполняется внутри цикла, поэтому два прохода никогда не идут
//! одновременно, а события, пришедшие во время прохода, ждут в канале и
//! взводят таймер сразу после его окончания.

use crate::error::Result;
use crate::events::WmEvent;
use crate::services::window_manager::EventStream;
use crate::services::WorkspaceUpdater;
use crate::{debug_if_enabled, trace_if_enabled};
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration, Instant};
use tracing::{info, warn};

/// Ёмкость канала событий. При переполнении событие можно выбросить: в канале
/// уже есть необработанные события, и они всё равно перевзведут таймер.
pub const EVENT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Armed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub events: u64,
    /// События, пришедшие при уже взведённом таймере после первого прохода.
    /// События до начального прохода не считаются: его запускает сам цикл.
    pub coalesced: u64,
    pub passes: u64,
    pub failed_passes: u64,
}

pub struct DebouncedLoop {
    updater: WorkspaceUpdater,
    quiet_period: Duration,
    state: DebounceState,
    stats: LoopStats,
}

impl DebouncedLoop {
    pub fn new(updater: WorkspaceUpdater, quiet_period: Duration) -> Self {
        Self {
            updater,
            quiet_period,
            // Первый проход должен случиться даже без единого события
            state: DebounceState::Armed,
            stats: LoopStats::default(),
        }
    }

    /// Крутится, пока отправляющая сторона канала жива
    pub async fn run(mut self, mut events: mpsc::Receiver<WmEvent>) -> LoopStats {
        info!(
            "Цикл обновления подписей запущен, тихий период {}мс",
            self.quiet_period.as_millis()
        );

        let timer = sleep(Duration::ZERO);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                biased;

                event = events.recv() => match event {
                    Some(event) => {
                        self.on_event(&event);
                        timer.as_mut().reset(Instant::now() + self.quiet_period);
                    }
                    None => {
                        info!("Канал событий закрыт, цикл обновления остановлен");
                        return self.stats;
                    }
                },

                () = &mut timer, if self.state == DebounceState::Armed => {
                    self.state = DebounceState::Idle;
                    self.run_pass().await;
                }
            }
        }
    }

    fn on_event(&mut self, event: &WmEvent) {
        trace_if_enabled!("Событие {}", event);
        self.stats.events += 1;
        if self.state == DebounceState::Armed && self.stats.passes > 0 {
            self.stats.coalesced += 1;
        }
        self.state = DebounceState::Armed;
    }

    async fn run_pass(&mut self) {
        self.stats.passes += 1;
        if let Err(e) = self.updater.update_workspace_labels().await {
            self.stats.failed_passes += 1;
            warn!("Не удалось обновить подписи рабочих столов: {}", e);
        }
        debug_if_enabled!(
            "Статистика цикла: проходов {}, неудачных {}, событий {}, поглощено {}",
            self.stats.passes,
            self.stats.failed_passes,
            self.stats.events,
            self.stats.coalesced
        );
    }
}

/// Перекачивает события подписки в канал цикла.
///
/// Возвращает ошибку при потере подписки и `Ok` когда цикл закрыл канал.
pub async fn forward_events<S>(mut stream: EventStream<S>, tx: mpsc::Sender<WmEvent>) -> Result<()>
where
    S: AsyncRead + Unpin,
{
    loop {
        let event = stream.next_event().await?;
        match tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                trace_if_enabled!("Очередь событий полна, {} отброшено", event);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => return Ok(()),
        }
    }
}
