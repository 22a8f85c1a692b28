use crate::error::{AutolabelError, Result};
use crate::events::{EventKind, Node, WmEvent};
use crate::utils::SocketFinder;
use crate::{debug_if_enabled, trace_if_enabled};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixStream;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::codec::{
    read_message, write_message, IPC_EVENT_WINDOW, IPC_EVENT_WORKSPACE, IPC_GET_TREE,
    IPC_RUN_COMMAND, IPC_SUBSCRIBE,
};
use super::r#trait::WindowManager;

/// Результат одной команды в ответе RUN_COMMAND
#[derive(Debug, Deserialize)]
struct CommandOutcome {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscribeReply {
    success: bool,
}

#[derive(Debug, Default, Deserialize)]
struct EventPayload {
    #[serde(default)]
    change: String,
}

/// Сессия sway/i3 IPC.
///
/// Запросы (GET_TREE, RUN_COMMAND) идут по одному постоянному соединению под
/// мьютексом; подписка на события открывает отдельное соединение.
#[derive(Clone)]
pub struct SwayIpc {
    socket_path: Arc<PathBuf>,
    // None после ошибки ввода-вывода: следующий запрос переподключится
    request: Arc<Mutex<Option<UnixStream>>>,
}

impl SwayIpc {
    pub async fn connect(socket_path: Option<&str>) -> Result<Self> {
        let socket_path = SocketFinder::find_socket(socket_path)?;
        let stream = UnixStream::connect(&socket_path).await?;
        info!("Подключено к IPC сокету {:?}", socket_path);

        Ok(Self {
            socket_path: Arc::new(socket_path),
            request: Arc::new(Mutex::new(Some(stream))),
        })
    }

    #[cfg(test)]
    pub fn from_stream(socket_path: impl Into<PathBuf>, stream: UnixStream) -> Self {
        Self {
            socket_path: Arc::new(socket_path.into()),
            request: Arc::new(Mutex::new(Some(stream))),
        }
    }

    async fn request(&self, msg_type: u32, payload: &[u8]) -> Result<Vec<u8>> {
        let mut guard = self.request.lock().await;

        if guard.is_none() {
            warn!("Переподключение к IPC сокету {:?}", self.socket_path);
            *guard = Some(UnixStream::connect(self.socket_path.as_path()).await?);
        }
        let Some(stream) = guard.as_mut() else {
            return AutolabelError::protocol("соединение IPC недоступно");
        };

        match exchange(stream, msg_type, payload).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                // Поток мог рассинхронизироваться посреди сообщения
                *guard = None;
                Err(e)
            }
        }
    }

    /// Подписаться на события и получить их поток
    pub async fn subscribe(&self, kinds: &[EventKind]) -> Result<EventStream> {
        let mut stream = UnixStream::connect(self.socket_path.as_path())
            .await
            .map_err(|e| crate::autolabel_error!(subscription, "не удалось подключиться: {}", e))?;
        subscribe_on(&mut stream, kinds).await?;
        Ok(EventStream::new(stream))
    }
}

async fn exchange<S>(stream: &mut S, msg_type: u32, payload: &[u8]) -> Result<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    write_message(stream, msg_type, payload).await?;
    let (reply_type, reply) = read_message(stream).await?;
    if reply_type != msg_type {
        return AutolabelError::protocol(format!(
            "ожидался ответ типа {}, получен {:#x}",
            msg_type, reply_type
        ));
    }
    Ok(reply)
}

async fn subscribe_on<S>(stream: &mut S, kinds: &[EventKind]) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let payload = serde_json::to_vec(kinds)?;
    let reply = exchange(stream, IPC_SUBSCRIBE, &payload).await?;
    let reply: SubscribeReply = serde_json::from_slice(&reply)?;
    if !reply.success {
        return Err(crate::autolabel_error!(
            subscription,
            "оконный менеджер отклонил подписку на {:?}",
            kinds
        ));
    }
    info!("Подписка на события {:?} оформлена", kinds);
    Ok(())
}

fn check_outcomes(command: &str, reply: &[u8]) -> Result<()> {
    let outcomes: Vec<CommandOutcome> = serde_json::from_slice(reply)?;
    if let Some(failed) = outcomes.iter().find(|outcome| !outcome.success) {
        return Err(crate::autolabel_error!(
            rejected,
            "{}: {}",
            command,
            failed.error.as_deref().unwrap_or("без описания")
        ));
    }
    Ok(())
}

#[async_trait::async_trait]
impl WindowManager for SwayIpc {
    async fn fetch_tree(&self) -> Result<Node> {
        let reply = self.request(IPC_GET_TREE, b"").await?;
        Ok(serde_json::from_slice(&reply)?)
    }

    async fn run_command(&self, command: &str) -> Result<()> {
        debug_if_enabled!("IPC команда: {}", command);
        let reply = self.request(IPC_RUN_COMMAND, command.as_bytes()).await?;
        check_outcomes(command, &reply)
    }
}

/// Поток событий подписки
pub struct EventStream<S = UnixStream> {
    stream: S,
}

impl<S> EventStream<S>
where
    S: AsyncRead + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Следующее событие о рабочих столах или окнах.
    ///
    /// Ошибка чтения означает потерю подписки.
    pub async fn next_event(&mut self) -> Result<WmEvent> {
        loop {
            let (msg_type, payload) = read_message(&mut self.stream)
                .await
                .map_err(|e| crate::autolabel_error!(subscription, "поток событий прерван: {}", e))?;

            let kind = match msg_type {
                IPC_EVENT_WORKSPACE => EventKind::Workspace,
                IPC_EVENT_WINDOW => EventKind::Window,
                other => {
                    trace_if_enabled!("Пропущено событие типа {:#x}", other);
                    continue;
                }
            };

            let payload: EventPayload = serde_json::from_slice(&payload).unwrap_or_else(|e| {
                trace_if_enabled!("Не удалось разобрать событие {:?}: {}", kind, e);
                EventPayload::default()
            });

            return Ok(WmEvent::new(kind, payload.change));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::window_manager::codec::IPC_EVENT_BIT;

    const IPC_EVENT_BINDING: u32 = IPC_EVENT_BIT | 5;

    async fn reply(server: &mut UnixStream, expected_type: u32, body: &str) -> Vec<u8> {
        let (msg_type, payload) = read_message(server).await.unwrap();
        assert_eq!(msg_type, expected_type);
        write_message(server, msg_type, body.as_bytes()).await.unwrap();
        payload
    }

    #[tokio::test]
    async fn test_fetch_tree() {
        let (client, mut server) = UnixStream::pair().unwrap();
        let ipc = SwayIpc::from_stream("/unused", client);

        let fake = tokio::spawn(async move {
            reply(
                &mut server,
                IPC_GET_TREE,
                r#"{"type":"root","nodes":[{"type":"output","nodes":[{"type":"workspace","name":"1"}]}]}"#,
            )
            .await
        });

        let tree = ipc.fetch_tree().await.unwrap();
        assert_eq!(tree.workspaces().count(), 1);
        assert!(fake.await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_command_success_and_rejection() {
        let (client, mut server) = UnixStream::pair().unwrap();
        let ipc = SwayIpc::from_stream("/unused", client);

        let fake = tokio::spawn(async move {
            let first = reply(&mut server, IPC_RUN_COMMAND, r#"[{"success":true}]"#).await;
            let second = reply(
                &mut server,
                IPC_RUN_COMMAND,
                r#"[{"success":false,"parse_error":true,"error":"Unknown/invalid command"}]"#,
            )
            .await;
            (first, second)
        });

        ipc.run_command("rename workspace number 1 to \"1 kitty\"").await.unwrap();
        let err = ipc.run_command("bogus").await.unwrap_err();
        assert!(matches!(err, AutolabelError::CommandRejected(ref msg) if msg.contains("Unknown/invalid")));

        let (first, second) = fake.await.unwrap();
        assert_eq!(first, b"rename workspace number 1 to \"1 kitty\"");
        assert_eq!(second, b"bogus");
    }

    #[tokio::test]
    async fn test_request_drops_broken_connection() {
        let (client, server) = UnixStream::pair().unwrap();
        let ipc = SwayIpc::from_stream("/nonexistent/sway.sock", client);
        drop(server);

        assert!(ipc.fetch_tree().await.is_err());
        assert!(ipc.request.lock().await.is_none());
        // переподключение к несуществующему сокету тоже ошибка, но не паника
        assert!(matches!(ipc.fetch_tree().await, Err(AutolabelError::Io(_))));
    }

    #[tokio::test]
    async fn test_subscribe_handshake() {
        let (mut client, mut server) = UnixStream::pair().unwrap();

        let fake = tokio::spawn(async move {
            reply(&mut server, IPC_SUBSCRIBE, r#"{"success":true}"#).await
        });

        subscribe_on(&mut client, &[EventKind::Workspace, EventKind::Window])
            .await
            .unwrap();
        assert_eq!(fake.await.unwrap(), br#"["workspace","window"]"#);
    }

    #[tokio::test]
    async fn test_subscribe_rejected() {
        let (mut client, mut server) = UnixStream::pair().unwrap();
        tokio::spawn(async move { reply(&mut server, IPC_SUBSCRIBE, r#"{"success":false}"#).await });

        let err = subscribe_on(&mut client, &[EventKind::Window]).await.unwrap_err();
        assert!(matches!(err, AutolabelError::Subscription(_)));
    }

    #[tokio::test]
    async fn test_event_stream() {
        let (client, mut server) = tokio::io::duplex(4096);
        let mut events = EventStream::new(client);

        write_message(&mut server, IPC_EVENT_WINDOW, br#"{"change":"new","container":{}}"#)
            .await
            .unwrap();
        // binding event (5) игнорируется
        write_message(&mut server, IPC_EVENT_BINDING, br#"{"change":"run"}"#)
            .await
            .unwrap();
        write_message(&mut server, IPC_EVENT_WORKSPACE, br#"{"change":"focus"}"#)
            .await
            .unwrap();
        write_message(&mut server, IPC_EVENT_WINDOW, b"not json").await.unwrap();
        drop(server);

        let first = events.next_event().await.unwrap();
        assert_eq!((first.kind, first.change.as_str()), (EventKind::Window, "new"));

        let second = events.next_event().await.unwrap();
        assert_eq!((second.kind, second.change.as_str()), (EventKind::Workspace, "focus"));

        let third = events.next_event().await.unwrap();
        assert_eq!((third.kind, third.change.as_str()), (EventKind::Window, ""));

        let err = events.next_event().await.unwrap_err();
        assert!(matches!(err, AutolabelError::Subscription(_)));
    }
}
