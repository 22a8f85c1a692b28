//! Бинарная обёртка сообщений i3/sway IPC.
//!
//! Заголовок: `"i3-ipc"` (6 байт) + длина полезной нагрузки (u32 LE) + тип (u32 LE),
//! дальше JSON. У событий в типе выставлен старший бит.

use crate::error::{AutolabelError, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const IPC_MAGIC: &[u8; 6] = b"i3-ipc";
pub const IPC_HEADER_SIZE: usize = 14;

pub const IPC_RUN_COMMAND: u32 = 0;
pub const IPC_SUBSCRIBE: u32 = 2;
pub const IPC_GET_TREE: u32 = 4;

pub const IPC_EVENT_BIT: u32 = 1 << 31;
pub const IPC_EVENT_WORKSPACE: u32 = IPC_EVENT_BIT;
pub const IPC_EVENT_WINDOW: u32 = IPC_EVENT_BIT | 3;

/// Защита от мусорного поля длины
pub const MAX_IPC_PAYLOAD: usize = 64 * 1024 * 1024;

pub async fn write_message<W>(stream: &mut W, msg_type: u32, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(payload.len())
        .map_err(|_| crate::autolabel_error!(protocol, "Сообщение слишком велико: {} байт", payload.len()))?;

    let mut header = [0u8; IPC_HEADER_SIZE];
    header[..6].copy_from_slice(IPC_MAGIC);
    header[6..10].copy_from_slice(&len.to_le_bytes());
    header[10..14].copy_from_slice(&msg_type.to_le_bytes());

    stream.write_all(&header).await?;
    if !payload.is_empty() {
        stream.write_all(payload).await?;
    }
    stream.flush().await?;
    Ok(())
}

/// Читает одно сообщение, возвращает (тип, полезная нагрузка)
pub async fn read_message<R>(stream: &mut R) -> Result<(u32, Vec<u8>)>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; IPC_HEADER_SIZE];
    stream.read_exact(&mut header).await?;

    if &header[..6] != IPC_MAGIC {
        return AutolabelError::protocol("неверная сигнатура i3-ipc");
    }

    let len = u32::from_le_bytes([header[6], header[7], header[8], header[9]]) as usize;
    let msg_type = u32::from_le_bytes([header[10], header[11], header[12], header[13]]);

    if len > MAX_IPC_PAYLOAD {
        return AutolabelError::protocol(format!("Слишком большая полезная нагрузка: {} байт", len));
    }

    let mut payload = vec![0u8; len];
    if len > 0 {
        stream.read_exact(&mut payload).await?;
    }

    Ok((msg_type, payload))
}
