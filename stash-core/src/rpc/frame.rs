//! Frame codec for the RPC channel.
//!
//! Request:  `[method: 1B][payload_len: 4B BE][payload]`
//! Response: `[status: 1B][payload_len: 4B BE][payload]`
//!
//! Payloads are protobuf-encoded messages from [`crate::proto`]. Both
//! directions share one layout, so one read and one write function
//! cover them; the leading byte is a method on the way in and a status
//! on the way out.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::constants::MAX_FRAME_LEN;
use crate::error::{Result, StashError};

/// Write one frame and flush it.
pub async fn write_frame<W>(writer: &mut W, header: u8, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_FRAME_LEN {
        return Err(StashError::InvalidArgument(format!(
            "frame payload of {} bytes exceeds the {} byte limit",
            payload.len(),
            MAX_FRAME_LEN
        )));
    }

    writer
        .write_u8(header)
        .await
        .map_err(|e| StashError::Io(format!("write frame header failed: {e}")))?;
    writer
        .write_u32(payload.len() as u32)
        .await
        .map_err(|e| StashError::Io(format!("write frame length failed: {e}")))?;
    writer
        .write_all(payload)
        .await
        .map_err(|e| StashError::Io(format!("write frame payload failed: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| StashError::Io(format!("flush frame failed: {e}")))?;
    Ok(())
}

/// Read one frame. Returns `None` on a clean end of stream (the peer
/// closed before sending another header byte).
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<(u8, Vec<u8>)>>
where
    R: AsyncRead + Unpin,
{
    let header = match reader.read_u8().await {
        Ok(byte) => byte,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(StashError::Io(format!("read frame header failed: {e}"))),
    };

    let payload_len = reader
        .read_u32()
        .await
        .map_err(|e| StashError::Io(format!("read frame length failed: {e}")))?
        as usize;

    if payload_len > MAX_FRAME_LEN {
        return Err(StashError::InvalidArgument(format!(
            "frame payload of {payload_len} bytes exceeds the {MAX_FRAME_LEN} byte limit"
        )));
    }

    let mut payload = vec![0u8; payload_len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| StashError::Io(format!("read frame payload failed: {e}")))?;

    Ok(Some((header, payload)))
}
