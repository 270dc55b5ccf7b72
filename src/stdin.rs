//! Bounded request reader.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{HookError, Result};

const CHUNK_SIZE: usize = 8 * 1024;

/// Reads the whole stream, failing as soon as more than `max_bytes` have
/// arrived. The text is decoded as UTF-8 (invalid sequences replaced) and
/// trimmed; nothing left after trimming is an error.
pub async fn read_request<R>(reader: &mut R, max_bytes: usize) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let mut chunk = vec![0u8; CHUNK_SIZE];

    loop {
        let read = reader.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        if buffer.len() + read > max_bytes {
            return Err(HookError::InputTooLarge { limit: max_bytes });
        }
        buffer.extend_from_slice(&chunk[..read]);
    }

    let text = String::from_utf8_lossy(&buffer);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(HookError::EmptyInput);
    }
    Ok(trimmed.to_string())
}
