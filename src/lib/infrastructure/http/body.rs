//! Request body accumulation

use std::pin::pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tracing::info;

/// Concatenates a streamed request body in arrival order.
///
/// Stops at the first stream error, discarding everything received so far. No size limit is
/// applied.
pub async fn accumulate<S, E>(chunks: S) -> Result<Vec<u8>, E>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    let mut chunks = pin!(chunks);
    let mut body = Vec::new();

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;

        info!(bytes = chunk.len(), "received body chunk");

        body.extend_from_slice(&chunk);
    }

    info!(bytes = body.len(), "request body complete");

    Ok(body)
}
