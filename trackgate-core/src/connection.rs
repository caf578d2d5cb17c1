//! Per-connection dispatch: identify the protocol, authenticate, attach
//! to the registry and hand the stream to the protocol session.

use crate::detect::{detect_protocol, DetectedProtocol, HANDSHAKE_DEADLINE};
use crate::registry::TrackerRegistry;
use bytes::BytesMut;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Framed, FramedParts};
use trackgate_proto_gt06::{Gt06Frame, Gt06FrameCodec, Gt06Session};
use trackgate_proto_jt808::{Jt808Frame, Jt808FrameCodec, Jt808Session};
use trackgate_sdk::{SessionContext, SessionEnd, SessionError, SessionHandle};
use tracing::{debug, info, warn};

/// Serve one accepted device connection to completion.
///
/// All failures end here: handshake garbage, disabled trackers and
/// session errors only ever cost this one connection.
pub async fn serve_connection<T>(stream: T, registry: Arc<TrackerRegistry>, ctx: SessionContext)
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    match drive(stream, &registry, ctx).await {
        Ok(Some((device_id, end))) => {
            info!(device = %device_id, reason = ?end, "session closed")
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "connection terminated"),
    }
}

async fn drive<T>(
    mut stream: T,
    registry: &Arc<TrackerRegistry>,
    ctx: SessionContext,
) -> Result<Option<(String, SessionEnd)>, SessionError>
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (protocol, consumed) = detect_protocol(&mut stream, HANDSHAKE_DEADLINE)
        .await
        .map_err(|e| SessionError::Handshake(e.to_string()))?;

    // The detection bytes are replayed into the codec buffer so every
    // frame, the first included, is parsed through one framing path.
    match protocol {
        DetectedProtocol::Gt06 { extended } => {
            debug!(extended, "GT06 stream detected");
            let mut framed = replay::<_, _, Gt06Frame>(stream, Gt06FrameCodec::new(), &consumed);
            let device_id =
                trackgate_proto_gt06::authenticate(&mut framed, HANDSHAKE_DEADLINE).await?;
            let Some((handle, channels)) = attach(registry, &ctx, &device_id).await? else {
                return Ok(None);
            };
            let result = Gt06Session::new(framed, device_id.clone(), ctx, channels)
                .run()
                .await;
            registry.detach(&handle);
            result.map(|end| Some((device_id, end)))
        }
        DetectedProtocol::Jt808 => {
            debug!("JT808 stream detected");
            let mut framed = replay::<_, _, Jt808Frame>(stream, Jt808FrameCodec::new(), &consumed);
            let device_id = trackgate_proto_jt808::authenticate(
                &mut framed,
                ctx.store.as_ref(),
                HANDSHAKE_DEADLINE,
            )
            .await?;
            let Some((handle, channels)) = attach(registry, &ctx, &device_id).await? else {
                return Ok(None);
            };
            let result = Jt808Session::new(framed, device_id.clone(), ctx, channels)
                .run()
                .await;
            registry.detach(&handle);
            result.map(|end| Some((device_id, end)))
        }
    }
}

/// Build a `Framed` whose read buffer starts with the already-consumed
/// detection bytes.
fn replay<T, C, I>(stream: T, codec: C, consumed: &[u8]) -> Framed<T, C>
where
    T: AsyncRead + AsyncWrite + Unpin,
    C: tokio_util::codec::Encoder<I>,
{
    let mut parts = FramedParts::new::<I>(stream, codec);
    parts.read_buf = BytesMut::from(consumed);
    Framed::from_parts(parts)
}

/// Gate on the tracker's registration state, then register the session.
/// Returns `None` when the tracker is unknown or disabled (the
/// connection is closed without a word, like any other auth failure).
async fn attach(
    registry: &Arc<TrackerRegistry>,
    ctx: &SessionContext,
    device_id: &str,
) -> Result<Option<(SessionHandle, trackgate_sdk::SessionChannels)>, SessionError> {
    if !ctx.store.is_tracker_enabled(device_id).await? {
        info!(device = %device_id, "tracker not registered or disabled, dropping connection");
        return Ok(None);
    }

    let (handle, channels) = SessionHandle::new(device_id);
    registry.attach(handle.clone());

    let now = chrono::Utc::now().timestamp();
    if let Err(e) = ctx.store.update_last_connected(device_id, now).await {
        warn!(device = %device_id, error = %e, "failed to record attach time");
    }
    info!(device = %device_id, "device connected");
    Ok(Some((handle, channels)))
}
