//! Server-side JT/T 808 session: the registration/authentication
//! handshake and the long-lived event loop.

use crate::protocol::codec::Jt808FrameCodec;
use crate::protocol::frame::{body, builder, defs, Jt808Frame};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::{SinkExt, StreamExt};
use rand::RngCore;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::Instant;
use tokio_util::codec::Framed;
use trackgate_sdk::{
    LocationFix, ReplyQueue, SessionChannels, SessionContext, SessionEnd, SessionError,
    TrackerStore,
};
use tracing::{debug, info, warn};

/// Expected device heartbeat cadence plus the slack granted on top.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const HEARTBEAT_SLACK: Duration = Duration::from_secs(60);

/// How long a freshly registered terminal gets to follow up with its
/// authentication frame.
pub const AUTH_FOLLOWUP_WAIT: Duration = Duration::from_secs(10);

/// Drive the JT/T 808 handshake.
///
/// The first frame must be a registration (`0x0100`) or an
/// authentication (`0x0102`). Registration mints a fresh 12-byte auth
/// code, persists it base-64 encoded and hands it to the terminal, which
/// must then authenticate with it within [`AUTH_FOLLOWUP_WAIT`]. Returns
/// the terminal id; every failure is terminal after the appropriate
/// negative acknowledgement.
pub async fn authenticate<T>(
    framed: &mut Framed<T, Jt808FrameCodec>,
    store: &dyn TrackerStore,
    deadline: Duration,
) -> Result<String, SessionError>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let first = read_frame(framed, deadline, "handshake").await?;

    match first.msg_id {
        defs::MSG_REGISTRATION => register_then_authenticate(framed, store, first).await,
        defs::MSG_AUTHENTICATION => verify_stored_code(framed, store, first).await,
        other => Err(SessionError::UnexpectedMessage(other)),
    }
}

async fn register_then_authenticate<T>(
    framed: &mut Framed<T, Jt808FrameCodec>,
    store: &dyn TrackerStore,
    registration: Jt808Frame,
) -> Result<String, SessionError>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let device_id = registration.device_id.clone();

    let mut code = [0u8; defs::AUTH_CODE_LEN];
    rand::thread_rng().fill_bytes(&mut code);

    if let Err(e) = store.save_auth_code(&device_id, &BASE64.encode(code)).await {
        // Most likely the tracker is simply not provisioned; tell the
        // terminal so and give up on the connection.
        framed
            .send(builder::registration_ack(
                &device_id,
                registration.serial,
                defs::REGISTRATION_NOT_PROVISIONED,
                None,
            ))
            .await?;
        warn!(device = %device_id, error = %e, "could not persist auth code");
        return Err(SessionError::Auth(format!(
            "auth code not stored for {device_id}"
        )));
    }

    framed
        .send(builder::registration_ack(
            &device_id,
            registration.serial,
            defs::REGISTRATION_OK,
            Some(&code),
        ))
        .await?;
    info!(device = %device_id, "terminal registered, awaiting authentication");

    let auth = read_frame(framed, AUTH_FOLLOWUP_WAIT, "authentication follow-up").await?;
    if auth.msg_id != defs::MSG_AUTHENTICATION {
        return Err(SessionError::UnexpectedMessage(auth.msg_id));
    }
    check_auth_code(framed, &device_id, &code, &auth).await
}

async fn verify_stored_code<T>(
    framed: &mut Framed<T, Jt808FrameCodec>,
    store: &dyn TrackerStore,
    auth: Jt808Frame,
) -> Result<String, SessionError>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let device_id = auth.device_id.clone();

    let encoded = match store.fetch_auth_code(&device_id).await? {
        Some(encoded) => encoded,
        None => {
            framed
                .send(builder::universal_ack(
                    &device_id,
                    auth.serial,
                    defs::MSG_AUTHENTICATION,
                    defs::RESULT_INCORRECT_INFORMATION,
                ))
                .await?;
            return Err(SessionError::Auth(format!(
                "no auth code on record for {device_id}"
            )));
        }
    };
    let code = BASE64
        .decode(&encoded)
        .map_err(|e| SessionError::Auth(format!("stored auth code is not base64: {e}")))?;

    check_auth_code(framed, &device_id, &code, &auth).await
}

/// Compare the terminal's auth payload against the expected code and
/// acknowledge accordingly.
async fn check_auth_code<T>(
    framed: &mut Framed<T, Jt808FrameCodec>,
    device_id: &str,
    expected: &[u8],
    auth: &Jt808Frame,
) -> Result<String, SessionError>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    if auth.body.as_ref() != expected {
        framed
            .send(builder::universal_ack(
                device_id,
                auth.serial,
                defs::MSG_AUTHENTICATION,
                defs::RESULT_FAILURE,
            ))
            .await?;
        return Err(SessionError::Auth(format!(
            "wrong auth code from {device_id}"
        )));
    }

    framed
        .send(builder::universal_ack(
            device_id,
            auth.serial,
            defs::MSG_AUTHENTICATION,
            defs::RESULT_SUCCESS,
        ))
        .await?;
    info!(device = %device_id, "terminal authenticated");
    Ok(device_id.to_string())
}

async fn read_frame<T>(
    framed: &mut Framed<T, Jt808FrameCodec>,
    deadline: Duration,
    stage: &str,
) -> Result<Jt808Frame, SessionError>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    match tokio::time::timeout(deadline, framed.next()).await {
        Ok(Some(Ok(frame))) => Ok(frame),
        Ok(Some(Err(e))) => Err(SessionError::Handshake(format!("{stage}: {e}"))),
        Ok(None) => Err(SessionError::Handshake(format!(
            "{stage}: connection closed"
        ))),
        Err(_) => Err(SessionError::Handshake(format!("{stage}: deadline expired"))),
    }
}

pub struct Jt808Session<T> {
    framed: Framed<T, Jt808FrameCodec>,
    device_id: String,
    ctx: SessionContext,
    channels: SessionChannels,
    /// Serial for platform-originated frames, strictly increasing per
    /// session (mod 2^16).
    serial: u16,
    /// JT/T 808 command responses carry no correlation id; pending reply
    /// slots resolve in send order.
    replies: ReplyQueue,
}

impl<T> Jt808Session<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        framed: Framed<T, Jt808FrameCodec>,
        device_id: String,
        ctx: SessionContext,
        channels: SessionChannels,
    ) -> Self {
        Self {
            framed,
            device_id,
            ctx,
            channels,
            serial: 1,
            replies: ReplyQueue::new(),
        }
    }

    pub async fn run(mut self) -> Result<SessionEnd, SessionError> {
        let mut deadline = Instant::now() + HEARTBEAT_INTERVAL + HEARTBEAT_SLACK;
        let mut commands_open = true;
        let mut evict_open = true;

        loop {
            tokio::select! {
                signal = self.channels.evict.recv(), if evict_open => {
                    match signal {
                        Some(()) => {
                            info!(device = %self.device_id, "session evicted by a newer login");
                            return Ok(SessionEnd::Evicted);
                        }
                        None => evict_open = false,
                    }
                }
                _ = tokio::time::sleep_until(deadline) => {
                    return Err(SessionError::HeartbeatTimeout);
                }
                cmd = self.channels.commands.recv(), if commands_open => {
                    match cmd {
                        Some(cmd) => {
                            self.framed
                                .send(builder::command(&self.device_id, &cmd.payload, self.serial))
                                .await?;
                            self.replies.push(cmd.reply);
                            self.serial = self.serial.wrapping_add(1);
                            debug!(device = %self.device_id, payload = %cmd.payload, "sent platform command");
                        }
                        None => commands_open = false,
                    }
                }
                frame = self.framed.next() => {
                    match frame {
                        None => {
                            info!(device = %self.device_id, "device closed the connection");
                            return Ok(SessionEnd::Disconnected);
                        }
                        // Recoverable corruption is dropped inside the
                        // codec; whatever surfaces here ends the session.
                        Some(Err(e)) => return Err(SessionError::Transport(e)),
                        Some(Ok(frame)) => {
                            if frame.msg_id == defs::MSG_HEARTBEAT {
                                deadline = Instant::now() + HEARTBEAT_INTERVAL + HEARTBEAT_SLACK;
                            }
                            if let Some(end) = self.handle_frame(frame).await? {
                                return Ok(end);
                            }
                        }
                    }
                }
            }
        }
    }

    async fn handle_frame(&mut self, frame: Jt808Frame) -> Result<Option<SessionEnd>, SessionError> {
        match frame.msg_id {
            defs::MSG_TERMINAL_ACK => {}
            defs::MSG_HEARTBEAT => {
                debug!(device = %self.device_id, "heartbeat");
                self.ack(&frame).await?;
            }
            defs::MSG_LOGOUT => {
                info!(device = %self.device_id, "terminal logged out");
                if let Err(e) = self.ctx.store.remove_auth_code(&self.device_id).await {
                    warn!(device = %self.device_id, error = %e, "failed to remove auth code");
                }
                return Ok(Some(SessionEnd::Logout));
            }
            defs::MSG_LOCATION => {
                self.ack(&frame).await?;
                match body::parse_location(&frame.body) {
                    Ok(report) => self.emit(report).await,
                    Err(e) => warn!(device = %self.device_id, error = %e, "bad location body"),
                }
            }
            defs::MSG_VERSION_INFO => {
                self.ack(&frame).await?;
                self.framed
                    .send(builder::version_info_ack(&self.device_id, frame.serial))
                    .await?;
            }
            // Accepted and acknowledged, intentionally not decoded.
            defs::MSG_LOCATION_BATCH | defs::MSG_UPSTREAM_DATA => {
                self.ack(&frame).await?;
            }
            defs::MSG_COMMAND_RESPONSE => match body::parse_command_response(&frame.body) {
                Ok(text) => {
                    if !self.replies.resolve_next(text) {
                        warn!(device = %self.device_id, "response without pending command");
                    }
                }
                Err(e) => warn!(device = %self.device_id, error = %e, "bad command response"),
            },
            other => {
                warn!(device = %self.device_id, msg_id = other, "unhandled message id");
            }
        }
        Ok(None)
    }

    async fn ack(&mut self, frame: &Jt808Frame) -> Result<(), SessionError> {
        self.framed
            .send(builder::universal_ack(
                &self.device_id,
                frame.serial,
                frame.msg_id,
                defs::RESULT_SUCCESS,
            ))
            .await?;
        Ok(())
    }

    /// Stamp a report with the terminal id and ingestion time and push
    /// it towards the persistence worker.
    async fn emit(&self, report: body::LocationReport) {
        let fix = LocationFix {
            tracker_id: self.device_id.clone(),
            timestamp: chrono::Utc::now().timestamp(),
            lat: report.lat,
            lon: report.lon,
            speed: report.speed,
            heading: report.heading,
            alarm: None,
        };
        if self.ctx.events.send(fix).await.is_err() {
            warn!(device = %self.device_id, "event sink closed, dropping location");
        }
    }
}
