//! Server-side GT06 session: login handshake and the long-lived event
//! loop multiplexing inbound frames, outbound commands and supervision.

use crate::protocol::codec::Gt06FrameCodec;
use crate::protocol::frame::{self, body, builder, Gt06Frame};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::Instant;
use tokio_util::codec::Framed;
use trackgate_sdk::{
    CommandMatcher, LocationFix, SessionChannels, SessionContext, SessionEnd, SessionError,
};
use tracing::{debug, info, warn};

/// Expected device heartbeat cadence plus the slack granted on top.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const HEARTBEAT_SLACK: Duration = Duration::from_secs(60);

/// Consume the login frame and acknowledge it.
///
/// The dispatcher has already identified the stream as GT06; the first
/// frame must be a `0x01` login carrying the BCD IMEI. Returns the
/// device id. Any failure here is terminal for the connection.
pub async fn authenticate<T>(
    framed: &mut Framed<T, Gt06FrameCodec>,
    deadline: Duration,
) -> Result<String, SessionError>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let frame = match tokio::time::timeout(deadline, framed.next()).await {
        Ok(Some(Ok(frame))) => frame,
        Ok(Some(Err(e))) => return Err(SessionError::Handshake(e.to_string())),
        Ok(None) => return Err(SessionError::Handshake("connection closed".into())),
        Err(_) => return Err(SessionError::Handshake("login deadline expired".into())),
    };

    if frame.msg_type != frame::MSG_LOGIN {
        return Err(SessionError::UnexpectedMessage(frame.msg_type as u16));
    }

    let device_id = body::device_id_from_login(&frame.payload)
        .map_err(|e| SessionError::Handshake(e.to_string()))?;
    framed.send(builder::login_ack(frame.serial)).await?;
    Ok(device_id)
}

pub struct Gt06Session<T> {
    framed: Framed<T, Gt06FrameCodec>,
    device_id: String,
    ctx: SessionContext,
    channels: SessionChannels,
    /// Serial for platform-originated frames, strictly increasing per
    /// session (mod 2^16). Doubles as the command correlation id.
    serial: u16,
    matcher: CommandMatcher,
}

impl<T> Gt06Session<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        framed: Framed<T, Gt06FrameCodec>,
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
            matcher: CommandMatcher::new(),
        }
    }

    /// Drive the session until the device disconnects, supervision trips
    /// or the registry evicts us. Pending reply slots simply drop with
    /// the session.
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
                        Some(cmd) => self.send_command(cmd.payload, cmd.reply).await?,
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
                            if frame.msg_type == frame::MSG_HEARTBEAT {
                                deadline = Instant::now() + HEARTBEAT_INTERVAL + HEARTBEAT_SLACK;
                            }
                            self.handle_frame(frame).await?;
                        }
                    }
                }
            }
        }
    }

    async fn send_command(
        &mut self,
        payload: String,
        reply: tokio::sync::oneshot::Sender<trackgate_sdk::CommandReply>,
    ) -> Result<(), SessionError> {
        let cmd_id = self.serial as u32;
        self.framed
            .send(builder::command(&payload, cmd_id, self.serial))
            .await?;
        self.matcher.insert(cmd_id, reply);
        self.serial = self.serial.wrapping_add(1);
        debug!(device = %self.device_id, cmd_id, %payload, "sent platform command");
        Ok(())
    }

    async fn handle_frame(&mut self, frame: Gt06Frame) -> Result<(), SessionError> {
        match frame.msg_type {
            frame::MSG_LOCATION | frame::MSG_LOCATION_4G => {
                match body::parse_location(&frame.payload) {
                    Ok(report) => self.emit(report, None).await,
                    Err(e) => warn!(device = %self.device_id, error = %e, "bad location payload"),
                }
            }
            frame::MSG_ALARM => match body::parse_alarm(&frame.payload) {
                Ok((report, alarm)) => {
                    info!(device = %self.device_id, alarm, "alarm reported");
                    self.emit(report, Some(alarm)).await;
                }
                Err(e) => warn!(device = %self.device_id, error = %e, "bad alarm payload"),
            },
            frame::MSG_HEARTBEAT => {
                debug!(device = %self.device_id, "heartbeat");
                self.framed.send(builder::heartbeat_ack(frame.serial)).await?;
            }
            frame::MSG_COMMAND_RESPONSE => match body::parse_command_response(&frame.payload) {
                Ok((text, cmd_id)) => {
                    if !self.matcher.resolve(cmd_id, text) {
                        warn!(device = %self.device_id, cmd_id, "response without pending command");
                    }
                }
                Err(e) => warn!(device = %self.device_id, error = %e, "bad command response"),
            },
            frame::MSG_IMSI => debug!(device = %self.device_id, "device reported IMSI"),
            frame::MSG_ICCID => debug!(device = %self.device_id, "device reported ICCID"),
            other => {
                warn!(device = %self.device_id, msg_type = other, "unhandled message type");
            }
        }
        Ok(())
    }

    /// Stamp a report with the device id and ingestion time and push it
    /// towards the persistence worker.
    async fn emit(&self, report: body::LocationReport, alarm: Option<&'static str>) {
        let fix = LocationFix {
            tracker_id: self.device_id.clone(),
            timestamp: chrono::Utc::now().timestamp(),
            lat: report.lat,
            lon: report.lon,
            speed: report.speed,
            heading: report.heading,
            alarm,
        };
        if self.ctx.events.send(fix).await.is_err() {
            warn!(device = %self.device_id, "event sink closed, dropping location");
        }
    }
}
