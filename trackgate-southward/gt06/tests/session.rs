mod common;

use bytes::{Bytes, BytesMut};
use common::test_context;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::codec::{Encoder, Framed};
use trackgate_proto_gt06::protocol::frame::{
    self, body, builder, Gt06Frame,
};
use trackgate_proto_gt06::session::{authenticate, Gt06Session};
use trackgate_proto_gt06::Gt06FrameCodec;
use trackgate_sdk::{CommandReply, SessionEnd, SessionError, SessionHandle, TrackerCommand};

const IMEI_BCD: [u8; 8] = [0x03, 0x53, 0x41, 0x90, 0x36, 0x00, 0x66, 0x71];

fn encode_frame(frame: Gt06Frame) -> BytesMut {
    let mut buf = BytesMut::new();
    Gt06FrameCodec::new().encode(frame, &mut buf).unwrap();
    buf
}

#[tokio::test]
async fn login_handshake_sends_reference_ack() {
    let (mut device, server) = tokio::io::duplex(256);
    let mut framed = Framed::new(server, Gt06FrameCodec::new());

    let login = encode_frame(Gt06Frame::new(
        frame::MSG_LOGIN,
        Bytes::copy_from_slice(&IMEI_BCD),
        1,
    ));
    device.write_all(&login).await.unwrap();

    let device_id = authenticate(&mut framed, Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(device_id, "353419036006671");

    let mut ack = [0u8; 10];
    device.read_exact(&mut ack).await.unwrap();
    assert_eq!(
        ack,
        [0x78, 0x78, 0x05, 0x01, 0x00, 0x01, 0xD9, 0xDC, 0x0D, 0x0A]
    );
}

#[tokio::test]
async fn non_login_first_frame_fails_handshake() {
    let (device, server) = tokio::io::duplex(256);
    let mut device = Framed::new(device, Gt06FrameCodec::new());
    let mut framed = Framed::new(server, Gt06FrameCodec::new());

    device.send(builder::heartbeat_ack(1)).await.unwrap();

    let err = authenticate(&mut framed, Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::UnexpectedMessage(0x13)));
}

#[tokio::test]
async fn command_roundtrip_matches_by_cmd_id() {
    let (device, server) = tokio::io::duplex(1024);
    let mut device = Framed::new(device, Gt06FrameCodec::new());
    let framed = Framed::new(server, Gt06FrameCodec::new());

    let (ctx, _events) = test_context();
    let (handle, channels) = SessionHandle::new("353419036006671");
    let session = Gt06Session::new(framed, "353419036006671".into(), ctx, channels);
    let run = tokio::spawn(session.run());

    let (cmd, reply) = TrackerCommand::new("353419036006671", "STATUS#");
    handle.try_send_command(cmd).unwrap();

    // Device sees the 0x80 frame and echoes the command id back.
    let sent = device.next().await.unwrap().unwrap();
    assert_eq!(sent.msg_type, frame::MSG_COMMAND);
    let payload = sent.payload.as_ref();
    assert_eq!(payload[0] as usize, "STATUS#".len() + 4);
    let cmd_id = u32::from_be_bytes([payload[1], payload[2], payload[3], payload[4]]);
    assert_eq!(&payload[5..], b"STATUS#");

    let mut answer = BytesMut::new();
    answer.extend_from_slice(&[("GPS ON".len() + 4) as u8]);
    answer.extend_from_slice(&cmd_id.to_be_bytes());
    answer.extend_from_slice(b"GPS ON");
    device
        .send(Gt06Frame::new(
            frame::MSG_COMMAND_RESPONSE,
            answer.freeze(),
            2,
        ))
        .await
        .unwrap();

    assert_eq!(
        reply.await.unwrap(),
        CommandReply::Answer("GPS ON".into())
    );

    drop(device);
    assert!(matches!(
        run.await.unwrap().unwrap(),
        SessionEnd::Disconnected
    ));
}

#[tokio::test]
async fn consecutive_commands_use_increasing_serials() {
    let (device, server) = tokio::io::duplex(1024);
    let mut device = Framed::new(device, Gt06FrameCodec::new());
    let framed = Framed::new(server, Gt06FrameCodec::new());

    let (ctx, _events) = test_context();
    let (handle, channels) = SessionHandle::new("1");
    let run = tokio::spawn(Gt06Session::new(framed, "1".into(), ctx, channels).run());

    let (c1, _r1) = TrackerCommand::new("1", "A#");
    let (c2, _r2) = TrackerCommand::new("1", "B#");
    handle.try_send_command(c1).unwrap();
    handle.try_send_command(c2).unwrap();

    let first = device.next().await.unwrap().unwrap();
    let second = device.next().await.unwrap().unwrap();
    assert_eq!(first.serial.wrapping_add(1), second.serial);

    drop(device);
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn heartbeat_is_echoed() {
    let (device, server) = tokio::io::duplex(256);
    let mut device = Framed::new(device, Gt06FrameCodec::new());
    let framed = Framed::new(server, Gt06FrameCodec::new());

    let (ctx, _events) = test_context();
    let (_handle, channels) = SessionHandle::new("1");
    let run = tokio::spawn(Gt06Session::new(framed, "1".into(), ctx, channels).run());

    device
        .send(Gt06Frame::new(frame::MSG_HEARTBEAT, Bytes::new(), 0x0042))
        .await
        .unwrap();
    let ack = device.next().await.unwrap().unwrap();
    assert_eq!(ack.msg_type, frame::MSG_HEARTBEAT);
    assert_eq!(ack.serial, 0x0042);
    assert!(ack.payload.is_empty());

    drop(device);
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn location_event_is_stamped_and_forwarded() {
    let (device, server) = tokio::io::duplex(1024);
    let mut device = Framed::new(device, Gt06FrameCodec::new());
    let framed = Framed::new(server, Gt06FrameCodec::new());

    let (ctx, mut events) = test_context();
    let (_handle, channels) = SessionHandle::new("353419036006671");
    let run = tokio::spawn(
        Gt06Session::new(framed, "353419036006671".into(), ctx, channels).run(),
    );

    let mut payload = vec![24, 3, 15, 12, 30, 45, 0xCA];
    payload.extend_from_slice(&40_582_800u32.to_be_bytes());
    payload.extend_from_slice(&205_302_600u32.to_be_bytes());
    payload.push(60);
    payload.extend_from_slice(&[0x00, 90]);
    device
        .send(Gt06Frame::new(frame::MSG_LOCATION, payload, 5))
        .await
        .unwrap();

    let fix = events.recv().await.unwrap();
    assert_eq!(fix.tracker_id, "353419036006671");
    assert_eq!(fix.lat, 40_582_800);
    assert_eq!(fix.lon, 205_302_600);
    assert_eq!(fix.speed, 60);
    assert_eq!(fix.heading, 90);
    assert_eq!(fix.alarm, None);

    drop(device);
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn alarm_event_carries_alarm_name() {
    let (device, server) = tokio::io::duplex(1024);
    let mut device = Framed::new(device, Gt06FrameCodec::new());
    let framed = Framed::new(server, Gt06FrameCodec::new());

    let (ctx, mut events) = test_context();
    let (_handle, channels) = SessionHandle::new("1");
    let run = tokio::spawn(Gt06Session::new(framed, "1".into(), ctx, channels).run());

    let mut payload = vec![24, 3, 15, 12, 30, 45, 0xCA];
    payload.extend_from_slice(&40_582_800u32.to_be_bytes());
    payload.extend_from_slice(&205_302_600u32.to_be_bytes());
    payload.push(0);
    payload.extend_from_slice(&[0x00, 0]);
    payload.resize(32, 0);
    payload[31] = 0x01;
    device
        .send(Gt06Frame::new(frame::MSG_ALARM, payload, 6))
        .await
        .unwrap();

    let fix = events.recv().await.unwrap();
    assert_eq!(fix.alarm, Some("SOS"));

    drop(device);
    run.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn missing_heartbeat_terminates_session() {
    let (device, server) = tokio::io::duplex(256);
    let framed = Framed::new(server, Gt06FrameCodec::new());

    let (ctx, _events) = test_context();
    let (_handle, channels) = SessionHandle::new("1");
    let result = Gt06Session::new(framed, "1".into(), ctx, channels)
        .run()
        .await;
    assert!(matches!(result, Err(SessionError::HeartbeatTimeout)));

    drop(device);
}

#[tokio::test]
async fn evict_signal_ends_session() {
    let (_device, server) = tokio::io::duplex(256);
    let framed = Framed::new(server, Gt06FrameCodec::new());

    let (ctx, _events) = test_context();
    let (handle, channels) = SessionHandle::new("1");
    let run = tokio::spawn(Gt06Session::new(framed, "1".into(), ctx, channels).run());

    handle.signal_evict();
    assert!(matches!(run.await.unwrap().unwrap(), SessionEnd::Evicted));
}

#[tokio::test]
async fn corrupt_frame_does_not_kill_session() {
    let (mut device_raw, server) = tokio::io::duplex(1024);
    let framed = Framed::new(server, Gt06FrameCodec::new());

    let (ctx, mut events) = test_context();
    let (_handle, channels) = SessionHandle::new("1");
    let run = tokio::spawn(Gt06Session::new(framed, "1".into(), ctx, channels).run());

    // A frame with a broken check code, followed by a valid location.
    let mut bad = encode_frame(builder::heartbeat_ack(1));
    let len = bad.len();
    bad[len - 3] ^= 0xFF;
    device_raw.write_all(&bad).await.unwrap();

    let mut payload = vec![24, 3, 15, 12, 30, 45, 0xCA];
    payload.extend_from_slice(&1u32.to_be_bytes());
    payload.extend_from_slice(&2u32.to_be_bytes());
    payload.push(0);
    payload.extend_from_slice(&[0x00, 0]);
    let good = encode_frame(Gt06Frame::new(frame::MSG_LOCATION, payload, 2));
    device_raw.write_all(&good).await.unwrap();

    let fix = events.recv().await.unwrap();
    assert_eq!(fix.lat, 1);
    assert_eq!(fix.lon, 2);

    drop(device_raw);
    run.await.unwrap().unwrap();
}

#[test]
fn location_parse_rejects_short_payload() {
    assert!(body::parse_location(&[0u8; 10]).is_err());
}
