//! End-to-end driver behaviour through the public API only.

use std::io::{self, Cursor, Read, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vmc96::{
    CancellationToken, DeviceConfig, IoTransport, PollPolicy, ProtocolError, ScriptedTransport,
    Vmc96, Vmc96Error,
};

fn fast() -> PollPolicy {
    PollPolicy::new(5, Duration::ZERO)
}

#[test]
fn test_vending_cycle_scan_run_then_check_sensors() {
    // Arrange: scan finds motors 0x17 and 0x21, run acknowledged, first opto line blocked
    let mut link = ScriptedTransport::new();
    link.push_response(0x30, &[0x11, 0x40, 0x01])
        .push_empty_reads(2)
        .push_response(0x30, &[0x00])
        .push_response(0x30, &[0x15, 0x01, 0x00, 0x00, 0x00]);
    let mut board = Vmc96::new(link).with_poll_policy(fast());

    // Act
    let scan = board.motor_scan_array().unwrap();
    board.motor_run(0x11).unwrap();
    let sensors = board.opto_sensor_read().unwrap();

    // Assert
    assert!(scan.is_available("0x21"));
    assert_eq!(sensors.set_indices().collect::<Vec<_>>(), vec![0]);
    let written = board.transport().written();
    assert_eq!(written.len(), 3);
    assert_eq!(written[1], vec![0x35, 0x30, 0x06, 0x13, 0x11, 0x01]);
}

#[test]
fn test_pair_run_then_status_reports_both_motors() {
    // Arrange
    let mut link = ScriptedTransport::new();
    link.push_response(0x30, &[0x00])
        .push_response(0x30, &[0x10, 0x33, 0x31, 0x32]);
    let mut board = Vmc96::new(link).with_poll_policy(fast());

    // Act
    board.motor_pair_run(2, 0, 1).unwrap();
    let status = board.motor_status_request().unwrap();

    // Assert
    assert_eq!(&board.transport().written()[0][3..6], &[0x13, 0x31, 0x32]);
    assert_eq!(status.running_motors, vec![0x31, 0x32]);
    assert_eq!(status.running_positions().collect::<Vec<_>>(), vec![(2, 0), (2, 1)]);
    assert!((status.current_milliamps - 100.0).abs() < 1e-9);
}

#[test]
fn test_coordinates_outside_grid_never_reach_the_link() {
    let mut board = Vmc96::new(ScriptedTransport::new()).with_poll_policy(fast());

    let err = board.motor_run_at(0, 12).unwrap_err();

    assert!(matches!(err, Vmc96Error::InvalidMotorCoordinates { row: 0, col: 12 }));
    assert!(board.transport().written().is_empty());
}

#[test]
fn test_address_clash_gathers_every_answer() {
    let mut link = ScriptedTransport::new();
    link.push_read(vec![0x26]).push_read(vec![0x27, 0x30]);
    let mut board = Vmc96::new(link).with_broadcast_policy(fast());

    assert_eq!(board.global_address_clash().unwrap(), vec![0x26, 0x27, 0x30]);
}

#[test]
fn test_silent_board_fails_every_command_with_invalid_length() {
    let mut board = Vmc96::new(ScriptedTransport::new()).with_poll_policy(fast());

    for result in [board.motor_reset(), board.relay_set_state(0, 1), board.motor_ping()] {
        let err = result.unwrap_err();
        assert!(matches!(
            err.protocol(),
            Some(ProtocolError::InvalidLength { received: 0, .. })
        ));
    }
    assert_eq!(board.transport().read_calls(), 15);
}

#[test]
fn test_config_file_drives_inversion() {
    // Arrange
    let config = DeviceConfig::from_toml_str(
        "[device]\ninverted_array = true\n[polling]\nmax_attempts = 2\ndelay_ms = 0\n",
    )
    .unwrap();
    let mut link = ScriptedTransport::new();
    link.push_response(0x30, &[0x00]);

    // Act
    let mut board = Vmc96::with_config(link, &config);
    board.motor_run(0x12).unwrap();

    // Assert
    assert_eq!(board.transport().last_written().unwrap()[4], 0x21);
}

#[test]
fn test_frame_dumps_reach_closure_sink() {
    let lines = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink_lines = Arc::clone(&lines);
    let mut link = ScriptedTransport::new();
    link.push_response(0x27, &[0x00]);
    let mut board = Vmc96::new(link)
        .with_poll_policy(fast())
        .with_log_sink(move |m: &str| sink_lines.lock().unwrap().push(m.to_owned()));

    board.relay_set_state(1, 0).unwrap();

    let lines = lines.lock().unwrap();
    assert_eq!(
        *lines,
        vec![
            "K1 request: [ hdr=0x35 cntrl=0x27 len=0x06 cmd=0x11 data=[0x00] chksum=0x05 ]"
                .to_string(),
            "K1 response: [ hdr=0x35 cntrl=0x27 len=0x05 data=[0x00] chksum=0x17 ]".to_string(),
        ]
    );
}

#[test]
fn test_cancelled_board_returns_cancelled_until_reset() {
    let token = CancellationToken::new();
    let mut link = ScriptedTransport::new();
    link.push_response(0x30, &[0x00]);
    let mut board = Vmc96::new(link)
        .with_poll_policy(fast())
        .with_cancellation(token.clone());

    token.cancel();
    assert!(matches!(board.motor_stop_all(), Err(Vmc96Error::Cancelled)));

    token.reset();
    board.motor_stop_all().unwrap();
}

/// Serial-port stand-in: the whole reply is available on the first read.
struct Port {
    reply: Cursor<Vec<u8>>,
    sent: Vec<u8>,
}

impl Read for Port {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reply.read(buf)
    }
}

impl Write for Port {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sent.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_io_transport_over_stream_reads_version() {
    // Arrange
    let mut reply = vec![0x35, 0x30, 0x09, 0x00, b'K', b'1', b'0', b'\0'];
    reply.push(reply.iter().fold(0, |acc, b| acc ^ b));
    let port = Port {
        reply: Cursor::new(reply),
        sent: Vec::new(),
    };
    let mut board = Vmc96::new(IoTransport::new(port)).with_poll_policy(fast());

    // Act
    let version = board.motor_version().unwrap();

    // Assert
    assert_eq!(version, "K10");
    let port = board.into_transport().into_inner();
    assert_eq!(port.sent, vec![0x35, 0x30, 0x05, 0x02, 0x02]);
}
