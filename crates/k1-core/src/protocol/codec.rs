//! Encoder for K1 request frames and validator for K1 response frames.
//!
//! Wire format:
//! ```text
//! request:  [0x35][controller:1][len:1][command:1][args:N][xor:1]
//! response: [0x35][controller:1][len:1][data:N][xor:1]
//! ```
//! `len` counts every byte of the frame, header and checksum included.
//! `xor` is the XOR of all bytes before it.

use thiserror::Error;

use crate::protocol::checksum::checksum;
use crate::protocol::frame::{HEADER, MAX_ARGS_LEN, MIN_FRAME_LEN, RESPONSE_PAYLOAD_OFFSET};

/// Reasons a response frame fails validation.
///
/// [`decode_response`] checks a frame in a fixed order (length, header,
/// controller, length field, checksum) and reports the first failure, so each
/// variant identifies one distinct fault on the link.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The first byte is not the K1 header.
    #[error("malformed response: expected header 0x35, got 0x{found:02X}")]
    Malformed { found: u8 },

    /// The trailing checksum does not match the frame contents.
    #[error("invalid checksum: frame carries 0x{found:02X}, computed 0x{computed:02X}")]
    InvalidChecksum { found: u8, computed: u8 },

    /// Too few bytes arrived, or the length field disagrees with the byte count.
    #[error("invalid response length: expected {expected} bytes, received {received}")]
    InvalidLength { expected: usize, received: usize },

    /// The controller explicitly rejected the command.
    ///
    /// No validation path produces this today: the controllers put their
    /// status byte in the payload and it is not inspected here.  The variant
    /// exists so callers can already match on it.
    #[error("negative acknowledgement from controller")]
    NegativeAck,

    /// The response came from a different controller than the one addressed.
    #[error("unexpected controller: addressed 0x{expected:02X}, answered by 0x{found:02X}")]
    UnexpectedController { expected: u8, found: u8 },
}

/// Errors that can occur while building a request frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The argument list would push the frame past the one-byte length field.
    #[error("request arguments too long: {len} bytes, at most {max} fit in a frame")]
    ArgsTooLong { len: usize, max: usize },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Builds a request frame addressed to `controller_id`.
///
/// # Errors
///
/// Returns [`EncodeError::ArgsTooLong`] if `args` is longer than
/// [`MAX_ARGS_LEN`].
///
/// # Examples
///
/// ```rust
/// use k1_core::protocol::{command, controller, encode_request};
///
/// let frame = encode_request(controller::MOTOR_ARRAY, command::motor::RUN, &[0x12]).unwrap();
/// assert_eq!(frame, vec![0x35, 0x30, 0x06, 0x13, 0x12, 0x02]);
/// ```
pub fn encode_request(controller_id: u8, command: u8, args: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if args.len() > MAX_ARGS_LEN {
        return Err(EncodeError::ArgsTooLong {
            len: args.len(),
            max: MAX_ARGS_LEN,
        });
    }

    let total_len = MIN_FRAME_LEN + args.len();
    let mut buf = Vec::with_capacity(total_len);
    buf.push(HEADER);
    buf.push(controller_id);
    buf.push(total_len as u8);
    buf.push(command);
    buf.extend_from_slice(args);
    buf.push(checksum(&buf));
    Ok(buf)
}

/// Validates a response frame and returns its payload.
///
/// The payload is everything between the length field and the checksum.
/// Checks run in this order and the first failure is returned:
///
/// 1. fewer than 5 bytes → [`ProtocolError::InvalidLength`]
/// 2. header is not `0x35` → [`ProtocolError::Malformed`]
/// 3. controller byte differs from `expected_controller` →
///    [`ProtocolError::UnexpectedController`]
/// 4. length field differs from `raw.len()` → [`ProtocolError::InvalidLength`]
/// 5. checksum mismatch → [`ProtocolError::InvalidChecksum`]
///
/// # Examples
///
/// ```rust
/// use k1_core::decode_response;
///
/// let raw = [0x35, 0x30, 0x06, 0x00, 0x13, 0x10];
/// assert_eq!(decode_response(0x30, &raw).unwrap(), &[0x00, 0x13]);
/// ```
pub fn decode_response(expected_controller: u8, raw: &[u8]) -> Result<&[u8], ProtocolError> {
    if raw.len() < MIN_FRAME_LEN {
        return Err(ProtocolError::InvalidLength {
            expected: MIN_FRAME_LEN,
            received: raw.len(),
        });
    }

    if raw[0] != HEADER {
        return Err(ProtocolError::Malformed { found: raw[0] });
    }

    if raw[1] != expected_controller {
        return Err(ProtocolError::UnexpectedController {
            expected: expected_controller,
            found: raw[1],
        });
    }

    let declared = raw[2] as usize;
    if declared != raw.len() {
        return Err(ProtocolError::InvalidLength {
            expected: declared,
            received: raw.len(),
        });
    }

    let (body, trailer) = raw.split_at(raw.len() - 1);
    let computed = checksum(body);
    if trailer[0] != computed {
        return Err(ProtocolError::InvalidChecksum {
            found: trailer[0],
            computed,
        });
    }

    Ok(&body[RESPONSE_PAYLOAD_OFFSET..])
}

/// Validates the answer to a broadcast command.
///
/// Broadcast answers are not K1-framed; the raw bytes are the payload.  The
/// only failure is receiving nothing at all.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidLength`] for an empty buffer.
pub fn decode_broadcast_response(raw: &[u8]) -> Result<&[u8], ProtocolError> {
    if raw.is_empty() {
        return Err(ProtocolError::InvalidLength {
            expected: 1,
            received: 0,
        });
    }
    Ok(raw)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
