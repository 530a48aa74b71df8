//! Decoders for command-specific response payloads.
//!
//! A valid K1 frame only proves the bytes arrived intact.  Some commands also
//! promise a payload shape: the opto line status is exactly five bytes, the
//! array scan and motor status at least two, and each starts by echoing the
//! command opcode.  These decoders check that shape and turn the bit-packed
//! data into structured values.

pub mod bitmap;
pub mod scan;
pub mod status;
pub mod version;

use thiserror::Error;

pub use bitmap::{decode_opto_status, SensorBitmap, OPTO_PAYLOAD_LEN};
pub use scan::{decode_scan_array, ScanResult, FULL_SCALE_MILLIAMPS};
pub use status::{decode_motor_status, MotorStatus};
pub use version::decode_version;

/// A response payload whose shape does not match what the command promises.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The payload must be exactly `expected` bytes long.
    #[error("{context}: expected {expected} payload bytes, got {actual}")]
    WrongLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The payload must be at least `min` bytes long.
    #[error("{context}: expected at least {min} payload bytes, got {actual}")]
    TooShort {
        context: &'static str,
        min: usize,
        actual: usize,
    },

    /// The first payload byte must echo the command opcode.
    #[error("{context}: expected echo of command 0x{expected:02X}, got 0x{found:02X}")]
    UnexpectedEcho {
        context: &'static str,
        expected: u8,
        found: u8,
    },
}
