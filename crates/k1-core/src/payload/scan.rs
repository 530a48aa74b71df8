//! Motor-array scan payload: supply current and the grid of fitted motors.
//!
//! The payload is `[0x11, current, row0, row1, ...]` where, as the board
//! reports it, the grid starts at the current byte itself: every byte after
//! the echoed opcode is one grid row, bit `n` (LSB first) is column `n`.
//! Motors are labelled by their 1-based row and column as two hex digits,
//! e.g. row 1 column 8 is `"0x18"`.

use super::bitmap::SensorBitmap;
use super::ShapeError;
use crate::protocol::command;

/// Current reading that maps to a raw value of `255`.
pub const FULL_SCALE_MILLIAMPS: f64 = 500.0;

const MIN_SCAN_PAYLOAD_LEN: usize = 2;
const COLUMNS_PER_ROW: usize = 8;

/// Result of a motor-array scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// Supply current measured during the scan, 0–500 mA.
    pub current_milliamps: f64,
    /// Labels of every motor position that answered, in row-major order.
    pub available_motors: Vec<String>,
}

impl ScanResult {
    /// Whether the motor at `label` (e.g. `"0x21"`) was detected.
    pub fn is_available(&self, label: &str) -> bool {
        self.available_motors.iter().any(|m| m == label)
    }
}

/// Decodes the motor controller's scan-array payload.
///
/// # Errors
///
/// [`ShapeError::TooShort`] for payloads under two bytes,
/// [`ShapeError::UnexpectedEcho`] unless the payload starts with the
/// scan-array opcode.
///
/// # Examples
///
/// ```rust
/// use k1_core::decode_scan_array;
///
/// let scan = decode_scan_array(&[0x11, 0x80, 0x01]).unwrap();
/// assert_eq!(scan.available_motors, vec!["0x18", "0x21"]);
/// assert!((scan.current_milliamps - 250.98).abs() < 0.01);
/// ```
pub fn decode_scan_array(payload: &[u8]) -> Result<ScanResult, ShapeError> {
    const CONTEXT: &str = "motor array scan";

    if payload.len() < MIN_SCAN_PAYLOAD_LEN {
        return Err(ShapeError::TooShort {
            context: CONTEXT,
            min: MIN_SCAN_PAYLOAD_LEN,
            actual: payload.len(),
        });
    }
    if payload[0] != command::motor::SCAN_ARRAY {
        return Err(ShapeError::UnexpectedEcho {
            context: CONTEXT,
            expected: command::motor::SCAN_ARRAY,
            found: payload[0],
        });
    }

    let grid = SensorBitmap::from_lsb_first(&payload[1..]);
    let available_motors = grid
        .set_indices()
        .map(|i| motor_label(i / COLUMNS_PER_ROW, i % COLUMNS_PER_ROW))
        .collect();

    Ok(ScanResult {
        current_milliamps: FULL_SCALE_MILLIAMPS * f64::from(payload[1]) / 255.0,
        available_motors,
    })
}

fn motor_label(row: usize, col: usize) -> String {
    format!("0x{:X}{:X}", row + 1, col + 1)
}
