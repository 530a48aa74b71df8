//! Motor status payload: supply current and the motors currently running.
//!
//! Layout is `[0x10, current, id, id, ...]`; each trailing byte is the id of
//! one running motor (row and column nibbles, both 1-based).

use super::scan::FULL_SCALE_MILLIAMPS;
use super::ShapeError;
use crate::protocol::command;

const MIN_STATUS_PAYLOAD_LEN: usize = 2;

/// Decoded motor status.
#[derive(Debug, Clone, PartialEq)]
pub struct MotorStatus {
    /// Supply current at the time of the request, 0–500 mA.
    pub current_milliamps: f64,
    /// Ids of the motors that are running, in the order reported.
    pub running_motors: Vec<u8>,
}

impl MotorStatus {
    pub fn active_count(&self) -> usize {
        self.running_motors.len()
    }

    pub fn is_running(&self, motor_id: u8) -> bool {
        self.running_motors.contains(&motor_id)
    }

    /// Zero-based `(row, col)` of every running motor.
    pub fn running_positions(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.running_motors
            .iter()
            .map(|&id| ((id >> 4).wrapping_sub(1), (id & 0x0F).wrapping_sub(1)))
    }
}

/// Decodes the motor controller's status-request payload.
///
/// # Errors
///
/// [`ShapeError::TooShort`] for payloads under two bytes,
/// [`ShapeError::UnexpectedEcho`] unless the payload starts with `0x10`.
///
/// ```rust
/// use k1_core::decode_motor_status;
///
/// let status = decode_motor_status(&[0x10, 0xFF, 0x12, 0x34]).unwrap();
/// assert_eq!(status.running_motors, vec![0x12, 0x34]);
/// assert_eq!(status.current_milliamps, 500.0);
/// ```
pub fn decode_motor_status(payload: &[u8]) -> Result<MotorStatus, ShapeError> {
    const CONTEXT: &str = "motor status";

    if payload.len() < MIN_STATUS_PAYLOAD_LEN {
        return Err(ShapeError::TooShort {
            context: CONTEXT,
            min: MIN_STATUS_PAYLOAD_LEN,
            actual: payload.len(),
        });
    }
    if payload[0] != command::motor::STATUS_REQUEST {
        return Err(ShapeError::UnexpectedEcho {
            context: CONTEXT,
            expected: command::motor::STATUS_REQUEST,
            found: payload[0],
        });
    }

    Ok(MotorStatus {
        current_milliamps: FULL_SCALE_MILLIAMPS * f64::from(payload[1]) / 255.0,
        running_motors: payload[2..].to_vec(),
    })
}
