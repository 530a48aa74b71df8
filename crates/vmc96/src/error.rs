//! Error type returned by every driver operation.

use std::io;

use k1_core::{EncodeError, ProtocolError, ShapeError};
use thiserror::Error;

/// Errors that can occur while executing a command on the board.
///
/// Transport failures are fatal to the connection.  Protocol and shape
/// errors fail only the command in flight; the driver never retries a whole
/// command on its own.
#[derive(Debug, Error)]
pub enum Vmc96Error {
    /// Writing to or reading from the serial link failed.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// The response frame failed validation.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The request could not be framed.
    #[error("cannot encode request: {0}")]
    Encode(#[from] EncodeError),

    /// The opto line status payload had the wrong length or echo byte.
    #[error("invalid opto sensor response: {0}")]
    InvalidOptoResponse(#[source] ShapeError),

    /// The motor-array scan payload had the wrong length or echo byte.
    #[error("invalid motor array scan response: {0}")]
    InvalidScanResponse(#[source] ShapeError),

    /// The motor status payload was too short or had the wrong echo byte.
    #[error("invalid motor status response: {0}")]
    InvalidStatusResponse(#[source] ShapeError),

    /// The coordinate lies outside the 8 x 12 motor grid.
    #[error("motor coordinates row {row}, column {col} are outside the motor grid")]
    InvalidMotorCoordinates { row: u8, col: u8 },

    /// `0x26 + relay_id` does not fit the controller address byte.
    #[error("relay {0} is outside the controller address range")]
    RelayOutOfRange(u8),

    /// The cancellation token fired while polling for a response.
    #[error("command cancelled while waiting for a response")]
    Cancelled,
}

impl Vmc96Error {
    /// The frame validation failure, if this is a protocol error.
    pub fn protocol(&self) -> Option<&ProtocolError> {
        match self {
            Vmc96Error::Protocol(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts_to_transport() {
        let err: Vmc96Error = io::Error::new(io::ErrorKind::BrokenPipe, "unplugged").into();
        assert!(matches!(err, Vmc96Error::Transport(_)));
        assert!(err.to_string().contains("unplugged"));
    }

    #[test]
    fn test_protocol_accessor_exposes_kind() {
        let err: Vmc96Error = ProtocolError::NegativeAck.into();
        assert_eq!(err.protocol(), Some(&ProtocolError::NegativeAck));
        assert_eq!(Vmc96Error::Cancelled.protocol(), None);
    }

    #[test]
    fn test_motor_coordinates_message_names_row_and_column() {
        let err = Vmc96Error::InvalidMotorCoordinates { row: 8, col: 2 };
        assert_eq!(
            err.to_string(),
            "motor coordinates row 8, column 2 are outside the motor grid"
        );
    }

    #[test]
    fn test_shape_error_message_names_the_payload() {
        let err = Vmc96Error::InvalidOptoResponse(ShapeError::WrongLength {
            context: "opto line status",
            expected: 5,
            actual: 3,
        });
        assert_eq!(
            err.to_string(),
            "invalid opto sensor response: opto line status: expected 5 payload bytes, got 3"
        );
    }
}
