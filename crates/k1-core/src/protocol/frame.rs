//! K1 frame constants, controller addresses, and command opcodes.
//!
//! Opcodes are scoped per controller: `0x11` is "relay function" on a relay
//! controller but "scan array" on the motor controller, and `0x05` is a reset
//! on both.  The controller byte in the frame disambiguates them.

// ── Frame constants ───────────────────────────────────────────────────────────

/// First byte of every K1 frame, request or response.
pub const HEADER: u8 = 0x35;

/// Smallest valid frame: header, controller, length, one body byte, checksum.
pub const MIN_FRAME_LEN: usize = 5;

/// The length field is a single byte.
pub const MAX_FRAME_LEN: usize = 255;

/// Largest argument list that still fits a request frame.
pub const MAX_ARGS_LEN: usize = MAX_FRAME_LEN - MIN_FRAME_LEN;

/// Byte offset of the first response payload byte.
pub const RESPONSE_PAYLOAD_OFFSET: usize = 3;

// ── Controller addresses ──────────────────────────────────────────────────────

/// Controller address bytes.
pub mod controller {
    /// Every controller on the bus listens to this address.  Responses to
    /// broadcast commands are not K1-framed.
    pub const BROADCAST: u8 = 0x00;
    /// Address of relay board 0; relay board `n` answers at `RELAY_BASE + n`.
    pub const RELAY_BASE: u8 = 0x26;
    /// The motor-array controller.
    pub const MOTOR_ARRAY: u8 = 0x30;

    /// Per-relay controller address, or `None` when the offset overflows the
    /// address byte.
    ///
    /// ```rust
    /// use k1_core::protocol::controller;
    ///
    /// assert_eq!(controller::relay(1), Some(0x27));
    /// assert_eq!(controller::relay(0xF0), None);
    /// ```
    pub fn relay(relay_id: u8) -> Option<u8> {
        RELAY_BASE.checked_add(relay_id)
    }
}

// ── Command opcodes ───────────────────────────────────────────────────────────

/// Command opcode bytes, grouped by the controller that understands them.
pub mod command {
    /// Commands every controller accepts.
    pub mod common {
        pub const PING: u8 = 0x00;
        pub const KERNEL_VERSION: u8 = 0x02;
        pub const RESET: u8 = 0x05;
    }

    /// Broadcast commands, sent to controller `0x00`.
    pub mod global {
        pub const RESET: u8 = 0x01;
        pub const SUSPEND: u8 = 0x03;
        pub const ADDRESS_CLASH: u8 = 0x05;
        /// Argument byte sent with [`RESET`] to reset every controller.
        pub const RESET_ALL: u8 = 0xFF;
    }

    /// General-purpose relay board commands.
    pub mod relay {
        pub const CONTROL: u8 = 0x11;
        pub const RESET: u8 = super::common::RESET;
    }

    /// Motor-array controller commands.
    pub mod motor {
        pub const DRIVER_SETUP: u8 = 0x04;
        pub const RESET: u8 = super::common::RESET;
        pub const STATUS_REQUEST: u8 = 0x10;
        pub const SCAN_ARRAY: u8 = 0x11;
        pub const STOP_ALL: u8 = 0x12;
        pub const RUN: u8 = 0x13;
        pub const GIVE_PULSE: u8 = 0x14;
        pub const OPTO_LINE_STATUS: u8 = 0x15;
    }
}

// ── Motor addressing ──────────────────────────────────────────────────────────

/// Rows in the motor grid.
pub const MOTOR_ROWS: u8 = 8;

/// Columns in the motor grid.
pub const MOTOR_COLUMNS: u8 = 12;

/// Motor id for a zero-based grid coordinate: 1-based row in the high
/// nibble, 1-based column in the low nibble.  `None` outside the grid.
///
/// ```rust
/// use k1_core::protocol::motor_id;
///
/// assert_eq!(motor_id(0, 7), Some(0x18));
/// assert_eq!(motor_id(7, 11), Some(0x8C));
/// assert_eq!(motor_id(8, 0), None);
/// ```
pub fn motor_id(row: u8, col: u8) -> Option<u8> {
    if row >= MOTOR_ROWS || col >= MOTOR_COLUMNS {
        return None;
    }
    Some(((row + 1) << 4) | (col + 1))
}

/// Swaps the row and column nibbles of a motor id.
///
/// Boards wired as an "inverted array" index the grid column-first, so a
/// row-major id must be remapped before it goes on the wire.
///
/// ```rust
/// use k1_core::protocol::swap_nibbles;
///
/// assert_eq!(swap_nibbles(0x12), 0x21);
/// assert_eq!(swap_nibbles(0xA0), 0x0A);
/// ```
pub fn swap_nibbles(motor_id: u8) -> u8 {
    ((motor_id & 0x0F) << 4) | ((motor_id & 0xF0) >> 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_args_len_fits_length_byte() {
        assert_eq!(MAX_ARGS_LEN + MIN_FRAME_LEN, u8::MAX as usize);
    }

    #[test]
    fn test_relay_address_offsets_from_base() {
        assert_eq!(controller::relay(0), Some(controller::RELAY_BASE));
        assert_eq!(controller::relay(1), Some(0x27));
    }

    #[test]
    fn test_relay_address_at_top_of_range() {
        // 0x26 + 0xD9 = 0xFF is still addressable; one more is not.
        assert_eq!(controller::relay(0xD9), Some(0xFF));
        assert_eq!(controller::relay(0xDA), None);
    }

    #[test]
    fn test_opcodes_are_reused_across_controllers() {
        assert_eq!(command::relay::CONTROL, command::motor::SCAN_ARRAY);
        assert_eq!(command::relay::RESET, command::motor::RESET);
    }

    #[test]
    fn test_swap_nibbles_is_an_involution() {
        for id in 0..=u8::MAX {
            assert_eq!(swap_nibbles(swap_nibbles(id)), id);
        }
    }

    #[test]
    fn test_motor_id_packs_one_based_row_and_column() {
        assert_eq!(motor_id(0, 0), Some(0x11));
        assert_eq!(motor_id(1, 0), Some(0x21));
        assert_eq!(motor_id(2, 9), Some(0x3A));
    }

    #[test]
    fn test_motor_id_rejects_coordinates_outside_grid() {
        assert_eq!(motor_id(MOTOR_ROWS, 0), None);
        assert_eq!(motor_id(0, MOTOR_COLUMNS), None);
        assert_eq!(motor_id(u8::MAX, u8::MAX), None);
        assert!(motor_id(MOTOR_ROWS - 1, MOTOR_COLUMNS - 1).is_some());
    }

    #[test]
    fn test_swap_nibbles_leaves_symmetric_ids_unchanged() {
        assert_eq!(swap_nibbles(0x11), 0x11);
        assert_eq!(swap_nibbles(0x00), 0x00);
    }
}
