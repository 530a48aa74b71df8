//! # k1-core
//!
//! Protocol library for the K1 message format spoken by the VMC96 vending
//! controller (a relay board plus a stepper-motor array behind a USB-to-serial
//! bridge).
//!
//! This crate has no I/O.  It turns `(controller, command, args)` into request
//! bytes, validates response bytes, and decodes the bit-packed payloads the
//! motor controller returns.  The `vmc96` crate drives a real transport on top
//! of it.
//!
//! # Architecture overview
//!
//! - **`protocol`** – The K1 wire format.  Every frame starts with the `0x35`
//!   header, carries its own total length, and ends with an XOR checksum:
//!
//!   ```text
//!   request:  [0x35][controller][len][command][args..][xor]
//!   response: [0x35][controller][len][data..][xor]
//!   ```
//!
//! - **`payload`** – Decoders for command-specific response data: the opto
//!   line sensor bitmap, the motor-array scan grid, the running-motor status
//!   and firmware version text.

pub mod payload;
pub mod protocol;

pub use payload::{
    decode_motor_status, decode_opto_status, decode_scan_array, decode_version, MotorStatus,
    ScanResult, SensorBitmap, ShapeError,
};
pub use protocol::checksum::checksum;
pub use protocol::codec::{
    decode_broadcast_response, decode_response, encode_request, EncodeError, ProtocolError,
};
pub use protocol::dump::{RequestDump, ResponseDump};
