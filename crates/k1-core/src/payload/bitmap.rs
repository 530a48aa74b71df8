//! LSB-first bit unpacking and the opto line sensor status payload.

use super::ShapeError;
use crate::protocol::command;

/// Exact length of an opto line status payload: the echoed opcode plus four
/// bytes of sensor bits.
pub const OPTO_PAYLOAD_LEN: usize = 5;

/// An ordered sequence of on/off states unpacked from bytes.
///
/// Bits are taken least-significant first within each byte, bytes in order,
/// so bit `i` of the bitmap is bit `i % 8` of byte `i / 8`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorBitmap {
    bits: Vec<bool>,
}

impl SensorBitmap {
    /// Unpacks every bit of `bytes`, LSB first.
    ///
    /// ```rust
    /// use k1_core::SensorBitmap;
    ///
    /// let bitmap = SensorBitmap::from_lsb_first(&[0b0000_0101]);
    /// assert_eq!(bitmap.len(), 8);
    /// assert_eq!(bitmap.get(0), Some(true));
    /// assert_eq!(bitmap.get(1), Some(false));
    /// assert_eq!(bitmap.get(2), Some(true));
    /// ```
    pub fn from_lsb_first(bytes: &[u8]) -> Self {
        let bits = bytes
            .iter()
            .flat_map(|byte| (0..8).map(move |bit| (byte >> bit) & 0x01 == 1))
            .collect();
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// State of bit `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Number of bits that are set.
    pub fn count_set(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Indices of the set bits, ascending.
    pub fn set_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, set)| set.then_some(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn into_vec(self) -> Vec<bool> {
        self.bits
    }
}

/// Decodes the motor controller's opto line status payload.
///
/// The payload is `[0x15, b0, b1, b2, b3]`; the result holds the 32 sensor
/// samples of `b0..b3`, LSB first.
///
/// # Errors
///
/// [`ShapeError::WrongLength`] unless the payload is exactly
/// [`OPTO_PAYLOAD_LEN`] bytes, [`ShapeError::UnexpectedEcho`] unless it
/// starts with the opto-status opcode.
pub fn decode_opto_status(payload: &[u8]) -> Result<SensorBitmap, ShapeError> {
    const CONTEXT: &str = "opto line status";

    if payload.len() != OPTO_PAYLOAD_LEN {
        return Err(ShapeError::WrongLength {
            context: CONTEXT,
            expected: OPTO_PAYLOAD_LEN,
            actual: payload.len(),
        });
    }
    if payload[0] != command::motor::OPTO_LINE_STATUS {
        return Err(ShapeError::UnexpectedEcho {
            context: CONTEXT,
            expected: command::motor::OPTO_LINE_STATUS,
            found: payload[0],
        });
    }
    Ok(SensorBitmap::from_lsb_first(&payload[1..]))
}
