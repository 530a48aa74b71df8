//! XOR checksum used to stamp and verify K1 frames.

/// XOR-reduces every byte of `bytes`.
///
/// The empty slice yields `0`.  Appending the result to the input makes the
/// checksum of the whole sequence zero, which is how a received frame can be
/// verified in one pass.
///
/// # Examples
///
/// ```rust
/// use k1_core::checksum;
///
/// assert_eq!(checksum(&[]), 0x00);
/// assert_eq!(checksum(&[0x35, 0x30, 0x05, 0x12]), 0x12);
/// ```
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc ^ b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_of_empty_slice_is_zero() {
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn test_checksum_of_single_byte_is_that_byte() {
        assert_eq!(checksum(&[0xA5]), 0xA5);
    }

    #[test]
    fn test_checksum_of_motor_stop_all_request() {
        // Arrange – header, motor controller, length 5, stop-all
        let bytes = [0x35, 0x30, 0x05, 0x12];

        // Act
        let sum = checksum(&bytes);

        // Assert – 0x35 ^ 0x30 = 0x05, ^ 0x05 = 0x00, ^ 0x12 = 0x12
        assert_eq!(sum, 0x12);
    }

    #[test]
    fn test_checksum_appended_makes_total_zero() {
        // Arrange
        let mut bytes = vec![0x35, 0x26, 0x06, 0x11, 0x01];

        // Act
        bytes.push(checksum(&bytes));

        // Assert
        assert_eq!(checksum(&bytes), 0);
    }

    #[test]
    fn test_checksum_of_repeated_pair_cancels() {
        assert_eq!(checksum(&[0x7F, 0x7F]), 0);
    }
}
