//! Kernel version payload returned by every controller.

/// Extracts the firmware version text from a kernel-version payload.
///
/// The first byte is the controller's status byte; the rest is ASCII text,
/// possibly NUL-padded.  Invalid UTF-8 is replaced rather than rejected since
/// the string is informational only.
///
/// ```rust
/// use k1_core::decode_version;
///
/// assert_eq!(decode_version(b"\x00K1-2.04\0\0"), "K1-2.04");
/// assert_eq!(decode_version(&[]), "");
/// ```
pub fn decode_version(payload: &[u8]) -> String {
    let text = payload.get(1..).unwrap_or_default();
    String::from_utf8_lossy(text)
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}
