//! Human-readable hex dumps of K1 frames for diagnostic logging.
//!
//! Both dump types borrow the raw bytes and render lazily through
//! [`Display`](fmt::Display), so building one costs nothing when the log line
//! is filtered out.

use std::fmt;

use crate::protocol::frame::MIN_FRAME_LEN;

/// Renders a request frame field by field.
///
/// ```rust
/// use k1_core::RequestDump;
///
/// let frame = [0x35, 0x30, 0x06, 0x13, 0x12, 0x02];
/// assert_eq!(
///     RequestDump(&frame).to_string(),
///     "[ hdr=0x35 cntrl=0x30 len=0x06 cmd=0x13 data=[0x12] chksum=0x02 ]"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequestDump<'a>(pub &'a [u8]);

/// Renders a response frame field by field.
///
/// Responses carry no command slot, so everything between the length field
/// and the checksum is shown as `data`.
#[derive(Debug, Clone, Copy)]
pub struct ResponseDump<'a>(pub &'a [u8]);

impl fmt::Display for RequestDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        if b.len() < MIN_FRAME_LEN {
            return write_byte_list(f, b);
        }
        write!(
            f,
            "[ hdr=0x{:02X} cntrl=0x{:02X} len=0x{:02X} cmd=0x{:02X} data=",
            b[0], b[1], b[2], b[3]
        )?;
        write_byte_list(f, &b[4..b.len() - 1])?;
        write!(f, " chksum=0x{:02X} ]", b[b.len() - 1])
    }
}

impl fmt::Display for ResponseDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.0;
        if b.len() < MIN_FRAME_LEN {
            return write_byte_list(f, b);
        }
        write!(
            f,
            "[ hdr=0x{:02X} cntrl=0x{:02X} len=0x{:02X} data=",
            b[0], b[1], b[2]
        )?;
        write_byte_list(f, &b[3..b.len() - 1])?;
        write!(f, " chksum=0x{:02X} ]", b[b.len() - 1])
    }
}

fn write_byte_list(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("[")?;
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "0x{byte:02X}")?;
    }
    f.write_str("]")
}
