//! Byte transport between the driver and the board.
//!
//! The board sits behind a USB-to-serial bridge.  Opening the device and
//! setting line parameters happen outside this crate; the driver only needs
//! something that can write a frame and hand back whatever bytes have
//! arrived.
//!
//! # Testability
//!
//! [`ScriptedTransport`] replays canned responses and records every frame
//! written, so the whole driver can be exercised without hardware.

use std::io;

pub mod io_adapter;
pub mod mock;

pub use io_adapter::IoTransport;
pub use mock::ScriptedTransport;

/// Raw byte access to the serial link.
///
/// Implementations must not treat "no data yet" as an error: [`read`]
/// returns an empty vector and the executor polls again.
///
/// [`read`]: Transport::read
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Writes a complete request frame.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Returns up to `max_len` bytes that have arrived, possibly none.
    fn read(&mut self, max_len: usize) -> io::Result<Vec<u8>>;

    /// Discards any stale input before a new request goes out.
    fn purge(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes)
    }

    fn read(&mut self, max_len: usize) -> io::Result<Vec<u8>> {
        (**self).read(max_len)
    }

    fn purge(&mut self) -> io::Result<()> {
        (**self).purge()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes)
    }

    fn read(&mut self, max_len: usize) -> io::Result<Vec<u8>> {
        (**self).read(max_len)
    }

    fn purge(&mut self) -> io::Result<()> {
        (**self).purge()
    }
}
