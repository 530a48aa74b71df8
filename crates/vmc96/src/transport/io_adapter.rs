//! [`Transport`] over any blocking byte stream.
//!
//! Serial port handles usually implement [`Read`] and [`Write`] and report a
//! read timeout as an error.  The driver polls instead, so a timed-out read
//! is just an empty one here.

use std::io::{self, Read, Write};

use super::Transport;

/// Adapts a blocking `Read + Write` stream (e.g. an already configured serial
/// port) to the [`Transport`] trait.
#[derive(Debug)]
pub struct IoTransport<S> {
    stream: S,
}

impl<S: Read + Write> IoTransport<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Write> Transport for IoTransport<S> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()
    }

    fn read(&mut self, max_len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; max_len];
        match self.stream.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if is_no_data(e.kind()) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

fn is_no_data(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// In-memory stream: reads come from `input`, writes land in `output`.
    struct FakePort {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
        read_error: Option<io::ErrorKind>,
    }

    impl FakePort {
        fn with_input(input: &[u8]) -> Self {
            Self {
                input: Cursor::new(input.to_vec()),
                output: Vec::new(),
                read_error: None,
            }
        }
    }

    impl Read for FakePort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.read_error {
                Some(kind) => Err(io::Error::new(kind, "fake port")),
                None => self.input.read(buf),
            }
        }
    }

    impl Write for FakePort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_forwards_whole_frame() {
        // Arrange
        let mut transport = IoTransport::new(FakePort::with_input(&[]));

        // Act
        transport.write(&[0x35, 0x30, 0x05, 0x12, 0x12]).expect("write failed");

        // Assert
        assert_eq!(transport.get_ref().output, vec![0x35, 0x30, 0x05, 0x12, 0x12]);
    }

    #[test]
    fn test_read_returns_available_bytes_up_to_limit() {
        let mut transport = IoTransport::new(FakePort::with_input(&[1, 2, 3, 4, 5]));
        assert_eq!(transport.read(3).expect("read failed"), vec![1, 2, 3]);
        assert_eq!(transport.read(255).expect("read failed"), vec![4, 5]);
    }

    #[test]
    fn test_read_at_end_of_stream_is_empty() {
        let mut transport = IoTransport::new(FakePort::with_input(&[]));
        assert!(transport.read(255).expect("read failed").is_empty());
    }

    #[test]
    fn test_read_timeout_is_empty_not_error() {
        // Arrange
        let mut port = FakePort::with_input(&[]);
        port.read_error = Some(io::ErrorKind::TimedOut);
        let mut transport = IoTransport::new(port);

        // Act
        let result = transport.read(255);

        // Assert
        assert!(result.expect("timeout must not be an error").is_empty());
    }

    #[test]
    fn test_read_hard_failure_propagates() {
        let mut port = FakePort::with_input(&[]);
        port.read_error = Some(io::ErrorKind::BrokenPipe);
        let mut transport = IoTransport::new(port);

        let err = transport.read(255).expect_err("broken pipe must surface");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_purge_defaults_to_noop() {
        let mut transport = IoTransport::new(FakePort::with_input(&[9]));
        transport.purge().expect("purge failed");
        assert_eq!(transport.read(1).expect("read failed"), vec![9]);
    }

    #[test]
    fn test_into_inner_returns_stream() {
        let transport = IoTransport::new(FakePort::with_input(&[]));
        let port = transport.into_inner();
        assert!(port.output.is_empty());
    }
}
