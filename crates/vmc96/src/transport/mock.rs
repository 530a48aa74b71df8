//! Scripted transport for tests and offline development.
//!
//! Queue up what the board should answer, run driver operations, then
//! inspect the frames that were written.

use std::collections::VecDeque;
use std::io;

use k1_core::checksum;
use k1_core::protocol::HEADER;

use super::Transport;

/// A [`Transport`] that replays queued reads and records writes.
///
/// When the queue runs dry every further read is empty, which looks like a
/// board that never answers.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    reads: VecDeque<Result<Vec<u8>, io::ErrorKind>>,
    written: Vec<Vec<u8>>,
    write_error: Option<io::ErrorKind>,
    read_calls: usize,
    purge_calls: usize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues raw bytes for one read.
    pub fn push_read(&mut self, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.reads.push_back(Ok(bytes.into()));
        self
    }

    /// Queues `count` reads that return nothing.
    pub fn push_empty_reads(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.reads.push_back(Ok(Vec::new()));
        }
        self
    }

    /// Queues a well-formed K1 response from `controller_id` carrying `data`.
    pub fn push_response(&mut self, controller_id: u8, data: &[u8]) -> &mut Self {
        let mut frame = Vec::with_capacity(data.len() + 4);
        frame.push(HEADER);
        frame.push(controller_id);
        frame.push((data.len() + 4) as u8);
        frame.extend_from_slice(data);
        frame.push(checksum(&frame));
        self.push_read(frame)
    }

    /// Queues a read that fails with `kind`.
    pub fn push_read_error(&mut self, kind: io::ErrorKind) -> &mut Self {
        self.reads.push_back(Err(kind));
        self
    }

    /// Makes every subsequent write fail with `kind`.
    pub fn fail_writes(&mut self, kind: io::ErrorKind) -> &mut Self {
        self.write_error = Some(kind);
        self
    }

    /// Every frame written so far, oldest first.
    pub fn written(&self) -> &[Vec<u8>] {
        &self.written
    }

    /// The most recently written frame.
    pub fn last_written(&self) -> Option<&[u8]> {
        self.written.last().map(Vec::as_slice)
    }

    /// Number of times [`Transport::read`] was called.
    pub fn read_calls(&self) -> usize {
        self.read_calls
    }

    /// Number of times [`Transport::purge`] was called.
    pub fn purge_calls(&self) -> usize {
        self.purge_calls
    }

    /// Queued reads not yet consumed.
    pub fn pending_reads(&self) -> usize {
        self.reads.len()
    }
}

impl Transport for ScriptedTransport {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if let Some(kind) = self.write_error {
            return Err(io::Error::new(kind, "scripted write failure"));
        }
        self.written.push(bytes.to_vec());
        Ok(())
    }

    fn read(&mut self, max_len: usize) -> io::Result<Vec<u8>> {
        self.read_calls += 1;
        match self.reads.pop_front() {
            Some(Ok(mut bytes)) => {
                bytes.truncate(max_len);
                Ok(bytes)
            }
            Some(Err(kind)) => Err(io::Error::new(kind, "scripted read failure")),
            None => Ok(Vec::new()),
        }
    }

    fn purge(&mut self) -> io::Result<()> {
        self.purge_calls += 1;
        Ok(())
    }
}
