//! Request/response round trips over a [`Transport`].
//!
//! One call to [`CommandExecutor::execute`] is one complete exchange:
//!
//! ```text
//! encode ─► log ─► purge ─► write ─► poll read (≤ N attempts) ─► log ─► decode
//! ```
//!
//! The board answers asynchronously, so the executor sleeps and re-reads
//! until something arrives.  Running out of attempts is not an error by
//! itself: the empty buffer is handed to the decoder, which rejects it with
//! [`ProtocolError::InvalidLength`](k1_core::ProtocolError::InvalidLength).
//!
//! Broadcasts can be answered by several controllers, in unframed chunks
//! that trickle in one after another.  They use a separate, slower policy and
//! keep reading after the first chunk until the link goes quiet.

use std::thread;
use std::time::Duration;

use k1_core::protocol::{controller, MAX_FRAME_LEN};
use k1_core::{
    decode_broadcast_response, decode_response, encode_request, RequestDump, ResponseDump,
};
use tracing::{debug, trace, warn};

use crate::cancellation::CancellationToken;
use crate::error::Vmc96Error;
use crate::log_sink::{LogSink, NoopSink};
use crate::transport::Transport;

/// Default number of read attempts per command.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Default pause before each read attempt.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_millis(10);

/// Default number of read attempts for a broadcast.
pub const DEFAULT_BROADCAST_MAX_ATTEMPTS: u32 = 10;

/// Default pause before each broadcast read attempt.
pub const DEFAULT_BROADCAST_DELAY: Duration = Duration::from_millis(300);

/// How long to wait for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Read attempts before giving up.
    pub max_attempts: u32,
    /// Sleep before each attempt.  Zero disables sleeping.
    pub delay: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// The long wait used for broadcast commands.
    pub fn broadcast() -> Self {
        Self::new(DEFAULT_BROADCAST_MAX_ATTEMPTS, DEFAULT_BROADCAST_DELAY)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_DELAY)
    }
}

/// Drives request/response exchanges over an owned transport.
pub struct CommandExecutor<T> {
    transport: T,
    policy: PollPolicy,
    broadcast_policy: PollPolicy,
    log_sink: Box<dyn LogSink + Send>,
    cancellation: CancellationToken,
}

impl<T: Transport> CommandExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            policy: PollPolicy::default(),
            broadcast_policy: PollPolicy::broadcast(),
            log_sink: Box::new(NoopSink),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_broadcast_policy(mut self, policy: PollPolicy) -> Self {
        self.broadcast_policy = policy;
        self
    }

    pub fn with_log_sink(mut self, sink: impl LogSink + Send + 'static) -> Self {
        self.log_sink = Box::new(sink);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn broadcast_policy(&self) -> PollPolicy {
        self.broadcast_policy
    }

    /// Handle to the token checked while polling; clone it to cancel from
    /// elsewhere.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Sends `command` with `args` to `controller_id` and returns the
    /// validated response payload.
    ///
    /// # Errors
    ///
    /// - [`Vmc96Error::Encode`] if `args` do not fit in a frame.
    /// - [`Vmc96Error::Transport`] if the transport fails.
    /// - [`Vmc96Error::Cancelled`] if the token fires while polling.
    /// - [`Vmc96Error::Protocol`] if the response does not validate,
    ///   including no response at all.
    pub fn execute(
        &mut self,
        controller_id: u8,
        command: u8,
        args: &[u8],
    ) -> Result<Vec<u8>, Vmc96Error> {
        let request = encode_request(controller_id, command, args)?;
        let raw = self.round_trip(&request, false)?;

        let payload = decode_response(controller_id, &raw).map_err(|e| {
            debug!("response from 0x{controller_id:02X} rejected: {e}");
            e
        })?;
        Ok(payload.to_vec())
    }

    /// Sends `command` to every controller on the bus.
    ///
    /// Broadcast answers are not framed.  After the first chunk arrives the
    /// executor keeps reading until a read comes back empty, and returns all
    /// chunks joined in arrival order.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute); an empty answer is
    /// [`ProtocolError::InvalidLength`](k1_core::ProtocolError::InvalidLength).
    pub fn execute_broadcast(&mut self, command: u8, args: &[u8]) -> Result<Vec<u8>, Vmc96Error> {
        let request = encode_request(controller::BROADCAST, command, args)?;
        let raw = self.round_trip(&request, true)?;
        decode_broadcast_response(&raw)?;
        Ok(raw)
    }

    fn round_trip(&mut self, request: &[u8], broadcast: bool) -> Result<Vec<u8>, Vmc96Error> {
        self.log_sink.log(&format!("K1 request: {}", RequestDump(request)));
        debug!("sending {}", RequestDump(request));

        self.transport.purge()?;
        self.transport.write(request)?;

        let raw = if broadcast {
            self.collect_broadcast()?
        } else {
            self.poll_response(self.policy)?
        };

        self.log_sink.log(&format!("K1 response: {}", ResponseDump(&raw)));
        debug!("received {}", ResponseDump(&raw));
        Ok(raw)
    }

    fn poll_response(&mut self, policy: PollPolicy) -> Result<Vec<u8>, Vmc96Error> {
        for attempt in 1..=policy.max_attempts {
            self.wait(policy.delay)?;

            let bytes = self.transport.read(MAX_FRAME_LEN)?;
            if !bytes.is_empty() {
                return Ok(bytes);
            }
            trace!("poll attempt {attempt}/{}: no data", policy.max_attempts);
        }

        warn!(
            "no response after {} attempts ({:?} apart)",
            policy.max_attempts, policy.delay
        );
        Ok(Vec::new())
    }

    /// Polls for the first answer, then drains further chunks until a read
    /// is empty or the attempt budget is spent.
    fn collect_broadcast(&mut self) -> Result<Vec<u8>, Vmc96Error> {
        let policy = self.broadcast_policy;
        let mut raw = self.poll_response(policy)?;
        if raw.is_empty() {
            return Ok(raw);
        }

        for _ in 1..policy.max_attempts {
            self.wait(self.policy.delay)?;
            let chunk = self.transport.read(MAX_FRAME_LEN)?;
            if chunk.is_empty() {
                break;
            }
            trace!("broadcast answer continues with {} bytes", chunk.len());
            raw.extend_from_slice(&chunk);
        }
        Ok(raw)
    }

    fn wait(&self, delay: Duration) -> Result<(), Vmc96Error> {
        self.check_cancelled()?;
        if !delay.is_zero() {
            thread::sleep(delay);
            self.check_cancelled()?;
        }
        Ok(())
    }

    fn check_cancelled(&self) -> Result<(), Vmc96Error> {
        if self.cancellation.is_cancelled() {
            warn!("command cancelled while waiting for a response");
            return Err(Vmc96Error::Cancelled);
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
