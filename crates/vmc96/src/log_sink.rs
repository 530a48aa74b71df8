//! Frame-dump log sink.
//!
//! The executor hands every outgoing and incoming frame to a [`LogSink`] as a
//! formatted dump.  The sink is chosen when the device is constructed;
//! [`NoopSink`] is used when none is given.

/// Receives one formatted line per request and per response.
#[cfg_attr(test, mockall::automock)]
pub trait LogSink {
    fn log(&self, message: &str);
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn log(&self, _message: &str) {}
}

/// Forwards messages to `tracing` at debug level under the `vmc96::k1`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str) {
        tracing::debug!(target: "vmc96::k1", "{message}");
    }
}

impl<F: Fn(&str)> LogSink for F {
    fn log(&self, message: &str) {
        self(message)
    }
}
