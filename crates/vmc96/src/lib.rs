//! # vmc96
//!
//! Driver for the VMC96 vending controller board: a bank of relays and a
//! stepper-motor array, both reached through one USB-to-serial bridge and
//! spoken to with K1 frames (see the `k1-core` crate).
//!
//! The driver is synchronous.  Each operation writes one request, polls the
//! link until the board answers, validates the frame and decodes the payload.
//!
//! ```rust
//! use vmc96::{ScriptedTransport, Vmc96};
//!
//! let mut link = ScriptedTransport::new();
//! link.push_response(0x30, &[0x11, 0x80, 0x01]);
//!
//! let mut board = Vmc96::new(link);
//! let scan = board.motor_scan_array().unwrap();
//! assert_eq!(scan.available_motors, vec!["0x18", "0x21"]);
//! ```
//!
//! # Architecture overview
//!
//! - **`transport`** – The [`Transport`] trait the driver talks through, an
//!   adapter for any `Read + Write` stream and a scripted double.
//! - **`executor`** – One request/response round trip with polling,
//!   cancellation and frame logging.
//! - **`device`** – [`Vmc96`], the typed board operations.
//! - **`config`** – TOML settings for board wiring and polling.
//!
//! Diagnostics go through `tracing`; no subscriber is installed here.

pub mod cancellation;
pub mod config;
pub mod device;
pub mod error;
pub mod executor;
pub mod log_sink;
pub mod transport;

pub use cancellation::CancellationToken;
pub use config::{BoardConfig, ConfigError, DeviceConfig, PollingConfig};
pub use device::Vmc96;
pub use error::Vmc96Error;
pub use executor::{CommandExecutor, PollPolicy};
pub use log_sink::{LogSink, NoopSink, TracingSink};
pub use transport::{IoTransport, ScriptedTransport, Transport};

pub use k1_core::{MotorStatus, ProtocolError, ScanResult, SensorBitmap, ShapeError};
