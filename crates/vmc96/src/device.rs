//! Typed operations on the VMC96 board.
//!
//! [`Vmc96`] owns a [`CommandExecutor`] and turns each board operation into
//! one K1 exchange, decoding the payload where the command returns data.
//!
//! Two controllers live on the board:
//!
//! | Controller | Address | Commands |
//! |-----------|---------|----------|
//! | relay `n` | `0x26 + n` | control, reset, ping, version |
//! | motor array | `0x30` | run, pair run, stop all, reset, opto, scan, setup, status, pulse, ping, version |
//!
//! Global commands go to the broadcast address `0x00`.
//!
//! Motors can be addressed by raw id (`0xRC`, 1-based row and column
//! nibbles) or by zero-based grid coordinate with the `_at` variants, which
//! reject positions outside the 8 x 12 grid before anything is sent.

use k1_core::protocol::{command, controller, motor_id, swap_nibbles};
use k1_core::{
    decode_motor_status, decode_opto_status, decode_scan_array, decode_version, MotorStatus,
    ScanResult, SensorBitmap,
};
use tracing::debug;

use crate::cancellation::CancellationToken;
use crate::config::DeviceConfig;
use crate::error::Vmc96Error;
use crate::executor::{CommandExecutor, PollPolicy};
use crate::log_sink::LogSink;
use crate::transport::Transport;

/// Driver for one VMC96 board.
///
/// Boards wired with the motor grid mirrored take motor ids with their
/// nibbles swapped; construct with [`with_inverted_array`](Self::with_inverted_array)
/// (or `inverted_array = true` in the config) and callers keep using the
/// logical id.
pub struct Vmc96<T> {
    executor: CommandExecutor<T>,
    inverted_array: bool,
}

impl<T: Transport> Vmc96<T> {
    pub fn new(transport: T) -> Self {
        Self {
            executor: CommandExecutor::new(transport),
            inverted_array: false,
        }
    }

    /// Builds a driver with the board and polling settings from `config`.
    pub fn with_config(transport: T, config: &DeviceConfig) -> Self {
        Self::new(transport)
            .with_inverted_array(config.device.inverted_array)
            .with_poll_policy(config.polling.policy())
            .with_broadcast_policy(config.polling.broadcast_policy())
    }

    pub fn with_inverted_array(mut self, inverted: bool) -> Self {
        self.inverted_array = inverted;
        self
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.executor = self.executor.with_policy(policy);
        self
    }

    pub fn with_broadcast_policy(mut self, policy: PollPolicy) -> Self {
        self.executor = self.executor.with_broadcast_policy(policy);
        self
    }

    pub fn with_log_sink(mut self, sink: impl LogSink + Send + 'static) -> Self {
        self.executor = self.executor.with_log_sink(sink);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.executor = self.executor.with_cancellation(token);
        self
    }

    pub fn is_inverted_array(&self) -> bool {
        self.inverted_array
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        self.executor.cancellation_token()
    }

    /// Low-level access for commands without a typed wrapper.
    pub fn executor_mut(&mut self) -> &mut CommandExecutor<T> {
        &mut self.executor
    }

    pub fn transport(&self) -> &T {
        self.executor.transport()
    }

    pub fn into_transport(self) -> T {
        self.executor.into_transport()
    }

    // ── Motor array ───────────────────────────────────────────────────────────

    /// Runs one motor.
    pub fn motor_run(&mut self, motor_id: u8) -> Result<(), Vmc96Error> {
        let id = self.physical_motor_id(motor_id);
        self.motor(command::motor::RUN, &[id])?;
        Ok(())
    }

    /// Runs the motor at a zero-based grid coordinate.
    ///
    /// # Errors
    ///
    /// [`Vmc96Error::InvalidMotorCoordinates`] if `row >= 8` or `col >= 12`;
    /// nothing is sent in that case.
    pub fn motor_run_at(&mut self, row: u8, col: u8) -> Result<(), Vmc96Error> {
        let id = grid_motor_id(row, col)?;
        self.motor_run(id)
    }

    /// Runs two motors of the same row together in one command.
    ///
    /// # Errors
    ///
    /// [`Vmc96Error::InvalidMotorCoordinates`] for the first coordinate that
    /// lies outside the grid; nothing is sent in that case.
    pub fn motor_pair_run(&mut self, row: u8, col1: u8, col2: u8) -> Result<(), Vmc96Error> {
        let first = self.physical_motor_id(grid_motor_id(row, col1)?);
        let second = self.physical_motor_id(grid_motor_id(row, col2)?);
        self.motor(command::motor::RUN, &[first, second])?;
        Ok(())
    }

    pub fn motor_stop_all(&mut self) -> Result<(), Vmc96Error> {
        self.motor(command::motor::STOP_ALL, &[])?;
        Ok(())
    }

    pub fn motor_reset(&mut self) -> Result<(), Vmc96Error> {
        self.motor(command::motor::RESET, &[])?;
        Ok(())
    }

    /// Reads the 32 opto line sensors.
    ///
    /// # Errors
    ///
    /// [`Vmc96Error::InvalidOptoResponse`] unless the payload is exactly the
    /// echo byte `0x15` followed by four bitmap bytes.
    pub fn opto_sensor_read(&mut self) -> Result<SensorBitmap, Vmc96Error> {
        let payload = self.motor(command::motor::OPTO_LINE_STATUS, &[])?;
        decode_opto_status(&payload).map_err(Vmc96Error::InvalidOptoResponse)
    }

    /// Scans the motor grid for connected motors and measures the supply
    /// current.
    ///
    /// # Errors
    ///
    /// [`Vmc96Error::InvalidScanResponse`] if the payload is shorter than two
    /// bytes or does not start with the echo byte `0x11`.
    pub fn motor_scan_array(&mut self) -> Result<ScanResult, Vmc96Error> {
        let payload = self.motor(command::motor::SCAN_ARRAY, &[])?;
        decode_scan_array(&payload).map_err(Vmc96Error::InvalidScanResponse)
    }

    pub fn motor_ping(&mut self) -> Result<(), Vmc96Error> {
        self.motor(command::common::PING, &[])?;
        Ok(())
    }

    /// Firmware version string of the motor controller.
    pub fn motor_version(&mut self) -> Result<String, Vmc96Error> {
        let payload = self.motor(command::common::KERNEL_VERSION, &[])?;
        Ok(decode_version(&payload))
    }

    /// Selects the stepper driver mode.
    pub fn motor_driver_setup(&mut self, mode: u8) -> Result<(), Vmc96Error> {
        self.motor(command::motor::DRIVER_SETUP, &[mode])?;
        Ok(())
    }

    /// Supply current and the ids of the motors currently running, as the
    /// board reports them.
    ///
    /// # Errors
    ///
    /// [`Vmc96Error::InvalidStatusResponse`] if the payload is shorter than
    /// two bytes or does not start with the echo byte `0x10`.
    pub fn motor_status_request(&mut self) -> Result<MotorStatus, Vmc96Error> {
        let payload = self.motor(command::motor::STATUS_REQUEST, &[])?;
        decode_motor_status(&payload).map_err(Vmc96Error::InvalidStatusResponse)
    }

    /// Drives one motor for `duration_ms` milliseconds.
    pub fn motor_pulse(&mut self, motor_id: u8, duration_ms: u8) -> Result<(), Vmc96Error> {
        let id = self.physical_motor_id(motor_id);
        self.motor(command::motor::GIVE_PULSE, &[id, duration_ms])?;
        Ok(())
    }

    /// Drives the motor at a zero-based grid coordinate for `duration_ms`
    /// milliseconds.
    pub fn motor_pulse_at(&mut self, row: u8, col: u8, duration_ms: u8) -> Result<(), Vmc96Error> {
        let id = grid_motor_id(row, col)?;
        self.motor_pulse(id, duration_ms)
    }

    // ── Relays ────────────────────────────────────────────────────────────────

    /// Resets the relay controller.
    ///
    /// The reset always goes to the first relay controller (`0x26`);
    /// `relay_id` is accepted for symmetry with the other relay operations
    /// but does not select the target.
    pub fn relay_reset(&mut self, relay_id: u8) -> Result<(), Vmc96Error> {
        debug!("relay reset requested for relay {relay_id}, sent to base controller");
        self.executor
            .execute(controller::RELAY_BASE, command::relay::RESET, &[])?;
        Ok(())
    }

    /// Switches relay `relay_id` to `state`.
    pub fn relay_set_state(&mut self, relay_id: u8, state: u8) -> Result<(), Vmc96Error> {
        self.relay(relay_id, command::relay::CONTROL, &[state])?;
        Ok(())
    }

    pub fn relay_ping(&mut self, relay_id: u8) -> Result<(), Vmc96Error> {
        self.relay(relay_id, command::common::PING, &[])?;
        Ok(())
    }

    /// Firmware version string of relay controller `relay_id`.
    pub fn relay_version(&mut self, relay_id: u8) -> Result<String, Vmc96Error> {
        let payload = self.relay(relay_id, command::common::KERNEL_VERSION, &[])?;
        Ok(decode_version(&payload))
    }

    // ── Broadcast ─────────────────────────────────────────────────────────────

    /// Resets every controller on the bus.
    pub fn global_reset(&mut self) -> Result<(), Vmc96Error> {
        self.executor
            .execute_broadcast(command::global::RESET, &[command::global::RESET_ALL])?;
        Ok(())
    }

    /// Asks every controller to report address clashes; returns the raw
    /// answers of all controllers that replied, joined in arrival order.
    pub fn global_address_clash(&mut self) -> Result<Vec<u8>, Vmc96Error> {
        self.executor
            .execute_broadcast(command::global::ADDRESS_CLASH, &[])
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn physical_motor_id(&self, motor_id: u8) -> u8 {
        if self.inverted_array {
            swap_nibbles(motor_id)
        } else {
            motor_id
        }
    }

    fn motor(&mut self, command: u8, args: &[u8]) -> Result<Vec<u8>, Vmc96Error> {
        self.executor.execute(controller::MOTOR_ARRAY, command, args)
    }

    fn relay(&mut self, relay_id: u8, command: u8, args: &[u8]) -> Result<Vec<u8>, Vmc96Error> {
        let address = controller::relay(relay_id).ok_or(Vmc96Error::RelayOutOfRange(relay_id))?;
        self.executor.execute(address, command, args)
    }
}

fn grid_motor_id(row: u8, col: u8) -> Result<u8, Vmc96Error> {
    motor_id(row, col).ok_or(Vmc96Error::InvalidMotorCoordinates { row, col })
}
