//! Session configuration, loadable from JSON.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RobotiqError;
use crate::poll::PollPolicy;
use crate::register::FaultBands;
use crate::transport::{ModbusRtuTransport, StatusFunction};

/// Settings of a gripper session. Missing JSON keys take the defaults.
///
/// ```
/// use robotiq_rs::GripperConfig;
///
/// let config = GripperConfig::from_json_str(r#"{ "slave_id": 10, "sticky_fault_from": 10 }"#).unwrap();
/// assert_eq!(config.slave_id, 10);
/// assert_eq!(config.baud_rate, 115_200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripperConfig {
    /// Modbus slave id of the gripper.
    pub slave_id: u8,
    pub baud_rate: u32,
    /// Upper bound of a single request/response transaction.
    pub transaction_timeout_ms: u64,
    /// Function code used to read the status block.
    pub status_function: StatusFunction,
    /// Polling of the reset and activation phases.
    pub activation_poll: PollPolicy,
    /// Polling of motions started by the driver itself (calibration, `go_to_and_wait`).
    pub settle_poll: PollPolicy,
    /// Fault codes at or above this value are sticky.
    pub sticky_fault_from: u8,
    /// Extrapolation allowed beyond `[0, 255]`, in position codes, before `to_code` rejects a value.
    pub calibration_tolerance: f64,
    pub default_speed: u8,
    pub default_force: u8,
}

impl Default for GripperConfig {
    fn default() -> Self {
        Self {
            slave_id: ModbusRtuTransport::DEFAULT_SLAVE_ID,
            baud_rate: ModbusRtuTransport::DEFAULT_BAUD_RATE,
            transaction_timeout_ms: 500,
            status_function: StatusFunction::default(),
            activation_poll: PollPolicy::default(),
            settle_poll: PollPolicy::default(),
            sticky_fault_from: FaultBands::default().sticky_from,
            calibration_tolerance: 0.0,
            default_speed: u8::MAX,
            default_force: u8::MAX,
        }
    }
}

impl GripperConfig {
    pub fn from_json_str(json: &str) -> Result<Self, RobotiqError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RobotiqError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_millis(self.transaction_timeout_ms)
    }

    pub fn fault_bands(&self) -> FaultBands {
        FaultBands {
            sticky_from: self.sticky_fault_from,
        }
    }
}
