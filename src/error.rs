use thiserror::Error;

use crate::calibration::CalibrationError;
use crate::register::GripperFault;

/// Failures of a single Modbus transaction.
///
/// These are never retried by the driver, the caller decides whether a retry
/// is safe while the fingers may be moving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("modbus transaction timed out")]
    Timeout,
    #[error("malformed modbus response: {0}")]
    Malformed(String),
    #[error("serial link failure: {0}")]
    LinkFailure(String),
}

impl From<tokio_modbus::Error> for TransportError {
    fn from(err: tokio_modbus::Error) -> Self {
        match err {
            tokio_modbus::Error::Transport(io) => io.into(),
            other => TransportError::Malformed(other.to_string()),
        }
    }
}

impl From<tokio_modbus::Exception> for TransportError {
    fn from(exception: tokio_modbus::Exception) -> Self {
        TransportError::Malformed(format!("exception response: {exception}"))
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut => TransportError::Timeout,
            std::io::ErrorKind::InvalidData => TransportError::Malformed(err.to_string()),
            _ => TransportError::LinkFailure(err.to_string()),
        }
    }
}

/// Errors surfaced by the gripper session.
#[derive(Debug, Error)]
pub enum RobotiqError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("activation did not complete after {attempts} status reads")]
    ActivationTimeout { attempts: u32 },
    #[error("gripper did not settle after {attempts} status reads")]
    SettleTimeout { attempts: u32 },
    #[error("gripper fault 0x{0:02X} ({desc})", desc = describe_fault(.0))]
    DeviceFault(u8),
    #[error("gripper is not activated")]
    NotActivated,
    #[error("gripper is not calibrated")]
    NotCalibrated,
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error("std io error, serial comm error")]
    IOError(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

fn describe_fault(code: &u8) -> String {
    match GripperFault::from_code(*code) {
        Some(fault) => fault.to_string(),
        None => "unknown".to_string(),
    }
}
