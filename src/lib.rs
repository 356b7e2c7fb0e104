//! # Robotiq-rs
//!
//! [![Static Badge](https://img.shields.io/badge/crate-robotiq_rs-red)](https://crates.io/crates/robotiq-rs)
//! [![docs.rs](https://img.shields.io/docsrs/robotiq-rs)](https://docs.rs/robotiq-rs/latest/robotiq_rs/)
//!
//! `robotiq-rs` is a library for interfacing with robotiq gripper over Modbus RTU.
//! ### Compatible product
//! - [x] Robotiq 2F-85
//! - [x] Robotiq 2F-140
//! - [x] Hand-E
//! - [ ] 3-Finger Gripper
//! - [ ] Vacuum Gripper
//!
//! ## Example
//! ```no_run
//! use robotiq_rs::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), RobotiqError> {
//!     // create a connection to serial RS485 modbus
//!     let mut gripper = RobotiqGripper::from_path("/dev/ttyUSB0")?;
//!
//!     // reset then activate, the gripper will open and close.
//!     gripper.activate().await?;
//!
//!     // go to a position code, then poll until the fingers stop
//!     gripper.move_to(0x08, 0xFF, 0x80).await?;
//!     let status = gripper
//!         .wait_until_settled(std::time::Duration::from_millis(100), 50)
//!         .await?;
//!     println!("Object detected : {}", status.object_detected());
//!
//!     // record both extremes, then position in millimeters
//!     gripper.calibrate(0.0, 85.0).await?;
//!     gripper.move_to_mm(40.0).await?;
//!     println!("Opening : {:.1} mm", gripper.read_position_mm().await?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Testing without hardware
//! [`mock::SimulatedGripper`] implements [`Transport`] and, together with
//! [`NoPause`], drives a session through activation and motion instantly.

pub mod calibration;
pub mod client;
pub mod config;
pub mod error;
pub mod gripper;
pub mod mock;
pub mod poll;
pub mod register;
pub mod transport;

pub use calibration::{CalibrationError, CalibrationMap};
pub use client::ProtocolClient;
pub use config::GripperConfig;
pub use error::{RobotiqError, TransportError};
pub use gripper::{FaultState, GripperState, MotionState, RobotiqGripper};
pub use poll::{NoPause, Pause, PollPolicy, TokioPause};
pub use register::{
    ActionRequest, ActivationStatus, AutoReleaseDirection, FaultBands, FaultSeverity,
    GripperFault, GripperPhase, GripperStatus, MotionStatus, ObjectStatus,
};
pub use transport::{ModbusRtuTransport, StatusFunction, Transport};
