//! The gripper session: activation, motion, fault tracking and mm positioning.

use std::time::Duration;

use crate::calibration::{CalibrationError, CalibrationMap};
use crate::client::ProtocolClient;
use crate::config::GripperConfig;
use crate::error::RobotiqError;
use crate::poll::{Pause, PollPolicy, TokioPause};
use crate::register::{
    ActionRequest, ActivationStatus, AutoReleaseDirection, FaultSeverity, GripperFault,
    GripperPhase, GripperStatus, MotionStatus, ObjectStatus,
};
use crate::transport::{ModbusRtuTransport, Transport};

/// Motion of an activated gripper, as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Idle,
    Moving,
    Stopped(ObjectStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultState {
    Ok,
    /// A sticky fault code, cleared only by [`RobotiqGripper::activate`].
    Fault(u8),
}

/// Session view of the gripper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripperState {
    Uninitialized,
    Resetting,
    Activating,
    Ready { motion: MotionState, fault: FaultState },
}

impl GripperState {
    pub fn is_ready(&self) -> bool {
        matches!(self, GripperState::Ready { .. })
    }

    pub fn fault(&self) -> Option<u8> {
        match self {
            GripperState::Ready {
                fault: FaultState::Fault(code),
                ..
            } => Some(*code),
            _ => None,
        }
    }
}

/// A session with one gripper over a [`Transport`].
///
/// Every operation takes `&mut self`, so one transaction is in flight at a
/// time. Put the session behind a mutex to drive it from several tasks.
pub struct RobotiqGripper<T = ModbusRtuTransport> {
    client: ProtocolClient<T>,
    config: GripperConfig,
    pause: Box<dyn Pause>,
    state: GripperState,
    last_status: Option<GripperStatus>,
    last_position_request: Option<u8>,
    calibration: Option<CalibrationMap>,
}

impl RobotiqGripper<ModbusRtuTransport> {
    /// Open the gripper on the serial port `path` with the default configuration.
    pub fn from_path(path: impl Into<String>) -> Result<Self, RobotiqError> {
        Self::from_config(path, GripperConfig::default())
    }

    pub fn from_config(path: impl Into<String>, config: GripperConfig) -> Result<Self, RobotiqError> {
        let transport = ModbusRtuTransport::open(path, &config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> RobotiqGripper<T> {
    pub fn new(transport: T, config: GripperConfig) -> Self {
        Self {
            client: ProtocolClient::new(transport, config.transaction_timeout()),
            config,
            pause: Box::new(TokioPause),
            state: GripperState::Uninitialized,
            last_status: None,
            last_position_request: None,
            calibration: None,
        }
    }

    /// Replace the wait between status polls.
    pub fn with_pause(mut self, pause: impl Pause + 'static) -> Self {
        self.pause = Box::new(pause);
        self
    }

    pub fn state(&self) -> GripperState {
        self.state
    }

    /// The most recent status read, if any.
    pub fn last_status(&self) -> Option<&GripperStatus> {
        self.last_status.as_ref()
    }

    pub fn config(&self) -> &GripperConfig {
        &self.config
    }

    pub fn calibration(&self) -> Option<&CalibrationMap> {
        self.calibration.as_ref()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    /// Restore a calibration recorded earlier, e.g. persisted by the application.
    pub fn set_calibration(&mut self, map: CalibrationMap) {
        self.calibration = Some(map);
    }

    /// Close the transport. The session is unusable afterwards.
    pub async fn disconnect(&mut self) -> Result<(), RobotiqError> {
        self.state = GripperState::Uninitialized;
        Ok(self.client.disconnect().await?)
    }

    /// Write a raw action request, bypassing the state checks.
    ///
    /// A go-to request becomes the position [`wait_until_settled`](Self::wait_until_settled) waits for.
    pub async fn write(&mut self, request: &ActionRequest) -> Result<(), RobotiqError> {
        self.client.write_action(request).await?;
        if !request.activate {
            self.last_position_request = None;
        } else if request.go_to && !request.auto_release {
            self.last_position_request = Some(request.position);
            if let GripperState::Ready { motion, .. } = &mut self.state {
                *motion = MotionState::Moving;
            }
        }
        Ok(())
    }

    /// Read the gripper status and fold it into the session state.
    pub async fn read_status(&mut self) -> Result<GripperStatus, RobotiqError> {
        let status = self.client.read_status().await?;
        self.observe(&status);
        self.last_status = Some(status);
        Ok(status)
    }

    fn observe(&mut self, status: &GripperStatus) {
        let severity = self.config.fault_bands().classify(status.fault_status);
        if severity == FaultSeverity::Transient {
            log::debug!(
                "transient fault 0x{:02X} ({:?})",
                status.fault_status,
                status.fault()
            );
        }

        let GripperState::Ready { motion, fault } = &mut self.state else {
            return;
        };
        if severity == FaultSeverity::Sticky && *fault != FaultState::Fault(status.fault_status) {
            log::warn!(
                "gripper fault 0x{:02X} ({:?}), reactivation required",
                status.fault_status,
                status.fault()
            );
            *fault = FaultState::Fault(status.fault_status);
        }
        if status.activation == ActivationStatus::Reset {
            log::info!("gripper reports reset, session needs activation");
            self.state = GripperState::Uninitialized;
            return;
        }
        *motion = match (status.motion, status.object) {
            (MotionStatus::Idle, _) => MotionState::Idle,
            (MotionStatus::GoToActive, ObjectStatus::Moving) => MotionState::Moving,
            (MotionStatus::GoToActive, object) => MotionState::Stopped(object),
        };
    }

    /// Poll the status until `done` holds, at most `policy.max_attempts` reads.
    async fn poll_status<F>(
        &mut self,
        policy: PollPolicy,
        mut done: F,
    ) -> Result<Option<GripperStatus>, RobotiqError>
    where
        F: FnMut(&GripperStatus) -> Result<bool, RobotiqError>,
    {
        for attempt in 1..=policy.max_attempts {
            let status = self.read_status().await?;
            if done(&status)? {
                log::debug!("poll condition met after {} reads", attempt);
                return Ok(Some(status));
            }
            if attempt < policy.max_attempts {
                self.pause.pause(policy.interval()).await;
            }
        }
        Ok(None)
    }

    /// Clear the activation bit, which also clears faults. The gripper must be activated again.
    pub async fn reset(&mut self) -> Result<&mut Self, RobotiqError> {
        self.client.write_action(&ActionRequest::new()).await?;
        self.state = GripperState::Uninitialized;
        self.last_position_request = None;
        Ok(self)
    }

    /// Reset and activate the gripper, waiting for the activation to complete.
    ///
    /// Does nothing when the session is already activated and fault free.
    ///
    /// ## Warning
    /// The activation makes the gripper fully open and close. The fingers must
    /// be able to move freely, do not command motion meanwhile.
    pub async fn activate(&mut self) -> Result<&mut Self, RobotiqError> {
        if let GripperState::Ready {
            fault: FaultState::Ok,
            ..
        } = self.state
        {
            log::debug!("gripper already activated");
            return Ok(self);
        }

        let policy = self.config.activation_poll;
        let bands = self.config.fault_bands();

        log::info!("resetting gripper");
        self.state = GripperState::Resetting;
        self.last_position_request = None;
        self.client.write_action(&ActionRequest::new()).await?;
        self.poll_status(policy, |status| {
            Ok(status.activation == ActivationStatus::Reset)
        })
        .await?
        .ok_or(RobotiqError::ActivationTimeout {
            attempts: policy.max_attempts,
        })?;

        log::info!("activating gripper");
        self.state = GripperState::Activating;
        let request = ActionRequest::new()
            .activate(true)
            .go_to(true)
            .speed(self.config.default_speed)
            .force(self.config.default_force);
        self.client.write_action(&request).await?;
        self.poll_status(policy, |status| {
            if bands.classify(status.fault_status) == FaultSeverity::Sticky {
                return Err(RobotiqError::DeviceFault(status.fault_status));
            }
            Ok(status.gripper == GripperPhase::Complete)
        })
        .await?
        .ok_or(RobotiqError::ActivationTimeout {
            attempts: policy.max_attempts,
        })?;

        self.state = GripperState::Ready {
            motion: MotionState::Idle,
            fault: FaultState::Ok,
        };
        self.last_position_request = Some(request.position);
        log::info!("activation completed");
        Ok(self)
    }

    pub async fn is_activated(&mut self) -> Result<bool, RobotiqError> {
        Ok(self.read_status().await?.is_activated())
    }

    fn ensure_ready(&self) -> Result<(), RobotiqError> {
        match self.state {
            GripperState::Ready {
                fault: FaultState::Fault(code),
                ..
            } => Err(RobotiqError::DeviceFault(code)),
            GripperState::Ready { .. } => Ok(()),
            _ => Err(RobotiqError::NotActivated),
        }
    }

    /// Command the gripper to go to `position` with `speed` and `force`.
    ///
    /// All three are codes in `0..=255`: position `0` is fully open and `255`
    /// fully closed, speed and force go from minimum to maximum. Returns as soon
    /// as the request is written, see [`wait_until_settled`](Self::wait_until_settled).
    pub async fn move_to(
        &mut self,
        position: u16,
        speed: u16,
        force: u16,
    ) -> Result<&mut Self, RobotiqError> {
        let position = code_argument("position", position)?;
        let speed = code_argument("speed", speed)?;
        let force = code_argument("force", force)?;
        self.ensure_ready()?;

        log::debug!(
            "go to position {} (speed {}, force {})",
            position,
            speed,
            force
        );
        self.client
            .write_action(&ActionRequest::go_to_position(position, speed, force))
            .await?;
        self.last_position_request = Some(position);
        if let GripperState::Ready { motion, .. } = &mut self.state {
            *motion = MotionState::Moving;
        }
        Ok(self)
    }

    /// Poll until the fingers stop, on an object or at the requested position.
    ///
    /// Object detection is not an error, inspect the returned status. A sticky
    /// fault ends the wait with [`RobotiqError::DeviceFault`].
    pub async fn wait_until_settled(
        &mut self,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<GripperStatus, RobotiqError> {
        let bands = self.config.fault_bands();
        let requested = self.last_position_request;
        self.poll_status(PollPolicy::new(poll_interval, max_attempts), |status| {
            if bands.classify(status.fault_status) == FaultSeverity::Sticky {
                return Err(RobotiqError::DeviceFault(status.fault_status));
            }
            // until gPR echoes the request, gOBJ still describes the previous motion
            let accepted = requested.map_or(true, |p| status.requested_position == p);
            Ok(accepted && status.object.is_settled())
        })
        .await?
        .ok_or(RobotiqError::SettleTimeout {
            attempts: max_attempts,
        })
    }

    /// [`move_to`](Self::move_to) and wait with the configured settle policy.
    pub async fn go_to_and_wait(
        &mut self,
        position: u16,
        speed: u16,
        force: u16,
    ) -> Result<GripperStatus, RobotiqError> {
        let policy = self.config.settle_poll;
        self.move_to(position, speed, force).await?;
        self.wait_until_settled(policy.interval(), policy.max_attempts)
            .await
    }

    /// Fully open at the default speed and force, waiting for the motion to end.
    pub async fn open(&mut self) -> Result<GripperStatus, RobotiqError> {
        let (speed, force) = self.default_motion();
        self.go_to_and_wait(0, speed, force).await
    }

    /// Fully close at the default speed and force, waiting for the motion to end.
    pub async fn close(&mut self) -> Result<GripperStatus, RobotiqError> {
        let (speed, force) = self.default_motion();
        self.go_to_and_wait(u8::MAX as u16, speed, force).await
    }

    fn default_motion(&self) -> (u16, u16) {
        (
            self.config.default_speed as u16,
            self.config.default_force as u16,
        )
    }

    /// Current finger position code.
    pub async fn read_position(&mut self) -> Result<u8, RobotiqError> {
        Ok(self.read_status().await?.current_position)
    }

    /// Current finger opening in millimeters. Requires a calibration.
    pub async fn read_position_mm(&mut self) -> Result<f64, RobotiqError> {
        let map = self.calibration.ok_or(RobotiqError::NotCalibrated)?;
        let code = self.read_position().await?;
        Ok(map.to_mm(code))
    }

    /// Go to an opening in millimeters at the default speed and force. Requires a calibration.
    pub async fn move_to_mm(&mut self, mm: f64) -> Result<&mut Self, RobotiqError> {
        let (speed, force) = self.default_motion();
        self.move_to_mm_with(mm, speed, force).await
    }

    pub async fn move_to_mm_with(
        &mut self,
        mm: f64,
        speed: u16,
        force: u16,
    ) -> Result<&mut Self, RobotiqError> {
        let map = self.calibration.ok_or(RobotiqError::NotCalibrated)?;
        let code = map.to_code(mm)?;
        self.move_to(code as u16, speed, force).await
    }

    /// Record the position codes of both extremes for mm positioning.
    ///
    /// `closed_mm` and `open_mm` are the distances between the fingers when the
    /// gripper is fully closed and fully open. The gripper opens, then closes,
    /// and must not meet any object on the way.
    pub async fn calibrate(
        &mut self,
        closed_mm: f64,
        open_mm: f64,
    ) -> Result<CalibrationMap, RobotiqError> {
        self.ensure_ready()?;

        let opened = self.open().await?;
        if opened.object_detected() {
            return Err(CalibrationError::Obstructed {
                position: opened.current_position,
            }
            .into());
        }
        let closed = self.close().await?;
        if closed.object_detected() {
            return Err(CalibrationError::Obstructed {
                position: closed.current_position,
            }
            .into());
        }

        let map = CalibrationMap::new(
            closed.current_position,
            closed_mm,
            opened.current_position,
            open_mm,
        )?
        .with_tolerance(self.config.calibration_tolerance);
        log::info!(
            "calibrated: closed {} mm at code {}, open {} mm at code {}",
            closed_mm,
            closed.current_position,
            open_mm,
            opened.current_position
        );
        self.calibration = Some(map);
        Ok(map)
    }

    /// Start the automatic release routine.
    ///
    /// The fingers slowly move in `direction` until the mechanical limits.
    /// Afterwards the gripper reports a fault and must be activated again.
    pub async fn automatic_release(
        &mut self,
        direction: AutoReleaseDirection,
    ) -> Result<&mut Self, RobotiqError> {
        if !self.state.is_ready() {
            return Err(RobotiqError::NotActivated);
        }
        log::warn!("automatic release towards {:?}", direction);
        let request = ActionRequest::new()
            .activate(true)
            .auto_release(true)
            .release_direction(direction);
        self.client.write_action(&request).await?;
        Ok(self)
    }

    /// Await the end of the automatic release routine.
    pub async fn await_automatic_release(&mut self) -> Result<GripperStatus, RobotiqError> {
        let policy = self.config.settle_poll;
        let bands = self.config.fault_bands();
        self.poll_status(policy, |status| match status.fault() {
            Some(GripperFault::AutomaticReleaseCompleted) => Ok(true),
            Some(GripperFault::Releasing) => Ok(false),
            _ if bands.classify(status.fault_status) == FaultSeverity::Sticky => {
                Err(RobotiqError::DeviceFault(status.fault_status))
            }
            _ => Ok(false),
        })
        .await?
        .ok_or(RobotiqError::SettleTimeout {
            attempts: policy.max_attempts,
        })
    }
}

fn code_argument(name: &str, value: u16) -> Result<u8, RobotiqError> {
    u8::try_from(value).map_err(|_| {
        RobotiqError::InvalidArgument(format!("{name} {value} is outside 0..=255"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::mock::SimulatedGripper;
    use crate::poll::NoPause;

    fn session(sim: &SimulatedGripper) -> RobotiqGripper<SimulatedGripper> {
        RobotiqGripper::new(sim.clone(), GripperConfig::default()).with_pause(NoPause)
    }

    #[tokio::test]
    async fn activation_resets_then_activates() {
        let sim = SimulatedGripper::new();
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();

        let writes = sim.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0], ActionRequest::new());
        assert!(writes[1].activate && writes[1].go_to);
        assert_eq!(
            gripper.state(),
            GripperState::Ready {
                motion: MotionState::Idle,
                fault: FaultState::Ok
            }
        );
    }

    #[tokio::test]
    async fn activation_times_out() {
        let sim = SimulatedGripper::new().with_activation_reads(1000);
        let mut config = GripperConfig::default();
        config.activation_poll.max_attempts = 5;
        let mut gripper = RobotiqGripper::new(sim.clone(), config).with_pause(NoPause);

        assert!(matches!(
            gripper.activate().await,
            Err(RobotiqError::ActivationTimeout { attempts: 5 })
        ));
        assert_eq!(gripper.state(), GripperState::Activating);
    }

    #[tokio::test]
    async fn motion_requires_activation() {
        let sim = SimulatedGripper::new();
        let mut gripper = session(&sim);
        assert!(matches!(
            gripper.move_to(10, 10, 10).await,
            Err(RobotiqError::NotActivated)
        ));
        assert_eq!(sim.write_count(), 0);
    }

    #[tokio::test]
    async fn rejects_codes_above_255() {
        let sim = SimulatedGripper::new();
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();
        let writes = sim.write_count();

        for (position, speed, force) in [(256, 0, 0), (0, 300, 0), (0, 0, u16::MAX)] {
            assert!(matches!(
                gripper.move_to(position, speed, force).await,
                Err(RobotiqError::InvalidArgument(_))
            ));
        }
        assert_eq!(sim.write_count(), writes);
    }

    #[tokio::test]
    async fn move_does_not_block() {
        let sim = SimulatedGripper::new();
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();
        let reads = sim.read_count();

        gripper.move_to(200, 255, 255).await.unwrap();
        assert_eq!(sim.read_count(), reads);
        assert_eq!(
            gripper.state(),
            GripperState::Ready {
                motion: MotionState::Moving,
                fault: FaultState::Ok
            }
        );

        let status = gripper
            .wait_until_settled(Duration::ZERO, 10)
            .await
            .unwrap();
        assert_eq!(status.object, ObjectStatus::AtRequestedPosition);
        assert_eq!(status.current_position, 200);
        assert_eq!(
            gripper.state(),
            GripperState::Ready {
                motion: MotionState::Stopped(ObjectStatus::AtRequestedPosition),
                fault: FaultState::Ok
            }
        );
    }

    #[tokio::test]
    async fn settle_times_out() {
        let sim = SimulatedGripper::new().with_motion_reads(50);
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();
        gripper.move_to(255, 255, 255).await.unwrap();
        assert!(matches!(
            gripper.wait_until_settled(Duration::ZERO, 3).await,
            Err(RobotiqError::SettleTimeout { attempts: 3 })
        ));
    }

    #[tokio::test]
    async fn transient_fault_is_telemetry_only() {
        let sim = SimulatedGripper::new();
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();

        sim.inject_fault(GripperFault::ActionDelay.code());
        let status = gripper.read_status().await.unwrap();
        assert_eq!(status.fault(), Some(GripperFault::ActionDelay));
        assert_eq!(gripper.state().fault(), None);
        gripper.move_to(100, 100, 100).await.unwrap();
    }

    #[tokio::test]
    async fn external_reset_drops_readiness() {
        let sim = SimulatedGripper::new();
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();

        let mut other = sim.clone();
        other
            .write(
                crate::register::ACTION_REQUEST_ADDRESS,
                &ActionRequest::new().encode(),
            )
            .await
            .unwrap();
        gripper.read_status().await.unwrap();
        assert_eq!(gripper.state(), GripperState::Uninitialized);
    }

    #[tokio::test]
    async fn broken_link_surfaces_transport_error() {
        let sim = SimulatedGripper::new();
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();
        sim.break_link();

        assert!(matches!(
            gripper.move_to(1, 1, 1).await,
            Err(RobotiqError::Transport(TransportError::LinkFailure(_)))
        ));
        assert!(matches!(
            gripper.read_status().await,
            Err(RobotiqError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn mm_operations_need_calibration() {
        let sim = SimulatedGripper::new();
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();
        let reads = sim.read_count();

        assert!(matches!(
            gripper.move_to_mm(10.0).await,
            Err(RobotiqError::NotCalibrated)
        ));
        assert!(matches!(
            gripper.read_position_mm().await,
            Err(RobotiqError::NotCalibrated)
        ));
        assert_eq!(sim.read_count(), reads);
    }

    #[tokio::test]
    async fn calibration_fails_on_obstacle() {
        let sim = SimulatedGripper::new().with_obstacle(128);
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();

        assert!(matches!(
            gripper.calibrate(0.0, 85.0).await,
            Err(RobotiqError::Calibration(CalibrationError::Obstructed { position: 128 }))
        ));
        assert!(!gripper.is_calibrated());
    }

    #[tokio::test]
    async fn automatic_release_ends_in_fault() {
        let sim = SimulatedGripper::new();
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();

        gripper
            .automatic_release(AutoReleaseDirection::Open)
            .await
            .unwrap();
        let status = gripper.await_automatic_release().await.unwrap();
        assert_eq!(status.fault(), Some(GripperFault::AutomaticReleaseCompleted));
        assert_eq!(status.current_position, 0);
        assert_eq!(
            gripper.state().fault(),
            Some(GripperFault::AutomaticReleaseCompleted.code())
        );

        gripper.activate().await.unwrap();
        assert_eq!(gripper.state().fault(), None);
    }

    #[tokio::test]
    async fn automatic_release_wait_ignores_transient_faults() {
        let sim = SimulatedGripper::new();
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();
        gripper
            .automatic_release(AutoReleaseDirection::Open)
            .await
            .unwrap();

        let releasing = GripperStatus {
            activation: ActivationStatus::Activated,
            motion: MotionStatus::Idle,
            gripper: GripperPhase::ResetOrAutoRelease,
            object: ObjectStatus::Moving,
            fault_status: GripperFault::Releasing.code(),
            controller_fault: 0,
            requested_position: 0,
            current_position: 40,
            current: 0,
        };
        sim.queue_status(releasing);
        sim.queue_status(GripperStatus {
            fault_status: GripperFault::ActionDelay.code(),
            ..releasing
        });
        sim.queue_status(GripperStatus {
            fault_status: 0x03,
            ..releasing
        });
        sim.queue_status(GripperStatus {
            fault_status: GripperFault::AutomaticReleaseCompleted.code(),
            current_position: 0,
            ..releasing
        });

        let status = gripper.await_automatic_release().await.unwrap();
        assert_eq!(status.fault(), Some(GripperFault::AutomaticReleaseCompleted));
        assert!(sim.read_count() >= 4);
    }

    #[tokio::test]
    async fn automatic_release_wait_stops_on_other_sticky_fault() {
        let sim = SimulatedGripper::new();
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();
        gripper
            .automatic_release(AutoReleaseDirection::Close)
            .await
            .unwrap();
        sim.inject_fault(GripperFault::OverCurrent.code());

        assert!(matches!(
            gripper.await_automatic_release().await,
            Err(RobotiqError::DeviceFault(0x0E))
        ));
    }

    #[tokio::test]
    async fn raw_go_to_request_is_awaited() {
        let sim = SimulatedGripper::new();
        let mut gripper = session(&sim);
        gripper.activate().await.unwrap();

        gripper
            .write(&ActionRequest::go_to_position(180, 255, 255))
            .await
            .unwrap();
        assert_eq!(
            gripper.state(),
            GripperState::Ready {
                motion: MotionState::Moving,
                fault: FaultState::Ok
            }
        );
        let status = gripper
            .wait_until_settled(Duration::ZERO, 5)
            .await
            .unwrap();
        assert_eq!(status.requested_position, 180);
        assert_eq!(status.current_position, 180);
    }
}
