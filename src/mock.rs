//! A simulated gripper behind the [`Transport`] trait.
//!
//! The simulation keeps the register blocks of a 2F gripper and advances its
//! activation and motion by one step per status read, so sessions can be
//! exercised without hardware and without real delays (pair it with
//! [`NoPause`](crate::poll::NoPause)).
//!
//! The handle is cheap to clone; keep a clone to inspect the device after
//! handing one to a session.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::TransportError;
use crate::register::{
    ActionRequest, ActivationStatus, AutoReleaseDirection, FaultBands, FaultSeverity,
    GripperFault, GripperPhase, GripperStatus, MotionStatus, ObjectStatus, ACTION_REQUEST_ADDRESS,
    BLOCK_BYTES, BLOCK_REGISTERS, STATUS_ADDRESS,
};
use crate::transport::Transport;

#[derive(Debug)]
struct Device {
    request: ActionRequest,
    phase: GripperPhase,
    object: ObjectStatus,
    fault: u8,
    position: u8,
    target: u8,
    steps_left: u32,
    releasing: bool,

    activation_reads: u32,
    motion_reads: u32,
    open_limit: u8,
    closed_limit: u8,
    obstacle: Option<u8>,

    writes: Vec<ActionRequest>,
    reads: usize,
    queued: VecDeque<GripperStatus>,
    failures: VecDeque<TransportError>,
    broken: bool,
}

impl Device {
    fn is_active(&self) -> bool {
        self.request.activate && self.phase == GripperPhase::Complete
    }

    fn apply(&mut self, request: ActionRequest) {
        let rising = request.activate && !self.request.activate;
        self.request = request;

        if !request.activate {
            self.phase = GripperPhase::ResetOrAutoRelease;
            self.object = ObjectStatus::Moving;
            self.fault = 0;
            self.steps_left = 0;
            self.releasing = false;
            return;
        }
        if rising {
            self.phase = GripperPhase::Activating;
            self.object = ObjectStatus::Moving;
            self.fault = 0;
            self.steps_left = self.activation_reads;
            if self.steps_left == 0 {
                self.finish_activation();
            }
            return;
        }
        if !self.is_active() || FaultBands::default().classify(self.fault) == FaultSeverity::Sticky {
            return;
        }
        if request.auto_release {
            self.releasing = true;
            self.phase = GripperPhase::ResetOrAutoRelease;
            self.fault = GripperFault::Releasing.code();
            self.target = match request.release_direction {
                AutoReleaseDirection::Open => self.open_limit,
                AutoReleaseDirection::Close => self.closed_limit,
            };
            self.steps_left = self.motion_reads.max(1);
        } else if request.go_to {
            self.start_motion(request.position);
        }
    }

    fn finish_activation(&mut self) {
        self.phase = GripperPhase::Complete;
        // activation ends after a full open/close stroke, resting open
        self.position = self.open_limit;
        if self.request.go_to {
            self.start_motion(self.request.position);
        }
    }

    fn start_motion(&mut self, requested: u8) {
        self.target = requested.clamp(self.open_limit, self.closed_limit);
        self.object = ObjectStatus::Moving;
        self.steps_left = self.motion_reads;
        if self.steps_left == 0 {
            self.finish_motion();
        }
    }

    fn finish_motion(&mut self) {
        let from = self.position;
        let to = self.target;
        match self.obstacle {
            Some(obstacle) if from < obstacle && obstacle < to => {
                self.position = obstacle;
                self.object = ObjectStatus::StoppedInnerObject;
            }
            Some(obstacle) if to < obstacle && obstacle < from => {
                self.position = obstacle;
                self.object = ObjectStatus::StoppedOuterObject;
            }
            _ => {
                self.position = to;
                self.object = ObjectStatus::AtRequestedPosition;
            }
        }
    }

    /// Advance one step and report the resulting status.
    fn step(&mut self) -> GripperStatus {
        if self.steps_left > 0 {
            self.steps_left -= 1;
            if self.steps_left == 0 {
                if self.phase == GripperPhase::Activating {
                    self.finish_activation();
                } else if self.releasing {
                    self.position = self.target;
                    self.fault = GripperFault::AutomaticReleaseCompleted.code();
                } else {
                    self.finish_motion();
                }
            } else if self.phase == GripperPhase::Complete {
                let midway = (self.position as u16 + self.target as u16) / 2;
                self.position = midway as u8;
            }
        }

        let status = self.status();
        if FaultBands::default().classify(self.fault) == FaultSeverity::Transient {
            self.fault = 0;
        }
        status
    }

    fn status(&self) -> GripperStatus {
        let moving = self.steps_left > 0;
        GripperStatus {
            activation: if self.request.activate {
                ActivationStatus::Activated
            } else {
                ActivationStatus::Reset
            },
            motion: if self.request.activate && self.request.go_to {
                MotionStatus::GoToActive
            } else {
                MotionStatus::Idle
            },
            gripper: self.phase,
            object: self.object,
            fault_status: self.fault,
            controller_fault: 0,
            requested_position: self.request.position,
            current_position: self.position,
            current: if moving { 0x20 } else { 0x00 },
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedGripper {
    device: Arc<Mutex<Device>>,
}

impl Default for SimulatedGripper {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedGripper {
    /// A powered, reset gripper with a full `0..=255` stroke.
    pub fn new() -> Self {
        Self {
            device: Arc::new(Mutex::new(Device {
                request: ActionRequest::new(),
                phase: GripperPhase::ResetOrAutoRelease,
                object: ObjectStatus::Moving,
                fault: 0,
                position: 0,
                target: 0,
                steps_left: 0,
                releasing: false,
                activation_reads: 3,
                motion_reads: 2,
                open_limit: 0,
                closed_limit: u8::MAX,
                obstacle: None,
                writes: Vec::new(),
                reads: 0,
                queued: VecDeque::new(),
                failures: VecDeque::new(),
                broken: false,
            })),
        }
    }

    fn device(&self) -> MutexGuard<'_, Device> {
        self.device.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Encoder codes the fingers report at the mechanical stops.
    pub fn with_stroke_limits(self, open: u8, closed: u8) -> Self {
        {
            let mut device = self.device();
            device.open_limit = open;
            device.closed_limit = closed;
            device.position = open;
        }
        self
    }

    /// Status reads an activation takes to complete.
    pub fn with_activation_reads(self, reads: u32) -> Self {
        self.device().activation_reads = reads;
        self
    }

    /// Status reads a go-to motion takes to complete.
    pub fn with_motion_reads(self, reads: u32) -> Self {
        self.device().motion_reads = reads;
        self
    }

    /// Place an object at `code`; motions crossing it stop there.
    pub fn with_obstacle(self, code: u8) -> Self {
        self.device().obstacle = Some(code);
        self
    }

    /// Raise a fault code, sticky codes stay until the next reset.
    pub fn inject_fault(&self, code: u8) {
        self.device().fault = code & 0x0F;
    }

    /// Report these statuses on the next reads instead of simulating.
    pub fn queue_status(&self, status: GripperStatus) {
        self.device().queued.push_back(status);
    }

    /// Fail the next transaction with `err`.
    pub fn fail_next(&self, err: TransportError) {
        self.device().failures.push_back(err);
    }

    /// Every following transaction fails as if the cable were unplugged.
    pub fn break_link(&self) {
        self.device().broken = true;
    }

    /// Every action request written so far.
    pub fn writes(&self) -> Vec<ActionRequest> {
        self.device().writes.clone()
    }

    pub fn write_count(&self) -> usize {
        self.device().writes.len()
    }

    pub fn read_count(&self) -> usize {
        self.device().reads
    }

    pub fn last_request(&self) -> Option<ActionRequest> {
        self.device().writes.last().copied()
    }

    /// Current finger position code.
    pub fn position(&self) -> u8 {
        self.device().position
    }

    fn check_link(device: &mut Device) -> Result<(), TransportError> {
        if device.broken {
            return Err(TransportError::LinkFailure("simulated link is down".into()));
        }
        match device.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Transport for SimulatedGripper {
    async fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), TransportError> {
        let mut device = self.device();
        Self::check_link(&mut device)?;
        let block = match (address, <&[u8; BLOCK_BYTES]>::try_from(bytes)) {
            (ACTION_REQUEST_ADDRESS, Ok(block)) => block,
            _ => {
                return Err(TransportError::Malformed(format!(
                    "illegal data address {} ({} bytes)",
                    address,
                    bytes.len()
                )))
            }
        };
        let request = ActionRequest::decode(block);
        device.writes.push(request);
        device.apply(request);
        Ok(())
    }

    async fn read(&mut self, address: u16, count: u16) -> Result<Vec<u8>, TransportError> {
        let mut device = self.device();
        Self::check_link(&mut device)?;
        if address != STATUS_ADDRESS || count != BLOCK_REGISTERS {
            return Err(TransportError::Malformed(format!(
                "illegal data address {} ({} registers)",
                address, count
            )));
        }
        device.reads += 1;
        let status = match device.queued.pop_front() {
            Some(status) => status,
            None => device.step(),
        };
        Ok(status.encode().to_vec())
    }
}
