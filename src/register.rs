//! Register map of the gripper and the codec between logical fields and wire bytes.
//!
//! Both directions use a block of three 16-bit registers (6 bytes):
//!
//! | byte | action request (write, `1000`) | status (read, `2000`)        |
//! |------|--------------------------------|------------------------------|
//! | 0    | `rACT` `rGTO` `rATR` `rARD`     | `gACT` `gGTO` `gSTA` `gOBJ`  |
//! | 1    | reserved                       | reserved                     |
//! | 2    | reserved                       | `kFLT` (high) / `gFLT` (low) |
//! | 3    | `rPR`                          | `gPR`                        |
//! | 4    | `rSP`                          | `gPO`                        |
//! | 5    | `rFR`                          | `gCU`                        |

use num::FromPrimitive;
use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

/// First register of the action request block.
pub const ACTION_REQUEST_ADDRESS: u16 = 1000;
/// First register of the status block.
pub const STATUS_ADDRESS: u16 = 2000;
/// Both blocks span 3 registers.
pub const BLOCK_REGISTERS: u16 = 3;
/// Both blocks span 6 bytes.
pub const BLOCK_BYTES: usize = 6;

/// Flag for `rACT` and `gACT`
const FLAG_ACT: u8 = 1 << 0;
/// Flag for `rGTO` and `gGTO`
const FLAG_GTO: u8 = 1 << 3;
/// Flag for `rATR`
const FLAG_ATR: u8 = 1 << 4;
/// Flag for `rARD`
const FLAG_ARD: u8 = 1 << 5;

/// Echo of the activation bit, `gACT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationStatus {
    Reset,
    Activated,
}

/// Echo of the go-to bit, `gGTO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionStatus {
    /// Stopped, or performing activation / automatic release.
    Idle,
    /// Go to position request.
    GoToActive,
}

/// The gripper's activation phase, `gSTA`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Serialize, Deserialize)]
pub enum GripperPhase {
    /// Gripper is in reset (or automatic release). See fault status if gripper is activated
    ResetOrAutoRelease,
    /// Activation in progress
    Activating,
    /// Not used by the 2F / Hand-E firmware
    ModeChange,
    /// Activation is completed
    Complete,
}

/// Object detection status, `gOBJ`, is a built-in feature that provides information
/// on possible object pick-up. Ignore if `gGTO == 0`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectStatus {
    /// Fingers are in motion towards requested position. No object detected
    Moving,
    /// Fingers have stopped due to a contact while opening before requested position.
    StoppedOuterObject,
    /// Fingers have stopped due to a contact while closing before requested position.
    StoppedInnerObject,
    /// Fingers are at requested position. No object detected or object has been lost/dropped.
    AtRequestedPosition,
}

impl ObjectStatus {
    pub fn detected_obj(&self) -> bool {
        matches!(
            self,
            ObjectStatus::StoppedOuterObject | ObjectStatus::StoppedInnerObject
        )
    }

    /// The fingers are no longer travelling.
    pub fn is_settled(&self) -> bool {
        !matches!(self, ObjectStatus::Moving)
    }
}

/// Direction of the automatic release routine, `rARD`.
///
/// `rARD = 1` is an opening release and `rARD = 0` a closing one, as in
/// Robotiq's register map. Some protocol summaries list the opposite polarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoReleaseDirection {
    #[default]
    Close,
    Open,
}

/// Named fault codes reported in the low nibble of the fault register (`gFLT`).
///
/// Fault LED is present on the gripper chassis, it can be blue, red or both
/// and be solid or blinking.
#[repr(u8)]
#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Serialize, Deserialize)]
pub enum GripperFault {
    /// No fault (solid blue LED)
    NoFault = 0x00,

    /// Action delayed. The activation (re-activation) must be completed prior to performing the action
    ActionDelay = 0x05,
    /// The activation bit must be set prior to performing the action
    NotActivated = 0x07,

    /// Maximum operating temperature exceeded (>= 85 degree celsius internally), let cool down (below 80 degree celsius)
    OverHeated = 0x08,
    /// No communication during at least 1 second.
    NoComm = 0x09,

    /// Under minimum operating voltage
    UnderVoltage = 0x0A,
    /// Automatic release in progress
    Releasing = 0x0B,
    /// Internal fault; contact support@robotiq.com
    InternalFault = 0x0C,
    /// Activation fault, verify that no interference or other error occurred.
    ActivationFault = 0x0D,
    /// Overcurrent triggered.
    OverCurrent = 0x0E,
    /// Automatic release completed
    AutomaticReleaseCompleted = 0x0F,
}

impl GripperFault {
    pub fn from_code(code: u8) -> Option<Self> {
        GripperFault::from_u8(code)
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl std::fmt::Display for GripperFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Robot Output / Functionalities
///
/// Written to the registers starting at `1000`, 6 bytes of data.
///
/// ## Reset
/// To reset the gripper send a request with `activate = false`.
///
/// ## Activating the gripper
/// To activate the gripper, send a request with `activate = true`.
/// `activate` needs to remain `true` in all following requests, otherwise the gripper will reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// `rACT`, clear it to reset the gripper and clear any fault status.
    ///
    /// ## Warning
    /// Setting `rACT` makes the gripper move to complete its activation routine.
    pub activate: bool,
    /// `rGTO` engages motion towards `position` with `speed` and `force`.
    /// The only motions performed without it are activation and automatic release.
    pub go_to: bool,
    /// `rATR` slowly moves the fingers until all axes reach their mechanical limits,
    /// overriding every other command except `rACT`.
    /// The gripper must be reactivated afterwards.
    pub auto_release: bool,
    /// `rARD`, should be set prior to or together with `rATR`.
    pub release_direction: AutoReleaseDirection,
    /// `rPR`, `0x00` is fully open and `0xFF` fully closed.
    pub position: u8,
    /// `rSP`, `0x00` minimum speed, `0xFF` maximum speed.
    pub speed: u8,
    /// `rFR`, fixes the maximum motor current and so the final grip force.
    pub force: u8,
}

impl ActionRequest {
    /// Create a new all-zero request, which resets the gripper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Activated go-to request with the given position, speed and force.
    pub fn go_to_position(position: u8, speed: u8, force: u8) -> Self {
        Self::new()
            .activate(true)
            .go_to(true)
            .position(position)
            .speed(speed)
            .force(force)
    }

    pub fn activate(mut self, b: bool) -> Self {
        self.activate = b;
        self
    }
    pub fn go_to(mut self, b: bool) -> Self {
        self.go_to = b;
        self
    }
    pub fn auto_release(mut self, b: bool) -> Self {
        self.auto_release = b;
        self
    }
    pub fn release_direction(mut self, direction: AutoReleaseDirection) -> Self {
        self.release_direction = direction;
        self
    }
    pub fn position(mut self, b: u8) -> Self {
        self.position = b;
        self
    }
    pub fn speed(mut self, b: u8) -> Self {
        self.speed = b;
        self
    }
    pub fn force(mut self, b: u8) -> Self {
        self.force = b;
        self
    }

    /// Wire bytes of the action request block.
    pub fn encode(&self) -> [u8; BLOCK_BYTES] {
        let mut req = 0;

        if self.activate {
            req |= FLAG_ACT;
        }
        if self.go_to {
            req |= FLAG_GTO;
        }
        if self.auto_release {
            req |= FLAG_ATR;
        }
        if self.release_direction == AutoReleaseDirection::Open {
            req |= FLAG_ARD;
        }

        [req, 0, 0, self.position, self.speed, self.force]
    }

    /// Recover the logical fields of an action request block, reserved bits are ignored.
    pub fn decode(bytes: &[u8; BLOCK_BYTES]) -> Self {
        let release_direction = if bytes[0] & FLAG_ARD != 0 {
            AutoReleaseDirection::Open
        } else {
            AutoReleaseDirection::Close
        };
        ActionRequest {
            activate: bytes[0] & FLAG_ACT != 0,
            go_to: bytes[0] & FLAG_GTO != 0,
            auto_release: bytes[0] & FLAG_ATR != 0,
            release_direction,
            position: bytes[3],
            speed: bytes[4],
            force: bytes[5],
        }
    }
}

/// Robot Input / Status of the gripper
///
/// Read from the registers starting at `2000`, 6 bytes of data.
/// A decoded status is a snapshot, every read produces a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GripperStatus {
    /// `gACT`, echo of the activation bit.
    pub activation: ActivationStatus,
    /// `gGTO`, echo of the go-to bit.
    pub motion: MotionStatus,
    /// `gSTA`, current activation phase of the gripper.
    pub gripper: GripperPhase,
    /// `gOBJ`, ignore if `motion == Idle`.
    pub object: ObjectStatus,
    /// `gFLT`, manufacturer fault code, `0` is no fault.
    pub fault_status: u8,
    /// `kFLT`, controller specific fault nibble.
    pub controller_fault: u8,
    /// `gPR`, echo of the last accepted requested position.
    pub requested_position: u8,
    /// `gPO`, actual position obtained via the encoders.
    pub current_position: u8,
    /// `gCU`, instantaneous motor current, roughly `10 * current` mA.
    pub current: u8,
}

impl GripperStatus {
    /// Decode a status block. Every bit pattern is accepted, reserved bits are ignored.
    pub fn decode(bytes: &[u8; BLOCK_BYTES]) -> Self {
        let activation = if bytes[0] & FLAG_ACT != 0 {
            ActivationStatus::Activated
        } else {
            ActivationStatus::Reset
        };
        let motion = if bytes[0] & FLAG_GTO != 0 {
            MotionStatus::GoToActive
        } else {
            MotionStatus::Idle
        };
        let gripper = match (bytes[0] >> 4) & 0b11 {
            0 => GripperPhase::ResetOrAutoRelease,
            1 => GripperPhase::Activating,
            2 => GripperPhase::ModeChange,
            _ => GripperPhase::Complete,
        };
        let object = match (bytes[0] >> 6) & 0b11 {
            0 => ObjectStatus::Moving,
            1 => ObjectStatus::StoppedOuterObject,
            2 => ObjectStatus::StoppedInnerObject,
            _ => ObjectStatus::AtRequestedPosition,
        };

        GripperStatus {
            activation,
            motion,
            gripper,
            object,
            fault_status: bytes[2] & 0x0F,
            controller_fault: bytes[2] >> 4,
            requested_position: bytes[3],
            current_position: bytes[4],
            current: bytes[5],
        }
    }

    /// Encode the status block as the device would report it.
    pub fn encode(&self) -> [u8; BLOCK_BYTES] {
        let mut head = (self.gripper as u8) << 4 | (self.object as u8) << 6;
        if self.activation == ActivationStatus::Activated {
            head |= FLAG_ACT;
        }
        if self.motion == MotionStatus::GoToActive {
            head |= FLAG_GTO;
        }
        [
            head,
            0,
            (self.controller_fault & 0x0F) << 4 | (self.fault_status & 0x0F),
            self.requested_position,
            self.current_position,
            self.current,
        ]
    }

    /// The named fault, if the code is one the manufacturer documents.
    pub fn fault(&self) -> Option<GripperFault> {
        GripperFault::from_code(self.fault_status)
    }

    pub fn object_detected(&self) -> bool {
        self.object.detected_obj()
    }

    pub fn is_activated(&self) -> bool {
        self.gripper == GripperPhase::Complete
    }

    pub fn approx_current_ma(&self) -> u32 {
        self.current as u32 * 10
    }
}

impl From<[u8; BLOCK_BYTES]> for GripperStatus {
    fn from(value: [u8; BLOCK_BYTES]) -> Self {
        GripperStatus::decode(&value)
    }
}

/// Which side of the sticky fault boundary a code falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultSeverity {
    None,
    /// Priority / informational faults, cleared by the device itself.
    Transient,
    /// Minor and major faults, cleared only by a reset and reactivation.
    Sticky,
}

/// Partition of the fault codes into transient and sticky bands.
///
/// Codes `>= sticky_from` require a reset (rising edge on `rACT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultBands {
    pub sticky_from: u8,
}

impl Default for FaultBands {
    fn default() -> Self {
        Self {
            sticky_from: GripperFault::OverHeated.code(),
        }
    }
}

impl FaultBands {
    pub fn classify(&self, code: u8) -> FaultSeverity {
        if code == 0 {
            FaultSeverity::None
        } else if code >= self.sticky_from {
            FaultSeverity::Sticky
        } else {
            FaultSeverity::Transient
        }
    }
}
