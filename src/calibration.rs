//! Two-point linear mapping between position codes and finger opening in millimeters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Absorbs float noise when checking the code range.
const RANGE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    #[error("calibration reference points coincide (codes {closed_code}/{open_code}, {closed_mm}/{open_mm} mm)")]
    DegenerateReference {
        closed_code: u8,
        open_code: u8,
        closed_mm: f64,
        open_mm: f64,
    },
    #[error("{mm} mm maps to position code {code:.1}, outside the calibrated range [0, 255]")]
    OutOfRange { mm: f64, code: f64 },
    #[error("calibration stroke stopped on an object at position code {position}")]
    Obstructed { position: u8 },
}

/// Reference points recorded by a calibration run.
///
/// `closed_code` and `open_code` are the encoder codes the gripper reported at
/// its closed and open extremes, `closed_mm` / `open_mm` the opening measured
/// there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationMap {
    closed_code: u8,
    closed_mm: f64,
    open_code: u8,
    open_mm: f64,
    #[serde(default)]
    tolerance: f64,
}

impl CalibrationMap {
    pub fn new(
        closed_code: u8,
        closed_mm: f64,
        open_code: u8,
        open_mm: f64,
    ) -> Result<Self, CalibrationError> {
        if closed_code == open_code || !(closed_mm - open_mm).is_normal() {
            return Err(CalibrationError::DegenerateReference {
                closed_code,
                open_code,
                closed_mm,
                open_mm,
            });
        }
        Ok(Self {
            closed_code,
            closed_mm,
            open_code,
            open_mm,
            tolerance: 0.0,
        })
    }

    /// Allow `to_code` to extrapolate up to `codes` beyond `[0, 255]`, clamping the result.
    pub fn with_tolerance(mut self, codes: f64) -> Self {
        self.tolerance = codes.max(0.0);
        self
    }

    pub fn closed(&self) -> (u8, f64) {
        (self.closed_code, self.closed_mm)
    }

    pub fn open(&self) -> (u8, f64) {
        (self.open_code, self.open_mm)
    }

    /// Millimeters per position code, negative when the opening shrinks as the code grows.
    fn slope(&self) -> f64 {
        (self.open_mm - self.closed_mm) / (self.open_code as f64 - self.closed_code as f64)
    }

    pub fn to_mm(&self, code: u8) -> f64 {
        self.closed_mm + (code as f64 - self.closed_code as f64) * self.slope()
    }

    /// Inverse of [`to_mm`](Self::to_mm), rounded to the nearest code.
    pub fn to_code(&self, mm: f64) -> Result<u8, CalibrationError> {
        let code = self.closed_code as f64 + (mm - self.closed_mm) / self.slope();
        let limit = self.tolerance + RANGE_EPSILON;
        if !code.is_finite() || code < -limit || code > u8::MAX as f64 + limit {
            return Err(CalibrationError::OutOfRange { mm, code });
        }
        Ok(code.round().clamp(0.0, u8::MAX as f64) as u8)
    }
}
