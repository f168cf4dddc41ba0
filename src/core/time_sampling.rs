//! Scene timing: mapping host frame indices to seconds.

use serde::{Deserialize, Serialize};

use crate::util::{Chrono, Error, Frame, Result};

/// Frame-rate configuration of a scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneTiming {
    /// First frame of the scene range; maps to time 0.
    pub frame_start: Frame,
    /// Frames per second.
    pub fps: f64,
}

impl Default for SceneTiming {
    fn default() -> Self {
        Self {
            frame_start: 1,
            fps: 24.0,
        }
    }
}

impl SceneTiming {
    /// Create timing, rejecting non-positive or non-finite frame rates.
    pub fn new(frame_start: Frame, fps: f64) -> Result<Self> {
        let timing = Self { frame_start, fps };
        timing.validate()?;
        Ok(timing)
    }

    /// Check that the frame rate can be divided by.
    pub fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        Ok(())
    }

    /// Time in seconds of a frame: `(frame - frame_start) / fps`.
    #[inline]
    pub fn frame_to_time(&self, frame: Frame) -> Chrono {
        (frame - self.frame_start) as Chrono / self.fps
    }
}
