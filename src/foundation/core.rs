use crate::foundation::error::{VideoBookError, VideoBookResult};

/// Frames per second of the reference composition.
pub const COMPOSITION_FPS: u32 = 30;
/// Duration of the reference composition, in frames (63 seconds).
pub const DURATION_IN_FRAMES: u64 = 63 * COMPOSITION_FPS as u64;
/// Width of the reference composition, in pixels.
pub const COMPOSITION_WIDTH: u32 = 393;
/// Height of the reference composition, in pixels.
pub const COMPOSITION_HEIGHT: u32 = 600;

/// Zero-based video frame number.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> VideoBookResult<Self> {
        if den == 0 {
            return Err(VideoBookError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(VideoBookError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Fractional frame position of a timestamp (e.g. a caption start).
    pub fn secs_to_frames(self, secs: f64) -> f64 {
        secs * self.as_f64()
    }

    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self {
            num: COMPOSITION_FPS,
            den: 1,
        }
    }
}

/// Composition canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: COMPOSITION_WIDTH,
            height: COMPOSITION_HEIGHT,
        }
    }
}

impl Canvas {
    /// Square video section edge: 40% of the canvas height.
    pub fn video_size(self) -> f64 {
        f64::from(self.height) * 0.4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_frames_secs_roundtrip_floor() {
        let fps = Fps::new(30000, 1001).unwrap();
        let secs = fps.frames_to_secs(123);
        assert_eq!(fps.secs_to_frames_floor(secs), 123);
    }

    #[test]
    fn fps_rejects_zero_parts() {
        assert!(Fps::new(0, 1).is_err());
        assert!(Fps::new(30, 0).is_err());
    }

    #[test]
    fn composition_constants_match_reference() {
        assert_eq!(DURATION_IN_FRAMES, 1890);
        assert_eq!(Fps::default().as_f64(), 30.0);
        assert_eq!(Canvas::default().video_size(), 240.0);
    }
}
