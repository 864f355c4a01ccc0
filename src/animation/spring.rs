use crate::foundation::error::{VideoBookError, VideoBookResult};

/// Longest simulated step; larger frame durations are split into several steps.
const MAX_STEP_SECS: f64 = 0.064;
/// Safety cap for [`measure_spring`].
const MEASURE_MAX_FRAMES: u64 = 1_000_000;

/// Damped harmonic oscillator parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringConfig {
    pub damping: f64,
    pub stiffness: f64,
    pub mass: f64,
    /// Clamp the curve at 1 instead of letting it overshoot.
    #[serde(default)]
    pub overshoot_clamping: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            stiffness: 100.0,
            mass: 1.0,
            overshoot_clamping: false,
        }
    }
}

impl SpringConfig {
    /// Curve used for caption scroll steps.
    pub const CAPTION_SCROLL: Self = Self {
        damping: 100.0,
        stiffness: 100.0,
        mass: 1.0,
        overshoot_clamping: false,
    };

    pub fn validate(&self) -> VideoBookResult<()> {
        if !(self.mass > 0.0) {
            return Err(VideoBookError::validation("spring mass must be > 0"));
        }
        if !(self.stiffness > 0.0) {
            return Err(VideoBookError::validation("spring stiffness must be > 0"));
        }
        if !(self.damping >= 0.0) {
            return Err(VideoBookError::validation("spring damping must be >= 0"));
        }
        Ok(())
    }

    pub fn damping_ratio(&self) -> f64 {
        let k = self.stiffness.max(0.0);
        let m = self.mass.max(1e-9);
        self.damping.max(0.0) / (2.0 * (k * m).sqrt()).max(1e-9)
    }
}

/// Position and velocity of a spring travelling from 0 toward 1.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SpringState {
    current: f64,
    velocity: f64,
}

impl SpringState {
    const AT_REST: Self = Self {
        current: 0.0,
        velocity: 0.0,
    };

    fn is_settled(&self) -> bool {
        (1.0 - self.current).abs() < 1e-12 && self.velocity.abs() < 1e-12
    }

    /// Curve value of this state, clamped when the config asks for it.
    fn output(&self, config: &SpringConfig) -> f64 {
        let mut v = self.current;
        if config.overshoot_clamping {
            v = v.min(1.0);
        }
        if v.is_finite() { v } else { 0.0 }
    }

    /// Exact solution of the oscillator over `dt` seconds from the current state.
    fn advance(self, dt: f64, config: &SpringConfig) -> Self {
        let k = config.stiffness.max(0.0);
        let m = config.mass.max(1e-9);
        let w0 = (k / m).sqrt();
        if w0 == 0.0 || dt <= 0.0 {
            return self;
        }
        let zeta = config.damping_ratio();

        let v0 = -self.velocity;
        let x0 = 1.0 - self.current;
        let t = dt;

        if zeta < 1.0 {
            let w1 = w0 * (1.0 - zeta * zeta).sqrt();
            let s1 = (w1 * t).sin();
            let c1 = (w1 * t).cos();
            let envelope = (-zeta * w0 * t).exp();
            let frag = envelope * (s1 * ((v0 + zeta * w0 * x0) / w1) + x0 * c1);
            let velocity =
                zeta * w0 * frag - envelope * (c1 * (v0 + zeta * w0 * x0) - w1 * x0 * s1);
            Self {
                current: 1.0 - frag,
                velocity,
            }
        } else {
            // Critically damped response, also used for zeta > 1.
            let envelope = (-w0 * t).exp();
            Self {
                current: 1.0 - envelope * (x0 + (v0 + w0 * x0) * t),
                velocity: envelope * (v0 * (t * w0 - 1.0) + t * x0 * w0 * w0),
            }
        }
    }
}

/// Spring progress `frame` frames after the animation was triggered.
///
/// Starts at 0 and settles at 1. Negative frames clamp to 0, and the result is always finite.
pub fn spring(frame: f64, fps: f64, config: SpringConfig) -> f64 {
    if frame.is_nan() || !(fps > 0.0) {
        return 0.0;
    }
    let frame = frame.max(0.0);
    if frame.is_infinite() {
        return 1.0;
    }

    let step = 1.0 / fps;
    let state = if step <= MAX_STEP_SECS {
        // Steps compose exactly, so one step over the whole span is equivalent.
        SpringState::AT_REST.advance(frame / fps, &config)
    } else {
        let whole = frame.floor() as u64;
        let rest = frame - frame.floor();
        let mut state = SpringState::AT_REST;
        let mut last = 0.0;
        if whole == 0 {
            state = state.advance(rest / fps, &config);
        }
        for f in 1..=whole {
            let mut pos = f as f64;
            if f == whole {
                pos += rest;
            }
            let now = pos / fps;
            state = state.advance((now - last).min(MAX_STEP_SECS), &config);
            last = now;
            if state.is_settled() {
                break;
            }
        }
        state
    };

    state.output(&config)
}

/// Frames until the spring stays within `threshold` of its target.
///
/// A value must hold for 20 consecutive frames to count as settled. Returns `None` for curves that
/// never settle (e.g. zero damping). The state is advanced one frame at a time with the same step
/// bound as [`spring`].
pub fn measure_spring(fps: f64, config: SpringConfig, threshold: f64) -> Option<u64> {
    if !(fps > 0.0) || !(threshold > 0.0) {
        return None;
    }
    let dt = (1.0 / fps).min(MAX_STEP_SECS);
    let diff = |s: &SpringState| (1.0 - s.output(&config)).abs();

    let mut state = SpringState::AT_REST;
    let mut frame = 0u64;
    while diff(&state) >= threshold {
        state = state.advance(dt, &config);
        frame += 1;
        if frame > MEASURE_MAX_FRAMES {
            return None;
        }
    }

    let mut finished = frame;
    let mut stable = 0;
    while stable < 20 {
        state = state.advance(dt, &config);
        frame += 1;
        if frame > MEASURE_MAX_FRAMES {
            return None;
        }
        if diff(&state) >= threshold {
            stable = 0;
            finished = frame + 1;
        } else {
            stable += 1;
        }
    }
    Some(finished)
}
