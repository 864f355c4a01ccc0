use crate::animation::interpolate::{InterpolateOpts, interpolate2};
use crate::animation::spring::{SpringConfig, spring};
use crate::captions::entry::{CaptionEntry, CaptionSet};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::math::finite_or_zero;
use crate::scroll::highlight::{Highlight, classify_all};

/// Illustration overlay shown at a frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IllustrationRef {
    pub index: usize,
    pub asset: String,
}

/// Everything the presentation layer needs for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameState {
    pub frame: FrameIndex,
    pub time_secs: f64,
    pub current_index: Option<usize>,
    pub illustration: Option<IllustrationRef>,
    pub highlights: Vec<Highlight>,
    pub scroll_offset: f64,
}

/// Per-frame caption scroll and highlight evaluation.
///
/// Every query is a pure function of the frame, so seeking in either direction re-evaluates all
/// scroll steps from scratch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEngine {
    fps: Fps,
    spring: SpringConfig,
}

impl ScrollEngine {
    pub fn new(fps: Fps) -> Self {
        Self {
            fps,
            spring: SpringConfig::CAPTION_SCROLL,
        }
    }

    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn time_at(&self, frame: FrameIndex) -> f64 {
        self.fps.frames_to_secs(frame.0)
    }

    pub fn current_index(&self, captions: &CaptionSet, frame: FrameIndex) -> Option<usize> {
        captions.last_started(self.time_at(frame))
    }

    /// First illustration whose window contains the frame time.
    pub fn active_illustration<'a>(
        &self,
        illustrations: &'a CaptionSet,
        frame: FrameIndex,
    ) -> Option<(usize, &'a CaptionEntry)> {
        illustrations.first_containing(self.time_at(frame))
    }

    /// Scroll delta contributed by entry `i` at `frame`.
    ///
    /// Animates from the previous entry's target to this entry's target, starting at the entry's
    /// start frame. Entries without a target contribute nothing.
    pub fn contribution(
        &self,
        captions: &CaptionSet,
        targets: &[Option<f64>],
        i: usize,
        frame: FrameIndex,
    ) -> f64 {
        let (Some(entry), Some(Some(to))) = (captions.get(i), targets.get(i)) else {
            return 0.0;
        };
        let from = if i == 0 {
            0.0
        } else {
            targets.get(i - 1).copied().flatten().unwrap_or(0.0)
        };
        let diff = finite_or_zero(to - from);

        let fps = self.fps.as_f64();
        let start_frame = self.fps.secs_to_frames(entry.start);
        let progress = spring(frame.0 as f64 - start_frame, fps, self.spring);
        finite_or_zero(interpolate2(
            progress,
            [0.0, 1.0],
            [0.0, diff],
            InterpolateOpts::CLAMP,
        ))
    }

    /// Total scroll offset: sum of contributions of every started entry.
    pub fn scroll_offset(
        &self,
        captions: &CaptionSet,
        targets: &[Option<f64>],
        frame: FrameIndex,
    ) -> f64 {
        let Some(current) = self.current_index(captions, frame) else {
            return 0.0;
        };
        if targets.len() != captions.len() {
            return 0.0;
        }
        let total: f64 = (0..=current)
            .map(|i| self.contribution(captions, targets, i, frame))
            .sum();
        finite_or_zero(total)
    }

    pub fn evaluate(
        &self,
        captions: &CaptionSet,
        illustrations: &CaptionSet,
        targets: &[Option<f64>],
        frame: FrameIndex,
    ) -> FrameState {
        let time_secs = self.time_at(frame);
        let current_index = captions.last_started(time_secs);
        let illustration = self
            .active_illustration(illustrations, frame)
            .map(|(index, e)| IllustrationRef {
                index,
                asset: e.text.clone(),
            });

        FrameState {
            frame,
            time_secs,
            current_index,
            illustration,
            highlights: classify_all(captions, current_index, time_secs),
            scroll_offset: self.scroll_offset(captions, targets, frame),
        }
    }
}
