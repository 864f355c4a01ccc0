//! Caption column geometry.
//!
//! A [`LayoutSnapshot`] is the measured position of every caption block inside the scrolling
//! container. It is derived data: rebuild it whenever the entry list or viewport changes and use
//! [`LayoutTracker`] to skip redundant updates.

pub mod stack;
pub mod text;

use crate::foundation::core::Canvas;

/// Top margin above the video section.
const VIDEO_SECTION_MARGIN_TOP: f64 = 8.0;

/// Measured geometry of one caption block.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntryRect {
    /// Pixels from the container origin.
    pub top: f64,
    pub height: f64,
}

/// Size of the caption scroll container.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Caption area of the video book page: everything below the video section.
    pub fn subtitle_area(canvas: Canvas) -> Self {
        let used = canvas.video_size() + VIDEO_SECTION_MARGIN_TOP;
        Self {
            width: f64::from(canvas.width),
            height: (f64::from(canvas.height) - used).max(0.0),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutSnapshot {
    pub container_height: f64,
    pub entries: Vec<EntryRect>,
}

impl LayoutSnapshot {
    /// Scroll offset that vertically centers each entry in the container.
    ///
    /// Returns an empty list when the snapshot does not describe `entry_count` entries or the
    /// container has no height. Entries without a usable measurement have no target.
    pub fn target_offsets(&self, entry_count: usize) -> Vec<Option<f64>> {
        let container = self.container_height;
        if self.entries.is_empty()
            || self.entries.len() != entry_count
            || !container.is_finite()
            || container <= 0.0
        {
            return Vec::new();
        }

        self.entries
            .iter()
            .map(|r| {
                if !r.height.is_finite() || r.height <= 0.0 || !r.top.is_finite() {
                    return None;
                }
                Some(container / 2.0 - r.top - r.height / 2.0)
            })
            .collect()
    }

    /// Content hash used for change detection.
    pub fn fingerprint(&self) -> u64 {
        let mut bytes = Vec::with_capacity(8 + self.entries.len() * 16);
        bytes.extend_from_slice(&self.container_height.to_bits().to_le_bytes());
        for r in &self.entries {
            bytes.extend_from_slice(&r.top.to_bits().to_le_bytes());
            bytes.extend_from_slice(&r.height.to_bits().to_le_bytes());
        }
        xxhash_rust::xxh3::xxh3_64(&bytes)
    }
}

/// Holds the latest snapshot and its derived targets.
///
/// Targets are recomputed only when an incoming snapshot differs from the current one.
#[derive(Debug, Default)]
pub struct LayoutTracker {
    snapshot: LayoutSnapshot,
    fingerprint: Option<u64>,
    targets: Vec<Option<f64>>,
}

impl LayoutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a new measurement. Returns `true` when it replaced the previous one.
    pub fn update(&mut self, snapshot: LayoutSnapshot) -> bool {
        let fp = snapshot.fingerprint();
        if self.fingerprint == Some(fp) && self.snapshot == snapshot {
            return false;
        }
        tracing::debug!(
            entries = snapshot.entries.len(),
            container_height = snapshot.container_height,
            "caption layout changed"
        );
        self.targets = snapshot.target_offsets(snapshot.entries.len());
        self.snapshot = snapshot;
        self.fingerprint = Some(fp);
        true
    }

    pub fn snapshot(&self) -> &LayoutSnapshot {
        &self.snapshot
    }

    /// Targets for a caption set of `entry_count` entries; empty on mismatch.
    pub fn targets(&self, entry_count: usize) -> &[Option<f64>] {
        if self.targets.len() == entry_count {
            &self.targets
        } else {
            &[]
        }
    }
}
