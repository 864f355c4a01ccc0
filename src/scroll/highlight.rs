use crate::captions::entry::CaptionSet;

/// Visual state of one caption line relative to the current caption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    /// Already passed.
    Read,
    /// Current caption whose time window has already closed.
    ScrolledTo,
    /// Current caption, being spoken now.
    Active,
    /// Not reached yet.
    Future,
}

impl Highlight {
    pub fn classify(index: usize, current: Option<usize>, is_in_window: bool) -> Self {
        match current {
            Some(c) if index < c => Self::Read,
            Some(c) if index == c => {
                if is_in_window {
                    Self::Active
                } else {
                    Self::ScrolledTo
                }
            }
            _ => Self::Future,
        }
    }

    pub fn opacity(self) -> f64 {
        match self {
            Self::Future => 0.1,
            Self::Read | Self::ScrolledTo | Self::Active => 1.0,
        }
    }

    /// Only the spoken line gets the emphasis background.
    pub fn is_emphasized(self) -> bool {
        self == Self::Active
    }

    /// Straight RGBA of the line background.
    pub fn background_rgba(self) -> [u8; 4] {
        if self.is_emphasized() {
            [255, 255, 255, 77]
        } else {
            [0, 0, 0, 0]
        }
    }
}

/// Highlight for every caption at `time_secs`.
pub fn classify_all(
    captions: &CaptionSet,
    current: Option<usize>,
    time_secs: f64,
) -> Vec<Highlight> {
    captions
        .iter()
        .enumerate()
        .map(|(i, e)| Highlight::classify(i, current, e.contains(time_secs)))
        .collect()
}
