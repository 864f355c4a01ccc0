use crate::foundation::core::FrameIndex;
use crate::foundation::error::VideoBookResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerEventKind {
    Play,
    Pause,
    FrameUpdate,
    RateChange,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerEvent {
    Play,
    Pause,
    FrameUpdate { frame: FrameIndex },
    RateChange { rate: f64 },
    Ended,
}

impl PlayerEvent {
    pub fn kind(&self) -> PlayerEventKind {
        match self {
            Self::Play => PlayerEventKind::Play,
            Self::Pause => PlayerEventKind::Pause,
            Self::FrameUpdate { .. } => PlayerEventKind::FrameUpdate,
            Self::RateChange { .. } => PlayerEventKind::RateChange,
            Self::Ended => PlayerEventKind::Ended,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

pub type Listener = Box<dyn FnMut(&PlayerEvent)>;

/// Imperative control surface of a player.
///
/// Transport controls are written against this trait only.
pub trait PlayerHandle {
    fn is_playing(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    fn seek_to(&mut self, frame: FrameIndex);

    fn current_frame(&self) -> FrameIndex;

    fn playback_rate(&self) -> f64;

    fn set_playback_rate(&mut self, rate: f64) -> VideoBookResult<()>;

    fn add_listener(&mut self, kind: PlayerEventKind, listener: Listener) -> ListenerId;

    /// Returns `false` when `id` was not registered.
    fn remove_listener(&mut self, id: ListenerId) -> bool;
}
