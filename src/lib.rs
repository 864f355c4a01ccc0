//! Scrolling-subtitle video book engine.
//!
//! A video book page plays a video above a column of spoken captions. As playback advances,
//! the caption column scrolls with a spring so the current line stays centered, past lines
//! stay readable and upcoming lines are dimmed. An illustration track can overlay an image
//! while its entry is on screen.
//!
//! The crate is deterministic: every query is a pure function of the frame index, the parsed
//! caption files and the measured layout.
//!
//! - [`parse_srt`] turns SubRip text into a [`CaptionSet`].
//! - [`ScrollEngine`] evaluates the current caption, highlight states and scroll offset.
//! - [`measure_stack`] lays the caption column out with taffy.
//! - [`VideoBookSession`] loads both caption files and gates frame output until ready.
//! - [`Player`] and the [`player::controls`] module drive playback interactively.
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod captions;
pub mod foundation;
pub mod layout;
pub mod player;
pub mod schema;
pub mod scroll;
pub mod session;

pub use animation::interpolate::{Extrapolate, InterpolateOpts, interpolate2};
pub use animation::spring::{SpringConfig, measure_spring, spring};
#[cfg(feature = "http")]
pub use assets::fetch::HttpFetcher;
pub use assets::fetch::{CaptionFetcher, StaticDirFetcher};
pub use captions::entry::{CaptionEntry, CaptionSet};
pub use captions::srt::{SrtError, parse_srt, parse_srt_time};
pub use foundation::core::{
    COMPOSITION_FPS, COMPOSITION_HEIGHT, COMPOSITION_WIDTH, Canvas, DURATION_IN_FRAMES, Fps,
    FrameIndex,
};
pub use foundation::error::{VideoBookError, VideoBookResult};
pub use layout::stack::{StackStyle, measure_stack};
pub use layout::{EntryRect, LayoutSnapshot, LayoutTracker, Viewport};
pub use player::clock::{DEFAULT_PLAYBACK_RATE, Player, PlayerOpts};
pub use player::controls::{PLAYBACK_RATES, TransportControls, format_time, frame_from_x};
pub use player::handle::{ListenerId, PlayerEvent, PlayerEventKind, PlayerHandle};
pub use schema::props::VideoBookProps;
pub use scroll::engine::{FrameState, IllustrationRef, ScrollEngine};
pub use scroll::highlight::Highlight;
pub use session::gate::{GateHandle, RenderGate};
pub use session::video_book::{LoadedCaptions, SessionOpts, VideoBookSession};
