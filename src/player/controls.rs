//! Transport controls: play/pause, elapsed time, seek bar and playback-rate cycling.
//!
//! Each control mirrors player state through listeners registered in `attach` and must be
//! detached from the same player before it is dropped.

use crate::animation::interpolate::{InterpolateOpts, interpolate2};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::VideoBookResult;
use crate::player::handle::{ListenerId, PlayerEvent, PlayerEventKind, PlayerHandle};
use smallvec::SmallVec;
use std::cell::Cell;
use std::rc::Rc;

/// Primary pointer button.
pub const PRIMARY_BUTTON: u16 = 0;

/// Rates cycled by [`PlaybackRateButton`].
pub const PLAYBACK_RATES: [f64; 4] = [1.0, 1.3, 1.5, 2.0];

type Registrations = SmallVec<[ListenerId; 3]>;

fn detach_all(player: &mut dyn PlayerHandle, ids: &mut Registrations) {
    for id in ids.drain(..) {
        player.remove_listener(id);
    }
}

fn track_playing(player: &mut dyn PlayerHandle, playing: &Rc<Cell<bool>>) -> [ListenerId; 2] {
    playing.set(player.is_playing());
    let on_play = playing.clone();
    let on_pause = playing.clone();
    [
        player.add_listener(
            PlayerEventKind::Play,
            Box::new(move |_: &PlayerEvent| on_play.set(true)),
        ),
        player.add_listener(
            PlayerEventKind::Pause,
            Box::new(move |_: &PlayerEvent| on_pause.set(false)),
        ),
    ]
}

fn track_frame(player: &mut dyn PlayerHandle, frame: &Rc<Cell<FrameIndex>>) -> ListenerId {
    frame.set(player.current_frame());
    let f = frame.clone();
    player.add_listener(
        PlayerEventKind::FrameUpdate,
        Box::new(move |e: &PlayerEvent| {
            if let PlayerEvent::FrameUpdate { frame } = *e {
                f.set(frame);
            }
        }),
    )
}

/// `MM:SS` elapsed time of `frame`.
pub fn format_time(frame: FrameIndex, fps: Fps) -> String {
    let total = fps.frames_to_secs(frame.0);
    let minutes = (total / 60.0).floor() as u64;
    let seconds = (total % 60.0).floor() as u64;
    format!("{minutes:02}:{seconds:02}")
}

/// Frame under horizontal position `x` of a bar `width` pixels wide.
pub fn frame_from_x(x: f64, duration_frames: u64, width: f64) -> FrameIndex {
    if width.is_nan() || width <= 0.0 || !x.is_finite() {
        return FrameIndex(0);
    }
    let last = duration_frames.saturating_sub(1) as f64;
    let frame = interpolate2(x, [0.0, width], [0.0, last], InterpolateOpts::CLAMP);
    FrameIndex(frame.round() as u64)
}

#[derive(Debug, Default)]
pub struct PlayPauseButton {
    playing: Rc<Cell<bool>>,
    ids: Registrations,
}

impl PlayPauseButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, player: &mut dyn PlayerHandle) {
        self.detach(player);
        self.ids.extend(track_playing(player, &self.playing));
    }

    pub fn detach(&mut self, player: &mut dyn PlayerHandle) {
        detach_all(player, &mut self.ids);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    /// Icon name to show: the action a click would perform.
    pub fn icon(&self) -> &'static str {
        if self.is_playing() { "pause" } else { "play" }
    }

    pub fn click(&self, player: &mut dyn PlayerHandle) {
        player.toggle();
    }
}

#[derive(Debug)]
pub struct TimeDisplay {
    fps: Fps,
    frame: Rc<Cell<FrameIndex>>,
    ids: Registrations,
}

impl TimeDisplay {
    pub fn new(fps: Fps) -> Self {
        Self {
            fps,
            frame: Rc::new(Cell::new(FrameIndex(0))),
            ids: Registrations::new(),
        }
    }

    pub fn attach(&mut self, player: &mut dyn PlayerHandle) {
        self.detach(player);
        self.ids.push(track_frame(player, &self.frame));
    }

    pub fn detach(&mut self, player: &mut dyn PlayerHandle) {
        detach_all(player, &mut self.ids);
    }

    pub fn text(&self) -> String {
        format_time(self.frame.get(), self.fps)
    }
}

/// Scrub bar. Dragging pauses playback and resumes it on release if it was playing.
#[derive(Debug)]
pub struct SeekBar {
    duration_frames: u64,
    width: f64,
    frame: Rc<Cell<FrameIndex>>,
    playing: Rc<Cell<bool>>,
    dragging: bool,
    was_playing: bool,
    ids: Registrations,
}

impl SeekBar {
    pub fn new(duration_frames: u64, width: f64) -> Self {
        Self {
            duration_frames,
            width,
            frame: Rc::new(Cell::new(FrameIndex(0))),
            playing: Rc::new(Cell::new(false)),
            dragging: false,
            was_playing: false,
            ids: Registrations::new(),
        }
    }

    pub fn attach(&mut self, player: &mut dyn PlayerHandle) {
        self.detach(player);
        self.ids.push(track_frame(player, &self.frame));
        self.ids.extend(track_playing(player, &self.playing));
    }

    pub fn detach(&mut self, player: &mut dyn PlayerHandle) {
        detach_all(player, &mut self.ids);
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn seek(&self, player: &mut dyn PlayerHandle, x: f64) {
        player.seek_to(frame_from_x(x, self.duration_frames, self.width));
    }

    /// `x` is relative to the bar's left edge.
    pub fn pointer_down(&mut self, player: &mut dyn PlayerHandle, button: u16, x: f64) {
        if button != PRIMARY_BUTTON {
            return;
        }
        self.was_playing = self.playing.get();
        player.pause();
        self.dragging = true;
        self.seek(player, x);
    }

    pub fn pointer_move(&mut self, player: &mut dyn PlayerHandle, x: f64) {
        if self.dragging {
            self.seek(player, x);
        }
    }

    pub fn pointer_up(&mut self, player: &mut dyn PlayerHandle) {
        if !self.dragging {
            return;
        }
        if self.was_playing {
            player.play();
        }
        self.dragging = false;
    }

    /// Played fraction in percent.
    pub fn progress_percent(&self) -> f64 {
        let last = self.duration_frames.saturating_sub(1);
        if last == 0 {
            return 0.0;
        }
        self.frame.get().0 as f64 / last as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackRateButton {
    rate: f64,
}

impl PlaybackRateButton {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn label(&self) -> String {
        format!("x{:.1}", self.rate)
    }

    /// Next rate in [`PLAYBACK_RATES`]; an unlisted rate goes to the first one.
    pub fn next_rate(&self) -> f64 {
        let next = PLAYBACK_RATES
            .iter()
            .position(|&r| r == self.rate)
            .map_or(0, |i| (i + 1) % PLAYBACK_RATES.len());
        PLAYBACK_RATES[next]
    }

    pub fn click(&mut self, player: &mut dyn PlayerHandle) -> VideoBookResult<f64> {
        let rate = self.next_rate();
        player.set_playback_rate(rate)?;
        self.rate = rate;
        Ok(rate)
    }
}

/// The full control bar.
#[derive(Debug)]
pub struct TransportControls {
    pub play_pause: PlayPauseButton,
    pub time: TimeDisplay,
    pub seek: SeekBar,
    pub rate: PlaybackRateButton,
}

impl TransportControls {
    pub fn new(fps: Fps, duration_frames: u64, bar_width: f64, rate: f64) -> Self {
        Self {
            play_pause: PlayPauseButton::new(),
            time: TimeDisplay::new(fps),
            seek: SeekBar::new(duration_frames, bar_width),
            rate: PlaybackRateButton::new(rate),
        }
    }

    pub fn attach(&mut self, player: &mut dyn PlayerHandle) {
        self.play_pause.attach(player);
        self.time.attach(player);
        self.seek.attach(player);
        self.rate = PlaybackRateButton::new(player.playback_rate());
    }

    pub fn detach(&mut self, player: &mut dyn PlayerHandle) {
        self.play_pause.detach(player);
        self.time.detach(player);
        self.seek.detach(player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::clock::{Player, PlayerOpts};

    fn player() -> Player {
        Player::new(PlayerOpts {
            fps: Fps::new(30, 1).unwrap(),
            duration_frames: 1890,
            loop_playback: true,
            playback_rate: 1.3,
        })
        .unwrap()
    }

    #[test]
    fn formats_minutes_and_seconds() {
        let fps = Fps::new(30, 1).unwrap();
        assert_eq!(format_time(FrameIndex(0), fps), "00:00");
        assert_eq!(format_time(FrameIndex(29), fps), "00:00");
        assert_eq!(format_time(FrameIndex(1890), fps), "01:03");
        assert_eq!(format_time(FrameIndex(30 * 600), fps), "10:00");
    }

    #[test]
    fn frame_from_x_clamps_and_rounds() {
        assert_eq!(frame_from_x(-10.0, 1890, 300.0), FrameIndex(0));
        assert_eq!(frame_from_x(150.0, 1890, 300.0), FrameIndex(945));
        assert_eq!(frame_from_x(999.0, 1890, 300.0), FrameIndex(1889));
        assert_eq!(frame_from_x(10.0, 1890, 0.0), FrameIndex(0));
        assert_eq!(frame_from_x(10.0, 0, 300.0), FrameIndex(0));
        let expected = interpolate2(75.0, [0.0, 300.0], [0.0, 1889.0], InterpolateOpts::CLAMP);
        assert_eq!(frame_from_x(75.0, 1890, 300.0), FrameIndex(expected.round() as u64));
    }

    #[test]
    fn play_pause_follows_player_events() {
        let mut p = player();
        let mut button = PlayPauseButton::new();
        button.attach(&mut p);
        assert_eq!(button.icon(), "play");
        button.click(&mut p);
        assert!(button.is_playing());
        assert_eq!(button.icon(), "pause");
        p.pause();
        assert!(!button.is_playing());

        button.detach(&mut p);
        p.play();
        assert!(!button.is_playing());
    }

    #[test]
    fn time_display_tracks_frame_updates() {
        let mut p = player();
        let mut time = TimeDisplay::new(p.opts().fps);
        time.attach(&mut p);
        p.seek_to(FrameIndex(95 * 30 / 2));
        assert_eq!(time.text(), "00:47");
    }

    #[test]
    fn drag_pauses_then_resumes() {
        let mut p = player();
        let mut bar = SeekBar::new(1890, 300.0);
        bar.attach(&mut p);
        p.play();

        bar.pointer_down(&mut p, PRIMARY_BUTTON, 150.0);
        assert!(bar.is_dragging());
        assert!(!p.is_playing());
        assert_eq!(p.current_frame(), FrameIndex(945));
        assert!((bar.progress_percent() - 945.0 / 1889.0 * 100.0).abs() < 1e-9);

        bar.pointer_move(&mut p, 300.0);
        assert_eq!(p.current_frame(), FrameIndex(1889));
        assert_eq!(bar.progress_percent(), 100.0);

        bar.pointer_up(&mut p);
        assert!(!bar.is_dragging());
        assert!(p.is_playing());
    }

    #[test]
    fn drag_from_paused_stays_paused() {
        let mut p = player();
        let mut bar = SeekBar::new(1890, 300.0);
        bar.attach(&mut p);
        bar.pointer_down(&mut p, PRIMARY_BUTTON, 30.0);
        bar.pointer_up(&mut p);
        assert!(!p.is_playing());

        // Secondary button and moves without a drag are ignored.
        bar.pointer_down(&mut p, 2, 200.0);
        bar.pointer_move(&mut p, 250.0);
        assert_eq!(p.current_frame(), FrameIndex(189));
    }

    #[test]
    fn rate_button_cycles_and_wraps() {
        let mut p = player();
        let mut rate = PlaybackRateButton::new(p.playback_rate());
        assert_eq!(rate.label(), "x1.3");
        assert_eq!(rate.click(&mut p).unwrap(), 1.5);
        assert_eq!(rate.click(&mut p).unwrap(), 2.0);
        assert_eq!(rate.click(&mut p).unwrap(), 1.0);
        assert_eq!(rate.label(), "x1.0");
        assert_eq!(p.playback_rate(), 1.0);
        assert_eq!(PlaybackRateButton::new(0.75).next_rate(), 1.0);
    }

    #[test]
    fn transport_controls_attach_together() {
        let mut p = player();
        let mut controls = TransportControls::new(p.opts().fps, 1890, 300.0, 1.0);
        controls.attach(&mut p);
        assert_eq!(controls.rate.rate(), 1.3);
        p.play();
        p.tick(2.0);
        assert!(controls.play_pause.is_playing());
        // 2 s at 1.3x = 78 frames.
        assert_eq!(controls.time.text(), "00:02");
        controls.detach(&mut p);
        p.pause();
        assert!(controls.play_pause.is_playing());
    }
}
