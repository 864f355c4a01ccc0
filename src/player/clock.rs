use crate::foundation::core::{DURATION_IN_FRAMES, Fps, FrameIndex};
use crate::foundation::error::{VideoBookError, VideoBookResult};
use crate::player::handle::{Listener, ListenerId, PlayerEvent, PlayerEventKind, PlayerHandle};

/// Playback rate the video book page starts with.
pub const DEFAULT_PLAYBACK_RATE: f64 = 1.3;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayerOpts {
    pub fps: Fps,
    pub duration_frames: u64,
    pub loop_playback: bool,
    pub playback_rate: f64,
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            duration_frames: DURATION_IN_FRAMES,
            loop_playback: true,
            playback_rate: DEFAULT_PLAYBACK_RATE,
        }
    }
}

fn check_rate(rate: f64) -> VideoBookResult<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(VideoBookError::player(format!(
            "playback rate must be a finite value > 0, got {rate}"
        )));
    }
    Ok(())
}

/// In-memory frame clock implementing [`PlayerHandle`].
///
/// Time only moves when [`Player::tick`] is called with the wall-clock time that elapsed.
pub struct Player {
    opts: PlayerOpts,
    frame: u64,
    playing: bool,
    carry: f64,
    next_listener: u64,
    listeners: Vec<(ListenerId, PlayerEventKind, Listener)>,
}

impl Player {
    pub fn new(opts: PlayerOpts) -> VideoBookResult<Self> {
        Fps::new(opts.fps.num, opts.fps.den)?;
        if opts.duration_frames == 0 {
            return Err(VideoBookError::player("duration_frames must be > 0"));
        }
        check_rate(opts.playback_rate)?;
        Ok(Self {
            opts,
            frame: 0,
            playing: false,
            carry: 0.0,
            next_listener: 0,
            listeners: Vec::new(),
        })
    }

    pub fn opts(&self) -> &PlayerOpts {
        &self.opts
    }

    fn last_frame(&self) -> u64 {
        self.opts.duration_frames - 1
    }

    fn emit(&mut self, event: PlayerEvent) {
        let kind = event.kind();
        for (_, k, listener) in self.listeners.iter_mut() {
            if *k == kind {
                listener(&event);
            }
        }
    }

    /// Advance playback by `elapsed_secs` of wall-clock time.
    pub fn tick(&mut self, elapsed_secs: f64) {
        if !self.playing || !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
            return;
        }
        self.carry += elapsed_secs * self.opts.fps.as_f64() * self.opts.playback_rate;
        let steps = self.carry.floor();
        self.carry -= steps;
        if steps < 1.0 {
            return;
        }

        let duration = self.opts.duration_frames;
        let target = self.frame.saturating_add(steps as u64);
        if target < duration {
            self.frame = target;
            self.emit(PlayerEvent::FrameUpdate {
                frame: FrameIndex(self.frame),
            });
        } else if self.opts.loop_playback {
            self.frame = target % duration;
            self.emit(PlayerEvent::FrameUpdate {
                frame: FrameIndex(self.frame),
            });
        } else {
            let at_end = self.frame == self.last_frame();
            self.frame = self.last_frame();
            self.carry = 0.0;
            if !at_end {
                self.emit(PlayerEvent::FrameUpdate {
                    frame: FrameIndex(self.frame),
                });
            }
            self.playing = false;
            self.emit(PlayerEvent::Pause);
            self.emit(PlayerEvent::Ended);
        }
    }
}

impl PlayerHandle for Player {
    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        if self.playing {
            return;
        }
        if !self.opts.loop_playback && self.frame == self.last_frame() {
            self.seek_to(FrameIndex(0));
        }
        self.playing = true;
        self.emit(PlayerEvent::Play);
    }

    fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.carry = 0.0;
        self.emit(PlayerEvent::Pause);
    }

    fn seek_to(&mut self, frame: FrameIndex) {
        let frame = frame.0.min(self.last_frame());
        self.carry = 0.0;
        if frame == self.frame {
            return;
        }
        self.frame = frame;
        self.emit(PlayerEvent::FrameUpdate {
            frame: FrameIndex(frame),
        });
    }

    fn current_frame(&self) -> FrameIndex {
        FrameIndex(self.frame)
    }

    fn playback_rate(&self) -> f64 {
        self.opts.playback_rate
    }

    fn set_playback_rate(&mut self, rate: f64) -> VideoBookResult<()> {
        check_rate(rate)?;
        if rate != self.opts.playback_rate {
            self.opts.playback_rate = rate;
            self.emit(PlayerEvent::RateChange { rate });
        }
        Ok(())
    }

    fn add_listener(&mut self, kind: PlayerEventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, kind, listener));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        self.listeners.len() != before
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("opts", &self.opts)
            .field("frame", &self.frame)
            .field("playing", &self.playing)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn player(duration: u64, looping: bool) -> Player {
        Player::new(PlayerOpts {
            fps: Fps::new(30, 1).unwrap(),
            duration_frames: duration,
            loop_playback: looping,
            playback_rate: 1.0,
        })
        .unwrap()
    }

    fn record(p: &mut Player, kinds: &[PlayerEventKind]) -> Rc<RefCell<Vec<PlayerEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for &k in kinds {
            let log = log.clone();
            p.add_listener(k, Box::new(move |e: &PlayerEvent| log.borrow_mut().push(*e)));
        }
        log
    }

    #[test]
    fn tick_advances_by_rate_and_carries_fractions() {
        let mut p = player(300, false);
        p.play();
        p.tick(0.5);
        assert_eq!(p.current_frame(), FrameIndex(15));
        p.set_playback_rate(2.0).unwrap();
        p.tick(0.25);
        assert_eq!(p.current_frame(), FrameIndex(30));
        p.set_playback_rate(1.0).unwrap();
        p.tick(0.02);
        p.tick(0.02);
        assert_eq!(p.current_frame(), FrameIndex(31));
    }

    #[test]
    fn paused_player_does_not_move() {
        let mut p = player(300, false);
        p.tick(1.0);
        assert_eq!(p.current_frame(), FrameIndex(0));
    }

    #[test]
    fn looping_wraps_around() {
        let mut p = player(30, true);
        p.play();
        p.tick(1.5);
        assert_eq!(p.current_frame(), FrameIndex(15));
        assert!(p.is_playing());
    }

    #[test]
    fn non_looping_stops_at_last_frame() {
        let mut p = player(30, false);
        let log = record(&mut p, &[PlayerEventKind::Pause, PlayerEventKind::Ended]);
        p.play();
        p.tick(5.0);
        assert_eq!(p.current_frame(), FrameIndex(29));
        assert!(!p.is_playing());
        assert_eq!(*log.borrow(), vec![PlayerEvent::Pause, PlayerEvent::Ended]);

        // Playing again restarts from the beginning.
        p.play();
        assert_eq!(p.current_frame(), FrameIndex(0));
    }

    #[test]
    fn events_reach_only_matching_listeners() {
        let mut p = player(300, false);
        let log = record(
            &mut p,
            &[PlayerEventKind::Play, PlayerEventKind::FrameUpdate],
        );
        p.toggle();
        p.seek_to(FrameIndex(1000));
        p.toggle();
        assert_eq!(
            *log.borrow(),
            vec![
                PlayerEvent::Play,
                PlayerEvent::FrameUpdate {
                    frame: FrameIndex(299)
                }
            ]
        );
    }

    #[test]
    fn removed_listeners_stop_receiving() {
        let mut p = player(300, false);
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        let id = p.add_listener(
            PlayerEventKind::Play,
            Box::new(move |_: &PlayerEvent| *h.borrow_mut() += 1),
        );
        p.play();
        assert!(p.remove_listener(id));
        assert!(!p.remove_listener(id));
        p.pause();
        p.play();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn rejects_bad_options() {
        let mut opts = PlayerOpts::default();
        opts.playback_rate = 0.0;
        assert!(Player::new(opts).is_err());
        opts.playback_rate = 1.0;
        opts.duration_frames = 0;
        assert!(Player::new(opts).is_err());
        let mut p = player(10, false);
        assert!(p.set_playback_rate(f64::NAN).is_err());
    }
}
