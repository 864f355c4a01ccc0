use crate::animation::spring::SpringConfig;
use crate::assets::fetch::CaptionFetcher;
use crate::captions::entry::CaptionSet;
use crate::captions::srt::parse_srt;
use crate::foundation::core::{Canvas, DURATION_IN_FRAMES, Fps, FrameIndex};
use crate::foundation::error::{VideoBookError, VideoBookResult};
use crate::layout::stack::{StackStyle, measure_stack};
use crate::layout::{LayoutSnapshot, LayoutTracker, Viewport};
use crate::schema::props::VideoBookProps;
use crate::scroll::engine::{FrameState, ScrollEngine};
use crate::session::gate::{GateHandle, RenderGate};
use std::sync::{Arc, mpsc};

/// Options for a [`VideoBookSession`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionOpts {
    pub fps: Fps,
    pub duration_frames: u64,
    pub canvas: Canvas,
    pub stack_style: StackStyle,
    pub spring: SpringConfig,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            duration_frames: DURATION_IN_FRAMES,
            canvas: Canvas::default(),
            stack_style: StackStyle::default(),
            spring: SpringConfig::CAPTION_SCROLL,
        }
    }
}

impl SessionOpts {
    pub fn validate(&self) -> VideoBookResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if self.duration_frames == 0 {
            return Err(VideoBookError::validation("duration_frames must be > 0"));
        }
        self.stack_style.validate()?;
        self.spring.validate()
    }
}

/// Both caption files of a session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadedCaptions {
    pub captions: CaptionSet,
    pub illustrations: CaptionSet,
}

/// Fetch and parse one caption file; failures are logged and yield an empty set.
#[tracing::instrument(skip(fetcher))]
fn load_caption_set(fetcher: &dyn CaptionFetcher, url: &str) -> CaptionSet {
    let parsed = fetcher
        .fetch(url)
        .and_then(|text| parse_srt(&text).map_err(VideoBookError::from));
    match parsed {
        Ok(set) => {
            tracing::debug!(entries = set.len(), "captions loaded");
            set
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch or parse captions");
            CaptionSet::default()
        }
    }
}

/// One playback session of a video book page.
///
/// Construction starts loading both caption files on a background thread and holds the render
/// gate until they arrive. Dropping the session while loading discards the result.
pub struct VideoBookSession {
    props: VideoBookProps,
    opts: SessionOpts,
    engine: ScrollEngine,

    gate: RenderGate,
    load_handle: Option<GateHandle>,
    incoming: Option<mpsc::Receiver<LoadedCaptions>>,

    loaded: LoadedCaptions,
    layout: LayoutTracker,
    measured_for: Option<(usize, Viewport)>,
}

impl VideoBookSession {
    /// Validate inputs and start loading captions in the background.
    pub fn spawn(
        props: VideoBookProps,
        fetcher: Arc<dyn CaptionFetcher>,
        opts: SessionOpts,
    ) -> VideoBookResult<Self> {
        props.validate()?;
        opts.validate()?;

        let mut gate = RenderGate::new();
        let load_handle = gate.delay_render("Fetching SRT files...");

        let (tx, rx) = mpsc::channel();
        let srt_url = props.srt_url.clone();
        let illustration_url = props.illustration_srt_url.clone();
        std::thread::Builder::new()
            .name("videobook-captions".to_string())
            .spawn(move || {
                let (captions, illustrations) = rayon::join(
                    || load_caption_set(fetcher.as_ref(), &srt_url),
                    || load_caption_set(fetcher.as_ref(), &illustration_url),
                );
                // The receiver is gone if the session was dropped mid-load.
                let _ = tx.send(LoadedCaptions {
                    captions,
                    illustrations,
                });
            })
            .map_err(|e| VideoBookError::Other(anyhow::anyhow!("spawn caption loader: {e}")))?;

        let engine = ScrollEngine::new(opts.fps).with_spring(opts.spring);
        Ok(Self {
            props,
            opts,
            engine,
            gate,
            load_handle: Some(load_handle),
            incoming: Some(rx),
            loaded: LoadedCaptions::default(),
            layout: LayoutTracker::new(),
            measured_for: None,
        })
    }

    /// Start a session and block until both caption files are loaded.
    pub fn load(
        props: VideoBookProps,
        fetcher: Arc<dyn CaptionFetcher>,
        opts: SessionOpts,
    ) -> VideoBookResult<Self> {
        let mut s = Self::spawn(props, fetcher, opts)?;
        s.wait()?;
        Ok(s)
    }

    /// Non-blocking check for loaded captions. Returns whether the gate is open.
    pub fn poll(&mut self) -> VideoBookResult<bool> {
        let Some(rx) = self.incoming.as_ref() else {
            return Ok(self.gate.is_open());
        };
        match rx.try_recv() {
            Ok(loaded) => self.finish_load(Some(loaded))?,
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => self.finish_load(None)?,
        }
        Ok(self.gate.is_open())
    }

    /// Block until the caption load finishes.
    pub fn wait(&mut self) -> VideoBookResult<()> {
        let Some(rx) = self.incoming.as_ref() else {
            return Ok(());
        };
        let loaded = rx.recv().ok();
        self.finish_load(loaded)
    }

    fn finish_load(&mut self, loaded: Option<LoadedCaptions>) -> VideoBookResult<()> {
        self.incoming = None;
        match loaded {
            Some(l) => self.loaded = l,
            None => tracing::warn!("caption loader exited without a result"),
        }
        self.measured_for = None;
        match self.load_handle.take() {
            Some(h) => self.gate.continue_render(h),
            None => Ok(()),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_open()
    }

    pub fn props(&self) -> &VideoBookProps {
        &self.props
    }

    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    pub fn engine(&self) -> &ScrollEngine {
        &self.engine
    }

    pub fn captions(&self) -> &CaptionSet {
        &self.loaded.captions
    }

    pub fn illustrations(&self) -> &CaptionSet {
        &self.loaded.illustrations
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::subtitle_area(self.opts.canvas)
    }

    /// Change the composition size; the caption column is remeasured on the next frame.
    pub fn resize(&mut self, canvas: Canvas) {
        self.opts.canvas = canvas;
    }

    /// Replace the measured layout with an externally measured snapshot.
    ///
    /// Returns `true` when it differed from the current one.
    pub fn set_layout(&mut self, snapshot: LayoutSnapshot) -> bool {
        self.measured_for = Some((snapshot.entries.len(), self.viewport()));
        self.layout.update(snapshot)
    }

    pub fn layout(&self) -> &LayoutSnapshot {
        self.layout.snapshot()
    }

    fn ensure_layout(&mut self) {
        let key = (self.loaded.captions.len(), self.viewport());
        if self.measured_for == Some(key) {
            return;
        }
        match measure_stack(&self.loaded.captions, key.1, &self.opts.stack_style) {
            Ok(snapshot) => {
                self.layout.update(snapshot);
            }
            Err(e) => {
                tracing::warn!(error = %e, "caption layout failed");
                self.layout.update(LayoutSnapshot::default());
            }
        }
        self.measured_for = Some(key);
    }

    /// Evaluate caption highlight and scroll state at `frame`.
    pub fn frame_state(&mut self, frame: FrameIndex) -> VideoBookResult<FrameState> {
        if !self.poll()? {
            return Err(VideoBookError::gate(
                "captions are still loading; frame output is deferred",
            ));
        }
        if frame.0 >= self.opts.duration_frames {
            return Err(VideoBookError::validation(
                "frame must be within composition duration",
            ));
        }
        self.ensure_layout();
        let targets = self.layout.targets(self.loaded.captions.len());
        Ok(self.engine.evaluate(
            &self.loaded.captions,
            &self.loaded.illustrations,
            targets,
            frame,
        ))
    }
}

impl std::fmt::Debug for VideoBookSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoBookSession")
            .field("props", &self.props)
            .field("ready", &self.gate.is_open())
            .field("captions", &self.loaded.captions.len())
            .field("illustrations", &self.loaded.illustrations.len())
            .finish()
    }
}
