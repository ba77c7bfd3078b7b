//! Replaying recorded input against a headless viewer.
//!
//! A script is a JSON document naming the image, the overlay geometry, an
//! optional configuration and a list of steps. Steps are either input events
//! (same JSON shape as [`InputEvent`]) or clock advances:
//!
//! ```json
//! {
//!   "src": "chart.png",
//!   "natural": { "width": 2400.0, "height": 1200.0 },
//!   "steps": [
//!     { "type": "wheel", "delta_y": -100.0, "position": { "x": 640.0, "y": 400.0 } },
//!     { "advance_ms": 100 },
//!     { "type": "key", "key": "Escape" }
//!   ]
//! }
//! ```

use std::path::Path;

use folio_zoom::{
    Frame, HeadlessHost, InputEvent, ManualClock, OverlayLayout, Phase, Response, Size, Viewer,
    ViewerConfig, ViewerError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or running a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),

    #[error("Viewer error: {0}")]
    Viewer(#[from] ViewerError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ReplayError>;

fn default_src() -> String {
    "image".to_string()
}

fn default_layout() -> OverlayLayout {
    OverlayLayout::viewport(1280.0, 800.0)
}

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplayStep {
    /// Move the virtual clock forward
    Advance { advance_ms: u64 },
    Input(InputEvent),
}

/// A recorded interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default = "default_src")]
    pub src: String,
    #[serde(default = "default_layout")]
    pub layout: OverlayLayout,
    /// Intrinsic image size; reported as loaded right after opening
    #[serde(default)]
    pub natural: Option<Size>,
    #[serde(default)]
    pub config: ViewerConfig,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self> {
        let script: ReplayScript = serde_json::from_str(json)?;
        script.config.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Intrinsic size of an image file, read from its header.
pub fn natural_size_of(path: &Path) -> Result<Size> {
    let (width, height) = image::image_dimensions(path)?;
    Ok(Size::new(f64::from(width), f64::from(height)))
}

/// What happened at one step.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayRecord {
    /// Index into the script's steps
    pub step: usize,
    pub response: Response,
    pub phase: Option<Phase>,
    /// Frames painted after the step
    pub frames: Vec<Frame>,
}

/// Outcome of a full replay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplayReport {
    pub records: Vec<ReplayRecord>,
    /// The viewer reached the closed state
    pub closed: bool,
    /// Global listeners still registered at the end
    pub live_listeners: usize,
}

impl ReplayReport {
    /// The last frame painted, if any.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.records.iter().rev().find_map(|record| record.frames.last())
    }
}

struct Replayer {
    viewer: Viewer<HeadlessHost, ManualClock>,
    host: HeadlessHost,
    clock: ManualClock,
    painted: usize,
}

impl Replayer {
    fn flush(&mut self) -> Vec<Frame> {
        while let Some(id) = self.host.take_pending_frame() {
            self.viewer.on_animation_frame(id);
        }
        let record = self.host.record();
        let frames = record.applied[self.painted..].to_vec();
        self.painted = record.applied.len();
        frames
    }
}

/// Drive a viewer through `script`.
pub fn run(script: &ReplayScript) -> Result<ReplayReport> {
    let host = HeadlessHost::new();
    let clock = ManualClock::new();
    let viewer = Viewer::open(
        &script.src,
        host.clone(),
        clock.clone(),
        script.config.clone(),
        script.layout,
    )?;
    let mut replayer = Replayer {
        viewer,
        host,
        clock,
        painted: 0,
    };

    if let Some(natural) = script.natural {
        replayer.viewer.dispatch(InputEvent::ImageLoaded { natural });
    }
    let opening_frames = replayer.flush();
    log::info!(
        "Opened {} ({:?}), {} frame(s)",
        script.src,
        replayer.viewer.phase(),
        opening_frames.len()
    );

    let mut report = ReplayReport::default();
    for (index, step) in script.steps.iter().enumerate() {
        let response = match step {
            ReplayStep::Advance { advance_ms } => {
                replayer.clock.advance_ms(*advance_ms);
                Response::ignored()
            }
            ReplayStep::Input(event) => replayer.viewer.dispatch(event.clone()),
        };
        let frames = replayer.flush();
        for frame in &frames {
            log::info!(
                "step {}: {} {} cursor={} zoom={}",
                index,
                frame.stage_transform(),
                frame.image_transform(),
                frame.cursor.css(),
                frame.zoom_label()
            );
        }
        let phase = (!replayer.viewer.is_closed()).then(|| replayer.viewer.phase());
        log::debug!("step {}: {:?} -> {:?}", index, response, phase);
        report.records.push(ReplayRecord {
            step: index,
            response,
            phase,
            frames,
        });
    }

    report.closed = replayer.viewer.is_closed();
    report.live_listeners = replayer.host.live_listener_count();
    Ok(report)
}
