//! Tickdown is the core of an animated countdown-overlay editor.
//!
//! A [`Studio`] owns the document and drives everything else:
//!
//! - Edit the durable state through sanitizing patches, with bounded undo/redo
//! - Preview a run on any [`Clock`], one frame callback at a time
//! - Project the state into a [`FrameView`] for a render surface
//! - Export a still frame or a recorded run through a [`FrameSink`]
#![forbid(unsafe_code)]

mod foundation;

/// Tick feedback and tick-track synthesis.
pub mod audio;
/// Studio tuning and presets.
pub mod config;
/// Capture sinks.
pub mod encode;
/// Still and video export.
pub mod export;
/// Undo/redo history and keyboard chords.
pub mod history;
/// State-to-frame projection.
pub mod projection;
/// Render surfaces.
pub mod render;
/// Document model, patches and the state owner.
pub mod state;
/// The editor controller.
pub mod studio;
/// Theme suggestions.
pub mod theme;
/// Run state machine and progress sampling.
pub mod timeline;

pub use crate::foundation::clock::{Clock, ManualClock, SystemClock};
pub use crate::foundation::core::{Affine, ElementId, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{TickdownError, TickdownResult};
pub use crate::foundation::input::{
    parse_duration_input, parse_float_input, parse_float_strict, parse_int_input, parse_int_strict,
};

pub use crate::audio::tick::{BellTicks, CountingTicks, NullTicks, TickSink};
pub use crate::config::{Preset, StudioConfig};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, OutputPath, is_ffmpeg_on_path};
pub use crate::encode::sink::{Artifact, FrameSink, InMemorySink, SinkConfig};
pub use crate::export::orchestrator::{
    ExportOutcome, ExportReport, export, export_still, export_video,
};
pub use crate::history::keys::{HistoryAction, KeyInput};
pub use crate::history::manager::History;
pub use crate::projection::view::{ElementContent, ElementView, FrameView};
pub use crate::render::backend::{FrameRGBA, RenderSurface};
pub use crate::render::cpu::CpuSurface;
pub use crate::state::model::{AppState, DurableState, ExportFormat, Resolution, RunState};
pub use crate::studio::Studio;
pub use crate::theme::{ThemeSuggester, ThemeSuggestion, parse_theme_response};
pub use crate::timeline::engine::{FrameUpdate, RunMode, RunStart};
pub use crate::timeline::sampling::RoundingPolicy;
