use std::path::PathBuf;

use crate::audio::tone::AudioTrack;
use crate::foundation::error::{TickdownError, TickdownResult};
use crate::render::backend::FrameRGBA;
use crate::state::model::ExportFormat;

/// Configuration provided to a [`FrameSink`] when a recording begins.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    pub fps: u32,
    /// Container/codec preference.
    pub format: ExportFormat,
    /// Target video bitrate in bits per second.
    pub bitrate_bps: u64,
    /// Suggested artifact file name, including extension.
    pub file_name: String,
    /// Optional tick track muxed alongside the video.
    pub audio: Option<AudioTrack>,
}

/// A finalized export.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub mime: String,
    /// Where the artifact was written, when the sink writes files.
    pub path: Option<PathBuf>,
    /// Encoded bytes, when the artifact lives in memory.
    pub bytes: Option<Vec<u8>>,
}

/// Sink contract for consuming captured frames in order.
///
/// `push_frame` is called with strictly increasing indices between `begin` and `finish`.
pub trait FrameSink: Send {
    /// Whether `finish` can mux an audio track for `format`.
    fn accepts_audio(&self, _format: ExportFormat) -> bool {
        false
    }
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> TickdownResult<()>;
    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> TickdownResult<()>;
    /// Called once after the last frame is pushed.
    fn finish(&mut self) -> TickdownResult<Artifact>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn accepts_audio(&self, format: ExportFormat) -> bool {
        (**self).accepts_audio(format)
    }

    fn begin(&mut self, cfg: SinkConfig) -> TickdownResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> TickdownResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn finish(&mut self) -> TickdownResult<Artifact> {
        (**self).finish()
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn accepts_audio(&self, format: ExportFormat) -> bool {
        !format.is_still()
    }

    fn begin(&mut self, cfg: SinkConfig) -> TickdownResult<()> {
        if cfg.width == 0 || cfg.height == 0 || cfg.fps == 0 {
            return Err(TickdownError::validation(
                "sink width/height/fps must be non-zero",
            ));
        }
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> TickdownResult<()> {
        if self.cfg.is_none() || self.finished {
            return Err(TickdownError::encoding("in-memory sink is not recording"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(TickdownError::encoding(
                "in-memory sink received out-of-order frame index",
            ));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn finish(&mut self) -> TickdownResult<Artifact> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| TickdownError::encoding("in-memory sink not started"))?;
        self.finished = true;
        Ok(Artifact {
            file_name: cfg.file_name.clone(),
            mime: cfg.format.mime().to_string(),
            path: None,
            bytes: None,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
