use std::collections::BTreeSet;
use std::time::Duration;

use crate::audio::tone::render_tick_track;
use crate::encode::png::encode_png;
use crate::encode::sink::{Artifact, FrameSink, SinkConfig};
use crate::export::params::{
    MAX_EXPORT_FRAMES, artifact_name, bitrate_bps, frame_time, trailing_frames, unix_ms_now,
};
use crate::foundation::clock::{Clock, ManualClock};
use crate::foundation::error::{TickdownError, TickdownResult};
use crate::projection::digits::DigitHighlighter;
use crate::projection::view::project;
use crate::render::backend::RenderSurface;
use crate::state::model::ExportFormat;
use crate::studio::Studio;
use crate::timeline::engine::{FrameUpdate, RunMode, RunPlan, RunStart, TimelineEngine};

/// What an export call did.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Finished(ExportReport),
    /// A preview or another export was active; nothing changed.
    Rejected { active: RunMode },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub artifact: Artifact,
    /// Frames handed to the sink (1 for stills).
    pub frames: u64,
    /// Count changes heard during the run.
    pub ticks: usize,
    pub width: u32,
    pub height: u32,
}

/// One captured frame of an offline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureFrame {
    /// Offset from the run start.
    pub at: Duration,
    pub update: FrameUpdate,
}

/// Drive a full export run on a manual clock stepped one frame interval per capture, then keep
/// capturing the terminal frame for `trailing` more frames.
pub fn capture_schedule(plan: RunPlan, fps: u32, trailing: u64) -> TickdownResult<Vec<CaptureFrame>> {
    if fps == 0 {
        return Err(TickdownError::validation("fps must be non-zero"));
    }
    let expected = (plan.duration_secs * f64::from(fps)).ceil();
    if !expected.is_finite() || expected + trailing as f64 > MAX_EXPORT_FRAMES as f64 {
        return Err(TickdownError::validation(format!(
            "export of {}s at {fps} fps exceeds {MAX_EXPORT_FRAMES} frames",
            plan.duration_secs
        )));
    }

    let clock = ManualClock::new();
    let mut engine = TimelineEngine::new();
    if let RunStart::Rejected { active } = engine.start(plan, clock.now()) {
        return Err(TickdownError::validation(format!(
            "timeline busy with {active:?}"
        )));
    }

    let mut frames = Vec::with_capacity(expected as usize + trailing as usize + 1);
    let mut idx = 0u64;
    while let Some(update) = engine.step(clock.now()) {
        frames.push(CaptureFrame {
            at: clock.elapsed(),
            update,
        });
        idx += 1;
        clock.set_elapsed(frame_time(idx, fps));
    }

    if let Some(last) = frames.last().copied() {
        let hold = FrameUpdate {
            ticked: false,
            completed: false,
            ..last.update
        };
        for _ in 0..trailing {
            frames.push(CaptureFrame {
                at: clock.elapsed(),
                update: hold,
            });
            idx += 1;
            clock.set_elapsed(frame_time(idx, fps));
        }
    }
    Ok(frames)
}

/// Export in the studio's configured format.
pub fn export<C: Clock>(
    studio: &mut Studio<C>,
    surface: Option<&mut dyn RenderSurface>,
    sink: &mut dyn FrameSink,
) -> TickdownResult<ExportOutcome> {
    if studio.durable().export.format.is_still() {
        export_still(studio, surface)
    } else {
        export_video(studio, surface, sink)
    }
}

/// Capture the terminal frame as a PNG at the still-frame density.
///
/// A missing surface aborts before any state changes.
#[tracing::instrument(skip_all, fields(scale = studio.config().still_scale))]
pub fn export_still<C: Clock>(
    studio: &mut Studio<C>,
    surface: Option<&mut dyn RenderSurface>,
) -> TickdownResult<ExportOutcome> {
    let Some(surface) = surface else {
        return Err(TickdownError::capture_unavailable("render target is missing"));
    };
    if let RunStart::Rejected { active } = studio.claim_export() {
        return Ok(ExportOutcome::Rejected { active });
    }

    let result = run_still(studio, surface);
    studio.release_export();
    if let Err(e) = &result {
        tracing::warn!(error = %e, "still export failed");
    }
    result.map(ExportOutcome::Finished)
}

fn run_still<C: Clock>(
    studio: &mut Studio<C>,
    surface: &mut dyn RenderSurface,
) -> TickdownResult<ExportReport> {
    let config = *studio.config();
    let plan = RunPlan::new(
        RunMode::Export,
        &studio.durable().sequence,
        config.export_rounding,
    );
    let clock = ManualClock::new();
    let mut engine = TimelineEngine::new();
    engine.start(plan, clock.now());
    clock.advance_secs(plan.duration_secs);
    while let Some(update) = engine.step(clock.now()) {
        studio.export_frame(&update);
        if update.completed {
            break;
        }
        clock.advance(Duration::from_millis(1));
    }

    let view = project(studio.durable(), studio.run(), &BTreeSet::new());
    let frame = surface.render(&view, config.still_scale)?;
    let bytes = encode_png(&frame)?;
    let artifact = Artifact {
        file_name: artifact_name(ExportFormat::Png, unix_ms_now()),
        mime: ExportFormat::Png.mime().to_string(),
        path: None,
        bytes: Some(bytes),
    };
    tracing::info!(
        file = %artifact.file_name,
        width = frame.width,
        height = frame.height,
        "still frame finalized"
    );
    Ok(ExportReport {
        artifact,
        frames: 1,
        ticks: 0,
        width: frame.width,
        height: frame.height,
    })
}

/// Record the full run into `sink` at the configured resolution and frame rate.
///
/// `is_exporting` is set before the first frame and cleared only after the sink has finalized,
/// or after any failure.
#[tracing::instrument(skip_all, fields(format = ?studio.durable().export.format))]
pub fn export_video<C: Clock>(
    studio: &mut Studio<C>,
    surface: Option<&mut dyn RenderSurface>,
    sink: &mut dyn FrameSink,
) -> TickdownResult<ExportOutcome> {
    let Some(surface) = surface else {
        return Err(TickdownError::capture_unavailable("render target is missing"));
    };
    let format = studio.durable().export.format;
    if format.is_still() {
        return Err(TickdownError::validation(format!(
            "{format:?} is a still format; use a still export"
        )));
    }
    if let RunStart::Rejected { active } = studio.claim_export() {
        return Ok(ExportOutcome::Rejected { active });
    }

    let result = run_video(studio, surface, sink);
    studio.release_export();
    if let Err(e) = &result {
        tracing::warn!(error = %e, "video export failed");
    }
    result.map(ExportOutcome::Finished)
}

fn run_video<C: Clock>(
    studio: &mut Studio<C>,
    surface: &mut dyn RenderSurface,
    sink: &mut dyn FrameSink,
) -> TickdownResult<ExportReport> {
    let config = *studio.config();
    let durable = studio.durable().clone();
    let settings = durable.export;
    let scale = settings.resolution.scale();
    let width = durable.canvas.width.saturating_mul(scale);
    let height = durable.canvas.height.saturating_mul(scale);

    let plan = RunPlan::new(RunMode::Export, &durable.sequence, config.export_rounding);
    let trailing = trailing_frames(config.trailing_capture(), settings.fps);
    let schedule = capture_schedule(plan, settings.fps, trailing)?;
    let onsets: Vec<f64> = schedule
        .iter()
        .filter(|f| f.update.ticked)
        .map(|f| f.at.as_secs_f64())
        .collect();

    let audio = (durable.visuals.sound && sink.accepts_audio(settings.format)).then(|| {
        let total = schedule.len() as f64 / f64::from(settings.fps);
        render_tick_track(&onsets, total)
    });

    sink.begin(SinkConfig {
        width,
        height,
        fps: settings.fps,
        format: settings.format,
        bitrate_bps: bitrate_bps(&settings),
        file_name: artifact_name(settings.format, unix_ms_now()),
        audio,
    })?;

    let clock = ManualClock::new();
    let mut highlighter = DigitHighlighter::new(config.highlight());
    for (idx, captured) in schedule.iter().enumerate() {
        clock.set_elapsed(captured.at);
        let now = clock.now();
        highlighter.observe(captured.update.current_count, now);
        studio.export_frame(&captured.update);

        let view = project(&durable, studio.run(), &highlighter.active(now));
        let frame = surface.render(&view, scale)?;
        sink.push_frame(idx as u64, &frame)?;
    }

    let artifact = sink.finish()?;
    tracing::info!(
        file = %artifact.file_name,
        frames = schedule.len(),
        ticks = onsets.len(),
        "recording finalized"
    );
    Ok(ExportReport {
        artifact,
        frames: schedule.len() as u64,
        ticks: onsets.len(),
        width,
        height,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/orchestrator.rs"]
mod tests;
