//! Single-run animation state machine: `Idle -> Running -> Idle`.
//!
//! A run captures its start instant and recomputes progress from the absolute elapsed time on
//! every step, so irregular frame delivery never skews the mapping from time to progress.

use std::time::Instant;

use crate::state::model::SequenceConfig;
use crate::timeline::sampling::{RoundingPolicy, count_at, progress_at};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Preview,
    Export,
}

/// Everything a run needs, captured at start so later edits cannot disturb it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunPlan {
    pub mode: RunMode,
    pub start: i64,
    pub end: i64,
    pub duration_secs: f64,
    pub rounding: RoundingPolicy,
}

impl RunPlan {
    pub fn new(mode: RunMode, sequence: &SequenceConfig, rounding: RoundingPolicy) -> Self {
        Self {
            mode,
            start: sequence.start,
            end: sequence.end,
            duration_secs: sequence.duration_secs,
            rounding,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStart {
    Started,
    /// Another run is active; nothing changed.
    Rejected { active: RunMode },
}

/// Result of one animation frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUpdate {
    pub mode: RunMode,
    pub progress: f64,
    pub current_count: i64,
    /// The displayed count changed on this frame.
    pub ticked: bool,
    /// Terminal frame; reported exactly once per run.
    pub completed: bool,
}

/// Outcome of cancelling a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cancelled {
    pub mode: RunMode,
    /// Count to display after the reset (the run's start value).
    pub reset_count: i64,
}

#[derive(Clone, Copy, Debug)]
struct ActiveRun {
    plan: RunPlan,
    started_at: Instant,
    last_progress: f64,
    last_count: i64,
}

#[derive(Clone, Copy, Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Running(ActiveRun),
}

#[derive(Clone, Debug, Default)]
pub struct TimelineEngine {
    phase: Phase,
}

impl TimelineEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    /// Count shown at normalized time `t`, without running.
    pub fn sample(start: i64, end: i64, t: f64, policy: RoundingPolicy) -> i64 {
        count_at(start, end, t, policy)
    }

    pub fn active_mode(&self) -> Option<RunMode> {
        match self.phase {
            Phase::Running(run) => Some(run.plan.mode),
            Phase::Idle => None,
        }
    }

    /// Begin a run at `now`. Only one run of either mode may be active.
    pub fn start(&mut self, plan: RunPlan, now: Instant) -> RunStart {
        if let Phase::Running(run) = self.phase {
            tracing::debug!(requested = ?plan.mode, active = ?run.plan.mode, "run rejected");
            return RunStart::Rejected {
                active: run.plan.mode,
            };
        }
        tracing::debug!(
            mode = ?plan.mode,
            start = plan.start,
            end = plan.end,
            duration_secs = plan.duration_secs,
            "run started"
        );
        self.phase = Phase::Running(ActiveRun {
            plan,
            started_at: now,
            last_progress: 0.0,
            last_count: plan.start,
        });
        RunStart::Started
    }

    /// Advance to `now`. Returns `None` while idle.
    ///
    /// The completing step sets progress to exactly 1 and the count to exactly `end`, then returns
    /// the engine to idle.
    pub fn step(&mut self, now: Instant) -> Option<FrameUpdate> {
        let Phase::Running(mut run) = self.phase else {
            return None;
        };

        let elapsed = now.saturating_duration_since(run.started_at).as_secs_f64();
        let t = progress_at(elapsed, run.plan.duration_secs).max(run.last_progress);
        let completed = t >= 1.0;
        let (progress, count) = if completed {
            (1.0, run.plan.end)
        } else {
            (t, count_at(run.plan.start, run.plan.end, t, run.plan.rounding))
        };

        let update = FrameUpdate {
            mode: run.plan.mode,
            progress,
            current_count: count,
            ticked: count != run.last_count,
            completed,
        };

        if completed {
            tracing::debug!(mode = ?run.plan.mode, "run completed");
            self.phase = Phase::Idle;
        } else {
            run.last_progress = progress;
            run.last_count = count;
            self.phase = Phase::Running(run);
        }
        Some(update)
    }

    /// Cancel the active run. No further frames or ticks are produced.
    pub fn stop(&mut self) -> Option<Cancelled> {
        let Phase::Running(run) = std::mem::take(&mut self.phase) else {
            return None;
        };
        tracing::debug!(mode = ?run.plan.mode, "run cancelled");
        Some(Cancelled {
            mode: run.plan.mode,
            reset_count: run.plan.start,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/engine.rs"]
mod tests;
