use std::io::Write;

use crate::foundation::error::{TickdownError, TickdownResult};

/// Fired each time the displayed count changes.
///
/// Failures are reported to the caller, which logs them and keeps the timeline running.
pub trait TickSink {
    fn tick(&mut self) -> TickdownResult<()>;
}

impl<T: TickSink + ?Sized> TickSink for Box<T> {
    fn tick(&mut self) -> TickdownResult<()> {
        (**self).tick()
    }
}

/// Discards every tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTicks;

impl TickSink for NullTicks {
    fn tick(&mut self) -> TickdownResult<()> {
        Ok(())
    }
}

/// Counts ticks; useful in tests.
#[derive(Clone, Debug, Default)]
pub struct CountingTicks {
    pub count: u64,
}

impl TickSink for CountingTicks {
    fn tick(&mut self) -> TickdownResult<()> {
        self.count += 1;
        Ok(())
    }
}

/// Rings the terminal bell on the wrapped writer.
#[derive(Debug)]
pub struct BellTicks<W: Write> {
    out: W,
}

impl<W: Write> BellTicks<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TickSink for BellTicks<W> {
    fn tick(&mut self) -> TickdownResult<()> {
        self.out
            .write_all(b"\x07")
            .and_then(|()| self.out.flush())
            .map_err(|e| TickdownError::capture_unavailable(format!("tick output failed: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/tick.rs"]
mod tests;
