//! Timing of loop phases, compiled in with the `perf` feature. Output goes
//! to the log file since the terminal is owned by the UI.

#[cfg(feature = "perf")]
use std::time::Instant;

#[cfg(feature = "perf")]
pub struct PerfGuard {
    label: &'static str,
    start: Instant,
}

#[cfg(feature = "perf")]
impl Drop for PerfGuard {
    fn drop(&mut self) {
        let micros = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);
        tracing::trace!(target: "reqlab::perf", phase = self.label, micros, "phase timing");
    }
}

#[cfg(feature = "perf")]
#[inline]
pub fn scope(label: &'static str) -> PerfGuard {
    PerfGuard {
        label,
        start: Instant::now(),
    }
}

#[cfg(not(feature = "perf"))]
pub struct PerfGuard;

#[cfg(not(feature = "perf"))]
#[inline]
pub fn scope(_label: &'static str) -> PerfGuard {
    PerfGuard
}
