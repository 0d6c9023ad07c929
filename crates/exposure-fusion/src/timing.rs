use core::{fmt, time::Duration};
use std::time::Instant;

use tracing::debug;

/// A duration shown in the coarsest unit it has at least one of, `42ms` or `7µs`.
///
/// Seconds keep one decimal place below ten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(pub Duration);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos();

        match nanos {
            0..1_000 => write!(f, "{nanos}ns"),
            1_000..1_000_000 => write!(f, "{}µs", nanos / 1_000),
            1_000_000..1_000_000_000 => write!(f, "{}ms", nanos / 1_000_000),
            1_000_000_000..10_000_000_000 => write!(f, "{:.1}s", self.0.as_secs_f64()),
            _ => write!(f, "{}s", self.0.as_secs()),
        }
    }
}

/// Logs the duration and pixel throughput of a pipeline stage when dropped.
pub(crate) struct StageTimer {
    stage: &'static str,
    pixels: u64,
    start: Instant,
}

impl StageTimer {
    /// Starts timing `stage` over an image of `size`.
    pub fn start(stage: &'static str, size: [u32; 2]) -> Self {
        Self {
            stage,
            pixels: u64::from(size[0]) * u64::from(size[1]),
            start: Instant::now(),
        }
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let megapixels_per_second = self.pixels as f64 / elapsed.as_secs_f64().max(1e-9) / 1e6;

        debug!(
            "[Timing] {} took {} ({megapixels_per_second:.1} MP/s)",
            self.stage,
            Elapsed(elapsed)
        );
    }
}
