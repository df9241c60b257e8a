use anyhow::Result;
use std::time::{Duration, Instant};
use wfc_core::{ProgressInfo, WfcError};

/// Receives progress snapshots from the solver.
///
/// Implementors decide how and how often to surface them.
pub trait ProgressReporter: Send + Sync {
    /// Called after every solver iteration.
    fn report(&mut self, info: &ProgressInfo) -> Result<()>;

    /// Called once when the grid is solved.
    fn finish(&mut self) -> Result<()>;

    /// Called once when solving fails.
    fn fail(&mut self, error: &WfcError) -> Result<()>;
}

/// A `ProgressReporter` that logs status lines, at most once per interval.
pub struct ConsoleProgressReporter {
    start_time: Instant,
    last_report_time: Option<Instant>,
    last_attempt: u32,
    report_interval: Duration,
}

impl ConsoleProgressReporter {
    pub fn new(report_interval: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            last_report_time: None,
            last_attempt: 0,
            report_interval,
        }
    }

    fn format_duration(duration: Duration) -> String {
        format!("{}.{:03}s", duration.as_secs(), duration.subsec_millis())
    }

    fn is_due(&self, now: Instant) -> bool {
        self.last_report_time
            .map_or(true, |last| now.duration_since(last) >= self.report_interval)
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report(&mut self, info: &ProgressInfo) -> Result<()> {
        if info.attempt != self.last_attempt {
            log::info!("Restarted: attempt {}", info.attempt);
            self.last_attempt = info.attempt;
        }

        let now = Instant::now();
        if !self.is_due(now) {
            return Ok(());
        }

        let percentage = if info.total_cells > 0 {
            (info.collapsed_cells as f32 / info.total_cells as f32) * 100.0
        } else {
            100.0
        };

        let eta = if info.collapsed_cells > 0 && info.collapsed_cells < info.total_cells {
            let per_cell = info.elapsed_time.as_secs_f64() / info.collapsed_cells as f64;
            let remaining = (info.total_cells - info.collapsed_cells) as f64;
            Self::format_duration(Duration::from_secs_f64(per_cell * remaining))
        } else {
            "N/A".to_string()
        };

        log::info!(
            "Progress: Attempt: {} | Iter: {} | Collapsed: {}/{} ({:.1}%) | Elapsed: {} | ETA: {}",
            info.attempt,
            info.iterations,
            info.collapsed_cells,
            info.total_cells,
            percentage,
            Self::format_duration(info.elapsed_time),
            eta
        );
        self.last_report_time = Some(now);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        log::info!(
            "Solve finished successfully. Total time: {}",
            Self::format_duration(self.start_time.elapsed())
        );
        Ok(())
    }

    fn fail(&mut self, error: &WfcError) -> Result<()> {
        log::error!(
            "Solve failed: {}. Total time: {}",
            error,
            Self::format_duration(self.start_time.elapsed())
        );
        Ok(())
    }
}
