use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use fdsm_sampler::ProgressSink;

const BAR_SLOTS: usize = 20;
const LINE_WIDTH: usize = 60;

/// Console progress renderer: a 60-column line with a 20-slot bar, the
/// completed percentage and the estimated time remaining. Redraws only when
/// the integer percentage changes.
pub struct ConsoleProgress {
    started: Instant,
    percent_done: AtomicU64,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            percent_done: AtomicU64::new(0),
        }
    }

    fn print_line(&self, line: &str) {
        let mut padded = format!("\r{line}");
        while padded.len() < LINE_WIDTH + 1 {
            padded.push(' ');
        }
        print!("{padded}");
        let _ = io::stdout().flush();
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleProgress {
    fn baseline_started(&self) {
        self.print_line("Computing baseline co-occurrence");
    }

    fn baseline_finished(&self) {
        self.print_line("Baseline complete");
        println!();
        self.print_line(&format!("Sampling [{}] 0% done", "-".repeat(BAR_SLOTS)));
    }

    fn sample_finished(&self, completed: usize, total: usize) {
        let percent = (100 * completed / total.max(1)) as u64;
        if percent <= self.percent_done.swap(percent, Ordering::Relaxed) {
            return;
        }
        let bars = (percent as usize / 5).min(BAR_SLOTS);
        let remaining = estimated_remaining(self.started.elapsed().as_millis() as u64, completed, total);
        self.print_line(&format!(
            "Sampling [{}{}] {}% done, ETR {}",
            "=".repeat(bars),
            "-".repeat(BAR_SLOTS - bars),
            percent,
            coarse_duration(remaining),
        ));
    }

    fn sampling_finished(&self) {
        self.print_line(&format!(
            "Sampling complete. Time required {}",
            full_duration(self.started.elapsed().as_millis() as u64)
        ));
        println!();
    }
}

fn estimated_remaining(elapsed_ms: u64, completed: usize, total: usize) -> u64 {
    let scale = total as f64 / (completed as f64 + 1.0) - 1.0;
    (elapsed_ms as f64 * scale.max(0.0)) as u64
}

/// Largest single unit, for the in-flight estimate.
fn coarse_duration(millis: u64) -> String {
    const HOUR: u64 = 3_600_000;
    const MINUTE: u64 = 60_000;
    if millis > HOUR {
        format!("{} hours", millis / HOUR)
    } else if millis > MINUTE {
        format!("{} min", millis / MINUTE)
    } else {
        format!("{} sec", millis / 1_000)
    }
}

/// Hours, minutes and seconds spelled out, for the closing line.
fn full_duration(mut millis: u64) -> String {
    const HOUR: u64 = 3_600_000;
    const MINUTE: u64 = 60_000;
    let mut out = String::new();
    if millis >= HOUR {
        out.push_str(&format!("{} hours ", millis / HOUR));
        millis %= HOUR;
    }
    if millis > MINUTE {
        out.push_str(&format!("{} min ", millis / MINUTE));
        millis %= MINUTE;
    }
    out.push_str(&format!("{} sec", millis / 1_000));
    out
}

#[cfg(test)]
mod tests {
    use super::{coarse_duration, estimated_remaining, full_duration};

    #[test]
    fn estimate_scales_elapsed_time_by_remaining_work() {
        // Half way through after 10 seconds: roughly 10 seconds to go.
        let remaining = estimated_remaining(10_000, 50, 100);
        assert!(remaining > 9_000 && remaining < 10_000);
        assert_eq!(estimated_remaining(10_000, 100, 100), 0);
    }

    #[test]
    fn durations_render_in_sensible_units() {
        assert_eq!(coarse_duration(5_000), "5 sec");
        assert_eq!(coarse_duration(150_000), "2 min");
        assert_eq!(coarse_duration(7_200_001), "2 hours");
        assert_eq!(full_duration(3_725_000), "1 hours 2 min 5 sec");
        assert_eq!(full_duration(59_000), "59 sec");
    }
}
