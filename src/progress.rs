use crate::log;
use std::path::Path;
use std::time::{Duration, Instant};

/// Games per second, or `None` before any measurable time has passed.
pub fn games_per_second(games: u64, elapsed: Duration) -> Option<f64> {
    let secs = elapsed.as_secs_f64();
    (secs > 0.0).then(|| games as f64 / secs)
}

/// Time left to reach `expected` games at the current rate.
pub fn estimate_remaining(games: u64, expected: u64, elapsed: Duration) -> Option<Duration> {
    let speed = games_per_second(games, elapsed)?;
    if speed <= 0.0 {
        return None;
    }
    let remaining = expected.saturating_sub(games) as f64 / speed;
    Duration::try_from_secs_f64(remaining).ok()
}

/// Batch-level throughput and ETA reporting for one conversion run.
pub struct Progress {
    started: Instant,
    chunk_started: Instant,
    games: u64,
    malformed: u64,
    expected: Option<u64>,
}

impl Progress {
    pub fn new(expected: Option<u64>) -> Self {
        let now = Instant::now();
        Self {
            started: now,
            chunk_started: now,
            games: 0,
            malformed: 0,
            expected,
        }
    }

    pub fn record_game(&mut self) {
        self.games += 1;
    }

    pub fn record_malformed(&mut self) {
        self.malformed += 1;
    }

    pub fn batch_written(&mut self, path: &Path) {
        let elapsed = self.started.elapsed();
        let speed = games_per_second(self.games, elapsed).unwrap_or_default();
        log::info(format!(
            "Processed: took {:.2} sec -- {} at speed: {:.2} games/second (wrote {})",
            self.chunk_started.elapsed().as_secs_f64(),
            self.games,
            speed,
            path.display()
        ));
        if let Some(expected) = self.expected
            && let Some(remaining) = estimate_remaining(self.games, expected, elapsed)
        {
            log::info(format!(
                "Estimated time remaining: {:.2} hours",
                remaining.as_secs_f64() / 3600.0
            ));
        }
        self.chunk_started = Instant::now();
    }

    pub fn finished(&self, source: &Path) {
        let elapsed = self.started.elapsed();
        log::info(format!(
            "Finished {}. Took: {:.2} seconds. Processed: {} ({} malformed) at speed: {:.2} games/second",
            source.display(),
            elapsed.as_secs_f64(),
            self.games,
            self.malformed,
            games_per_second(self.games, elapsed).unwrap_or_default()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_games_per_second() {
        assert_eq!(games_per_second(100, Duration::from_secs(4)), Some(25.0));
        assert_eq!(games_per_second(100, Duration::ZERO), None);
    }

    #[test]
    fn test_estimate_remaining() {
        assert_eq!(
            estimate_remaining(1_000, 4_600, Duration::from_secs(10)),
            Some(Duration::from_secs(36))
        );
        assert_eq!(
            estimate_remaining(5_000, 4_600, Duration::from_secs(10)),
            Some(Duration::ZERO)
        );
        assert_eq!(estimate_remaining(0, 4_600, Duration::from_secs(10)), None);
    }

    #[test]
    fn test_progress_counts() {
        let mut progress = Progress::new(None);
        progress.record_game();
        progress.record_game();
        progress.record_malformed();
        assert_eq!(progress.games, 2);
        assert_eq!(progress.malformed, 1);
    }
}
