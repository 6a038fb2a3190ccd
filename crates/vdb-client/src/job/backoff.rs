//! Delay state of the poller.

use std::time::Duration;

use crate::config::PollConfig;

/// Geometric delay between polls, bounded by a ceiling.
///
/// The ceiling is checked before a wait is handed out: once the current
/// delay has reached it, the next pending observation is a timeout.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    multiplier: u32,
    ceiling: Duration,
}

impl Backoff {
    /// Start a sequence at the configured initial delay.
    pub fn new(config: &PollConfig) -> Self {
        Self {
            current: config.initial_delay,
            multiplier: config.multiplier,
            ceiling: config.max_delay,
        }
    }

    /// Delay the next wait would use.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Delay at which polling gives up.
    pub fn ceiling(&self) -> Duration {
        self.ceiling
    }

    pub fn exhausted(&self) -> bool {
        self.current >= self.ceiling
    }

    /// Wait to schedule after a pending poll, or `None` when the job timed out.
    pub fn next_wait(&mut self) -> Option<Duration> {
        if self.exhausted() {
            return None;
        }
        let wait = self.current;
        self.current = self.current.saturating_mul(self.multiplier);
        Some(wait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backoff(initial_ms: u64, multiplier: u32, ceiling_ms: u64) -> Backoff {
        Backoff::new(&PollConfig::new(
            Duration::from_millis(initial_ms),
            multiplier,
            Duration::from_millis(ceiling_ms),
        ))
    }

    #[test]
    fn test_waits_grow_geometrically() {
        let mut backoff = backoff(100, 3, 10_000);
        let waits: Vec<u64> = std::iter::from_fn(|| backoff.next_wait())
            .map(|d| d.as_millis() as u64)
            .collect();
        assert_eq!(waits, vec![100, 300, 900, 2700, 8100]);
        assert!(backoff.exhausted());
        assert_eq!(backoff.next_wait(), None);
    }

    #[test]
    fn test_kth_wait_is_initial_times_multiplier_pow_k() {
        let mut backoff = backoff(5, 2, u64::MAX / 4);
        for k in 0..20u32 {
            let wait = backoff.next_wait().unwrap();
            assert_eq!(wait, Duration::from_millis(5 * 2u64.pow(k)));
        }
    }

    #[test]
    fn test_ceiling_reached_exactly() {
        let mut backoff = backoff(1000, 2, 4000);
        assert_eq!(backoff.next_wait(), Some(Duration::from_millis(1000)));
        assert_eq!(backoff.next_wait(), Some(Duration::from_millis(2000)));
        assert_eq!(backoff.current(), Duration::from_millis(4000));
        assert_eq!(backoff.next_wait(), None);
    }

    #[test]
    fn test_initial_at_ceiling_times_out_immediately() {
        let mut backoff = backoff(500, 2, 500);
        assert_eq!(backoff.next_wait(), None);
    }

    #[test]
    fn test_always_terminates() {
        for multiplier in 2..6 {
            let mut backoff = backoff(1, multiplier, 1_000_000);
            let rounds = std::iter::from_fn(|| backoff.next_wait()).count();
            assert!(rounds < 64, "multiplier {multiplier} took {rounds} rounds");
        }
    }
}
