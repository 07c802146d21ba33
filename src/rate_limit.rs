use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Fixed-window counter per email address.
pub struct AttemptLimiter {
    /// email -> (count, window_start)
    entries: DashMap<String, (u32, Instant)>,
    limit: u32,
    window: Duration,
}

impl AttemptLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            limit,
            window,
        }
    }

    /// Five attempts per fifteen minutes.
    pub fn per_quarter_hour() -> Self {
        Self::new(5, Duration::from_secs(15 * 60))
    }

    /// Check whether another attempt is allowed. Does NOT count the attempt;
    /// call `record()` for that. Err carries retry-after seconds.
    pub fn check(&self, email: &str) -> Result<(), u64> {
        let now = Instant::now();

        let Some(entry) = self.entries.get(&email.to_lowercase()) else {
            return Ok(());
        };

        let (count, start) = entry.value();

        if now.duration_since(*start) > self.window {
            return Ok(());
        }

        if *count >= self.limit {
            let elapsed = now.duration_since(*start).as_secs();
            return Err(self.window.as_secs().saturating_sub(elapsed));
        }

        Ok(())
    }

    pub fn record(&self, email: &str) {
        let now = Instant::now();

        let mut entry = self.entries.entry(email.to_lowercase()).or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > self.window {
            *count = 1;
            *start = now;
        } else {
            *count += 1;
        }
    }

    pub fn cleanup(&self) {
        let now = Instant::now();
        let window = self.window;
        self.entries
            .retain(|_, (_, start)| now.duration_since(*start) < window);
    }
}
