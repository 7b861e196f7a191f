use std::time::Duration;

/// Exponentially-weighted moving average of an event rate, fed once per tick.
#[derive(Debug, Clone)]
pub struct Ewma {
    alpha: f64,
    interval_secs: f64,
    rate: f64,
    initialized: bool,
}

impl Ewma {
    /// Average decaying over `minutes`, ticked every `interval`.
    pub fn over_minutes(minutes: u32, interval: Duration) -> Self {
        let interval_secs = interval.as_secs_f64();
        let alpha = 1.0 - (-interval_secs / 60.0 / f64::from(minutes)).exp();
        Self {
            alpha,
            interval_secs,
            rate: 0.0,
            initialized: false,
        }
    }

    /// Fold in the events counted during the last interval.
    pub fn tick(&mut self, count: u64) {
        let instant_rate = count as f64 / self.interval_secs;
        if self.initialized {
            self.rate += self.alpha * (instant_rate - self.rate);
        } else {
            self.rate = instant_rate;
            self.initialized = true;
        }
    }

    /// Events per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}
