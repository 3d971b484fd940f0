//=========================================================================
// Frequency Meter
//=========================================================================
//
// Rolling measurement of the achieved tick rate over windows of at least
// one second.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

//=== Constants ===========================================================

const WINDOW: Duration = Duration::from_secs(1);

//=== FrequencyMeter ======================================================

#[derive(Debug, Clone, Default)]
pub(crate) struct FrequencyMeter {
    window_start: Option<Instant>,
    ticks_in_window: u64,
    measured_hz: f64,
}

impl FrequencyMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the current window and the last measurement.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Counts `ticks` executed in the frame at `now`.
    ///
    /// The first call opens a window. Once a window spans a second the
    /// rate is published and the next window starts at `now`.
    pub fn record(&mut self, now: Instant, ticks: u64) {
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            self.ticks_in_window = ticks;
            return;
        };

        self.ticks_in_window += ticks;

        let span = now.saturating_duration_since(start);
        if span >= WINDOW {
            self.measured_hz = self.ticks_in_window as f64 / span.as_secs_f64();
            self.window_start = Some(now);
            self.ticks_in_window = 0;
        }
    }

    /// Rate of the last complete window, `0.0` before the first one.
    pub fn measured_hz(&self) -> f64 {
        self.measured_hz
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_measured_before_a_full_window() {
        let mut meter = FrequencyMeter::new();
        let start = Instant::now();
        meter.record(start, 0);
        meter.record(start + Duration::from_millis(500), 30);

        assert_eq!(meter.measured_hz(), 0.0);
    }

    #[test]
    fn publishes_rate_after_one_second() {
        let mut meter = FrequencyMeter::new();
        let start = Instant::now();
        meter.record(start, 0);
        for frame in 1..=50 {
            meter.record(start + Duration::from_millis(20 * frame), 1);
        }

        assert!((meter.measured_hz() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn reset_clears_measurement() {
        let mut meter = FrequencyMeter::new();
        let start = Instant::now();
        meter.record(start, 0);
        meter.record(start + Duration::from_secs(2), 120);
        assert!((meter.measured_hz() - 60.0).abs() < 1e-6);

        meter.reset();
        assert_eq!(meter.measured_hz(), 0.0);
    }
}
