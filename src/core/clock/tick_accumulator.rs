//=========================================================================
// Tick Accumulator
//=========================================================================
//
// Fixed-step accounting in exact integer arithmetic.
//
// The accumulator stores owed simulation time in units of 1e-9 ticks
// (nanoseconds × hz), so the ticks handed out over any sequence of frames
// always equal floor(total elapsed time × hz). Nothing is rounded twice
// and the remainder can never go negative.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Constants ===========================================================

const UNITS_PER_TICK: u128 = 1_000_000_000;

//=== TickPlan ============================================================

/// Ticks owed for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TickPlan {
    /// Ticks to execute now.
    pub ticks: u64,
    /// Whole ticks discarded because of the per-frame cap.
    pub dropped: u64,
}

//=== TickAccumulator =====================================================

#[derive(Debug, Clone, Default)]
pub(crate) struct TickAccumulator {
    units: u128,
}

impl TickAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` of wall-clock time at `hz` and takes out every whole
    /// tick owed.
    ///
    /// The frequency only scales the new delta; time accumulated earlier
    /// keeps the rate it was accrued at. With a cap, excess whole ticks
    /// are dropped while the fractional remainder is kept.
    pub fn advance(&mut self, delta: Duration, hz: u32, cap: Option<u32>) -> TickPlan {
        self.units += delta.as_nanos() * u128::from(hz);

        let owed = self.units / UNITS_PER_TICK;
        self.units %= UNITS_PER_TICK;
        let owed = u64::try_from(owed).unwrap_or(u64::MAX);

        match cap.map(u64::from) {
            Some(cap) if owed > cap => TickPlan {
                ticks: cap,
                dropped: owed - cap,
            },
            _ => TickPlan {
                ticks: owed,
                dropped: 0,
            },
        }
    }

    /// Discards any partial tick.
    pub fn clear(&mut self) {
        self.units = 0;
    }

    /// Owed fraction of the next tick, in `[0, 1)`.
    #[cfg(test)]
    pub fn fraction(&self) -> f64 {
        self.units as f64 / UNITS_PER_TICK as f64
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matched_rate_yields_one_tick_per_frame() {
        let mut acc = TickAccumulator::new();
        for _ in 0..10 {
            assert_eq!(acc.advance(Duration::from_millis(20), 50, None).ticks, 1);
        }
        assert_eq!(acc.fraction(), 0.0);
    }

    #[test]
    fn fast_display_accumulates_partial_ticks() {
        let mut acc = TickAccumulator::new();
        let ticks: Vec<u64> = (0..8)
            .map(|_| acc.advance(Duration::from_millis(5), 50, None).ticks)
            .collect();
        assert_eq!(ticks, vec![0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn slow_display_owes_several_ticks() {
        let mut acc = TickAccumulator::new();
        assert_eq!(acc.advance(Duration::from_millis(100), 60, None).ticks, 6);
    }

    #[test]
    fn total_ticks_equal_floor_of_elapsed_time_times_frequency() {
        for hz in [1_u32, 7, 30, 60, 144, 1000] {
            let mut acc = TickAccumulator::new();
            let mut seed = 0x2545_f491_u64;
            let mut total_nanos: u128 = 0;
            let mut total_ticks: u64 = 0;

            for _ in 0..500 {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let nanos = (seed >> 33) % 40_000_000;
                total_nanos += u128::from(nanos);
                total_ticks += acc.advance(Duration::from_nanos(nanos), hz, None).ticks;

                let expected = total_nanos * u128::from(hz) / UNITS_PER_TICK;
                assert_eq!(u128::from(total_ticks), expected, "hz {}", hz);
                assert!(acc.fraction() >= 0.0 && acc.fraction() < 1.0);
            }
        }
    }

    #[test]
    fn frequency_change_only_scales_new_time() {
        let mut acc = TickAccumulator::new();
        // Half a tick at 10 Hz.
        assert_eq!(acc.advance(Duration::from_millis(50), 10, None).ticks, 0);
        // Another 50 ms at 20 Hz is one full tick; plus the half from before.
        assert_eq!(acc.advance(Duration::from_millis(50), 20, None).ticks, 1);
        assert!((acc.fraction() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn cap_drops_whole_ticks_and_keeps_fraction() {
        let mut acc = TickAccumulator::new();
        let plan = acc.advance(Duration::from_millis(1050), 10, Some(3));

        assert_eq!(plan, TickPlan { ticks: 3, dropped: 7 });
        assert!((acc.fraction() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn clear_discards_partial_tick() {
        let mut acc = TickAccumulator::new();
        acc.advance(Duration::from_millis(15), 50, None);
        acc.clear();
        assert_eq!(acc.advance(Duration::from_millis(15), 50, None).ticks, 0);
    }
}
