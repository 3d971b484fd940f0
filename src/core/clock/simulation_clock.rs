//=========================================================================
// SimulationClock
//=========================================================================
//
// Per-frame flow:
//
//   on_frame(now)
//     ├─ on_frame_start() × 1            (guarded)
//     ├─ delta = now - last_frame        (0 on the first frame)
//     ├─ paused?  → 0 ticks, delta discarded
//     │  else     → ticks = accumulator.advance(delta, hz, cap)
//     ├─ on_tick() × ticks               (each guarded)
//     └─ on_render() × 1                 (guarded)
//
// A failing or panicking callback is logged and counted; the tick counter
// still advances and the next frame runs normally.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use super::frequency_meter::FrequencyMeter;
use super::tick_accumulator::TickAccumulator;
use super::ClockTarget;
use crate::core::error::{ClockError, SceneResult};

//=== FrameReport =========================================================

/// What a single `on_frame()` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Simulation ticks executed.
    pub ticks: u64,
    /// Whether the render callback ran.
    pub rendered: bool,
    /// Owed ticks discarded by the per-frame cap.
    pub dropped: u64,
    /// Callbacks that failed or panicked.
    pub failures: u32,
}

//=== SimulationClock =====================================================

/// Fixed-rate tick scheduler driven by the host's frame callback.
///
/// # Example
///
/// ```rust
/// # use std::time::{Duration, Instant};
/// # use arcade_stage::prelude::*;
/// struct Counter(u64);
///
/// impl ClockTarget for Counter {
///     fn on_tick(&mut self, _tick: u64) -> SceneResult {
///         self.0 += 1;
///         Ok(())
///     }
///     fn on_render(&mut self) -> SceneResult {
///         Ok(())
///     }
/// }
///
/// let mut clock = SimulationClock::new(50);
/// let mut counter = Counter(0);
/// let start = Instant::now();
///
/// clock.start();
/// clock.on_frame(start, &mut counter);
/// clock.on_frame(start + Duration::from_millis(100), &mut counter);
/// assert_eq!(counter.0, 5);
/// ```
#[derive(Debug)]
pub struct SimulationClock {
    target_hz: u32,
    default_hz: u32,
    max_ticks_per_frame: Option<u32>,

    running: bool,
    paused: bool,

    elapsed_ticks: u64,
    frames_rendered: u64,
    failures: u64,

    accumulator: TickAccumulator,
    meter: FrequencyMeter,
    last_frame: Option<Instant>,
}

impl SimulationClock {
    /// Tick rate used when nothing else is configured.
    pub const DEFAULT_HZ: u32 = 60;

    /// Creates a stopped, unpaused clock.
    ///
    /// `target_hz` also becomes the frequency restored by
    /// [`reset_target_frequency`](Self::reset_target_frequency).
    ///
    /// # Panics
    ///
    /// Panics if `target_hz == 0`.
    pub fn new(target_hz: u32) -> Self {
        assert!(target_hz > 0, "Target frequency must be positive");
        Self {
            target_hz,
            default_hz: target_hz,
            max_ticks_per_frame: None,
            running: false,
            paused: false,
            elapsed_ticks: 0,
            frames_rendered: 0,
            failures: 0,
            accumulator: TickAccumulator::new(),
            meter: FrequencyMeter::new(),
            last_frame: None,
        }
    }

    /// Limits the ticks a single frame may run; excess backlog is dropped.
    pub fn with_max_ticks_per_frame(mut self, cap: Option<u32>) -> Self {
        self.max_ticks_per_frame = cap.filter(|cap| *cap > 0);
        self
    }

    /// Sets the initial paused flag.
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    //=== Lifecycle =======================================================

    /// Starts scheduling. Does nothing if already running.
    ///
    /// Resets the frequency measurement; the first frame after a start
    /// owes no ticks.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_frame = None;
        self.meter.reset();
        info!(target: "clock", "Clock started at {} Hz (paused: {})", self.target_hz, self.paused);
    }

    /// Stops scheduling and discards any partial tick.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.accumulator.clear();
        self.last_frame = None;
        info!(
            target: "clock",
            "Clock stopped after {} ticks, {} frames",
            self.elapsed_ticks,
            self.frames_rendered
        );
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    //=== Pause & Frequency ===============================================

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pauses or resumes the simulation. Rendering continues either way.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            self.paused = paused;
            info!(target: "clock", "Simulation {}", if paused { "paused" } else { "resumed" });
        }
    }

    /// Flips the paused flag and returns the new value.
    pub fn toggle_paused(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    pub fn target_frequency_hz(&self) -> u32 {
        self.target_hz
    }

    /// Sets the tick rate used from the next frame on.
    ///
    /// # Errors
    ///
    /// [`ClockError::ZeroFrequency`] if `hz == 0`; the rate is unchanged.
    pub fn set_target_frequency(&mut self, hz: u32) -> Result<(), ClockError> {
        if hz == 0 {
            return Err(ClockError::ZeroFrequency);
        }
        if hz != self.target_hz {
            debug!(target: "clock", "Target frequency {} Hz → {} Hz", self.target_hz, hz);
            self.target_hz = hz;
        }
        Ok(())
    }

    /// Adds `delta` to the tick rate if the result stays positive.
    ///
    /// Returns the new rate, or `None` if the change was rejected.
    pub fn change_target_frequency(&mut self, delta: i32) -> Option<u32> {
        let hz = i64::from(self.target_hz) + i64::from(delta);
        let hz = u32::try_from(hz).ok().filter(|hz| *hz > 0)?;
        self.set_target_frequency(hz).ok()?;
        Some(hz)
    }

    /// Restores the frequency the clock was created with.
    pub fn reset_target_frequency(&mut self) {
        self.target_hz = self.default_hz;
        debug!(target: "clock", "Target frequency reset to {} Hz", self.target_hz);
    }

    //=== Frame Callback ==================================================

    /// Runs the owed ticks for the frame at `now`, then renders once.
    ///
    /// Does nothing while stopped.
    pub fn on_frame<T>(&mut self, now: Instant, target: &mut T) -> FrameReport
    where
        T: ClockTarget + ?Sized,
    {
        let mut report = FrameReport::default();
        if !self.running {
            return report;
        }

        if !self.guarded("frame start", || target.on_frame_start()) {
            report.failures += 1;
        }

        let delta = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_frame = Some(now);

        if !self.paused {
            let plan = self
                .accumulator
                .advance(delta, self.target_hz, self.max_ticks_per_frame);

            if plan.dropped > 0 {
                warn!(
                    target: "clock",
                    "Frame owed {} ticks, dropped {} over the cap",
                    plan.ticks + plan.dropped,
                    plan.dropped
                );
            }

            for _ in 0..plan.ticks {
                if !self.run_tick(target) {
                    report.failures += 1;
                }
            }
            report.ticks = plan.ticks;
            report.dropped = plan.dropped;
        }

        self.meter.record(now, report.ticks);

        if !self.run_render(target) {
            report.failures += 1;
        }
        report.rendered = true;
        report
    }

    //=== Single Stepping =================================================

    /// Executes exactly one tick while paused, optionally followed by one
    /// render.
    ///
    /// # Errors
    ///
    /// [`ClockError::NotPaused`] if the clock is running freely; nothing
    /// is executed.
    pub fn execute_single_step<T>(&mut self, force_render: bool, target: &mut T) -> Result<(), ClockError>
    where
        T: ClockTarget + ?Sized,
    {
        if !self.paused {
            return Err(ClockError::NotPaused);
        }

        self.run_tick(target);
        if force_render {
            self.run_render(target);
        }
        Ok(())
    }

    /// Executes `n` single steps within the calling frame.
    pub fn execute_steps<T>(&mut self, n: u32, force_render: bool, target: &mut T) -> Result<(), ClockError>
    where
        T: ClockTarget + ?Sized,
    {
        if !self.paused {
            return Err(ClockError::NotPaused);
        }

        debug!(target: "clock", "Executing {} steps (render: {})", n, force_render);
        for _ in 0..n {
            self.execute_single_step(force_render, target)?;
        }
        Ok(())
    }

    //=== Statistics ======================================================

    /// Ticks executed since creation, failed ones included.
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Render callbacks issued since creation.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Callbacks that failed or panicked since creation.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Tick rate achieved over the last full second of frames.
    pub fn measured_frequency_hz(&self) -> f64 {
        self.meter.measured_hz()
    }

    //=== Internals =======================================================

    fn run_tick<T>(&mut self, target: &mut T) -> bool
    where
        T: ClockTarget + ?Sized,
    {
        let tick = self.elapsed_ticks;
        self.elapsed_ticks += 1;
        self.guarded("tick", || target.on_tick(tick))
    }

    fn run_render<T>(&mut self, target: &mut T) -> bool
    where
        T: ClockTarget + ?Sized,
    {
        self.frames_rendered += 1;
        self.guarded("render", || target.on_render())
    }

    fn guarded<F>(&mut self, what: &str, callback: F) -> bool
    where
        F: FnOnce() -> SceneResult,
    {
        match panic::catch_unwind(AssertUnwindSafe(callback)) {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                self.failures += 1;
                error!(target: "clock", "{} #{} failed: {:#}", what, self.elapsed_ticks, err);
                false
            }
            Err(payload) => {
                self.failures += 1;
                error!(
                    target: "clock",
                    "{} #{} panicked: {}",
                    what,
                    self.elapsed_ticks,
                    panic_message(payload.as_ref())
                );
                false
            }
        }
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HZ)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
