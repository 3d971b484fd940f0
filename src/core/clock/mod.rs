//=========================================================================
// Simulation Clock
//
// Fixed-rate tick scheduling on the host's frame pump.
//
// Responsibilities:
// - Decide how many simulation ticks each frame owes
// - Render exactly once per frame, paused or not
// - Single-step the simulation while paused
// - Contain failures of tick and render callbacks
//
// Notes:
// The clock owns no thread. The host calls `SimulationClock::on_frame()`
// from its event loop and the clock calls back into a `ClockTarget`.
// Every callback, frame start included, runs inside the failure guard.
//
//=========================================================================

//=== Module Declarations =================================================

mod frequency_meter;
mod simulation_clock;
mod tick_accumulator;

//=== Public API ==========================================================

pub use simulation_clock::{FrameReport, SimulationClock};

//=== Internal Dependencies ===============================================

use crate::core::error::SceneResult;

//=== ClockTarget =========================================================

/// Receiver of the clock's tick and render callbacks.
pub trait ClockTarget {
    /// Runs once at the start of every frame, paused or not, before any
    /// tick of that frame.
    fn on_frame_start(&mut self) -> SceneResult {
        Ok(())
    }

    /// Advances the simulation by one tick. `tick` is the zero-based
    /// number of the tick being executed.
    fn on_tick(&mut self, tick: u64) -> SceneResult;

    /// Draws the current state. Must not advance the simulation.
    fn on_render(&mut self) -> SceneResult;
}
