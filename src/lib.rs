//=========================================================================
// Arcade Stage: Library Root
//
// Fixed-rate simulation clock and state-driven scene dispatcher for an
// arcade game front-end.
//
// Responsibilities:
// - Expose the stage facade (`Stage`, `StageBuilder`)
// - Expose the toolkit-independent core (clock, scenes, events)
// - Keep the Winit integration (`platform`) hidden from users
//
// Typical usage:
// ```no_run
// use arcade_stage::prelude::*;
//
// let stage = StageBuilder::new(StageConfig::default())
//     .build(catalog, controller);
// stage.run()?;
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the clock, the scene system and event routing. It has no
// Winit dependency and can be driven by any frame pump.
//
pub mod config;
pub mod core;
pub mod logging;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` is the Winit host; `stage` wires the core to it.
//
mod platform;
mod stage;

//--- Public Exports ------------------------------------------------------

pub use platform::PlatformError;
pub use stage::{Stage, StageBuilder};
