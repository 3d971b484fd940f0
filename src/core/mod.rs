//=========================================================================
// Core
//
// Toolkit-independent heart of the stage: clock, scenes, events.
//
// Responsibilities:
// - Schedule simulation ticks and renders at a fixed rate
// - Keep exactly one scene active and in step with the game controller
// - Route controller events to the dispatcher and the active scene
// - Map debug key combinations to simulation commands
//
// Notes:
// Everything here runs on the host's UI thread. The only cross-thread
// entry point is the event mailbox.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod clock;
pub mod controller;
pub mod director;
pub mod error;
pub mod events;
pub mod input;
pub mod scene;
pub mod shell;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use clock::{ClockTarget, FrameReport, SimulationClock};
pub use controller::{GameController, GameState, GameVariant};
pub use director::Director;
pub use error::{CatalogError, ClockError, SceneResolutionError, SceneResult};
pub use events::{EventMailbox, EventRouter, EventSender, GameEvent};
pub use scene::{Dimension, Scene, SceneCatalog, SceneContext, SceneDispatcher, SceneId, SceneSlot};
pub use shell::{AnimationSource, Creature, UiShell};
