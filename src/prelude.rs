//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use arcade_stage::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Stage facade
pub use crate::config::StageConfig;
pub use crate::logging::{init_logging, LoggingConfig};
pub use crate::{PlatformError, Stage, StageBuilder};

// Clock
pub use crate::core::clock::{ClockTarget, FrameReport, SimulationClock};

// Controller contract and events
pub use crate::core::controller::{GameController, GameState, GameVariant};
pub use crate::core::events::{EventSender, GameEvent};

// Scene system
pub use crate::core::error::{SceneResolutionError, SceneResult};
pub use crate::core::scene::{
    Dimension, Scene, SceneCatalog, SceneContext, SceneDispatcher, SceneSlot,
};

// Shell collaborators
pub use crate::core::shell::{AnimationSource, Creature, SceneChange, UiShell};

// Input
pub use crate::core::input::{DebugBindings, DebugCommand, KeyCode, KeyInput, Modifiers};
