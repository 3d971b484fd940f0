//=========================================================================
// Core Error Types
//=========================================================================
//
// Typed failures raised by the clock, the scene catalog and the
// dispatcher.
//
// Resolution and catalog errors are configuration bugs (missing content),
// never runtime conditions: callers surface them, they do not pick a
// fallback scene. Scene callbacks themselves report failures through
// `SceneResult` and are contained at the clock boundary.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::controller::GameState;
use crate::core::scene::SceneSlot;

//=== SceneResult =========================================================

/// Result type returned by scene and tick-target callbacks.
pub type SceneResult = anyhow::Result<()>;

//=== SceneResolutionError ================================================

/// Raised when the catalog has no scene for a (variant, state, index)
/// combination.
///
/// The variant is carried in its `Debug` rendering so the error stays
/// independent of the concrete variant type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneResolutionError {
    /// No entry exists for the mapped slot.
    #[error("no scene registered for variant {variant} in slot {slot:?} (state {state:?})")]
    MissingScene {
        variant: String,
        state: GameState,
        slot: SceneSlot,
    },

    /// The intermission index lies outside the configured cutscene range.
    #[error(
        "intermission index {index} out of range for variant {variant} \
         (state {state:?}, {available} cutscenes configured)"
    )]
    CutsceneOutOfRange {
        variant: String,
        state: GameState,
        index: usize,
        available: usize,
    },

    /// A cutscene state was reported without an intermission index.
    #[error("state {state:?} of variant {variant} requires an intermission index")]
    MissingIntermissionIndex { variant: String, state: GameState },
}

//=== CatalogError ========================================================

/// Raised when a scene catalog is incomplete at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No variant was registered at all.
    #[error("scene catalog is empty")]
    Empty,

    /// A variant lacks one of the mandatory 2D slots.
    #[error("variant {variant} has no 2D scene for required slot {slot:?}")]
    MissingRequiredSlot { variant: String, slot: SceneSlot },

    /// Cutscene indices of a variant do not form the range `0..n`.
    #[error("variant {variant} has a gap in its cutscenes: index {missing} is missing")]
    CutsceneGap { variant: String, missing: usize },

    /// An entry points at a scene id this catalog never handed out.
    #[error("catalog entry refers to unknown scene #{index}")]
    UnknownScene { index: usize },
}

//=== ClockError ==========================================================

/// Rejected clock operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClockError {
    /// Single-stepping is only allowed while the clock is paused.
    #[error("simulation steps can only be executed while paused")]
    NotPaused,

    /// A target frequency of zero was requested.
    #[error("target frequency must be positive")]
    ZeroFrequency,
}

//=========================================================================
// Unit Tests
//=========================================================================
