//=========================================================================
// Game Controller Contract
//=========================================================================
//
// Polling interface to the game controller that owns the rules and the
// high-level state machine. The core never mutates controller state; it
// only reads (variant, state, intermission index) as a lookup key and
// asks the controller to advance one tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Internal Dependencies ===============================================

use crate::core::events::GameEvent;
use crate::core::scene::SceneSlot;

//=== GameVariant =========================================================

/// Marker trait for game variant identifiers.
///
/// Typically implemented by a small game-specific enum
/// (e.g. `PacMan`, `MsPacMan`).
pub trait GameVariant: Clone + Copy + Eq + Hash + Debug + 'static {}

//=== GameState ===========================================================

/// High-level controller state, mirrored by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Boot,
    Intro,
    Credit,
    Ready,
    Hunting,
    LevelComplete,
    LevelTest,
    ChangingToNextLevel,
    PacDying,
    GhostDying,
    GameOver,
    Intermission,
    IntermissionTest,
}

impl GameState {
    /// Catalog slot that shows this state.
    ///
    /// All playing states share the play slot. Cutscene states map to the
    /// cutscene slot whose index is supplied separately by the controller.
    pub fn scene_slot(self, intermission: usize) -> SceneSlot {
        match self {
            Self::Boot => SceneSlot::Boot,
            Self::Intro => SceneSlot::Intro,
            Self::Credit => SceneSlot::Credit,
            Self::Intermission | Self::IntermissionTest => SceneSlot::Cutscene(intermission),
            _ => SceneSlot::Play,
        }
    }

    /// Whether this state is shown by a cutscene.
    pub fn is_intermission(self) -> bool {
        matches!(self, Self::Intermission | Self::IntermissionTest)
    }
}

//=== GameController ======================================================

/// Read access to the game controller plus its per-tick step.
pub trait GameController<V: GameVariant> {
    /// Current high-level state.
    fn state(&self) -> GameState;

    /// Currently selected game variant.
    fn variant(&self) -> V;

    /// Zero-based cutscene index for the intermission states.
    ///
    /// Only consulted while [`GameState::is_intermission`] holds.
    fn intermission_index(&self) -> Option<usize> {
        None
    }

    /// Advances the game model by one simulation tick.
    ///
    /// Events raised during the step are appended to `events` in the
    /// order they occurred.
    fn update(&mut self, _events: &mut Vec<GameEvent>) {}
}

//=========================================================================
// Unit Tests
//=========================================================================
