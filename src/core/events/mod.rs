//=========================================================================
// Game Events
//=========================================================================
//
// Notifications raised by the game controller and delivered to the
// dispatcher and the active scene.
//
// Architecture:
//   GameController::update() ─┐
//                             ├─> EventRouter ─┬─> SceneDispatcher (re-resolve)
//   EventMailbox (off-thread)─┘                └─> Scene::on_domain_event
//
// Delivery is synchronous and in arrival order. The mailbox only moves
// events produced on other threads onto the UI thread; it never reorders.
//
//=========================================================================

//=== Module Declarations =================================================

mod mailbox;
mod router;

//=== Public API ==========================================================

pub use mailbox::{EventMailbox, EventSender};
pub use router::{EventRouter, RouterStats};

//=== Internal Dependencies ===============================================

use crate::core::controller::GameState;

//=== GameEvent ===========================================================

/// Event raised by the game controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The controller moved to another high-level state.
    StateChange { from: GameState, to: GameState },

    /// Something changed that invalidates the active scene's internal
    /// state (e.g. the game variant was switched).
    UnspecifiedChange,

    /// A new level was created; creature animations must be rebuilt.
    LevelCreated { level: u32 },

    /// A level is about to start.
    LevelStarting { level: u32 },

    PacFoundFood,
    PacGetsPower,
    PacLostPower,
    PacDied,
    PacGetsExtraLife,

    GhostEaten { ghost: u8 },
    GhostEntersHouse { ghost: u8 },
    GhostRevived { ghost: u8 },

    BonusActivated,
    BonusEaten,
    BonusExpired,

    CreditAdded,
}

//=== EventKind ===========================================================

/// Routing category of a [`GameEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    StateChange,
    UnspecifiedChange,
    LevelCreated,
    Domain,
}

impl GameEvent {
    /// Returns the routing category of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::StateChange { .. } => EventKind::StateChange,
            Self::UnspecifiedChange => EventKind::UnspecifiedChange,
            Self::LevelCreated { .. } => EventKind::LevelCreated,
            _ => EventKind::Domain,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
