//=========================================================================
// UI Shell & Asset Contracts
//=========================================================================
//
// Narrow interfaces to the collaborators around the core:
// - `UiShell`: hosts the scene's visual root, input listeners, flash
//   messages and audio silencing
// - `AnimationSource`: builds creature animation sets on request
//
// The core never draws or loads assets itself. It only tells these
// collaborators *when* something has to happen.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::controller::GameVariant;
use crate::core::scene::{Dimension, SceneId};

//=== SceneChange =========================================================

/// Notification sent to the shell after every successful scene switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneChange<'a> {
    /// Scene that stopped being active, if any.
    pub previous: Option<SceneId>,

    /// Scene whose visual root must now be shown.
    pub current: SceneId,

    /// Display name of the new scene.
    pub name: &'a str,

    /// Whether movement-key steering must be attached.
    pub is_play_scene: bool,

    /// Whether the new scene renders in 3D.
    pub three_dimensional: bool,
}

//=== UiShell =============================================================

/// Host window collaborator.
pub trait UiShell {
    /// Re-parents the new scene's visual root and rebinds input handlers.
    fn scene_changed(&mut self, change: &SceneChange<'_>);

    /// Shows a short message on top of the current scene.
    fn show_flash_message(&mut self, message: &str, duration: Duration) {
        info!(target: "stage", "Flash ({:.1}s): {}", duration.as_secs_f32(), message);
    }

    /// Called whenever the clock is paused or resumed.
    fn pause_changed(&mut self, _paused: bool) {}
}

/// Shell that only logs, used when no window shell is attached.
#[derive(Debug, Default)]
pub struct LogShell;

impl UiShell for LogShell {
    fn scene_changed(&mut self, change: &SceneChange<'_>) {
        info!(
            target: "stage",
            "Showing scene '{}' (play: {}, 3D: {})",
            change.name,
            change.is_play_scene,
            change.three_dimensional
        );
    }

    fn show_flash_message(&mut self, message: &str, _duration: Duration) {
        warn!(target: "stage", "{}", message);
    }
}

//=== Creature ============================================================

/// Animated actors whose sprite sets depend on variant and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Creature {
    Pac,
    Ghost(u8),
}

impl Creature {
    /// Every creature of a level, player first.
    pub const ALL: [Creature; 5] = [
        Creature::Pac,
        Creature::Ghost(0),
        Creature::Ghost(1),
        Creature::Ghost(2),
        Creature::Ghost(3),
    ];
}

//=== AnimationSource =====================================================

/// Rendering collaborator that (re)creates animation sets.
pub trait AnimationSource<V: GameVariant> {
    /// Builds or re-selects the animation set for `creature`.
    fn create_animations(&mut self, creature: Creature, variant: V, renderer: Dimension);
}

/// Animation source that ignores every request.
#[derive(Debug, Default)]
pub struct NoAnimations;

impl<V: GameVariant> AnimationSource<V> for NoAnimations {
    fn create_animations(&mut self, _creature: Creature, _variant: V, _renderer: Dimension) {}
}
