//=========================================================================
// Scene System
//=========================================================================
//
// Scene contract, catalog and dispatcher.
//
// Architecture:
//   SceneDispatcher
//     ├─ catalog: SceneCatalog (owns every Scene, keyed by variant/slot/dimension)
//     └─ current: Option<SceneId>
//
// Flow:
//   on_tick()   → sync with controller → Scene::update()
//   on_render() → Scene::render()
//
//=========================================================================

//=== Module Declarations =================================================

mod catalog;
mod dispatcher;
mod slot;

//=== Public API ==========================================================

pub use catalog::{SceneCatalog, SceneCatalogBuilder, SceneId};
pub use dispatcher::{DispatcherState, SceneDispatcher};
pub use slot::{Dimension, SceneSlot};

//=== Internal Dependencies ===============================================

use crate::core::controller::{GameState, GameVariant};
use crate::core::error::SceneResult;
use crate::core::events::GameEvent;
use crate::core::input::KeyInput;
use crate::core::shell::{AnimationSource, Creature};

//=== Scene Trait =========================================================

/// A self-contained screen (boot, intro, credit, play field, cutscene).
///
/// Scenes are constructed once, stored in the [`SceneCatalog`] and reused
/// every time they become active. Lifecycle while owned by a dispatcher:
///
/// ```text
/// init() → { update() | render() | handle_input() | on_domain_event() }* → end()
/// ```
///
/// `init()` runs on every activation, `end()` exactly once per activation.
///
/// # Minimal Implementation
///
/// ```rust
/// # use arcade_stage::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Variant { PacMan }
/// # impl GameVariant for Variant {}
/// struct IntroScene {
///     frame: u64,
/// }
///
/// impl Scene<Variant> for IntroScene {
///     fn update(&mut self, _tick: u64) -> SceneResult {
///         self.frame += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Scene<V: GameVariant> {
    /// Display name used in logs and shell notifications.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called every time the scene becomes active.
    ///
    /// Reset timers and request animation sets here.
    fn init(&mut self, _context: &mut SceneContext<'_, V>) -> SceneResult {
        Ok(())
    }

    /// Called once per simulation tick while active.
    fn update(&mut self, tick: u64) -> SceneResult;

    /// Called once per rendered frame while active.
    ///
    /// Must not advance simulation state.
    fn render(&mut self) -> SceneResult {
        Ok(())
    }

    /// Called once when the scene stops being active.
    ///
    /// Stop sound loops and freeze animations here.
    fn end(&mut self) {}

    /// Receives key input not consumed by the stage's debug bindings.
    fn handle_input(&mut self, _input: &KeyInput) {}

    /// Receives every controller event while active, in arrival order.
    fn on_domain_event(&mut self, _event: &GameEvent) {}

    /// Whether this scene renders in 3D.
    fn is_three_dimensional(&self) -> bool {
        false
    }

    /// Called after a dimension toggle re-activated this scene.
    fn on_dimension_switched(&mut self, _from: Dimension) {}
}

//=== SceneContext ========================================================

/// Activation context handed to [`Scene::init`].
pub struct SceneContext<'a, V: GameVariant> {
    variant: V,
    state: Option<GameState>,
    renderer: Dimension,
    animations: &'a mut dyn AnimationSource<V>,
}

impl<'a, V: GameVariant> SceneContext<'a, V> {
    pub(crate) fn new(
        variant: V,
        state: Option<GameState>,
        renderer: Dimension,
        animations: &'a mut dyn AnimationSource<V>,
    ) -> Self {
        Self {
            variant,
            state,
            renderer,
            animations,
        }
    }

    /// Game variant the scene is shown for.
    pub fn variant(&self) -> V {
        self.variant
    }

    /// Controller state that selected the scene (`None` for manual
    /// activation before the first controller sync).
    pub fn state(&self) -> Option<GameState> {
        self.state
    }

    /// Renderer dimension of the scene being activated.
    pub fn renderer(&self) -> Dimension {
        self.renderer
    }

    /// Requests the animation set of one creature for this scene's
    /// variant and renderer.
    pub fn request_animations(&mut self, creature: Creature) {
        self.animations
            .create_animations(creature, self.variant, self.renderer);
    }

    /// Requests animation sets for every creature.
    pub fn request_all_animations(&mut self) {
        for creature in Creature::ALL {
            self.request_animations(creature);
        }
    }
}
