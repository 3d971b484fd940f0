//=========================================================================
// Scene Dispatcher
//=========================================================================
//
// Keeps exactly one scene of the catalog active and in step with the game
// controller.
//
// Architecture:
//   SceneDispatcher
//     ├─ catalog: SceneCatalog (scenes + entries)
//     ├─ current: Option<SceneId>
//     ├─ synced: last (variant, state, intermission) applied
//     ├─ shell: Box<dyn UiShell>
//     └─ animations: Box<dyn AnimationSource>
//
// Switch order (never interleaved with update/render):
//   previous.end() → current = next → next.init() → shell.scene_changed()
//
// Resolution failures leave the active scene untouched and are reported
// once per failing (variant, state, intermission) key.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use anyhow::{bail, Context};
use log::{debug, error, info, trace};

//=== Internal Dependencies ===============================================

use super::{Dimension, Scene, SceneCatalog, SceneContext, SceneId, SceneSlot};
use crate::core::controller::{GameController, GameState, GameVariant};
use crate::core::error::{SceneResolutionError, SceneResult};
use crate::core::events::GameEvent;
use crate::core::input::KeyInput;
use crate::core::shell::{AnimationSource, Creature, LogShell, NoAnimations, SceneChange, UiShell};

//=== Constants ===========================================================

const FAILURE_FLASH: Duration = Duration::from_secs(3);

type SyncKey<V> = (V, GameState, Option<usize>);

//=== DispatcherState =====================================================

/// Whether a scene is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// No scene has been activated yet.
    Idle,
    /// Exactly one scene is active.
    Active,
}

//=== SceneDispatcher =====================================================

/// Owns the catalog and switches the active scene on controller changes.
pub struct SceneDispatcher<V: GameVariant> {
    catalog: SceneCatalog<V>,
    current: Option<SceneId>,

    variant: V,
    game_state: Option<GameState>,
    synced: Option<SyncKey<V>>,
    failed: Option<SyncKey<V>>,
    preferred: Dimension,

    shell: Box<dyn UiShell>,
    animations: Box<dyn AnimationSource<V>>,
}

impl<V: GameVariant> SceneDispatcher<V> {
    /// Creates an idle dispatcher.
    ///
    /// `variant` is used for scenes activated before the first controller
    /// sync.
    pub fn new(catalog: SceneCatalog<V>, variant: V) -> Self {
        Self {
            catalog,
            current: None,
            variant,
            game_state: None,
            synced: None,
            failed: None,
            preferred: Dimension::TwoD,
            shell: Box::new(LogShell),
            animations: Box::new(NoAnimations),
        }
    }

    /// Replaces the UI shell.
    pub fn with_shell(mut self, shell: Box<dyn UiShell>) -> Self {
        self.shell = shell;
        self
    }

    /// Replaces the animation source.
    pub fn with_animations(mut self, animations: Box<dyn AnimationSource<V>>) -> Self {
        self.animations = animations;
        self
    }

    /// Sets the initial renderer preference.
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.preferred = dimension;
        self
    }

    //=== Resolution & Switching ==========================================

    /// Looks up the scene for a controller snapshot using the current
    /// renderer preference. Never touches the active scene.
    pub fn resolve_scene(
        &self,
        variant: V,
        state: GameState,
        intermission: Option<usize>,
    ) -> Result<SceneId, SceneResolutionError> {
        self.catalog.resolve(variant, state, intermission, self.preferred)
    }

    /// Makes `candidate` the active scene.
    ///
    /// Returns `Ok(false)` without any callback if `candidate` is already
    /// active and `force_reload` is not set. Otherwise the previous scene
    /// is ended, the candidate initialized and the shell notified, in that
    /// order, and `Ok(true)` is returned.
    ///
    /// # Errors
    ///
    /// Fails if `candidate` does not belong to this catalog, or with the
    /// error returned by the candidate's `init()`. In the latter case the
    /// candidate is still active and the shell has been notified.
    pub fn apply_scene(&mut self, candidate: SceneId, force_reload: bool) -> anyhow::Result<bool> {
        if candidate.index() >= self.catalog.len() {
            bail!("scene #{} is not part of the catalog", candidate.index());
        }

        if self.current == Some(candidate) && !force_reload {
            trace!(target: "scene", "Scene #{} already active", candidate.index());
            return Ok(false);
        }

        let previous = self.current.take();
        if let Some(previous) = previous {
            let scene = self.catalog.scene_mut(previous);
            debug!(target: "scene", "Ending scene '{}'", scene.name());
            scene.end();
        }

        self.current = Some(candidate);

        let scene = self.catalog.scene_mut(candidate);
        let renderer = if scene.is_three_dimensional() {
            Dimension::ThreeD
        } else {
            Dimension::TwoD
        };
        let mut context = SceneContext::new(
            self.variant,
            self.game_state,
            renderer,
            self.animations.as_mut(),
        );
        let init_result = scene.init(&mut context);

        let scene = self.catalog.scene(candidate);
        let is_play_scene = self.catalog.lookup(self.variant, SceneSlot::Play, Dimension::TwoD)
            == Some(candidate)
            || self.catalog.lookup(self.variant, SceneSlot::Play, Dimension::ThreeD)
                == Some(candidate);

        info!(
            target: "scene",
            "Scene switch: {} → '{}'{}",
            previous
                .map(|id| format!("'{}'", self.catalog.scene(id).name()))
                .unwrap_or_else(|| "none".to_string()),
            scene.name(),
            if force_reload { " (reload)" } else { "" }
        );

        self.shell.scene_changed(&SceneChange {
            previous,
            current: candidate,
            name: scene.name(),
            is_play_scene,
            three_dimensional: scene.is_three_dimensional(),
        });

        init_result
            .map(|()| true)
            .with_context(|| format!("scene '{}' failed to initialize", scene.name()))
    }

    /// Re-resolves the scene for the controller's current snapshot and
    /// applies it.
    ///
    /// With `force_reload` the scene is re-initialized even if it did not
    /// change. Init failures are logged; the scene stays active.
    ///
    /// # Errors
    ///
    /// Returns the resolution error after logging it. The active scene is
    /// left unchanged.
    pub fn update_or_reload<C>(
        &mut self,
        controller: &C,
        force_reload: bool,
    ) -> Result<bool, SceneResolutionError>
    where
        C: GameController<V> + ?Sized,
    {
        let key = Self::key_of(controller);
        let (variant, state, intermission) = key;

        let candidate = match self.catalog.resolve(variant, state, intermission, self.preferred) {
            Ok(candidate) => candidate,
            Err(err) => {
                self.report_failure(key, &err);
                return Err(err);
            }
        };

        if self.failed.take().is_some() {
            info!(target: "scene", "Scene resolution recovered for {:?}/{:?}", variant, state);
        }

        self.variant = variant;
        self.game_state = Some(state);
        self.synced = Some(key);

        match self.apply_scene(candidate, force_reload) {
            Ok(changed) => Ok(changed),
            Err(err) => {
                error!(target: "scene", "{:#}", err);
                Ok(true)
            }
        }
    }

    //=== Per-Frame Hooks =================================================

    /// Advances the active scene by one tick.
    ///
    /// If the controller moved to another state without an event, the
    /// matching scene is activated first so no tick reaches a stale scene.
    /// When that resolution fails the tick is skipped. Returning to the
    /// synced key ends a failure streak, so the same bad key is reported
    /// again when it comes back.
    pub fn on_tick<C>(&mut self, controller: &C, tick: u64) -> SceneResult
    where
        C: GameController<V> + ?Sized,
    {
        let key = Self::key_of(controller);
        if self.current.is_none() || self.synced != Some(key) {
            if self.update_or_reload(controller, false).is_err() {
                trace!(target: "scene", "Skipping tick {} until resolution succeeds", tick);
                return Ok(());
            }
        } else if self.failed.take().is_some() {
            info!(target: "scene", "Back on {:?}/{:?}, resolution failure cleared", key.0, key.1);
        }

        let Some(id) = self.current else {
            return Ok(());
        };

        let scene = self.catalog.scene_mut(id);
        scene
            .update(tick)
            .with_context(|| format!("scene '{}' failed to update at tick {}", scene.name(), tick))
    }

    /// Renders the active scene. Does nothing while idle.
    pub fn on_render(&mut self) -> SceneResult {
        let Some(id) = self.current else {
            return Ok(());
        };

        let scene = self.catalog.scene_mut(id);
        scene
            .render()
            .with_context(|| format!("scene '{}' failed to render", scene.name()))
    }

    /// Forwards a key press to the active scene.
    pub fn handle_input(&mut self, input: &KeyInput) {
        match self.current {
            Some(id) => self.catalog.scene_mut(id).handle_input(input),
            None => trace!(target: "scene", "Dropping key {:?}: no active scene", input.key),
        }
    }

    /// Forwards a controller event to the active scene.
    ///
    /// Returns `false` if no scene is active and the event was dropped.
    pub fn deliver_domain_event(&mut self, event: &GameEvent) -> bool {
        match self.current {
            Some(id) => {
                self.catalog.scene_mut(id).on_domain_event(event);
                true
            }
            None => {
                trace!(target: "events", "Dropping {:?}: no active scene", event);
                false
            }
        }
    }

    //=== Renderer Dimension ==============================================

    /// Flips the 2D/3D preference.
    ///
    /// If the current slot has scenes in both dimensions the scene is
    /// re-resolved with a forced reload and told which dimension it was
    /// switched from. Returns the new preference.
    ///
    /// # Errors
    ///
    /// Returns the resolution error for the controller's current key; the
    /// preference is left unchanged.
    pub fn toggle_dimension<C>(&mut self, controller: &C) -> Result<Dimension, SceneResolutionError>
    where
        C: GameController<V> + ?Sized,
    {
        let from = self.preferred;
        let (variant, state, intermission) = Self::key_of(controller);
        let slot = self.catalog.slot_for(variant, state, intermission)?;

        self.preferred = from.toggled();
        if self.catalog.exists_in_both_dimensions(variant, slot) {
            if let Err(err) = self.update_or_reload(controller, true) {
                self.preferred = from;
                return Err(err);
            }
            if let Some(id) = self.current {
                self.catalog.scene_mut(id).on_dimension_switched(from);
            }
        }

        info!(target: "scene", "Renderer preference {:?} → {:?}", from, self.preferred);
        Ok(self.preferred)
    }

    /// Rebuilds the animation sets of every creature for a new level.
    pub fn rebuild_level_animations(&mut self, variant: V) {
        let renderer = self
            .current_scene()
            .map(|scene| {
                if scene.is_three_dimensional() {
                    Dimension::ThreeD
                } else {
                    Dimension::TwoD
                }
            })
            .unwrap_or(self.preferred);

        debug!(target: "scene", "Rebuilding level animations for {:?} ({:?})", variant, renderer);
        for creature in Creature::ALL {
            self.animations.create_animations(creature, variant, renderer);
        }
    }

    /// Ends the active scene and returns to idle.
    pub fn end_current(&mut self) {
        if let Some(id) = self.current.take() {
            let scene = self.catalog.scene_mut(id);
            debug!(target: "scene", "Ending scene '{}' on shutdown", scene.name());
            scene.end();
        }
        self.synced = None;
    }

    //=== Accessors =======================================================

    pub fn state(&self) -> DispatcherState {
        if self.current.is_some() {
            DispatcherState::Active
        } else {
            DispatcherState::Idle
        }
    }

    /// Handle of the active scene.
    pub fn current(&self) -> Option<SceneId> {
        self.current
    }

    /// The active scene, if any.
    pub fn current_scene(&self) -> Option<&dyn Scene<V>> {
        self.current.map(|id| self.catalog.scene(id))
    }

    /// Last controller state the dispatcher synced to.
    pub fn game_state(&self) -> Option<GameState> {
        self.game_state
    }

    pub fn preferred_dimension(&self) -> Dimension {
        self.preferred
    }

    pub fn catalog(&self) -> &SceneCatalog<V> {
        &self.catalog
    }

    pub fn shell_mut(&mut self) -> &mut dyn UiShell {
        self.shell.as_mut()
    }

    //=== Internals =======================================================

    fn key_of<C>(controller: &C) -> SyncKey<V>
    where
        C: GameController<V> + ?Sized,
    {
        let state = controller.state();
        let intermission = if state.is_intermission() {
            controller.intermission_index()
        } else {
            None
        };
        (controller.variant(), state, intermission)
    }

    fn report_failure(&mut self, key: SyncKey<V>, err: &SceneResolutionError) {
        if self.failed == Some(key) {
            trace!(target: "scene", "Resolution still failing: {}", err);
            return;
        }

        let active = self
            .current_scene()
            .map(|scene| scene.name().to_string())
            .unwrap_or_else(|| "none".to_string());
        error!(
            target: "scene",
            "Scene resolution failed, keeping '{}': {}",
            active,
            err
        );
        self.shell
            .show_flash_message(&format!("Scene error: {}", err), FAILURE_FLASH);
        self.failed = Some(key);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
