//=========================================================================
// Event Router
//=========================================================================
//
// Translates controller events into dispatcher actions and active-scene
// hooks.
//
// Routing per event, in arrival order:
//   StateChange       → dispatcher.update_or_reload(force = false)
//   UnspecifiedChange → dispatcher.update_or_reload(force = true)
//   LevelCreated      → dispatcher.rebuild_level_animations()
//                       then update_or_reload(force = true)
//   (every event)     → active scene's on_domain_event()
//
// The router keeps no queue. Each event is fully handled before the
// next one is looked at.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{EventKind, GameEvent};
use crate::core::controller::{GameController, GameVariant};
use crate::core::error::SceneResolutionError;
use crate::core::scene::SceneDispatcher;

//=== RouterStats =========================================================

/// Delivery counters, mainly for diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RouterStats {
    /// Events handed to an active scene.
    pub delivered: u64,
    /// Events dropped because no scene was active.
    pub dropped: u64,
    /// Scene-affecting events whose scene could not be resolved.
    pub failed_resolutions: u64,
}

//=== EventRouter =========================================================

/// Stateless apart from its counters.
#[derive(Debug, Default)]
pub struct EventRouter {
    stats: RouterStats,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one controller event.
    ///
    /// The event is forwarded to the active scene even when the scene
    /// switch it triggered failed; the scene is then the unchanged one.
    ///
    /// # Errors
    ///
    /// Returns the resolution error of a failed switch. It has already
    /// been logged and flashed by the dispatcher.
    pub fn route<V, C>(
        &mut self,
        event: &GameEvent,
        dispatcher: &mut SceneDispatcher<V>,
        controller: &C,
    ) -> Result<(), SceneResolutionError>
    where
        V: GameVariant,
        C: GameController<V> + ?Sized,
    {
        let outcome = match event.kind() {
            EventKind::StateChange => self
                .on_state_change_event(event, dispatcher, controller)
                .map(|_| ()),
            EventKind::UnspecifiedChange => self
                .on_unspecified_change_event(dispatcher, controller)
                .map(|_| ()),
            EventKind::LevelCreated => {
                dispatcher.rebuild_level_animations(controller.variant());
                self.count_failure(dispatcher.update_or_reload(controller, true))
                    .map(|_| ())
            }
            EventKind::Domain => Ok(()),
        };

        self.on_domain_event(event, dispatcher);
        outcome
    }

    /// Routes a batch in order, continuing past failed switches.
    ///
    /// Returns the number of events whose switch failed.
    pub fn route_all<'e, V, C, I>(
        &mut self,
        events: I,
        dispatcher: &mut SceneDispatcher<V>,
        controller: &C,
    ) -> usize
    where
        V: GameVariant,
        C: GameController<V> + ?Sized,
        I: IntoIterator<Item = &'e GameEvent>,
    {
        events
            .into_iter()
            .filter(|event| self.route(event, dispatcher, controller).is_err())
            .count()
    }

    //--- Individual Handlers ----------------------------------------------

    /// Re-resolves the scene right away, without waiting for the next tick.
    ///
    /// Returns whether the active scene changed.
    pub fn on_state_change_event<V, C>(
        &mut self,
        event: &GameEvent,
        dispatcher: &mut SceneDispatcher<V>,
        controller: &C,
    ) -> Result<bool, SceneResolutionError>
    where
        V: GameVariant,
        C: GameController<V> + ?Sized,
    {
        if let GameEvent::StateChange { from, to } = event {
            debug!(target: "events", "Controller state {:?} → {:?}", from, to);
        }
        self.count_failure(dispatcher.update_or_reload(controller, false))
    }

    /// Re-resolves and re-initializes the scene even if it is unchanged.
    pub fn on_unspecified_change_event<V, C>(
        &mut self,
        dispatcher: &mut SceneDispatcher<V>,
        controller: &C,
    ) -> Result<bool, SceneResolutionError>
    where
        V: GameVariant,
        C: GameController<V> + ?Sized,
    {
        debug!(target: "events", "Unspecified change, reloading scene");
        self.count_failure(dispatcher.update_or_reload(controller, true))
    }

    /// Forwards an event to the active scene.
    ///
    /// Returns `false` if no scene was active and the event was dropped.
    pub fn on_domain_event<V>(&mut self, event: &GameEvent, dispatcher: &mut SceneDispatcher<V>) -> bool
    where
        V: GameVariant,
    {
        if dispatcher.deliver_domain_event(event) {
            self.stats.delivered += 1;
            true
        } else {
            trace!(target: "events", "{:?} arrived before the first scene", event);
            self.stats.dropped += 1;
            false
        }
    }

    pub fn stats(&self) -> RouterStats {
        self.stats
    }

    fn count_failure(
        &mut self,
        result: Result<bool, SceneResolutionError>,
    ) -> Result<bool, SceneResolutionError> {
        if result.is_err() {
            self.stats.failed_resolutions += 1;
        }
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::controller::GameState;
    use crate::core::testing::{
        standard_catalog, CallLog, RecordingAnimations, RecordingShell, ScriptedController,
        TestVariant,
    };

    fn setup(log: &CallLog) -> (EventRouter, SceneDispatcher<TestVariant>) {
        let dispatcher = SceneDispatcher::new(standard_catalog(log), TestVariant::A)
            .with_shell(Box::new(RecordingShell::new(log)))
            .with_animations(Box::new(RecordingAnimations::new(log)));
        (EventRouter::new(), dispatcher)
    }

    #[test]
    fn events_before_first_scene_are_dropped() {
        let log = CallLog::default();
        let (mut router, mut dispatcher) = setup(&log);

        assert!(!router.on_domain_event(&GameEvent::CreditAdded, &mut dispatcher));
        assert_eq!(router.stats().dropped, 1);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn state_change_switches_scene_immediately() {
        let log = CallLog::default();
        let (mut router, mut dispatcher) = setup(&log);
        let mut controller = ScriptedController::new(TestVariant::A, GameState::Intro);
        dispatcher.update_or_reload(&controller, false).unwrap();

        controller.state = GameState::Credit;
        let event = GameEvent::StateChange {
            from: GameState::Intro,
            to: GameState::Credit,
        };
        router.route(&event, &mut dispatcher, &controller).unwrap();

        let entries = log.entries();
        let init = entries.iter().position(|e| e == "credit:init").unwrap();
        let forwarded = entries
            .iter()
            .position(|e| e.starts_with("credit:event:StateChange"))
            .unwrap();
        assert!(init < forwarded);
        assert_eq!(log.count("intro:end"), 1);
    }

    #[test]
    fn unspecified_change_forces_reload() {
        let log = CallLog::default();
        let (mut router, mut dispatcher) = setup(&log);
        let controller = ScriptedController::new(TestVariant::A, GameState::Hunting);
        dispatcher.update_or_reload(&controller, false).unwrap();

        router
            .route(&GameEvent::UnspecifiedChange, &mut dispatcher, &controller)
            .unwrap();

        assert_eq!(log.count("play:init"), 2);
        assert_eq!(log.count("play:end"), 1);
    }

    #[test]
    fn domain_events_keep_arrival_order() {
        let log = CallLog::default();
        let (mut router, mut dispatcher) = setup(&log);
        let controller = ScriptedController::new(TestVariant::A, GameState::Hunting);
        dispatcher.update_or_reload(&controller, false).unwrap();
        log.clear();

        let events = [
            GameEvent::PacFoundFood,
            GameEvent::GhostEaten { ghost: 2 },
            GameEvent::BonusExpired,
        ];
        assert_eq!(router.route_all(&events, &mut dispatcher, &controller), 0);

        assert_eq!(
            log.entries(),
            vec![
                "play:event:PacFoundFood",
                "play:event:GhostEaten { ghost: 2 }",
                "play:event:BonusExpired",
            ]
        );
        assert_eq!(router.stats().delivered, 3);
    }

    #[test]
    fn level_created_rebuilds_animations_then_reloads_scene() {
        let log = CallLog::default();
        let (mut router, mut dispatcher) = setup(&log);
        let controller = ScriptedController::new(TestVariant::B, GameState::Ready);
        dispatcher.update_or_reload(&controller, false).unwrap();
        log.clear();

        router
            .route(&GameEvent::LevelCreated { level: 2 }, &mut dispatcher, &controller)
            .unwrap();

        // Four ghosts from the rebuild; Pac from the rebuild and from init.
        assert_eq!(log.count_prefix("anim:Ghost"), 4);
        assert_eq!(log.count("anim:Pac:B:TwoD"), 2);
        assert!(log.position("anim:Ghost(3):B:TwoD").unwrap() < log.position("b-play:end").unwrap());
        assert!(log.position("b-play:end").unwrap() < log.position("b-play:init").unwrap());
        assert_eq!(log.count("b-play:init"), 1);
        assert_eq!(log.count("b-play:event:LevelCreated { level: 2 }"), 1);
    }

    #[test]
    fn level_created_counts_failed_reload() {
        let log = CallLog::default();
        let (mut router, mut dispatcher) = setup(&log);
        let mut controller = ScriptedController::new(TestVariant::A, GameState::Hunting);
        dispatcher.update_or_reload(&controller, false).unwrap();

        controller.state = GameState::IntermissionTest;
        let result = router.route(&GameEvent::LevelCreated { level: 3 }, &mut dispatcher, &controller);

        assert!(matches!(
            result,
            Err(SceneResolutionError::MissingIntermissionIndex { .. })
        ));
        assert_eq!(router.stats().failed_resolutions, 1);
        assert_eq!(log.count("play:init"), 1);
    }

    #[test]
    fn failed_switch_still_forwards_to_current_scene() {
        let log = CallLog::default();
        let (mut router, mut dispatcher) = setup(&log);
        let mut controller = ScriptedController::new(TestVariant::A, GameState::Hunting);
        dispatcher.update_or_reload(&controller, false).unwrap();

        controller.state = GameState::Intermission;
        controller.intermission = Some(2);
        let event = GameEvent::StateChange {
            from: GameState::Hunting,
            to: GameState::Intermission,
        };
        let result = router.route(&event, &mut dispatcher, &controller);

        assert!(matches!(
            result,
            Err(SceneResolutionError::CutsceneOutOfRange { index: 2, .. })
        ));
        assert_eq!(router.stats().failed_resolutions, 1);
        assert_eq!(log.count_prefix("play:event:StateChange"), 1);
        assert_eq!(dispatcher.current_scene().map(|s| s.name()), Some("play"));
    }
}
