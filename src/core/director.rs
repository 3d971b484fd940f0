//=========================================================================
// Director
//=========================================================================
//
// Tick target that ties the controller, the router and the dispatcher
// together.
//
// Per tick:
//   1. controller.update()          (raises events)
//   2. router.route() per event     (in raised order)
//   3. dispatcher.on_tick()         (syncs, then Scene::update)
//
// Per frame, as the clock's guarded frame start:
//   drain_mailbox() → router.route() per off-thread event
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::clock::ClockTarget;
use crate::core::controller::{GameController, GameVariant};
use crate::core::error::{SceneResolutionError, SceneResult};
use crate::core::events::{EventMailbox, EventRouter, EventSender, GameEvent, RouterStats};
use crate::core::input::KeyInput;
use crate::core::scene::{Dimension, SceneDispatcher};

//=== Director ============================================================

/// Owns the game controller and the scene dispatcher.
pub struct Director<V: GameVariant, C: GameController<V>> {
    controller: C,
    dispatcher: SceneDispatcher<V>,
    router: EventRouter,
    mailbox: EventMailbox,
    pending: Vec<GameEvent>,
}

impl<V: GameVariant, C: GameController<V>> Director<V, C> {
    pub fn new(controller: C, dispatcher: SceneDispatcher<V>, mailbox: EventMailbox) -> Self {
        Self {
            controller,
            dispatcher,
            router: EventRouter::new(),
            mailbox,
            pending: Vec::with_capacity(16),
        }
    }

    /// Activates the scene for the controller's initial state.
    pub fn boot(&mut self) -> Result<bool, SceneResolutionError> {
        info!(
            target: "stage",
            "Booting into {:?} ({:?})",
            self.controller.state(),
            self.controller.variant()
        );
        self.dispatcher.update_or_reload(&self.controller, false)
    }

    /// Routes every event queued by other threads since the last frame.
    ///
    /// Returns the number of events routed.
    pub fn drain_mailbox(&mut self) -> usize {
        self.pending.clear();
        let drained = self.mailbox.drain_into(&mut self.pending);
        if drained > 0 {
            self.route_pending();
        }
        drained
    }

    /// Producer handle for off-thread events.
    pub fn event_sender(&self) -> EventSender {
        self.mailbox.sender()
    }

    /// Forwards an unbound key press to the active scene.
    pub fn handle_input(&mut self, input: &KeyInput) {
        self.dispatcher.handle_input(input);
    }

    /// Flips the 2D/3D preference for the controller's current state.
    pub fn toggle_dimension(&mut self) -> Result<Dimension, SceneResolutionError> {
        self.dispatcher.toggle_dimension(&self.controller)
    }

    /// Ends the active scene.
    pub fn shutdown(&mut self) {
        self.dispatcher.end_current();
    }

    //--- Accessors --------------------------------------------------------

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn dispatcher(&self) -> &SceneDispatcher<V> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut SceneDispatcher<V> {
        &mut self.dispatcher
    }

    pub fn router_stats(&self) -> RouterStats {
        self.router.stats()
    }

    fn route_pending(&mut self) {
        let failed = self
            .router
            .route_all(&self.pending, &mut self.dispatcher, &self.controller);
        if failed > 0 {
            debug!(target: "events", "{} of {} events hit a resolution error", failed, self.pending.len());
        }
        self.pending.clear();
    }
}

impl<V: GameVariant, C: GameController<V>> ClockTarget for Director<V, C> {
    fn on_frame_start(&mut self) -> SceneResult {
        self.drain_mailbox();
        Ok(())
    }

    fn on_tick(&mut self, tick: u64) -> SceneResult {
        self.pending.clear();
        self.controller.update(&mut self.pending);
        self.route_pending();
        self.dispatcher.on_tick(&self.controller, tick)
    }

    fn on_render(&mut self) -> SceneResult {
        self.dispatcher.on_render()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
