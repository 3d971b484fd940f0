//=========================================================================
// Arcade Stage
//
// Application root: owns the clock and the director and plugs them into
// the platform's frame pump.
//
// Architecture:
// ```text
//     StageBuilder  ──build()──>  Stage  ──run()──>  Platform (Winit)
//         │                         │
//         ├─ with_target_hz()       ├─ SimulationClock
//         ├─ with_debug()           ├─ Director
//         └─ with_shell()           │    ├─ GameController
//                                   │    ├─ SceneDispatcher
//                                   │    └─ EventRouter / EventMailbox
//                                   └─ DebugBindings
// ```
//
// Frame:
//   clock.on_frame(now, director)
//     → drain mailbox → ticks → render   (each guarded)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::time::{Duration, Instant};

use log::{error, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::config::StageConfig;
use crate::core::clock::{FrameReport, SimulationClock};
use crate::core::controller::{GameController, GameVariant};
use crate::core::director::Director;
use crate::core::events::{EventMailbox, EventSender};
use crate::core::input::{DebugBindings, DebugCommand, KeyCode, KeyInput};
use crate::core::scene::{Dimension, SceneCatalog, SceneDispatcher};
use crate::core::shell::{AnimationSource, LogShell, NoAnimations, UiShell};
use crate::platform::{FrameHost, Platform, PlatformError, WindowSettings};

//=== Constants ===========================================================

const FLASH_DURATION: Duration = Duration::from_millis(1500);

//=== StageBuilder ========================================================

/// Builder for configuring and constructing a [`Stage`].
///
/// # Default Values
///
/// - **Target frequency**: 60 Hz
/// - **Paused**: false
/// - **Debug controls**: off
/// - **Shell**: logs scene changes and flash messages
///
/// # Examples
///
/// ```no_run
/// # use arcade_stage::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Variant { PacMan }
/// # impl GameVariant for Variant {}
/// # struct Controller;
/// # impl GameController<Variant> for Controller {
/// #     fn state(&self) -> GameState { GameState::Boot }
/// #     fn variant(&self) -> Variant { Variant::PacMan }
/// # }
/// # fn catalog() -> SceneCatalog<Variant> { unimplemented!() }
/// StageBuilder::new(StageConfig::default())
///     .with_target_hz(120)
///     .with_debug(true)
///     .build(catalog(), Controller)
///     .run()?;
/// # Ok::<(), PlatformError>(())
/// ```
pub struct StageBuilder<V: GameVariant> {
    config: StageConfig,
    shell: Box<dyn UiShell>,
    animations: Box<dyn AnimationSource<V>>,
    bindings: DebugBindings,
    dimension: Dimension,
}

impl<V: GameVariant> StageBuilder<V> {
    /// Starts from the given configuration.
    pub fn new(config: StageConfig) -> Self {
        Self {
            config,
            shell: Box::new(LogShell),
            animations: Box::new(NoAnimations),
            bindings: DebugBindings::default(),
            dimension: Dimension::TwoD,
        }
    }

    /// Sets the simulation tick rate.
    ///
    /// # Panics
    ///
    /// Panics if `hz == 0`.
    pub fn with_target_hz(mut self, hz: u32) -> Self {
        assert!(hz > 0, "Target frequency must be positive, got {}", hz);
        self.config.target_hz = hz;
        self
    }

    /// Starts the simulation paused.
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.config.start_paused = paused;
        self
    }

    /// Enables single-step and speed controls.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Caps the ticks a single frame may run.
    pub fn with_max_ticks_per_frame(mut self, cap: Option<u32>) -> Self {
        self.config.max_ticks_per_frame = cap;
        self
    }

    /// Sets the frequency step of the speed commands.
    ///
    /// # Panics
    ///
    /// Panics if `hz == 0`.
    pub fn with_speed_step(mut self, hz: u32) -> Self {
        assert!(hz > 0, "Speed step must be positive");
        self.config.speed_step_hz = hz;
        self
    }

    /// Replaces the log-only UI shell.
    pub fn with_shell<S: UiShell + 'static>(mut self, shell: S) -> Self {
        self.shell = Box::new(shell);
        self
    }

    /// Replaces the no-op animation source.
    pub fn with_animations<A: AnimationSource<V> + 'static>(mut self, animations: A) -> Self {
        self.animations = Box::new(animations);
        self
    }

    /// Replaces the standard debug key layout.
    pub fn with_bindings(mut self, bindings: DebugBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Sets the initial 2D/3D preference.
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = dimension;
        self
    }

    /// Builds the stage around a validated catalog and a controller.
    ///
    /// # Panics
    ///
    /// Panics if the configuration holds a zero frequency or a zero
    /// mailbox capacity.
    pub fn build<C: GameController<V>>(self, catalog: SceneCatalog<V>, controller: C) -> Stage<V, C> {
        let config = self.config;
        info!(
            target: "stage",
            "Building stage ({} Hz, paused: {}, debug: {})",
            config.target_hz,
            config.start_paused,
            config.debug
        );

        let clock = SimulationClock::new(config.target_hz)
            .with_paused(config.start_paused)
            .with_max_ticks_per_frame(config.max_ticks_per_frame);

        let dispatcher = SceneDispatcher::new(catalog, controller.variant())
            .with_shell(self.shell)
            .with_animations(self.animations)
            .with_dimension(self.dimension);

        let director = Director::new(controller, dispatcher, EventMailbox::new(config.mailbox_capacity));

        Stage {
            config,
            clock,
            director,
            bindings: self.bindings,
            consumed_keys: HashSet::new(),
        }
    }
}

impl<V: GameVariant> Default for StageBuilder<V> {
    fn default() -> Self {
        Self::new(StageConfig::default())
    }
}

//=== Stage ===============================================================

/// Clock, scenes and controller wired to a host frame pump.
pub struct Stage<V: GameVariant, C: GameController<V>> {
    config: StageConfig,
    clock: SimulationClock,
    director: Director<V, C>,
    bindings: DebugBindings,
    consumed_keys: HashSet<KeyCode>,
}

impl<V: GameVariant, C: GameController<V>> Stage<V, C> {
    //--- Lifecycle --------------------------------------------------------

    /// Starts the clock and activates the first scene.
    ///
    /// A resolution failure is logged and flashed by the dispatcher;
    /// the stage keeps running and retries on every tick.
    pub fn boot(&mut self) {
        self.clock.start();
        if self.director.boot().is_err() {
            warn!(target: "stage", "No scene for the initial state, retrying on the next tick");
        }
    }

    /// Runs one host frame at `now`.
    ///
    /// Off-thread events are drained as part of the clock's frame start,
    /// inside its failure guard.
    pub fn on_frame(&mut self, now: Instant) -> FrameReport {
        self.clock.on_frame(now, &mut self.director)
    }

    /// Stops the clock and ends the active scene.
    pub fn shutdown(&mut self) {
        self.clock.stop();
        self.director.shutdown();
        info!(target: "stage", "Stage shut down after {} ticks", self.clock.elapsed_ticks());
    }

    /// Runs the Winit host until the window is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop fails.
    pub fn run(self) -> Result<(), PlatformError> {
        let settings = WindowSettings {
            width: self.config.width,
            height: self.config.height,
        };
        Platform::new(self, settings).run()
    }

    //--- Input ------------------------------------------------------------

    /// Applies a bound debug command or forwards the key to the scene.
    ///
    /// Releases of keys whose press was consumed, or of bound
    /// combinations, are swallowed so the scene never sees a release
    /// without its press.
    ///
    /// Returns `true` if the key was consumed by a debug binding.
    pub fn handle_key(&mut self, input: KeyInput) -> bool {
        if !input.pressed {
            let consumed = self.consumed_keys.remove(&input.key);
            if consumed || self.bindings.is_bound(input.key, input.modifiers) {
                trace!(target: "stage", "Release of bound key {:?} swallowed", input.key);
                return true;
            }
        }

        match self.bindings.resolve(&input) {
            Some(command) => {
                self.consumed_keys.insert(input.key);
                self.apply_debug_command(command);
                true
            }
            None => {
                self.director.handle_input(&input);
                false
            }
        }
    }

    /// Executes a simulation control command.
    ///
    /// Returns whether the command took effect.
    pub fn apply_debug_command(&mut self, command: DebugCommand) -> bool {
        if command.requires_debug() && !self.config.debug {
            warn!(target: "stage", "{:?} ignored: debug controls are disabled", command);
            return false;
        }

        match command {
            DebugCommand::TogglePause => {
                let paused = self.clock.toggle_paused();
                self.shell().pause_changed(paused);
                true
            }
            DebugCommand::SingleStep => self.step(1),
            DebugCommand::TenSteps => self.step(10),
            DebugCommand::SpeedUp => self.change_speed(1),
            DebugCommand::SpeedDown => self.change_speed(-1),
            DebugCommand::ResetSpeed => {
                self.clock.reset_target_frequency();
                self.flash_frequency();
                true
            }
            DebugCommand::ToggleDimension => match self.director.toggle_dimension() {
                Ok(dimension) => {
                    info!(target: "stage", "Renderer preference is now {:?}", dimension);
                    true
                }
                Err(err) => {
                    error!(target: "stage", "Dimension toggle failed: {}", err);
                    false
                }
            },
        }
    }

    //--- Accessors --------------------------------------------------------

    /// Producer handle for events raised on other threads.
    pub fn event_sender(&self) -> EventSender {
        self.director.event_sender()
    }

    /// Window title, marked while paused.
    pub fn title(&self) -> String {
        if self.clock.is_paused() {
            format!("{} (paused)", self.config.title)
        } else {
            self.config.title.clone()
        }
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn director(&self) -> &Director<V, C> {
        &self.director
    }

    pub fn director_mut(&mut self) -> &mut Director<V, C> {
        &mut self.director
    }

    //--- Internal Helpers -------------------------------------------------

    fn step(&mut self, n: u32) -> bool {
        match self.clock.execute_steps(n, true, &mut self.director) {
            Ok(()) => true,
            Err(err) => {
                warn!(target: "stage", "Step ignored: {}", err);
                false
            }
        }
    }

    fn change_speed(&mut self, direction: i32) -> bool {
        let step = i32::try_from(self.config.speed_step_hz).unwrap_or(i32::MAX);
        match self.clock.change_target_frequency(direction.saturating_mul(step)) {
            Some(_) => {
                self.flash_frequency();
                true
            }
            None => {
                warn!(
                    target: "stage",
                    "Frequency must stay positive, keeping {} Hz",
                    self.clock.target_frequency_hz()
                );
                false
            }
        }
    }

    fn flash_frequency(&mut self) {
        let message = format!("{}Hz", self.clock.target_frequency_hz());
        self.shell().show_flash_message(&message, FLASH_DURATION);
    }

    fn shell(&mut self) -> &mut dyn UiShell {
        self.director.dispatcher_mut().shell_mut()
    }
}

//=== Platform Hookup =====================================================

impl<V: GameVariant, C: GameController<V>> FrameHost for Stage<V, C> {
    fn on_start(&mut self) {
        self.boot();
    }

    fn on_frame(&mut self, now: Instant) {
        Stage::on_frame(self, now);
    }

    fn on_key(&mut self, input: KeyInput) {
        self.handle_key(input);
    }

    fn on_close(&mut self) {
        self.shutdown();
    }

    fn title(&self) -> String {
        Stage::title(self)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
