//=========================================================================
// Test Doubles
//=========================================================================
//
// Recording collaborators shared by the unit tests of the core.
//
// Every double writes into a `CallLog` so tests can assert on the exact
// interleaving of scene callbacks, shell notifications and animation
// requests.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use anyhow::bail;

//=== Internal Dependencies ===============================================

use crate::core::controller::{GameController, GameState, GameVariant};
use crate::core::error::SceneResult;
use crate::core::events::GameEvent;
use crate::core::input::KeyInput;
use crate::core::scene::{Dimension, Scene, SceneCatalog, SceneContext, SceneSlot};
use crate::core::shell::{AnimationSource, Creature, SceneChange, UiShell};

//=== TestVariant =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestVariant {
    A,
    B,
}

impl GameVariant for TestVariant {}

//=== CallLog =============================================================

/// Shared, ordered record of callback invocations.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.as_str() == entry).count()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == entry)
    }
}

//=== RecordingScene ======================================================

pub struct RecordingScene {
    name: String,
    log: CallLog,
    three_d: bool,
    fail_init: bool,
    fail_update: bool,
    panic_update: bool,
    panic_event: bool,
}

impl RecordingScene {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            three_d: false,
            fail_init: false,
            fail_update: false,
            panic_update: false,
            panic_event: false,
        }
    }

    pub fn three_dimensional(mut self) -> Self {
        self.three_d = true;
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn panicking_update(mut self) -> Self {
        self.panic_update = true;
        self
    }

    pub fn panicking_on_event(mut self) -> Self {
        self.panic_event = true;
        self
    }
}

impl<V: GameVariant> Scene<V> for RecordingScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, context: &mut SceneContext<'_, V>) -> SceneResult {
        self.log.push(format!("{}:init", self.name));
        context.request_animations(Creature::Pac);
        if self.fail_init {
            bail!("{} refused to initialize", self.name);
        }
        Ok(())
    }

    fn update(&mut self, _tick: u64) -> SceneResult {
        self.log.push(format!("{}:update", self.name));
        if self.panic_update {
            panic!("{} blew up", self.name);
        }
        if self.fail_update {
            bail!("{} failed to update", self.name);
        }
        Ok(())
    }

    fn render(&mut self) -> SceneResult {
        self.log.push(format!("{}:render", self.name));
        Ok(())
    }

    fn end(&mut self) {
        self.log.push(format!("{}:end", self.name));
    }

    fn handle_input(&mut self, input: &KeyInput) {
        self.log.push(format!("{}:input:{:?}", self.name, input.key));
    }

    fn on_domain_event(&mut self, event: &GameEvent) {
        self.log.push(format!("{}:event:{:?}", self.name, event));
        if self.panic_event {
            panic!("{} choked on {:?}", self.name, event);
        }
    }

    fn is_three_dimensional(&self) -> bool {
        self.three_d
    }

    fn on_dimension_switched(&mut self, from: Dimension) {
        self.log.push(format!("{}:switched_from:{:?}", self.name, from));
    }
}

//=== Catalog Fixture =====================================================

/// Variant A: `boot`, `intro`, `credit`, `play`, `cut0`, `cut1` in 2D and
/// `play3d` in 3D. Variant B: the same slots prefixed with `b-`.
pub fn standard_catalog(log: &CallLog) -> SceneCatalog<TestVariant> {
    let mut builder = SceneCatalog::builder();
    for (variant, prefix) in [(TestVariant::A, ""), (TestVariant::B, "b-")] {
        let slots = [
            (SceneSlot::Boot, "boot"),
            (SceneSlot::Intro, "intro"),
            (SceneSlot::Credit, "credit"),
            (SceneSlot::Play, "play"),
            (SceneSlot::Cutscene(0), "cut0"),
            (SceneSlot::Cutscene(1), "cut1"),
        ];
        for (slot, name) in slots {
            let name = format!("{}{}", prefix, name);
            builder.register(variant, slot, RecordingScene::new(&name, log));
        }
    }
    builder.register_3d(
        TestVariant::A,
        SceneSlot::Play,
        RecordingScene::new("play3d", log).three_dimensional(),
    );
    match builder.build() {
        Ok(catalog) => catalog,
        Err(err) => panic!("fixture catalog invalid: {}", err),
    }
}

/// Variant A with plain `boot`, `intro` and `credit` scenes and the given
/// scene in the play slot.
pub fn catalog_with_play(log: &CallLog, play: RecordingScene) -> SceneCatalog<TestVariant> {
    let mut builder = SceneCatalog::builder();
    builder.register(TestVariant::A, SceneSlot::Boot, RecordingScene::new("boot", log));
    builder.register(TestVariant::A, SceneSlot::Intro, RecordingScene::new("intro", log));
    builder.register(TestVariant::A, SceneSlot::Credit, RecordingScene::new("credit", log));
    builder.register(TestVariant::A, SceneSlot::Play, play);
    match builder.build() {
        Ok(catalog) => catalog,
        Err(err) => panic!("fixture catalog invalid: {}", err),
    }
}

//=== ScriptedController ==================================================

/// Controller that replays one batch of events per update.
///
/// State changes in a batch are applied to the controller before they are
/// emitted, the way a real controller reports its own transitions.
pub struct ScriptedController {
    pub variant: TestVariant,
    pub state: GameState,
    pub intermission: Option<usize>,
    pub script: VecDeque<Vec<GameEvent>>,
    pub updates: usize,
    log: Option<CallLog>,
}

impl ScriptedController {
    pub fn new(variant: TestVariant, state: GameState) -> Self {
        Self {
            variant,
            state,
            intermission: None,
            script: VecDeque::new(),
            updates: 0,
            log: None,
        }
    }

    pub fn with_log(mut self, log: &CallLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    pub fn then(mut self, batch: Vec<GameEvent>) -> Self {
        self.script.push_back(batch);
        self
    }
}

impl GameController<TestVariant> for ScriptedController {
    fn state(&self) -> GameState {
        self.state
    }

    fn variant(&self) -> TestVariant {
        self.variant
    }

    fn intermission_index(&self) -> Option<usize> {
        self.intermission
    }

    fn update(&mut self, events: &mut Vec<GameEvent>) {
        self.updates += 1;
        if let Some(log) = &self.log {
            log.push("controller:update");
        }
        if let Some(batch) = self.script.pop_front() {
            for event in batch {
                if let GameEvent::StateChange { to, .. } = event {
                    self.state = to;
                }
                events.push(event);
            }
        }
    }
}

//=== RecordingShell ======================================================

pub struct RecordingShell {
    log: CallLog,
}

impl RecordingShell {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl UiShell for RecordingShell {
    fn scene_changed(&mut self, change: &SceneChange<'_>) {
        self.log.push(format!(
            "shell:show:{}:play={}",
            change.name, change.is_play_scene
        ));
    }

    fn show_flash_message(&mut self, message: &str, _duration: Duration) {
        self.log.push(format!("shell:flash:{}", message));
    }

    fn pause_changed(&mut self, paused: bool) {
        self.log.push(format!("shell:paused:{}", paused));
    }
}

//=== RecordingAnimations =================================================

pub struct RecordingAnimations {
    log: CallLog,
}

impl RecordingAnimations {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl<V: GameVariant> AnimationSource<V> for RecordingAnimations {
    fn create_animations(&mut self, creature: Creature, variant: V, renderer: Dimension) {
        self.log
            .push(format!("anim:{:?}:{:?}:{:?}", creature, variant, renderer));
    }
}
