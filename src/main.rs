//=========================================================================
// Arcade Stage Demo
//
// Two game variants with log-only scenes and a scripted controller that
// walks through the attract and play cycle:
//
//   Boot → Intro → Credit → Ready → Hunting → LevelComplete
//        → Intermission(n) → Ready → ...
//
// Keys: P pause, Shift+P step, Shift+Space ten steps, Alt+Up/Down/0
// speed, Ctrl+3 toggle 3D. Every fourth level switches the variant.
//
//=========================================================================

use std::thread;
use std::time::Duration;

use anyhow::Context;
use arcade_stage::prelude::*;
use log::{debug, info};

//=== Variant =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Variant {
    PacMan,
    MsPacMan,
}

impl GameVariant for Variant {}

impl Variant {
    fn cutscenes(self) -> usize {
        match self {
            Self::PacMan => 3,
            Self::MsPacMan => 3,
        }
    }

    fn other(self) -> Self {
        match self {
            Self::PacMan => Self::MsPacMan,
            Self::MsPacMan => Self::PacMan,
        }
    }
}

//=== LogScene ============================================================

/// Scene that only reports its lifecycle.
struct LogScene {
    name: String,
    three_d: bool,
    ticks: u64,
}

impl LogScene {
    fn flat(name: &str) -> Self {
        Self {
            name: name.to_string(),
            three_d: false,
            ticks: 0,
        }
    }

    fn deep(name: &str) -> Self {
        Self {
            three_d: true,
            ..Self::flat(name)
        }
    }
}

impl Scene<Variant> for LogScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, context: &mut SceneContext<'_, Variant>) -> SceneResult {
        self.ticks = 0;
        if context.state().map_or(false, |state| state.scene_slot(0) == SceneSlot::Play) {
            context.request_all_animations();
        }
        info!("[{}] init ({:?}, {:?})", self.name, context.variant(), context.renderer());
        Ok(())
    }

    fn update(&mut self, _tick: u64) -> SceneResult {
        self.ticks += 1;
        if self.ticks % 60 == 0 {
            debug!("[{}] {} ticks", self.name, self.ticks);
        }
        Ok(())
    }

    fn end(&mut self) {
        info!("[{}] end after {} ticks", self.name, self.ticks);
    }

    fn handle_input(&mut self, input: &KeyInput) {
        if input.pressed {
            debug!("[{}] key {:?}", self.name, input.key);
        }
    }

    fn on_domain_event(&mut self, event: &GameEvent) {
        debug!("[{}] {:?}", self.name, event);
    }

    fn is_three_dimensional(&self) -> bool {
        self.three_d
    }

    fn on_dimension_switched(&mut self, from: Dimension) {
        info!("[{}] switched from {:?}", self.name, from);
    }
}

fn build_catalog() -> Result<SceneCatalog<Variant>, arcade_stage::core::CatalogError> {
    let mut builder = SceneCatalog::builder();

    for variant in [Variant::PacMan, Variant::MsPacMan] {
        let prefix = format!("{:?}", variant);
        builder.register(variant, SceneSlot::Boot, LogScene::flat(&format!("{prefix}/boot")));
        builder.register(variant, SceneSlot::Intro, LogScene::flat(&format!("{prefix}/intro")));
        builder.register(variant, SceneSlot::Credit, LogScene::flat(&format!("{prefix}/credit")));
        builder.register(variant, SceneSlot::Play, LogScene::flat(&format!("{prefix}/play")));
        builder.register_3d(variant, SceneSlot::Play, LogScene::deep(&format!("{prefix}/play3d")));

        for index in 0..variant.cutscenes() {
            builder.register(
                variant,
                SceneSlot::Cutscene(index),
                LogScene::flat(&format!("{prefix}/cutscene{}", index + 1)),
            );
        }
    }

    builder.build()
}

//=== DemoController ======================================================

/// Time-driven stand-in for the real game model.
struct DemoController {
    variant: Variant,
    state: GameState,
    ticks_in_state: u32,
    level: u32,
    intermission: usize,
}

impl DemoController {
    fn new(variant: Variant) -> Self {
        Self {
            variant,
            state: GameState::Boot,
            ticks_in_state: 0,
            level: 0,
            intermission: 0,
        }
    }

    /// Ticks spent in a state before the script moves on.
    fn duration(state: GameState) -> u32 {
        match state {
            GameState::Boot => 60,
            GameState::Intro => 300,
            GameState::Credit => 120,
            GameState::Ready => 120,
            GameState::Hunting => 600,
            GameState::LevelComplete => 90,
            GameState::Intermission => 240,
            _ => 60,
        }
    }

    fn next(&mut self) -> GameState {
        match self.state {
            GameState::Boot => GameState::Intro,
            GameState::Intro => GameState::Credit,
            GameState::Credit => GameState::Ready,
            GameState::Ready => GameState::Hunting,
            GameState::Hunting => GameState::LevelComplete,
            GameState::LevelComplete if self.level % 2 == 0 => GameState::Intermission,
            GameState::Intermission => {
                self.intermission = (self.intermission + 1) % self.variant.cutscenes();
                GameState::Ready
            }
            _ => GameState::Ready,
        }
    }
}

impl GameController<Variant> for DemoController {
    fn state(&self) -> GameState {
        self.state
    }

    fn variant(&self) -> Variant {
        self.variant
    }

    fn intermission_index(&self) -> Option<usize> {
        Some(self.intermission)
    }

    fn update(&mut self, events: &mut Vec<GameEvent>) {
        self.ticks_in_state += 1;
        if self.ticks_in_state < Self::duration(self.state) {
            if self.state == GameState::Hunting && self.ticks_in_state % 45 == 0 {
                events.push(GameEvent::PacFoundFood);
            }
            return;
        }

        let from = self.state;
        let to = self.next();
        self.state = to;
        self.ticks_in_state = 0;

        if to == GameState::Ready {
            self.level += 1;
            events.push(GameEvent::LevelCreated { level: self.level });
        }
        events.push(GameEvent::StateChange { from, to });
        if to == GameState::Ready {
            events.push(GameEvent::LevelStarting { level: self.level });
        }

        // Switch variant every fourth level, like selecting another game.
        if to == GameState::Ready && self.level % 4 == 0 {
            self.variant = self.variant.other();
            events.push(GameEvent::UnspecifiedChange);
        }
    }
}

//=== Entry Point =========================================================

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let mut config = StageConfig {
        title: "Arcade Stage Demo".to_string(),
        debug: true,
        ..StageConfig::default()
    };
    config.apply_env_overrides();

    let catalog = build_catalog().context("demo scene catalog is incomplete")?;
    let stage = StageBuilder::new(config).build(catalog, DemoController::new(Variant::PacMan));

    // Coins arrive from outside the UI thread.
    let coins = stage.event_sender();
    thread::spawn(move || loop {
        thread::sleep(Duration::from_secs(7));
        if coins.send(GameEvent::CreditAdded).is_err() {
            break;
        }
    });

    stage.run()?;
    info!("Demo finished");
    Ok(())
}
