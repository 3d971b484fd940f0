//=========================================================================
// Scene Catalog
//=========================================================================
//
// Immutable mapping (variant, slot, dimension) → scene.
//
// Scenes are stored once in a Vec and referenced by `SceneId`, so one
// scene instance can serve several entries and keeps its state between
// activations. The catalog is populated through `SceneCatalogBuilder`
// and validated once at startup.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Dimension, Scene, SceneSlot};
use crate::core::controller::{GameState, GameVariant};
use crate::core::error::{CatalogError, SceneResolutionError};

//=== SceneId =============================================================

/// Handle of a scene stored in a [`SceneCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(usize);

impl SceneId {
    /// Position of the scene in its catalog.
    pub fn index(self) -> usize {
        self.0
    }
}

type EntryKey<V> = (V, SceneSlot, Dimension);

//=== SceneCatalogBuilder =================================================

/// Collects scenes and their catalog entries before validation.
///
/// # Example
///
/// ```rust
/// # use arcade_stage::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Variant { PacMan }
/// # impl GameVariant for Variant {}
/// # struct Blank;
/// # impl Scene<Variant> for Blank {
/// #     fn update(&mut self, _tick: u64) -> SceneResult { Ok(()) }
/// # }
/// let mut builder = SceneCatalog::builder();
/// builder.register(Variant::PacMan, SceneSlot::Boot, Blank);
/// builder.register(Variant::PacMan, SceneSlot::Intro, Blank);
/// builder.register(Variant::PacMan, SceneSlot::Credit, Blank);
/// let play = builder.register(Variant::PacMan, SceneSlot::Play, Blank);
/// builder.bind(Variant::PacMan, SceneSlot::Cutscene(0), play);
/// let catalog = builder.build().unwrap();
/// assert_eq!(catalog.cutscene_count(Variant::PacMan), 1);
/// ```
pub struct SceneCatalogBuilder<V: GameVariant> {
    scenes: Vec<Box<dyn Scene<V>>>,
    entries: HashMap<EntryKey<V>, SceneId>,
}

impl<V: GameVariant> SceneCatalogBuilder<V> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            scenes: Vec::new(),
            entries: HashMap::new(),
        }
    }

    /// Stores a scene and returns its handle without binding it.
    pub fn add_scene<S>(&mut self, scene: S) -> SceneId
    where
        S: Scene<V> + 'static,
    {
        let id = SceneId(self.scenes.len());
        self.scenes.push(Box::new(scene));
        id
    }

    /// Binds a stored scene as the 2D scene of a slot.
    pub fn bind(&mut self, variant: V, slot: SceneSlot, id: SceneId) -> &mut Self {
        self.bind_in(variant, slot, Dimension::TwoD, id)
    }

    /// Binds a stored scene as the 3D scene of a slot.
    pub fn bind_3d(&mut self, variant: V, slot: SceneSlot, id: SceneId) -> &mut Self {
        self.bind_in(variant, slot, Dimension::ThreeD, id)
    }

    /// Stores a scene and binds it as the 2D scene of a slot.
    pub fn register<S>(&mut self, variant: V, slot: SceneSlot, scene: S) -> SceneId
    where
        S: Scene<V> + 'static,
    {
        let id = self.add_scene(scene);
        self.bind(variant, slot, id);
        id
    }

    /// Stores a scene and binds it as the 3D scene of a slot.
    pub fn register_3d<S>(&mut self, variant: V, slot: SceneSlot, scene: S) -> SceneId
    where
        S: Scene<V> + 'static,
    {
        let id = self.add_scene(scene);
        self.bind_3d(variant, slot, id);
        id
    }

    /// Validates the entries and freezes the catalog.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Empty`] if nothing was bound
    /// - [`CatalogError::UnknownScene`] for a foreign `SceneId`
    /// - [`CatalogError::MissingRequiredSlot`] if a variant lacks a 2D
    ///   boot, intro, credit or play scene
    /// - [`CatalogError::CutsceneGap`] if 2D cutscenes are not `0..n`
    pub fn build(self) -> Result<SceneCatalog<V>, CatalogError> {
        if self.entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        if let Some(id) = self.entries.values().find(|id| id.0 >= self.scenes.len()) {
            return Err(CatalogError::UnknownScene { index: id.0 });
        }

        let variants: HashSet<V> = self.entries.keys().map(|(variant, _, _)| *variant).collect();
        let mut cutscene_counts = HashMap::with_capacity(variants.len());

        for &variant in &variants {
            for slot in SceneSlot::REQUIRED {
                if !self.entries.contains_key(&(variant, slot, Dimension::TwoD)) {
                    return Err(CatalogError::MissingRequiredSlot {
                        variant: format!("{:?}", variant),
                        slot,
                    });
                }
            }

            let indices: HashSet<usize> = self
                .entries
                .keys()
                .filter_map(|(v, slot, dimension)| match slot {
                    SceneSlot::Cutscene(index) if *v == variant && *dimension == Dimension::TwoD => {
                        Some(*index)
                    }
                    _ => None,
                })
                .collect();

            if let Some(missing) = (0..indices.len()).find(|index| !indices.contains(index)) {
                return Err(CatalogError::CutsceneGap {
                    variant: format!("{:?}", variant),
                    missing,
                });
            }

            cutscene_counts.insert(variant, indices.len());
        }

        debug!(
            target: "scene",
            "Scene catalog built: {} scenes, {} entries, {} variants",
            self.scenes.len(),
            self.entries.len(),
            variants.len()
        );

        Ok(SceneCatalog {
            scenes: self.scenes,
            entries: self.entries,
            cutscene_counts,
        })
    }

    fn bind_in(&mut self, variant: V, slot: SceneSlot, dimension: Dimension, id: SceneId) -> &mut Self {
        if let Some(previous) = self.entries.insert((variant, slot, dimension), id) {
            debug!(
                target: "scene",
                "Entry {:?}/{:?}/{:?} rebound from #{} to #{}",
                variant,
                slot,
                dimension,
                previous.0,
                id.0
            );
        }
        self
    }
}

impl<V: GameVariant> Default for SceneCatalogBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

//=== SceneCatalog ========================================================

/// Validated, immutable scene lookup table.
///
/// Only the scenes themselves are mutable (through the dispatcher); the
/// set of entries never changes after [`SceneCatalogBuilder::build`].
pub struct SceneCatalog<V: GameVariant> {
    scenes: Vec<Box<dyn Scene<V>>>,
    entries: HashMap<EntryKey<V>, SceneId>,
    cutscene_counts: HashMap<V, usize>,
}

impl<V: GameVariant> SceneCatalog<V> {
    /// Starts a new catalog.
    pub fn builder() -> SceneCatalogBuilder<V> {
        SceneCatalogBuilder::new()
    }

    //--- Resolution -------------------------------------------------------

    /// Returns the scene that should be active for the given controller
    /// snapshot.
    ///
    /// Pure lookup: the same inputs always yield the same id. With a 3D
    /// preference the 2D entry is used when the slot has no 3D scene.
    pub fn resolve(
        &self,
        variant: V,
        state: GameState,
        intermission: Option<usize>,
        preferred: Dimension,
    ) -> Result<SceneId, SceneResolutionError> {
        let slot = self.slot_for(variant, state, intermission)?;

        if preferred == Dimension::ThreeD {
            if let Some(id) = self.lookup(variant, slot, Dimension::ThreeD) {
                return Ok(id);
            }
        }

        self.lookup(variant, slot, Dimension::TwoD)
            .ok_or_else(|| SceneResolutionError::MissingScene {
                variant: format!("{:?}", variant),
                state,
                slot,
            })
    }

    /// Maps a controller snapshot to a slot, validating cutscene indices.
    pub fn slot_for(
        &self,
        variant: V,
        state: GameState,
        intermission: Option<usize>,
    ) -> Result<SceneSlot, SceneResolutionError> {
        if !state.is_intermission() {
            return Ok(state.scene_slot(0));
        }

        let index = intermission.ok_or_else(|| SceneResolutionError::MissingIntermissionIndex {
            variant: format!("{:?}", variant),
            state,
        })?;

        let available = self.cutscene_count(variant);
        if index >= available {
            return Err(SceneResolutionError::CutsceneOutOfRange {
                variant: format!("{:?}", variant),
                state,
                index,
                available,
            });
        }

        Ok(state.scene_slot(index))
    }

    /// Exact entry lookup without fallback.
    pub fn lookup(&self, variant: V, slot: SceneSlot, dimension: Dimension) -> Option<SceneId> {
        self.entries.get(&(variant, slot, dimension)).copied()
    }

    /// Whether a slot has distinct 2D and 3D scenes.
    pub fn exists_in_both_dimensions(&self, variant: V, slot: SceneSlot) -> bool {
        match (
            self.lookup(variant, slot, Dimension::TwoD),
            self.lookup(variant, slot, Dimension::ThreeD),
        ) {
            (Some(flat), Some(deep)) => flat != deep,
            _ => false,
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Number of cutscenes configured for a variant.
    pub fn cutscene_count(&self, variant: V) -> usize {
        self.cutscene_counts.get(&variant).copied().unwrap_or(0)
    }

    /// Whether the variant has any entries.
    pub fn contains_variant(&self, variant: V) -> bool {
        self.cutscene_counts.contains_key(&variant)
    }

    /// Number of stored scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Returns true if no scene is stored.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Number of (variant, slot, dimension) entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    //--- Scene Access -----------------------------------------------------

    /// Borrows a stored scene, or `None` for an id of another catalog.
    pub fn get(&self, id: SceneId) -> Option<&dyn Scene<V>> {
        let scene: &dyn Scene<V> = self.scenes.get(id.0)?.as_ref();
        Some(scene)
    }

    pub(crate) fn scene(&self, id: SceneId) -> &dyn Scene<V> {
        self.scenes[id.0].as_ref()
    }

    pub(crate) fn scene_mut(&mut self, id: SceneId) -> &mut dyn Scene<V> {
        self.scenes[id.0].as_mut()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{CallLog, RecordingScene, TestVariant};

    fn full_builder(log: &CallLog) -> SceneCatalogBuilder<TestVariant> {
        let mut builder = SceneCatalog::builder();
        for variant in [TestVariant::A, TestVariant::B] {
            builder.register(variant, SceneSlot::Boot, RecordingScene::new("boot", log));
            builder.register(variant, SceneSlot::Intro, RecordingScene::new("intro", log));
            builder.register(variant, SceneSlot::Credit, RecordingScene::new("credit", log));
            builder.register(variant, SceneSlot::Play, RecordingScene::new("play", log));
            builder.register(variant, SceneSlot::Cutscene(0), RecordingScene::new("cut0", log));
            builder.register(variant, SceneSlot::Cutscene(1), RecordingScene::new("cut1", log));
        }
        builder
    }

    //--- Construction -----------------------------------------------------

    #[test]
    fn empty_catalog_is_rejected() {
        let builder = SceneCatalogBuilder::<TestVariant>::new();
        assert_eq!(builder.build().err(), Some(CatalogError::Empty));
    }

    #[test]
    fn missing_required_slot_is_rejected() {
        let log = CallLog::default();
        let mut builder = SceneCatalog::builder();
        builder.register(TestVariant::A, SceneSlot::Boot, RecordingScene::new("boot", &log));
        builder.register(TestVariant::A, SceneSlot::Intro, RecordingScene::new("intro", &log));
        builder.register(TestVariant::A, SceneSlot::Play, RecordingScene::new("play", &log));

        assert_eq!(
            builder.build().err(),
            Some(CatalogError::MissingRequiredSlot {
                variant: "A".to_string(),
                slot: SceneSlot::Credit,
            })
        );
    }

    #[test]
    fn cutscene_gap_is_rejected() {
        let log = CallLog::default();
        let mut builder = SceneCatalog::builder();
        for slot in SceneSlot::REQUIRED {
            builder.register(TestVariant::A, slot, RecordingScene::new("s", &log));
        }
        builder.register(TestVariant::A, SceneSlot::Cutscene(1), RecordingScene::new("cut1", &log));

        assert_eq!(
            builder.build().err(),
            Some(CatalogError::CutsceneGap {
                variant: "A".to_string(),
                missing: 0,
            })
        );
    }

    #[test]
    fn foreign_scene_id_is_rejected() {
        let log = CallLog::default();
        let mut other = SceneCatalog::<TestVariant>::builder();
        for _ in 0..20 {
            other.add_scene(RecordingScene::new("x", &log));
        }
        let foreign = other.add_scene(RecordingScene::new("x", &log));

        let mut builder = full_builder(&log);
        builder.bind(TestVariant::A, SceneSlot::Cutscene(2), foreign);

        assert!(matches!(builder.build(), Err(CatalogError::UnknownScene { .. })));
    }

    #[test]
    fn shared_scene_serves_several_entries() {
        let log = CallLog::default();
        let mut builder = SceneCatalog::builder();
        let shared = builder.add_scene(RecordingScene::new("shared", &log));
        for slot in SceneSlot::REQUIRED {
            builder.bind(TestVariant::A, slot, shared);
        }
        let catalog = builder.build().unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entry_count(), 4);
        assert_eq!(catalog.cutscene_count(TestVariant::A), 0);
    }

    //--- Resolution -------------------------------------------------------

    #[test]
    fn resolution_is_deterministic() {
        let log = CallLog::default();
        let catalog = full_builder(&log).build().unwrap();

        let first = catalog.resolve(TestVariant::A, GameState::Hunting, None, Dimension::TwoD);
        let second = catalog.resolve(TestVariant::A, GameState::Hunting, None, Dimension::TwoD);

        assert_eq!(first, second);
        assert_eq!(catalog.scene(first.unwrap()).name(), "play");
        assert_eq!(catalog.entry_count(), 12);
    }

    #[test]
    fn variants_resolve_to_their_own_scenes() {
        let log = CallLog::default();
        let catalog = full_builder(&log).build().unwrap();

        let a = catalog.resolve(TestVariant::A, GameState::Intro, None, Dimension::TwoD).unwrap();
        let b = catalog.resolve(TestVariant::B, GameState::Intro, None, Dimension::TwoD).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn intermission_uses_explicit_index() {
        let log = CallLog::default();
        let catalog = full_builder(&log).build().unwrap();

        let id = catalog
            .resolve(TestVariant::A, GameState::Intermission, Some(1), Dimension::TwoD)
            .unwrap();
        assert_eq!(catalog.scene(id).name(), "cut1");
    }

    #[test]
    fn out_of_range_intermission_is_an_error() {
        let log = CallLog::default();
        let catalog = full_builder(&log).build().unwrap();

        let result = catalog.resolve(TestVariant::A, GameState::Intermission, Some(2), Dimension::TwoD);
        assert_eq!(
            result,
            Err(SceneResolutionError::CutsceneOutOfRange {
                variant: "A".to_string(),
                state: GameState::Intermission,
                index: 2,
                available: 2,
            })
        );
    }

    #[test]
    fn missing_intermission_index_is_an_error() {
        let log = CallLog::default();
        let catalog = full_builder(&log).build().unwrap();

        let result = catalog.resolve(TestVariant::B, GameState::IntermissionTest, None, Dimension::TwoD);
        assert!(matches!(
            result,
            Err(SceneResolutionError::MissingIntermissionIndex { .. })
        ));
    }

    #[test]
    fn unknown_variant_is_missing_scene() {
        let log = CallLog::default();
        let mut builder = SceneCatalog::builder();
        for slot in SceneSlot::REQUIRED {
            builder.register(TestVariant::A, slot, RecordingScene::new("s", &log));
        }
        let catalog = builder.build().unwrap();

        assert!(!catalog.contains_variant(TestVariant::B));
        assert!(matches!(
            catalog.resolve(TestVariant::B, GameState::Boot, None, Dimension::TwoD),
            Err(SceneResolutionError::MissingScene { .. })
        ));
    }

    #[test]
    fn three_d_preference_falls_back_to_2d() {
        let log = CallLog::default();
        let mut builder = full_builder(&log);
        let play_3d = builder.register_3d(
            TestVariant::A,
            SceneSlot::Play,
            RecordingScene::new("play3d", &log).three_dimensional(),
        );
        let catalog = builder.build().unwrap();

        let play = catalog
            .resolve(TestVariant::A, GameState::Ready, None, Dimension::ThreeD)
            .unwrap();
        assert_eq!(play, play_3d);

        let intro = catalog
            .resolve(TestVariant::A, GameState::Intro, None, Dimension::ThreeD)
            .unwrap();
        assert_eq!(catalog.scene(intro).name(), "intro");

        assert!(catalog.exists_in_both_dimensions(TestVariant::A, SceneSlot::Play));
        assert!(!catalog.exists_in_both_dimensions(TestVariant::A, SceneSlot::Intro));
        assert!(!catalog.exists_in_both_dimensions(TestVariant::B, SceneSlot::Play));
    }

    #[test]
    fn get_rejects_foreign_ids() {
        let log = CallLog::default();
        let mut other = full_builder(&log);
        for _ in 0..10 {
            other.add_scene(RecordingScene::new("spare", &log));
        }
        let foreign = other.add_scene(RecordingScene::new("foreign", &log));
        let catalog = full_builder(&log).build().unwrap();

        assert!(catalog.get(foreign).is_none());
        let boot = catalog.lookup(TestVariant::A, SceneSlot::Boot, Dimension::TwoD).unwrap();
        assert_eq!(catalog.get(boot).map(|s| s.name()), Some("boot"));
    }
}
