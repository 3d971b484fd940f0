//=========================================================================
// Scene Slots
//=========================================================================
//
// Closed set of positions a scene can occupy in the catalog, and the
// renderer dimension a catalog entry belongs to.
//
//=========================================================================

//=== SceneSlot ===========================================================

/// Catalog position of a scene within one game variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneSlot {
    Boot,
    Intro,
    Credit,
    Play,
    /// Zero-based cutscene (intermission) index.
    Cutscene(usize),
}

impl SceneSlot {
    /// Slots every variant must fill with a 2D scene.
    pub const REQUIRED: [SceneSlot; 4] = [
        SceneSlot::Boot,
        SceneSlot::Intro,
        SceneSlot::Credit,
        SceneSlot::Play,
    ];
}

//=== Dimension ===========================================================

/// Renderer dimension of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dimension {
    #[default]
    TwoD,
    ThreeD,
}

impl Dimension {
    /// Returns the other dimension.
    pub fn toggled(self) -> Self {
        match self {
            Self::TwoD => Self::ThreeD,
            Self::ThreeD => Self::TwoD,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
