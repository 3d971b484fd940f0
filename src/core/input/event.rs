//=========================================================================
// Key Input Types
//
// Platform-independent representation of keyboard input.
//
// The platform layer converts its native key events into `KeyInput`;
// the stage matches debug bindings against it and forwards everything
// else to the active scene.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    KeyInput (this module)
//         ↓
//    Stage → DebugCommand / Scene::handle_input
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    F1,
    F11,
}

//=== Modifiers ===========================================================

/// Modifier keys held while a key event occurred.
///
/// Left and right variants are not distinguished. Bindings require an
/// exact modifier match: `Shift+P` does not match `Ctrl+Shift+P`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    /// Ctrl only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Alt only.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

//=== KeyInput ============================================================

/// A single key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    pub pressed: bool,
}

impl KeyInput {
    /// Key press without modifiers.
    pub fn pressed(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            pressed: true,
        }
    }

    /// Key press with the given modifiers.
    pub fn pressed_with(key: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            pressed: true,
        }
    }

    /// Key release without modifiers.
    pub fn released(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            pressed: false,
        }
    }

    /// Whether this is a press of `key` with exactly `modifiers` held.
    pub fn is_press_of(&self, key: KeyCode, modifiers: Modifiers) -> bool {
        self.pressed && self.key == key && self.modifiers == modifiers
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_default_to_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }

    #[test]
    fn press_match_requires_exact_modifiers() {
        let input = KeyInput::pressed_with(KeyCode::KeyP, Modifiers::SHIFT);

        assert!(input.is_press_of(KeyCode::KeyP, Modifiers::SHIFT));
        assert!(!input.is_press_of(KeyCode::KeyP, Modifiers::NONE));
        assert!(!input.is_press_of(KeyCode::KeyN, Modifiers::SHIFT));
    }

    #[test]
    fn release_never_matches_press() {
        let input = KeyInput::released(KeyCode::KeyP);
        assert!(!input.is_press_of(KeyCode::KeyP, Modifiers::NONE));
    }
}
