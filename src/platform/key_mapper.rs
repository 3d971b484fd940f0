//=========================================================================
// Key Mapper
//=========================================================================
//
// Converts Winit keyboard events into core `KeyInput`s.
//
// Modifier state is sticky: it is cached from `ModifiersChanged` and
// applied to every following key event. Keys the core has no code for
// are filtered out (None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::ElementState,
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{KeyCode, KeyInput, Modifiers};

//=== KeyMapper ===========================================================

pub(crate) struct KeyMapper {
    modifiers: Modifiers,
}

impl KeyMapper {
    pub(crate) fn new() -> Self {
        Self {
            modifiers: Modifiers::NONE,
        }
    }

    /// Caches modifier state for subsequent key events.
    pub(crate) fn update_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from(state);
    }

    #[cfg(test)]
    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Converts a physical key transition, filtering unmapped keys.
    pub(crate) fn map(&self, physical: PhysicalKey, state: ElementState) -> Option<KeyInput> {
        let PhysicalKey::Code(code) = physical else {
            return None;
        };

        Some(KeyInput {
            key: map_key_code(code)?,
            modifiers: self.modifiers,
            pressed: state == ElementState::Pressed,
        })
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Winit normalizes platform keys (macOS Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Maps the physical keys the core knows about.
fn map_key_code(code: WinitKeyCode) -> Option<KeyCode> {
    use WinitKeyCode as W;

    let key = match code {
        //--- Digits -------------------------------------------------------
        W::Digit0 => KeyCode::Digit0, W::Digit1 => KeyCode::Digit1,
        W::Digit2 => KeyCode::Digit2, W::Digit3 => KeyCode::Digit3,
        W::Digit4 => KeyCode::Digit4, W::Digit5 => KeyCode::Digit5,
        W::Digit6 => KeyCode::Digit6, W::Digit7 => KeyCode::Digit7,
        W::Digit8 => KeyCode::Digit8, W::Digit9 => KeyCode::Digit9,

        //--- Letters ------------------------------------------------------
        W::KeyA => KeyCode::KeyA, W::KeyB => KeyCode::KeyB, W::KeyC => KeyCode::KeyC,
        W::KeyD => KeyCode::KeyD, W::KeyE => KeyCode::KeyE, W::KeyF => KeyCode::KeyF,
        W::KeyG => KeyCode::KeyG, W::KeyH => KeyCode::KeyH, W::KeyI => KeyCode::KeyI,
        W::KeyJ => KeyCode::KeyJ, W::KeyK => KeyCode::KeyK, W::KeyL => KeyCode::KeyL,
        W::KeyM => KeyCode::KeyM, W::KeyN => KeyCode::KeyN, W::KeyO => KeyCode::KeyO,
        W::KeyP => KeyCode::KeyP, W::KeyQ => KeyCode::KeyQ, W::KeyR => KeyCode::KeyR,
        W::KeyS => KeyCode::KeyS, W::KeyT => KeyCode::KeyT, W::KeyU => KeyCode::KeyU,
        W::KeyV => KeyCode::KeyV, W::KeyW => KeyCode::KeyW, W::KeyX => KeyCode::KeyX,
        W::KeyY => KeyCode::KeyY, W::KeyZ => KeyCode::KeyZ,

        //--- Arrows -------------------------------------------------------
        W::ArrowUp => KeyCode::ArrowUp,
        W::ArrowDown => KeyCode::ArrowDown,
        W::ArrowLeft => KeyCode::ArrowLeft,
        W::ArrowRight => KeyCode::ArrowRight,

        //--- Special ------------------------------------------------------
        W::Space => KeyCode::Space,
        W::Enter => KeyCode::Enter,
        W::Escape => KeyCode::Escape,
        W::Tab => KeyCode::Tab,
        W::F1 => KeyCode::F1,
        W::F11 => KeyCode::F11,

        _ => return None,
    };
    Some(key)
}

//=========================================================================
// Unit Tests
//=========================================================================
