//=========================================================================
// Debug Bindings
//=========================================================================
//
// Maps key combinations to simulation debug commands.
//
// Architecture:
//   (key, modifiers) → HashMap → DebugCommand
//
// Only presses resolve; releases never trigger a command.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::event::{KeyCode, KeyInput, Modifiers};

//=== DebugCommand ========================================================

/// Simulation control commands available from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugCommand {
    /// Pauses or resumes the simulation.
    TogglePause,

    /// Executes one tick while paused.
    SingleStep,

    /// Executes ten ticks while paused.
    TenSteps,

    /// Raises the target frequency by one speed step.
    SpeedUp,

    /// Lowers the target frequency by one speed step.
    SpeedDown,

    /// Restores the configured target frequency.
    ResetSpeed,

    /// Switches between 2D and 3D scenes.
    ToggleDimension,
}

impl DebugCommand {
    /// Whether the command is only honored with debug controls enabled.
    pub fn requires_debug(self) -> bool {
        matches!(
            self,
            Self::SingleStep | Self::TenSteps | Self::SpeedUp | Self::SpeedDown | Self::ResetSpeed
        )
    }
}

//=== DebugBindings =======================================================

/// Key combination table for [`DebugCommand`]s.
#[derive(Debug, Clone)]
pub struct DebugBindings {
    bindings: HashMap<(KeyCode, Modifiers), DebugCommand>,
}

impl DebugBindings {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    //--- Binding API ------------------------------------------------------

    /// Binds a key combination, replacing any previous binding.
    pub fn bind(&mut self, key: KeyCode, modifiers: Modifiers, command: DebugCommand) {
        if let Some(previous) = self.bindings.insert((key, modifiers), command) {
            warn!(
                target: "stage",
                "Rebinding {:?}+{:?} from {:?} to {:?}",
                modifiers,
                key,
                previous,
                command
            );
        }
    }

    /// Removes the binding for a key combination.
    pub fn unbind(&mut self, key: KeyCode, modifiers: Modifiers) -> Option<DebugCommand> {
        self.bindings.remove(&(key, modifiers))
    }

    //--- Resolution -------------------------------------------------------

    /// Returns the command bound to a key press, if any.
    pub fn resolve(&self, input: &KeyInput) -> Option<DebugCommand> {
        if !input.pressed {
            return None;
        }

        let command = self.bindings.get(&(input.key, input.modifiers)).copied();
        if let Some(command) = command {
            debug!(target: "stage", "Key {:?} resolved to {:?}", input.key, command);
        }
        command
    }

    /// Whether a key combination is bound, regardless of press state.
    pub fn is_bound(&self, key: KeyCode, modifiers: Modifiers) -> bool {
        self.bindings.contains_key(&(key, modifiers))
    }

    /// Number of bound combinations.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for DebugBindings {
    /// Standard layout: P pause, Shift+P single step, Shift+Space ten
    /// steps, Alt+Up/Down/0 speed, Ctrl+3 dimension toggle.
    fn default() -> Self {
        let mut table = Self::empty();
        table.bind(KeyCode::KeyP, Modifiers::NONE, DebugCommand::TogglePause);
        table.bind(KeyCode::KeyP, Modifiers::SHIFT, DebugCommand::SingleStep);
        table.bind(KeyCode::Space, Modifiers::SHIFT, DebugCommand::TenSteps);
        table.bind(KeyCode::ArrowUp, Modifiers::ALT, DebugCommand::SpeedUp);
        table.bind(KeyCode::ArrowDown, Modifiers::ALT, DebugCommand::SpeedDown);
        table.bind(KeyCode::Digit0, Modifiers::ALT, DebugCommand::ResetSpeed);
        table.bind(KeyCode::Digit3, Modifiers::CTRL, DebugCommand::ToggleDimension);
        table
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_resolves_pause_and_steps() {
        let table = DebugBindings::default();

        assert_eq!(
            table.resolve(&KeyInput::pressed(KeyCode::KeyP)),
            Some(DebugCommand::TogglePause)
        );
        assert_eq!(
            table.resolve(&KeyInput::pressed_with(KeyCode::KeyP, Modifiers::SHIFT)),
            Some(DebugCommand::SingleStep)
        );
        assert_eq!(
            table.resolve(&KeyInput::pressed_with(KeyCode::Space, Modifiers::SHIFT)),
            Some(DebugCommand::TenSteps)
        );
    }

    #[test]
    fn unbound_keys_resolve_to_none() {
        let table = DebugBindings::default();
        assert_eq!(table.resolve(&KeyInput::pressed(KeyCode::ArrowLeft)), None);
        assert_eq!(table.resolve(&KeyInput::pressed(KeyCode::Space)), None);
    }

    #[test]
    fn releases_never_resolve() {
        let table = DebugBindings::default();
        assert_eq!(table.resolve(&KeyInput::released(KeyCode::KeyP)), None);
    }

    #[test]
    fn bind_replaces_and_unbind_removes() {
        let mut table = DebugBindings::empty();
        table.bind(KeyCode::KeyS, Modifiers::NONE, DebugCommand::SingleStep);
        table.bind(KeyCode::KeyS, Modifiers::NONE, DebugCommand::TenSteps);

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.resolve(&KeyInput::pressed(KeyCode::KeyS)),
            Some(DebugCommand::TenSteps)
        );

        assert_eq!(
            table.unbind(KeyCode::KeyS, Modifiers::NONE),
            Some(DebugCommand::TenSteps)
        );
        assert!(table.is_empty());
    }

    #[test]
    fn step_and_speed_commands_require_debug() {
        assert!(DebugCommand::SingleStep.requires_debug());
        assert!(DebugCommand::SpeedUp.requires_debug());
        assert!(!DebugCommand::TogglePause.requires_debug());
        assert!(!DebugCommand::ToggleDimension.requires_debug());
    }
}
