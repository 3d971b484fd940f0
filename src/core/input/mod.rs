//=========================================================================
// Input
//
// Keyboard input as seen by the core.
//
// Responsibilities:
// - Represent key presses independently of the windowing toolkit
// - Map key combinations to simulation debug commands
//
// Notes:
// Movement steering is not handled here. Keys that match no debug
// binding are forwarded to the active scene, which decides what they
// mean.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod debug_bindings;

//=== Public API ==========================================================

pub use debug_bindings::{DebugBindings, DebugCommand};
pub use event::{KeyCode, KeyInput, Modifiers};
