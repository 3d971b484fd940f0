//=========================================================================
// Stage Configuration
//=========================================================================
//
// Startup settings consumed by the stage: tick rate, pause and debug
// flags, catch-up cap and window geometry.
//
// Values come from code (`Default` + field updates or `StageBuilder`)
// and can be overridden from the environment:
//
//   ARCADE_TICK_HZ              positive integer
//   ARCADE_PAUSED               1/0, true/false, yes/no, on/off
//   ARCADE_DEBUG                same as ARCADE_PAUSED
//   ARCADE_MAX_TICKS_PER_FRAME  positive integer, 0 disables the cap
//
//=========================================================================

//=== External Dependencies ===============================================

use std::str::FromStr;

use log::{debug, warn};

//=== StageConfig =========================================================

/// Settings supplied once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageConfig {
    /// Simulation ticks per second.
    pub target_hz: u32,
    /// Whether the simulation starts paused.
    pub start_paused: bool,
    /// Enables single-step and speed controls.
    pub debug: bool,
    /// Upper bound on ticks run in a single frame.
    pub max_ticks_per_frame: Option<u32>,
    /// Frequency change applied by the speed up/down commands.
    pub speed_step_hz: u32,
    /// Capacity of the off-thread event mailbox.
    pub mailbox_capacity: usize,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            target_hz: 60,
            start_paused: false,
            debug: false,
            max_ticks_per_frame: None,
            speed_step_hz: 5,
            mailbox_capacity: 256,
            title: "Arcade Stage".to_string(),
            width: 672,
            height: 864,
        }
    }
}

impl StageConfig {
    /// Applies the `ARCADE_*` environment variables.
    ///
    /// Invalid values are logged and ignored.
    pub fn apply_env_overrides(&mut self) -> &mut Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> &mut Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(hz) = parse_var::<u32>(&lookup, "ARCADE_TICK_HZ") {
            if hz > 0 {
                self.target_hz = hz;
            } else {
                warn!(target: "stage", "Ignoring ARCADE_TICK_HZ=0: frequency must be positive");
            }
        }

        if let Some(paused) = flag_var(&lookup, "ARCADE_PAUSED") {
            self.start_paused = paused;
        }

        if let Some(debug) = flag_var(&lookup, "ARCADE_DEBUG") {
            self.debug = debug;
        }

        if let Some(cap) = parse_var::<u32>(&lookup, "ARCADE_MAX_TICKS_PER_FRAME") {
            self.max_ticks_per_frame = (cap > 0).then_some(cap);
        }

        debug!(target: "stage", "Effective configuration: {:?}", self);
        self
    }
}

//=== Parsing Helpers =====================================================

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(target: "stage", "Ignoring {}={:?}: not a valid number", name, raw);
            None
        }
    }
}

fn flag_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<bool> {
    let raw = lookup(name)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(target: "stage", "Ignoring {}={:?}: not a boolean", name, raw);
            None
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
