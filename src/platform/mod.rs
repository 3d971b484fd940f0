//=========================================================================
// Platform Subsystem
//
// Winit host that pumps frames and keys into the stage.
//
// Architecture:
// ```text
//  Main Thread (Winit event loop)
//  ┌───────────────────────────────────┐
//  │  resumed()          → on_start()  │
//  │  KeyboardInput      → KeyMapper   │
//  │                       → on_key()  │
//  │  RedrawRequested    → on_frame()  │
//  │                       → title     │
//  │                       → redraw    │
//  │  CloseRequested     → on_close()  │
//  └───────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: the clock runs once per redraw
//   and the next redraw is requested immediately
// - **Sticky modifiers**: cached from `ModifiersChanged`
// - **Main thread requirement**: Winit mandates the main thread on
//   macOS/iOS, so this runs on the thread that called `Stage::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod key_mapper;

//=== External Crates =====================================================

use std::time::Instant;

use log::*;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::input::KeyInput;
use key_mapper::KeyMapper;

//=== PlatformError =======================================================

/// Window and event loop failures. Fatal: the stage cannot run.
///
/// The Winit error is kept in its rendered form so the error stays
/// `Send + Sync` on every backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// Failed to create the event loop (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// The event loop terminated with an error.
    #[error("event loop error: {0}")]
    EventLoopExecution(String),
}

//=== FrameHost ===========================================================

/// Application side of the platform loop.
pub(crate) trait FrameHost {
    /// Called once, after the window exists.
    fn on_start(&mut self);

    /// Called on every redraw with the current time.
    fn on_frame(&mut self, now: Instant);

    /// Called for every mapped key press or release.
    fn on_key(&mut self, input: KeyInput);

    /// Called when the window is closing.
    fn on_close(&mut self);

    /// Current window title.
    fn title(&self) -> String;
}

//=== WindowSettings ======================================================

#[derive(Debug, Clone)]
pub(crate) struct WindowSettings {
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Window owner and frame pump.
///
/// This type is NOT Send/Sync; it must remain on the main thread.
pub(crate) struct Platform<H: FrameHost> {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,
    settings: WindowSettings,
    keys: KeyMapper,
    host: H,
    started: bool,
    shown_title: String,
}

impl<H: FrameHost> Platform<H> {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens in `resumed()`.
    pub fn new(host: H, settings: WindowSettings) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            settings,
            keys: KeyMapper::new(),
            host,
            started: false,
            shown_title: String::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the window is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// ends with an error.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    fn start_host(&mut self) {
        if !self.started {
            self.started = true;
            self.host.on_start();
        }
    }

    fn forward_key(&mut self, physical: PhysicalKey, state: ElementState) {
        match self.keys.map(physical, state) {
            Some(input) => self.host.on_key(input),
            None => trace!(target: "platform", "Unmapped key ignored: {:?}", physical),
        }
    }

    /// Runs one frame and returns the title the window should show.
    fn pump_frame(&mut self, now: Instant) -> Option<String> {
        self.host.on_frame(now);

        let title = self.host.title();
        if title == self.shown_title {
            return None;
        }
        self.shown_title = title.clone();
        Some(title)
    }
}

//=== Winit Integration ===================================================

impl<H: FrameHost> ApplicationHandler for Platform<H> {
    /// Creates the window on first activation.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.host.title())
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
                self.start_host();
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.host.on_close();
                event_loop.exit();
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform", "Modifiers changed: {:?}", state);
                self.keys.update_modifiers(state.state());
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                self.forward_key(key_event.physical_key, key_event.state);
            }

            WindowEvent::RedrawRequested => {
                if let Some(title) = self.pump_frame(Instant::now()) {
                    if let Some(window) = &self.window {
                        window.set_title(&title);
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, Modifiers};
    use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState};

    #[derive(Default)]
    struct RecordingHost {
        starts: u32,
        frames: Vec<Instant>,
        keys: Vec<KeyInput>,
        closed: bool,
        title: String,
    }

    impl FrameHost for RecordingHost {
        fn on_start(&mut self) {
            self.starts += 1;
        }

        fn on_frame(&mut self, now: Instant) {
            self.frames.push(now);
        }

        fn on_key(&mut self, input: KeyInput) {
            self.keys.push(input);
        }

        fn on_close(&mut self) {
            self.closed = true;
        }

        fn title(&self) -> String {
            self.title.clone()
        }
    }

    fn platform() -> Platform<RecordingHost> {
        Platform::new(
            RecordingHost {
                title: "Stage".to_string(),
                ..RecordingHost::default()
            },
            WindowSettings {
                width: 224,
                height: 288,
            },
        )
    }

    #[test]
    fn window_is_created_lazily() {
        let platform = platform();
        assert!(platform.window.is_none());
        assert_eq!(platform.host.starts, 0);
    }

    #[test]
    fn host_starts_once() {
        let mut platform = platform();
        platform.start_host();
        platform.start_host();
        assert_eq!(platform.host.starts, 1);
    }

    #[test]
    fn keys_carry_cached_modifiers() {
        let mut platform = platform();
        platform.keys.update_modifiers(ModifiersState::ALT);

        platform.forward_key(PhysicalKey::Code(WinitKeyCode::ArrowUp), ElementState::Pressed);
        platform.forward_key(PhysicalKey::Code(WinitKeyCode::F24), ElementState::Pressed);

        assert_eq!(
            platform.host.keys,
            vec![KeyInput::pressed_with(KeyCode::ArrowUp, Modifiers::ALT)]
        );
    }

    #[test]
    fn title_is_reported_only_when_changed() {
        let mut platform = platform();
        let now = Instant::now();

        assert_eq!(platform.pump_frame(now), Some("Stage".to_string()));
        assert_eq!(platform.pump_frame(now), None);

        platform.host.title = "Stage (paused)".to_string();
        assert_eq!(platform.pump_frame(now), Some("Stage (paused)".to_string()));
        assert_eq!(platform.host.frames.len(), 3);
    }

    #[test]
    fn platform_error_converts_into_anyhow() {
        let err: anyhow::Error = PlatformError::EventLoopCreation("no display".to_string()).into();
        assert!(err.to_string().contains("no display"));
    }
}
