//! Global hotkeys.
//!
//! A [`HotkeyService`] owns one background thread that registers the two
//! application hotkeys with the OS and forwards accepted presses to the UI
//! thread as [`AppEvent`]s. The egui context is woken with
//! `request_repaint()` after each send so the event loop notices even when
//! idle.
//!
//! Repeat presses within 300 ms are dropped (key-repeat and double-fire
//! suppression). Shutdown is deterministic: `stop()` flips a flag the
//! receive loop observes within its timeout, the thread is joined, and
//! dropping the manager unregisters the hotkeys with the OS.

use eframe::egui;
use global_hotkey::{
    hotkey::HotKey, Error as HotkeyError, GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::shortcuts::Shortcut;
use crate::state::AppEvent;

/// How long after an accepted press further presses of the same hotkey are
/// ignored.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// How often the listener thread re-checks its stop flag while idle.
const RECV_TIMEOUT: Duration = Duration::from_millis(200);

/// The two global actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum HotkeyAction {
    ToggleOverlay,
    ToggleTagPanel,
}

impl HotkeyAction {
    fn event(self) -> AppEvent {
        match self {
            HotkeyAction::ToggleOverlay => AppEvent::ToggleOverlay,
            HotkeyAction::ToggleTagPanel => AppEvent::ToggleTagPanel,
        }
    }

    fn name(self) -> &'static str {
        match self {
            HotkeyAction::ToggleOverlay => "toggle overlay",
            HotkeyAction::ToggleTagPanel => "toggle tag panel",
        }
    }
}

/// Per-hotkey debounce: accepts a press only when the previous accepted
/// press of the same id is at least `window` in the past.
struct Debouncer {
    window: Duration,
    last_accepted: HashMap<u32, Instant>,
}

impl Debouncer {
    fn new(window: Duration) -> Self {
        Debouncer {
            window,
            last_accepted: HashMap::new(),
        }
    }

    fn accept(&mut self, id: u32, now: Instant) -> bool {
        match self.last_accepted.get(&id) {
            Some(&last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last_accepted.insert(id, now);
                true
            }
        }
    }
}

/// Registration failure with enough context for the user to act on.
fn format_hotkey_error(e: &HotkeyError, shortcut: &Shortcut) -> String {
    match e {
        HotkeyError::AlreadyRegistered(hk) => format!(
            "Hotkey '{}' is already registered by another application (id: {}). \
             Pick a different shortcut in Settings.",
            shortcut,
            hk.id()
        ),
        HotkeyError::FailedToRegister(msg) => format!(
            "System rejected hotkey '{}': {}. It may be reserved by the OS.",
            shortcut, msg
        ),
        HotkeyError::OsError(os_err) => {
            format!("OS error registering hotkey '{}': {}", shortcut, os_err)
        }
        other => format!("Failed to register hotkey '{}': {}", shortcut, other),
    }
}

/// Background listener for the application's global hotkeys.
pub struct HotkeyService {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl HotkeyService {
    /// Spawn the listener thread for the hotkeys in `config`.
    pub fn start(config: &Config, events: Sender<AppEvent>, ctx: egui::Context) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let overlay = config.overlay_shortcut();
        let tags = config.tags_shortcut();

        let thread = std::thread::spawn(move || {
            listener_loop(overlay, tags, events, ctx, flag);
        });

        HotkeyService {
            running,
            thread: Some(thread),
        }
    }

    /// Stop the listener and join its thread. Dropping the manager inside
    /// the thread unregisters the hotkeys with the OS.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("Hotkey listener thread panicked");
            }
        }
    }

    /// Replace this service with one registered for `config`'s hotkeys.
    /// Used after the settings dialog changes a shortcut.
    pub fn restart(&mut self, config: &Config, events: Sender<AppEvent>, ctx: egui::Context) {
        self.stop();
        *self = HotkeyService::start(config, events, ctx);
    }
}

impl Drop for HotkeyService {
    fn drop(&mut self) {
        self.stop();
    }
}

fn listener_loop(
    overlay: Shortcut,
    tags: Shortcut,
    events: Sender<AppEvent>,
    ctx: egui::Context,
    running: Arc<AtomicBool>,
) {
    let manager = match GlobalHotKeyManager::new() {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, "Failed to create global hotkey manager; hotkeys disabled");
            return;
        }
    };

    let mut actions: HashMap<u32, HotkeyAction> = HashMap::new();
    for (shortcut, action) in [
        (&overlay, HotkeyAction::ToggleOverlay),
        (&tags, HotkeyAction::ToggleTagPanel),
    ] {
        match register(&manager, shortcut) {
            Ok(id) => {
                info!(
                    event_type = "hotkey",
                    shortcut = %shortcut,
                    action = action.name(),
                    id,
                    "Registered global hotkey"
                );
                actions.insert(id, action);
            }
            Err(msg) => warn!(event_type = "hotkey", shortcut = %shortcut, "{}", msg),
        }
    }

    if actions.is_empty() {
        warn!("No global hotkeys registered; in-window shortcuts still work");
    }

    let receiver = GlobalHotKeyEvent::receiver();
    let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW);

    while running.load(Ordering::SeqCst) {
        // The receiver is crossbeam-backed; a timeout just means "check the
        // stop flag and keep waiting".
        let event = match receiver.recv_timeout(RECV_TIMEOUT) {
            Ok(event) => event,
            Err(err) if err.is_timeout() => continue,
            Err(_) => break,
        };

        // Trigger on press, not release
        if event.state != HotKeyState::Pressed {
            continue;
        }

        let Some(&action) = actions.get(&event.id) else {
            continue;
        };

        if !debouncer.accept(event.id, Instant::now()) {
            debug!(action = action.name(), "Hotkey press debounced");
            continue;
        }

        debug!(event_type = "hotkey", action = action.name(), "Hotkey pressed");
        if events.send(action.event()).is_err() {
            // UI side is gone; nothing left to notify.
            break;
        }
        // Wake the event loop so the toggle applies immediately, not on the
        // next user interaction.
        ctx.request_repaint();
    }

    drop(manager);
    info!("Hotkey listener stopped");
}

fn register(manager: &GlobalHotKeyManager, shortcut: &Shortcut) -> Result<u32, String> {
    let (mods, code) = shortcut
        .to_global_hotkey()
        .ok_or_else(|| format!("Shortcut '{}' has no OS key mapping", shortcut))?;
    let hotkey = HotKey::new(Some(mods), code);
    let id = hotkey.id();
    manager
        .register(hotkey)
        .map_err(|e| format_hotkey_error(&e, shortcut))?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debouncer_accepts_first_press() {
        let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW);
        assert!(debouncer.accept(1, Instant::now()));
    }

    #[test]
    fn debouncer_drops_rapid_repeat() {
        let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW);
        let t0 = Instant::now();
        assert!(debouncer.accept(1, t0));
        assert!(!debouncer.accept(1, t0 + Duration::from_millis(100)));
        assert!(!debouncer.accept(1, t0 + Duration::from_millis(299)));
    }

    #[test]
    fn debouncer_accepts_after_window() {
        let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW);
        let t0 = Instant::now();
        assert!(debouncer.accept(1, t0));
        assert!(debouncer.accept(1, t0 + Duration::from_millis(301)));
    }

    #[test]
    fn debouncer_tracks_hotkeys_independently() {
        let mut debouncer = Debouncer::new(DEBOUNCE_WINDOW);
        let t0 = Instant::now();
        assert!(debouncer.accept(1, t0));
        assert!(debouncer.accept(2, t0 + Duration::from_millis(10)));
        assert!(!debouncer.accept(1, t0 + Duration::from_millis(10)));
    }

    #[test]
    fn actions_map_to_view_events() {
        assert_eq!(
            HotkeyAction::ToggleOverlay.event(),
            AppEvent::ToggleOverlay
        );
        assert_eq!(
            HotkeyAction::ToggleTagPanel.event(),
            AppEvent::ToggleTagPanel
        );
    }

    // Registering real hotkeys needs OS support; run with --features system-tests.
    #[cfg(feature = "system-tests")]
    mod system {
        use super::*;
        use crate::config::Config;

        #[test]
        fn service_starts_and_stops_cleanly() {
            let (tx, _rx) = std::sync::mpsc::channel();
            let ctx = egui::Context::default();
            let mut service = HotkeyService::start(&Config::default(), tx, ctx);
            std::thread::sleep(Duration::from_millis(50));
            service.stop();
        }
    }
}
