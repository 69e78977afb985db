//! Settings directory watcher.
//!
//! Watches ~/.climpt/ for edits to theme.json and config.json and emits
//! [`ReloadEvent`]s to the UI thread, debounced by 500 ms so editors that
//! write in bursts (create + several modifies) produce one reload. The
//! thread re-checks its stop flag on a short timeout, so shutdown is a flag
//! flip plus a join - never a timed kill.

use eframe::egui;
use notify::{recommended_watcher, Event, EventKind, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Which settings document changed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadEvent {
    Theme,
    Config,
}

/// Debounce window for file-change bursts.
const DEBOUNCE: Duration = Duration::from_millis(500);

/// How often the watch loop re-checks its stop flag and pending deadlines.
const TICK: Duration = Duration::from_millis(100);

/// Map a filesystem event to the settings document it affects, if any.
/// Only create and modify events count; removals are ignored (a missing
/// file just means defaults on the next explicit load).
fn relevant_reload(event: &Event) -> Option<ReloadEvent> {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return None;
    }
    for path in &event.paths {
        match path.file_name().and_then(|name| name.to_str()) {
            Some("theme.json") => return Some(ReloadEvent::Theme),
            Some("config.json") => return Some(ReloadEvent::Config),
            _ => {}
        }
    }
    None
}

/// Watches the settings directory and reports debounced reload events.
pub struct SettingsWatcher {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SettingsWatcher {
    /// Start watching `dir`. Returns the watcher handle and the receiver the
    /// UI drains each frame. The egui context is woken whenever an event is
    /// emitted so reloads apply even while the app is idle.
    pub fn start(dir: PathBuf, ctx: egui::Context) -> (Self, Receiver<ReloadEvent>) {
        let (tx, rx) = channel();
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let thread = std::thread::spawn(move || {
            if let Err(e) = watch_loop(dir, tx, ctx, flag) {
                warn!(error = %e, "Settings watcher error");
            }
        });

        (
            SettingsWatcher {
                running,
                thread: Some(thread),
            },
            rx,
        )
    }

    /// Stop the watcher and join its thread.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("Settings watcher thread panicked");
            }
        }
    }
}

impl Drop for SettingsWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn watch_loop(
    dir: PathBuf,
    tx: Sender<ReloadEvent>,
    ctx: egui::Context,
    running: Arc<AtomicBool>,
) -> notify::Result<()> {
    std::fs::create_dir_all(&dir).ok();

    let (watch_tx, watch_rx) = channel();
    let mut watcher = recommended_watcher(move |res: notify::Result<Event>| {
        let _ = watch_tx.send(res);
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    info!(path = %dir.display(), "Settings watcher started");

    // Deadline per document; an event (re)arms it, expiry emits one reload.
    let mut theme_due: Option<Instant> = None;
    let mut config_due: Option<Instant> = None;

    while running.load(Ordering::SeqCst) {
        match watch_rx.recv_timeout(TICK) {
            Ok(Ok(event)) => match relevant_reload(&event) {
                Some(ReloadEvent::Theme) => {
                    theme_due.get_or_insert(Instant::now() + DEBOUNCE);
                }
                Some(ReloadEvent::Config) => {
                    config_due.get_or_insert(Instant::now() + DEBOUNCE);
                }
                None => {}
            },
            Ok(Err(e)) => {
                warn!(error = %e, "File watcher error");
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }

        let now = Instant::now();
        for (due, event) in [
            (&mut theme_due, ReloadEvent::Theme),
            (&mut config_due, ReloadEvent::Config),
        ] {
            if due.is_some_and(|deadline| deadline <= now) {
                *due = None;
                info!(?event, "Settings file changed, emitting reload");
                if tx.send(event).is_err() {
                    // UI side is gone; stop watching.
                    return Ok(());
                }
                ctx.request_repaint();
            }
        }
    }

    info!("Settings watcher stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    fn event(kind: EventKind, file: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(format!("/tmp/.climpt/{}", file)))
    }

    #[test]
    fn theme_modify_maps_to_theme_reload() {
        let ev = event(EventKind::Modify(ModifyKind::Any), "theme.json");
        assert_eq!(relevant_reload(&ev), Some(ReloadEvent::Theme));
    }

    #[test]
    fn config_create_maps_to_config_reload() {
        let ev = event(EventKind::Create(CreateKind::File), "config.json");
        assert_eq!(relevant_reload(&ev), Some(ReloadEvent::Config));
    }

    #[test]
    fn unrelated_files_are_ignored() {
        let ev = event(EventKind::Modify(ModifyKind::Any), "prompts.json");
        assert_eq!(relevant_reload(&ev), None);
        let ev = event(EventKind::Modify(ModifyKind::Any), "notes.txt");
        assert_eq!(relevant_reload(&ev), None);
    }

    #[test]
    fn removals_are_ignored() {
        let ev = event(EventKind::Remove(RemoveKind::File), "theme.json");
        assert_eq!(relevant_reload(&ev), None);
    }

    // Exercises a real filesystem watcher; run with --features system-tests.
    #[cfg(feature = "system-tests")]
    mod system {
        use super::*;

        #[test]
        fn emits_one_debounced_reload_for_a_burst_of_writes() {
            let dir = tempfile::tempdir().unwrap();
            let ctx = egui::Context::default();
            let (mut watcher, rx) = SettingsWatcher::start(dir.path().to_path_buf(), ctx);

            // Give the watcher a moment to arm before writing.
            std::thread::sleep(Duration::from_millis(200));
            let path = dir.path().join("theme.json");
            for _ in 0..3 {
                std::fs::write(&path, r##"{"accent": "#ff0000"}"##).unwrap();
                std::thread::sleep(Duration::from_millis(50));
            }

            let first = rx.recv_timeout(Duration::from_secs(3)).unwrap();
            assert_eq!(first, ReloadEvent::Theme);
            // The burst collapsed into a single event.
            assert!(rx.recv_timeout(Duration::from_millis(700)).is_err());

            watcher.stop();
        }
    }
}
