//! File watcher: exports once on startup, then re-exports when the post changes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands;
use crate::config::Config;
use crate::diagnostics;
use crate::error;
use crate::types::Platform;

/// Debounce delay between filesystem events and re-export.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that signals on the channel whenever `target`
/// is created, modified or removed.
///
/// # Errors
///
/// Returns `Error::WatcherFailed` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
    target: PathBuf,
) -> Result<notify::RecommendedWatcher, error::Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_) | notify::EventKind::Modify(_) | notify::EventKind::Remove(_)
            )
            && event.paths.iter().any(|p| return p.file_name() == target.file_name())
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| return error::Error::WatcherFailed { reason: e.to_string() });
}

/// Entry point for the watch command. Runs until the watcher shuts down.
///
/// A failed re-export is printed and the watch continues.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the post does not exist, or
/// `Error::WatcherFailed` if the watcher cannot be set up.
pub async fn run(file: &Path, platform: Platform, out: &Path, config: &Config) -> Result<(), error::Error> {
    if !file.exists() {
        return Err(error::Error::FileNotFound { path: file.to_path_buf() });
    }

    eprintln!("watch: initial export");
    run_export(file, platform, out, config).await;

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx, file.to_path_buf())?;
    let dir = file.parent().filter(|p| return !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .map_err(|e| return error::Error::WatcherFailed { reason: e.to_string() })?;

    eprintln!("watch: monitoring {}, press Ctrl+C to stop", file.display());

    while tokio::task::block_in_place(|| return wait_for_change(&rx)) {
        eprintln!("watch: change detected, re-exporting...");
        run_export(file, platform, out, config).await;
    }

    return Ok(());
}

/// Export once and report the outcome on stderr.
async fn run_export(file: &Path, platform: Platform, out: &Path, config: &Config) {
    match commands::export_to_file(file, platform, out, config).await {
        Err(e) => diagnostics::print_error(&e),
        Ok(()) => eprintln!("watch: wrote {}", out.display()),
    }
    return;
}

/// Block until a change arrives, then drain events for the debounce window.
/// Returns false once the channel is closed.
fn wait_for_change(rx: &crossbeam_channel::Receiver<()>) -> bool {
    if rx.recv().is_err() {
        return false;
    }
    let debounce = Duration::from_millis(DEBOUNCE_MS);
    while rx.recv_timeout(debounce).is_ok() {}
    return true;
}
