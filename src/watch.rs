use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use strata_runtime::ChunkRuntime;
use strata_world::{World, load_config_from_path};

use crate::report;

/// Watches `path` on a background thread; every file event becomes one `()`.
pub fn spawn_config_watcher(path: PathBuf) -> Receiver<()> {
    let (tx, rx) = mpsc::channel::<()>();
    std::thread::spawn(move || {
        use notify::{EventKind, RecursiveMode, Watcher};
        match notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                match event.kind {
                    EventKind::Modify(_)
                    | EventKind::Create(_)
                    | EventKind::Remove(_)
                    | EventKind::Any => {
                        let _ = tx.send(());
                    }
                    _ => {}
                }
            }
        }) {
            Ok(mut watcher) => {
                if let Err(e) = watcher.watch(&path, RecursiveMode::NonRecursive) {
                    log::warn!("cannot watch {}: {}", path.display(), e);
                    return;
                }
                loop {
                    std::thread::sleep(Duration::from_secs(3600));
                }
            }
            Err(e) => log::warn!("config watcher unavailable: {}", e),
        }
    });
    rx
}

/// Reloads the config after a burst of file events and regenerates.
/// Returns false once the watcher thread is gone.
pub fn wait_and_reload(
    events: &Receiver<()>,
    path: &Path,
    world: &World,
    runtime: &mut ChunkRuntime,
) -> bool {
    if events.recv().is_err() {
        return false;
    }
    // Editors emit several events per save.
    std::thread::sleep(Duration::from_millis(100));
    for _ in events.try_iter() {}

    if !path.exists() {
        log::warn!("world config missing: {}", path.display());
        return true;
    }
    match load_config_from_path(path) {
        Ok(cfg) => match world.update_config(cfg) {
            Ok(rev) => {
                log::info!("world config reloaded from {} (rev {})", path.display(), rev);
                match runtime.regenerate(world) {
                    Ok(chunks) => report(&chunks),
                    Err(e) => log::warn!("regenerate failed: {}", e),
                }
            }
            Err(e) => log::warn!("world config rejected ({}): {}", path.display(), e),
        },
        Err(e) => {
            log::warn!("world config reload failed ({}): {}", path.display(), e);
        }
    }
    true
}
