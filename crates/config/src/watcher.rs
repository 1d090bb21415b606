use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Editors often write a file in several bursts; changes closer together
/// than this collapse into one reload.
const SETTLE: Duration = Duration::from_millis(250);

/// How often a missing config directory is checked for.
const DIR_POLL: Duration = Duration::from_secs(1);

/// Sends `()` after every settled change to the config file.
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by writing a temp file and renaming it over the original are
/// still picked up. Dropping the handle stops the watch task.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// use tread_config::ConfigWatcher;
/// let (_watcher, mut changes) = ConfigWatcher::spawn("/home/user/.config/treadboard/treadboard.toml");
/// while changes.recv().await.is_some() {
///     println!("treadboard.toml changed");
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    task: JoinHandle<()>,
}

impl ConfigWatcher {
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(watch_loop(path.as_ref().to_path_buf(), tx));
        (Self { task }, rx)
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Whether a notify event touches the watched file.
fn concerns(event: &notify::Event, path: &Path) -> bool {
    use notify::EventKind::{Create, Modify};

    let file_name = path.file_name();
    matches!(event.kind, Modify(_) | Create(_))
        && event
            .paths
            .iter()
            .any(|p| p == path || (file_name.is_some() && p.file_name() == file_name))
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<()>) {
    use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let handler = move |res: notify::Result<Event>| {
        // Full channel: a reload is already pending.
        let _ = sync_tx.try_send(res);
    };
    let mut watcher = match RecommendedWatcher::new(handler, Config::default()) {
        Ok(w) => w,
        Err(e) => {
            error!("cannot watch config: {e}");
            return;
        }
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let appeared = !dir.is_dir();
    if appeared {
        info!(
            "config directory '{}' does not exist; live reload starts once it is created",
            dir.display()
        );
        let mut poll = tokio::time::interval(DIR_POLL);
        while !dir.is_dir() {
            poll.tick().await;
        }
    }

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        error!("cannot watch '{}', live reload disabled: {e}", dir.display());
        return;
    }

    // The file may have been written before the watch was in place.
    if appeared && path.exists() && tx.send(()).await.is_err() {
        return;
    }

    info!(path = %path.display(), "watching config");

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) if concerns(&e, &path) => {
                // Drain the burst before notifying.
                while let Ok(Some(_)) = tokio::time::timeout(SETTLE, sync_rx.recv()).await {}
                debug!("config change settled");
                if tx.send(()).await.is_err() {
                    break; // receiver dropped
                }
            }
            Ok(_) => {}
            Err(e) => warn!("config watch error: {e}"),
        }
    }
}
