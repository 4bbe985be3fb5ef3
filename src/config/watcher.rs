//! Skin file watcher for hot-reload support

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::skin::{Skin, SkinDirectory, SkinLoader, SkinStore};

/// Delay between a file event and the reload, so writes can settle
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Orders reloads triggered by a burst of file events
///
/// Each event takes a new generation. A reload only runs if its generation
/// is still the latest once it holds the lock, so an older reload never
/// publishes after a newer one.
#[derive(Debug, Default)]
struct ReloadGate {
    generation: AtomicU64,
    lock: Mutex<()>,
}

impl ReloadGate {
    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Run `reload` unless a newer event superseded `generation`
    fn run<T>(&self, generation: u64, reload: impl FnOnce() -> T) -> Option<T> {
        let _guard = self.lock.lock();
        self.is_current(generation).then(reload)
    }
}

/// Watches the active skin's directory and republishes the skin on change
pub struct SkinWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<Arc<Skin>>,
}

impl SkinWatcher {
    /// Start watching `skin` inside `skins`
    ///
    /// Every modification of `pad.ini` or a mask reloads the skin through
    /// `store`. Reloads that are rejected keep the previous skin published.
    pub fn new(
        skins: SkinDirectory,
        skin: String,
        loader: SkinLoader,
        store: Arc<SkinStore>,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::channel(10);
        let skin_dir = skins.skin_dir(&skin);

        // notify callbacks run on their own OS thread, outside the runtime
        let runtime_handle = tokio::runtime::Handle::current();
        let gate = Arc::new(ReloadGate::default());

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        return;
                    }
                    debug!("Skin file changed: {:?}", event.paths);

                    let skins = skins.clone();
                    let skin = skin.clone();
                    let store = store.clone();
                    let tx = tx.clone();
                    let gate = gate.clone();
                    let generation = gate.begin();

                    runtime_handle.spawn(async move {
                        tokio::time::sleep(DEBOUNCE).await;
                        if !gate.is_current(generation) {
                            return;
                        }

                        let reloaded = tokio::task::spawn_blocking(move || {
                            gate.run(generation, || {
                                store.reload(&loader, Some(skin.as_str()), &skins, &skins)
                            })
                        })
                        .await;

                        match reloaded {
                            Ok(None) => {
                                debug!("Skin reload {} superseded by a newer change", generation);
                            }
                            Ok(Some(Ok(published))) => {
                                info!("Skin reloaded successfully");
                                if let Err(e) = tx.send(published).await {
                                    error!("Failed to send skin update: {}", e);
                                }
                            }
                            Ok(Some(Err(e))) => {
                                warn!("Failed to reload skin (keeping old skin): {}", e);
                            }
                            Err(e) => {
                                error!("Skin reload task failed: {}", e);
                            }
                        }
                    });
                }
                Err(e) => {
                    error!("Watch error: {}", e);
                }
            }
        })?;

        watcher
            .watch(&skin_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch skin directory: {}", skin_dir.display()))?;

        info!("Skin watcher started for: {}", skin_dir.display());

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Wait for the next published skin
    /// Returns None if the watcher has been closed
    pub async fn next_skin(&mut self) -> Option<Arc<Skin>> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_skin_watcher_reloads() -> Result<()> {
        let root = TempDir::new()?;
        let skin_dir = root.path().join("classic");
        fs::create_dir(&skin_dir)?;
        fs::write(skin_dir.join("pad.ini"), "[Buttons]\ninfo=buttons\nx=50\ny=50\n")?;
        RgbImage::new(20, 20).save(skin_dir.join("Buttons.bmp"))?;
        RgbImage::new(20, 20).save(skin_dir.join("Start.bmp"))?;

        let skins = SkinDirectory::new(root.path());
        let loader = SkinLoader::default();
        let store = Arc::new(SkinStore::new());
        store.reload(&loader, Some("classic"), &skins, &skins)?;
        assert_eq!(store.current().regions.len(), 1);

        let mut watcher = SkinWatcher::new(skins, "classic".to_string(), loader, store.clone())?;

        tokio::time::sleep(Duration::from_millis(100)).await;
        fs::write(
            skin_dir.join("pad.ini"),
            "[Buttons]\ninfo=buttons\nx=50\ny=50\n\n[Start]\ninfo=buttons\nx=10\ny=10\n",
        )?;

        let skin = tokio::time::timeout(Duration::from_secs(2), watcher.next_skin())
            .await?
            .expect("watcher closed");

        assert_eq!(skin.regions.len(), 2);
        assert_eq!(store.current().regions.len(), 2);

        Ok(())
    }

    #[test]
    fn test_superseded_reload_is_skipped() {
        let gate = ReloadGate::default();
        let first = gate.begin();
        let second = gate.begin();

        assert_eq!(gate.run(first, || "stale"), None);
        assert_eq!(gate.run(second, || "fresh"), Some("fresh"));

        let third = gate.begin();
        assert!(!gate.is_current(second));
        assert_eq!(gate.run(third, || 3), Some(3));
    }
}
