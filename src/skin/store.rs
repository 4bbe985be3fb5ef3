//! Published skin shared between the loader and the per-frame resolver
//!
//! One writer (startup, or the file watcher on reload) swaps complete skins
//! in; readers take an `Arc` snapshot once per frame. A skin is never
//! visible before it is fully built.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use super::{MaskSource, SectionReader, Skin, SkinError, SkinLoader};

#[derive(Debug)]
pub struct SkinStore {
    current: RwLock<Arc<Skin>>,
}

impl Default for SkinStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SkinStore {
    /// Store holding an uninitialized (inert) skin until the first load
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Skin::default())),
        }
    }

    /// Snapshot of the published skin
    pub fn current(&self) -> Arc<Skin> {
        self.current.read().clone()
    }

    pub fn publish(&self, skin: Skin) -> Arc<Skin> {
        let skin = Arc::new(skin);
        *self.current.write() = skin.clone();
        skin
    }

    /// Load a skin and publish it
    ///
    /// An unreadable configuration publishes an empty skin so the pad goes
    /// quiet instead of failing. A skin over capacity is rejected and the
    /// previously published skin stays active.
    pub fn reload<R, M>(
        &self,
        loader: &SkinLoader,
        skin: Option<&str>,
        sections: &R,
        masks: &M,
    ) -> Result<Arc<Skin>, SkinError>
    where
        R: SectionReader + ?Sized,
        M: MaskSource + ?Sized,
    {
        match loader.load(skin, sections, masks) {
            Ok(loaded) => {
                info!(
                    "Skin '{}' active ({} regions, analog: {})",
                    skin.unwrap_or("<none>"),
                    loaded.regions.len(),
                    loaded.analog.is_some()
                );
                Ok(self.publish(loaded))
            }
            Err(e @ SkinError::Config { .. }) => {
                warn!("{:#}, touchpad disabled", anyhow::Error::from(e));
                Ok(self.publish(Skin::empty(loader.pad())))
            }
            Err(e) => {
                warn!("Skin rejected, keeping previous skin: {}", e);
                Err(e)
            }
        }
    }
}
