//! Application path management for portable and installed modes.
//!
//! ## Mode Detection
//!
//! - **Dev mode** (debug builds): a `config.yaml` in the working directory
//!   wins, with skins under `./skins`.
//! - **Portable mode**: a `.portable` marker next to the executable keeps
//!   the config and skins beside it.
//! - **Installed mode** (default): data lives in the platform data
//!   directory under `Touchpad Skin`.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Application name used for directories in installed mode
const APP_NAME: &str = "Touchpad Skin";

const CONFIG_FILE: &str = "config.yaml";
const EXAMPLE_CONFIG_FILE: &str = "config.example.yaml";
const SKINS_DIR: &str = "skins";

/// Where the configuration and skins live
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Path to the configuration file
    pub config: PathBuf,
    /// Directory holding one sub-directory per skin
    pub skins_dir: PathBuf,
    /// Whether running in portable mode (data next to exe)
    pub is_portable: bool,
}

impl AppPaths {
    /// Paths rooted at `base`
    pub fn in_dir(base: &Path, is_portable: bool) -> Self {
        Self {
            config: base.join(CONFIG_FILE),
            skins_dir: base.join(SKINS_DIR),
            is_portable,
        }
    }

    /// Detect the appropriate paths based on environment.
    ///
    /// Called before logging is initialized, so diagnostics go to stderr.
    pub fn detect() -> Self {
        let exe_dir = exe_dir();

        #[cfg(debug_assertions)]
        {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            if cwd.join(CONFIG_FILE).exists() {
                eprintln!("[paths] Running in DEV mode (config.yaml found in cwd: {})", cwd.display());
                return Self::in_dir(&cwd, true);
            }
        }

        if exe_dir.join(".portable").exists() {
            #[cfg(debug_assertions)]
            eprintln!("[paths] Running in PORTABLE mode (.portable marker found)");
            return Self::in_dir(&exe_dir, true);
        }

        let app_data = dirs::data_dir()
            .unwrap_or_else(|| {
                eprintln!("[paths] WARNING: dirs::data_dir() returned None, falling back to exe dir");
                exe_dir.clone()
            })
            .join(APP_NAME);

        #[cfg(debug_assertions)]
        eprintln!("[paths] Running in INSTALLED mode (data dir: {})", app_data.display());

        Self::in_dir(&app_data, false)
    }

    /// Get the base directory (for displaying in logs)
    pub fn base_dir(&self) -> PathBuf {
        self.config
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Ensure the skins directory exists.
    ///
    /// In installed mode, also seeds the config from `config.example.yaml`
    /// next to the executable when no config exists yet.
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        if !self.skins_dir.exists() {
            debug!("Creating skins directory: {}", self.skins_dir.display());
            std::fs::create_dir_all(&self.skins_dir).with_context(|| {
                format!("Failed to create skins directory: {}", self.skins_dir.display())
            })?;
        }

        if !self.is_portable && !self.config.exists() {
            let example = exe_dir().join(EXAMPLE_CONFIG_FILE);
            if example.exists() {
                info!("Copying example config to {}", self.config.display());
                std::fs::copy(&example, &self.config).with_context(|| {
                    format!(
                        "Failed to copy example config from {} to {}",
                        example.display(),
                        self.config.display()
                    )
                })?;
            } else {
                info!("No config found, defaults apply until {} is created", self.config.display());
            }
        }

        Ok(())
    }
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_paths_structure() {
        let paths = AppPaths::in_dir(Path::new("test"), true);

        assert!(paths.is_portable);
        assert_eq!(paths.config, PathBuf::from("test/config.yaml"));
        assert_eq!(paths.skins_dir, PathBuf::from("test/skins"));
        assert_eq!(paths.base_dir(), PathBuf::from("test"));
    }

    #[test]
    fn test_ensure_directories_creates_skins_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::in_dir(dir.path(), true);

        paths.ensure_directories().unwrap();
        assert!(paths.skins_dir.is_dir());
    }
}
