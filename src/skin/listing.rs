//! Listing of installed skins (`touchpad_list.ini`)

use std::path::Path;

use anyhow::{Context, Result};
use tracing::error;

/// Skin names, one per non-empty line of the listing file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkinListing {
    pub names: Vec<String>,
}

impl SkinListing {
    pub fn parse(text: &str) -> Self {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read skin listing: {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    /// Read the listing, logging and returning an empty one on failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::read(path).unwrap_or_else(|e| {
            error!("{:#}", e);
            Self::default()
        })
    }

    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
