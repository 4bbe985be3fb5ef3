//! Errors raised while loading a skin

use thiserror::Error;

/// Skin loading errors
#[derive(Debug, Error)]
pub enum SkinError {
    /// The skin's `pad.ini` could not be read
    #[error("failed to read configuration for skin '{skin}'")]
    Config {
        skin: String,
        #[source]
        source: std::io::Error,
    },

    /// The skin declares more entries than the pad supports
    #[error("skin '{skin}' declares more than {limit} {kind}")]
    CapacityExceeded {
        skin: String,
        kind: &'static str,
        limit: usize,
    },
}
