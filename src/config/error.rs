//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A relative path was resolved before the document root was assigned.
    ///
    /// This is fatal by contract: there is no sensible default root to
    /// fall back to.
    #[error(
        "document root is not set; assign `config.doc_root` before resolving `{}`",
        .0.display()
    )]
    DocRootUnset(PathBuf),

    #[error("IO error at `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),
}
