//! Asset error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::asset::plot::PlotSaveError;
use crate::config::ConfigError;

/// Errors raised while saving or loading assets.
///
/// Everything here is fatal and propagates immediately; non-fatal
/// conditions (skipped saves, missing directories on assignment) go
/// through the logger instead.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Path resolution failed (document root unset).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Save was attempted with no payload to serialize.
    #[error("there is nothing to be saved for `{label}` yet")]
    EmptyPayload { label: String },

    /// `load()` on a kind that can only be saved.
    #[error("{kind} assets can currently only be saved, not loaded")]
    LoadUnsupported { kind: &'static str },

    /// The plot backend implements neither save protocol.
    #[error("the plot backend for `{label}` supports neither file rendering nor encoding")]
    NoSaveCapability { label: String },

    /// An image or plot was saved before a label was assigned or
    /// propagated, so no file name can be formed.
    #[error("{kind} asset has no label yet; set one or save it through a figure")]
    Unlabeled { kind: &'static str },

    /// No extension was given and none could be inferred from the data.
    #[error("could not infer an image format for `{label}`; pass an explicit extension")]
    UnknownImageFormat { label: String },

    /// The plot backend failed while rendering or encoding.
    #[error("plot backend failed for `{label}`")]
    Backend {
        label: String,
        #[source]
        source: PlotSaveError,
    },

    /// Fetching a remote image failed.
    #[error("failed to fetch `{url}`")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("IO error at `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = AssetError> = std::result::Result<T, E>;
