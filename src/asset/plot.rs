//! Plot assets rendered through an external backend.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::asset::{error::Result, persist_enabled, write_bytes, AssetError};
use crate::config::{ConfigField, DocConfig, FolderSpec};

/// Free-form save arguments passed through to the backend
/// (the core attaches no meaning to them).
pub type PlotOptions = BTreeMap<String, String>;

/// Errors a [`PlotBackend`] reports back.
#[derive(Debug, Error)]
pub enum PlotSaveError {
    /// The backend does not implement this protocol.
    #[error("unsupported by this backend")]
    Unsupported,

    #[error("backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Collaborator contract: a plotting object that can persist itself.
///
/// Backends implement at least one of the two protocols; both default to
/// [`PlotSaveError::Unsupported`] so a backend only overrides what it
/// has.
pub trait PlotBackend {
    /// Render the plot straight to `path`, honoring `options`.
    fn render_to_file(&self, path: &Path, options: &PlotOptions) -> Result<(), PlotSaveError> {
        let _ = (path, options);
        Err(PlotSaveError::Unsupported)
    }

    /// Encode the plot as image bytes in `format`.
    fn encode(&self, format: &str) -> Result<Vec<u8>, PlotSaveError> {
        let _ = format;
        Err(PlotSaveError::Unsupported)
    }
}

/// A write-only plot asset saved as `<label>.<format>`.
///
/// Tries the backend's direct file rendering first, then falls back to
/// encode-and-write. Plots cannot be loaded.
pub struct Plot {
    label: Option<String>,
    folder: PathBuf,
    format: String,
    options: PlotOptions,
    backend: Box<dyn PlotBackend>,
}

impl Plot {
    /// Wrap a backend, unlabeled, in the configured image folder, with
    /// the configured default plot format.
    pub fn new(backend: impl PlotBackend + 'static, config: &DocConfig) -> Self {
        Self {
            label: None,
            folder: FolderSpec::from(ConfigField::ImgDir).dereference(config),
            format: config.plot_format.clone(),
            options: PlotOptions::new(),
            backend: Box::new(backend),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_options(mut self, options: PlotOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_folder(mut self, folder: impl Into<FolderSpec>, config: &DocConfig) -> Self {
        self.folder = folder.into().dereference(config);
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Assign the label if none is set yet. Used by figure label
    /// propagation; an existing label is never overwritten.
    pub(crate) fn label_if_unset(&mut self, label: &str) {
        if self.label.is_none() {
            self.label = Some(label.to_string());
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    fn label_or_kind(&self) -> String {
        self.label.clone().unwrap_or_else(|| "plot".to_string())
    }

    pub fn file_name(&self) -> Result<String> {
        let label = self
            .label
            .as_deref()
            .ok_or(AssetError::Unlabeled { kind: "plot" })?;
        Ok(format!("{label}.{}", self.format))
    }

    pub fn resolved_path(&self, config: &DocConfig) -> Result<PathBuf> {
        Ok(config.resolve(&self.folder)?.join(self.file_name()?))
    }

    pub fn save(&self, config: &DocConfig) -> Result<()> {
        if !persist_enabled(config) {
            return Ok(());
        }
        let path = self.resolved_path(config)?;

        match self.backend.render_to_file(&path, &self.options) {
            Ok(()) => return Ok(()),
            Err(PlotSaveError::Unsupported) => {}
            Err(source) => {
                return Err(AssetError::Backend {
                    label: self.label_or_kind(),
                    source,
                });
            }
        }

        match self.backend.encode(&self.format) {
            Ok(bytes) => write_bytes(&path, &bytes),
            Err(PlotSaveError::Unsupported) => Err(AssetError::NoSaveCapability {
                label: self.label_or_kind(),
            }),
            Err(source) => Err(AssetError::Backend {
                label: self.label_or_kind(),
                source,
            }),
        }
    }

    /// Plots are write-only.
    pub fn load(&mut self, _config: &DocConfig) -> Result<()> {
        Err(AssetError::LoadUnsupported { kind: "plot" })
    }
}
