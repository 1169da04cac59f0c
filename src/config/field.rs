//! Typed references to configurable directory fields.
//!
//! Asset constructors accept a [`FolderSpec`]: either a literal path or a
//! reference to one of the [`DocConfig`] directory fields. References are
//! dereferenced exactly once, at construction time — an asset captures the
//! folder by value and is insulated from later config mutation.

use std::path::{Path, PathBuf};

use super::DocConfig;

/// Configurable directory fields of [`DocConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    DocRoot,
    EqDir,
    ImgDir,
    FigDir,
    TabDir,
    SnipDir,
}

impl ConfigField {
    /// Read the live value of this field.
    ///
    /// `DocRoot` yields `.` when the root is still unset, so an asset
    /// created early resolves against whatever root is assigned later.
    pub fn get(self, config: &DocConfig) -> PathBuf {
        match self {
            Self::DocRoot => config
                .doc_root
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
            Self::EqDir => config.eq_dir.clone(),
            Self::ImgDir => config.img_dir.clone(),
            Self::FigDir => config.fig_dir.clone(),
            Self::TabDir => config.tab_dir.clone(),
            Self::SnipDir => config.snip_dir.clone(),
        }
    }
}

/// A folder given either literally or as a config-field reference.
#[derive(Debug, Clone)]
pub enum FolderSpec {
    Field(ConfigField),
    Path(PathBuf),
}

impl FolderSpec {
    /// Dereference against the current configuration.
    ///
    /// Field references read the live field value; literal paths are
    /// returned unchanged. Callers capture the result once and never
    /// re-dereference.
    pub fn dereference(&self, config: &DocConfig) -> PathBuf {
        match self {
            Self::Field(field) => field.get(config),
            Self::Path(path) => path.clone(),
        }
    }
}

impl From<ConfigField> for FolderSpec {
    fn from(field: ConfigField) -> Self {
        Self::Field(field)
    }
}

impl From<PathBuf> for FolderSpec {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for FolderSpec {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for FolderSpec {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for FolderSpec {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}
