//! Document configuration and path resolution.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError
//! ├── field      # ConfigField / FolderSpec typed indirection
//! └── mod.rs     # DocConfig (this file)
//! ```
//!
//! [`DocConfig`] is the process-lifetime configuration object: it owns the
//! document root, the per-kind subfolders, the cross-reference prefixes,
//! the format templates, and the behavior flags. One instance is
//! constructed at startup and threaded by reference into every asset
//! constructor and save/load call — there is no hidden global.

mod error;
mod field;

pub use error::ConfigError;
pub use field::{ConfigField, FolderSpec};

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::template::{DEFAULT_EQ_TEMPLATE, DEFAULT_FIG_TEMPLATE, DEFAULT_TAB_TEMPLATE};
use crate::utils::path::{normalize_path, relative_between};
use crate::utils::tree::tree;
use crate::{debug, log};

// ============================================================================
// root configuration
// ============================================================================

/// Document-tree configuration, loadable from `texport.toml`.
///
/// All subfolder paths may be absolute or relative to [`doc_root`]
/// (`doc_root` itself may be relative to the current directory). Fields
/// are public; the [`set_doc_root`]/[`set_dir`] setters additionally run
/// the flag-gated existence diagnostic that plain field mutation skips.
///
/// [`doc_root`]: DocConfig::doc_root
/// [`set_doc_root`]: DocConfig::set_doc_root
/// [`set_dir`]: DocConfig::set_dir
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocConfig {
    /// Document root; `None` until assigned.
    pub doc_root: Option<PathBuf>,

    /// Equation folder.
    pub eq_dir: PathBuf,
    /// Image folder (images and rendered plots).
    pub img_dir: PathBuf,
    /// Figure folder (`.tex` fragments referencing images).
    pub fig_dir: PathBuf,
    /// Table folder.
    pub tab_dir: PathBuf,
    /// Snippet folder; defaults to the document root itself.
    pub snip_dir: PathBuf,

    /// Cross-reference prefix for equations (`\label{eq:...}`).
    pub eq_prefix: String,
    /// Cross-reference prefix for figures.
    pub fig_prefix: String,
    /// Cross-reference prefix for tables.
    pub tab_prefix: String,

    /// Equation template (`{label}`, `{block}`, `{eq}`).
    pub eq_template: String,
    /// Figure template (`{label}`, `{incl_args}`, `{img_path}`, `{caption}`).
    pub fig_template: String,
    /// Table template (`{label}`, `{formatting}`, `{table}`, `{caption}`).
    pub tab_template: String,

    /// Warn when an assigned path is not an existing directory.
    pub check_dirs: bool,
    /// Global persist switch; `save()` is a diagnosed no-op when off.
    pub save_enabled: bool,
    /// Save assets immediately when constructed with a payload.
    pub auto_save: bool,
    /// Load assets immediately when constructed without a payload.
    pub auto_load: bool,
    /// Terminate snippet output with `%` to suppress trailing whitespace
    /// at the `\input` site.
    pub percent_terminate: bool,

    /// Default file extension for rendered plots.
    pub plot_format: String,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            doc_root: None,
            eq_dir: PathBuf::from("./eq"),
            img_dir: PathBuf::from("./img"),
            fig_dir: PathBuf::from("./fig"),
            tab_dir: PathBuf::from("./tab"),
            snip_dir: PathBuf::from("."),
            eq_prefix: "eq:".to_string(),
            fig_prefix: "fig:".to_string(),
            tab_prefix: "tab:".to_string(),
            eq_template: DEFAULT_EQ_TEMPLATE.to_string(),
            fig_template: DEFAULT_FIG_TEMPLATE.to_string(),
            tab_template: DEFAULT_TAB_TEMPLATE.to_string(),
            check_dirs: true,
            save_enabled: true,
            auto_save: false,
            auto_load: false,
            percent_terminate: false,
            plot_format: "pdf".to_string(),
        }
    }
}

impl DocConfig {
    /// Create a configuration with default folders and templates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file.
    ///
    /// Missing fields fall back to their defaults, so a partial file like
    /// `doc_root = "~/paper"` is enough to get started.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Toml`] if it does not parse.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let mut config: Self = toml::from_str(&raw)?;
        config.doc_root = config.doc_root.take().map(expand);
        Ok(config)
    }

    // ------------------------------------------------------------------
    // path resolution
    // ------------------------------------------------------------------

    /// Absolute form of the document root.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DocRootUnset`] if no root has been assigned.
    pub fn root_abs(&self) -> Result<PathBuf, ConfigError> {
        match &self.doc_root {
            Some(root) => Ok(normalize_path(root)),
            None => Err(ConfigError::DocRootUnset(PathBuf::from("."))),
        }
    }

    /// Resolve `path` to absolute form.
    ///
    /// Absolute paths are returned as-is. Relative paths require the
    /// document root and resolve against it.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DocRootUnset`] when `path` is relative and no root
    /// has been assigned — a fatal configuration error, not a recoverable
    /// default.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
        let path = path.as_ref();
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        let root = self
            .doc_root
            .as_ref()
            .ok_or_else(|| ConfigError::DocRootUnset(path.to_path_buf()))?;
        Ok(normalize_path(&root.join(path)))
    }

    /// The per-kind asset folders, as configured (not resolved).
    pub fn asset_dirs(&self) -> [&PathBuf; 5] {
        [
            &self.eq_dir,
            &self.img_dir,
            &self.fig_dir,
            &self.tab_dir,
            &self.snip_dir,
        ]
    }

    /// The document root plus every asset folder, resolved and
    /// deduplicated (root first, then in declaration order).
    pub fn all_dirs(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let mut dirs = vec![self.root_abs()?];
        for dir in self.asset_dirs() {
            let resolved = self.resolve(dir)?;
            if !dirs.contains(&resolved) {
                dirs.push(resolved);
            }
        }
        Ok(dirs)
    }

    /// Create the folder structure implied by this config.
    ///
    /// Idempotent: pre-existing directories are left untouched and never
    /// overwritten, so calling this twice is a no-op the second time.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DocRootUnset`] if the root is unassigned;
    /// [`ConfigError::Io`] if a directory cannot be created.
    pub fn make_folders(&self) -> Result<(), ConfigError> {
        for dir in self.all_dirs()? {
            fs::create_dir_all(&dir).map_err(|e| ConfigError::Io(dir.clone(), e))?;
            debug!("config"; "created {}", dir.display());
        }
        Ok(())
    }

    /// Relative path from the figure folder to the image folder, the hop
    /// a figure fragment takes to `\includegraphics` its image.
    pub fn fig_to_img(&self) -> Result<PathBuf, ConfigError> {
        Ok(relative_between(
            &self.resolve(&self.img_dir)?,
            &self.resolve(&self.fig_dir)?,
        ))
    }

    // ------------------------------------------------------------------
    // checked assignment
    // ------------------------------------------------------------------

    /// Assign the document root.
    ///
    /// `~` is expanded; with [`check_dirs`](DocConfig::check_dirs) on, a
    /// non-directory target emits a warning without blocking the
    /// assignment.
    pub fn set_doc_root(&mut self, path: impl Into<PathBuf>) {
        let path = expand(path.into());
        if self.check_dirs {
            warn_if_not_dir(&normalize_path(&path));
        }
        self.doc_root = Some(path);
    }

    /// Assign one of the directory fields.
    ///
    /// Subfolders are checked in resolved form when the root allows it;
    /// the diagnostic never blocks the assignment.
    pub fn set_dir(&mut self, field: ConfigField, path: impl Into<PathBuf>) {
        if field == ConfigField::DocRoot {
            return self.set_doc_root(path);
        }
        let path = expand(path.into());
        if self.check_dirs {
            let probe = self.resolve(&path).unwrap_or_else(|_| path.clone());
            warn_if_not_dir(&probe);
        }
        match field {
            ConfigField::DocRoot => unreachable!("handled above"),
            ConfigField::EqDir => self.eq_dir = path,
            ConfigField::ImgDir => self.img_dir = path,
            ConfigField::FigDir => self.fig_dir = path,
            ConfigField::TabDir => self.tab_dir = path,
            ConfigField::SnipDir => self.snip_dir = path,
        }
    }

    // ------------------------------------------------------------------
    // listing
    // ------------------------------------------------------------------

    /// A visual tree of the document root's contents.
    ///
    /// First line is the root as assigned, followed by one line per entry
    /// in lexicographic-sibling, depth-first order.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DocRootUnset`] if the root is unassigned;
    /// [`ConfigError::Io`] if a directory cannot be read.
    pub fn file_tree(&self) -> Result<String, ConfigError> {
        let Some(raw) = &self.doc_root else {
            return Err(ConfigError::DocRootUnset(PathBuf::from(".")));
        };
        let abs = normalize_path(raw);
        let mut lines = vec![raw.display().to_string()];
        lines.extend(tree(&abs).map_err(|e| ConfigError::Io(abs.clone(), e))?);
        Ok(lines.join("\n"))
    }
}

/// Expand a leading `~` in user-supplied paths.
fn expand(raw: PathBuf) -> PathBuf {
    match raw.to_str() {
        Some(s) if s.starts_with('~') => PathBuf::from(shellexpand::tilde(s).into_owned()),
        _ => raw,
    }
}

fn warn_if_not_dir(path: &Path) {
    if !path.is_dir() {
        log!(
            "warning";
            "`{}` is not a directory, consider running `make_folders()`",
            path.display()
        );
    }
}

// ============================================================================
// tests
// ============================================================================
