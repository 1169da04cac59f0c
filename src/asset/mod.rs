//! LaTeX asset kinds and their save/load lifecycle.
//!
//! The variant set is closed: [`Snippet`], [`Equation`], [`Table`],
//! [`RegressionTable`], [`Figure`], [`Image`], [`Plot`]. Each kind is its
//! own struct with kind-specific constructors and payload; the [`Asset`]
//! sum type puts them behind the one shared contract
//! {label, folder, file name, resolved path, save, load, preview}.
//!
//! Saving is gated by a shared precondition: with
//! `config.save_enabled` off it is a diagnosed no-op, with an absent
//! payload it is [`AssetError::EmptyPayload`]. Saving never creates
//! parent directories — that is `DocConfig::make_folders`' job — so a
//! missing folder surfaces as the IO error it is.

mod equation;
mod error;
mod figure;
mod image;
mod plot;
mod snippet;
mod table;

pub use equation::Equation;
pub use error::{AssetError, Result};
pub use figure::{Figure, Graphic};
pub use image::{Image, ImageSource};
pub use plot::{Plot, PlotBackend, PlotOptions, PlotSaveError};
pub use snippet::Snippet;
pub use table::{RegressionSource, RegressionTable, Table, TabularSource};

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DocConfig;
use crate::log;

// ============================================================================
// Asset sum type
// ============================================================================

/// Any exportable asset, behind the common contract.
///
/// Constructed via `From` on the variant structs; kind-specific
/// operations (`Equation::inline`, `Figure::img_rel_path`, ...) stay on
/// the variants themselves.
pub enum Asset {
    Snippet(Snippet),
    Equation(Equation),
    Table(Table),
    RegressionTable(RegressionTable),
    Figure(Figure),
    Image(Image),
    Plot(Plot),
}

impl Asset {
    /// The asset's label, if one has been assigned.
    ///
    /// Text kinds always carry a label; images and plots may be unlabeled
    /// until a wrapping figure propagates its own.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Snippet(a) => Some(a.label()),
            Self::Equation(a) => Some(a.label()),
            Self::Table(a) => Some(a.label()),
            Self::RegressionTable(a) => Some(a.label()),
            Self::Figure(a) => Some(a.label()),
            Self::Image(a) => a.label(),
            Self::Plot(a) => a.label(),
        }
    }

    /// The storage folder captured at construction time.
    pub fn folder(&self) -> &Path {
        match self {
            Self::Snippet(a) => a.folder(),
            Self::Equation(a) => a.folder(),
            Self::Table(a) => a.folder(),
            Self::RegressionTable(a) => a.folder(),
            Self::Figure(a) => a.folder(),
            Self::Image(a) => a.folder(),
            Self::Plot(a) => a.folder(),
        }
    }

    /// Kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Snippet(_) => "snippet",
            Self::Equation(_) => "equation",
            Self::Table(_) => "table",
            Self::RegressionTable(_) => "regression table",
            Self::Figure(_) => "figure",
            Self::Image(_) => "image",
            Self::Plot(_) => "plot",
        }
    }

    /// The file name this asset saves under.
    pub fn file_name(&self) -> Result<String> {
        match self {
            Self::Snippet(a) => Ok(a.file_name()),
            Self::Equation(a) => Ok(a.file_name()),
            Self::Table(a) => Ok(a.file_name()),
            Self::RegressionTable(a) => Ok(a.file_name()),
            Self::Figure(a) => Ok(a.file_name()),
            Self::Image(a) => a.file_name(),
            Self::Plot(a) => a.file_name(),
        }
    }

    /// Absolute target path, computed on demand so it observes the
    /// current document root.
    pub fn resolved_path(&self, config: &DocConfig) -> Result<PathBuf> {
        match self {
            Self::Snippet(a) => a.resolved_path(config),
            Self::Equation(a) => a.resolved_path(config),
            Self::Table(a) => a.resolved_path(config),
            Self::RegressionTable(a) => a.resolved_path(config),
            Self::Figure(a) => a.resolved_path(config),
            Self::Image(a) => a.resolved_path(config),
            Self::Plot(a) => a.resolved_path(config),
        }
    }

    /// Write the asset to its resolved path.
    pub fn save(&mut self, config: &DocConfig) -> Result<()> {
        match self {
            Self::Snippet(a) => a.save(config),
            Self::Equation(a) => a.save(config),
            Self::Table(a) => a.save(config),
            Self::RegressionTable(a) => a.save(config),
            Self::Figure(a) => a.save(config),
            Self::Image(a) => a.save(config),
            Self::Plot(a) => a.save(config),
        }
    }

    /// Read the asset's payload back from disk.
    ///
    /// Only snippets, equations, and sourced images support this; the
    /// other kinds fail with [`AssetError::LoadUnsupported`].
    pub fn load(&mut self, config: &DocConfig) -> Result<()> {
        let kind = self.kind();
        match self {
            Self::Snippet(a) => a.load(config),
            Self::Equation(a) => a.load(config),
            Self::Image(a) => a.load(config),
            Self::Table(_) | Self::RegressionTable(_) | Self::Figure(_) | Self::Plot(_) => {
                Err(AssetError::LoadUnsupported { kind })
            }
        }
    }

    /// Rich representation for a display front-end.
    pub fn preview(&self) -> Option<Preview<'_>> {
        match self {
            Self::Snippet(a) => a.tex().map(|t| Preview::Latex(t.to_string())),
            Self::Equation(a) => a.tex().map(|t| Preview::Latex(t.to_string())),
            Self::Table(a) => a.preview_html(),
            Self::RegressionTable(a) => a.preview_html(),
            Self::Figure(a) => a.preview(),
            Self::Image(a) => a.data().map(Preview::Bytes),
            Self::Plot(_) => None,
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Asset {
                fn from(asset: $variant) -> Self {
                    Self::$variant(asset)
                }
            }
        )*
    };
}

impl_from_variant!(Snippet, Equation, Table, RegressionTable, Figure, Image, Plot);

// ============================================================================
// Preview
// ============================================================================

/// What a display front-end gets when it asks an asset for a rich
/// representation. The crate only exposes these; rendering them is the
/// front-end's business.
pub enum Preview<'a> {
    /// LaTeX source (snippets, equations, figures).
    Latex(String),
    /// HTML rendered by a tabular collaborator.
    Html(String),
    /// Raw encoded image bytes.
    Bytes(&'a [u8]),
}

// ============================================================================
// shared save/load plumbing
// ============================================================================

/// The global persist gate. A disabled config makes every `save()` a
/// diagnosed no-op rather than an error.
pub(crate) fn persist_enabled(config: &DocConfig) -> bool {
    if config.save_enabled {
        true
    } else {
        log!("save"; "not saved because `config.save_enabled` is off");
        false
    }
}

pub(crate) fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| AssetError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| AssetError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

pub(crate) fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|e| AssetError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| AssetError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
