//! texport - create, preview and export LaTeX assets (equations,
//! figures, tables, snippets) into a document tree.
//!
//! ## Architecture
//!
//! Two layers, config first:
//!
//! - [`DocConfig`]: the process-lifetime configuration — document root,
//!   per-kind subfolders, cross-reference prefixes, format templates,
//!   behavior flags. Threaded explicitly by reference into every
//!   constructor and save/load call.
//! - The asset model: a closed set of kinds ([`Snippet`], [`Equation`],
//!   [`Table`], [`RegressionTable`], [`Figure`], [`Image`], [`Plot`])
//!   behind the [`Asset`] sum type, each resolving its storage folder
//!   through the config and serializing through the configured
//!   templates.
//!
//! External engines stay external: tabular data, regression results and
//! plotting backends plug in through the [`TabularSource`],
//! [`RegressionSource`] and [`PlotBackend`] traits.
//!
//! ## Example
//!
//! ```no_run
//! use texport::{DocConfig, Equation};
//!
//! # fn main() -> Result<(), texport::AssetError> {
//! let mut config = DocConfig::new();
//! config.set_doc_root("~/papers/draft");
//! config.make_folders()?;
//!
//! let mut growth = Equation::new("growth", "g = \\alpha + \\beta t", &config)?;
//! growth.save(&config)?; // -> ~/papers/draft/eq/growth.tex
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod config;
pub mod logger;
pub mod template;
pub mod utils;

// Re-exports for convenience
pub use asset::{
    Asset, AssetError, Equation, Figure, Graphic, Image, ImageSource, Plot, PlotBackend,
    PlotOptions, PlotSaveError, Preview, RegressionSource, RegressionTable, Snippet, Table,
    TabularSource,
};
pub use config::{ConfigError, ConfigField, DocConfig, FolderSpec};
