//! Tabular assets backed by external data collaborators.
//!
//! The core never models tabular data itself: a [`TabularSource`] (a data
//! table) or [`RegressionSource`] (fitted regression results) renders its
//! own LaTeX, and this module decides how that output lands in the table
//! template.

use std::path::{Path, PathBuf};

use crate::asset::{error::Result, persist_enabled, write_text, AssetError, Preview};
use crate::config::{ConfigField, DocConfig, FolderSpec};
use crate::template;

// ============================================================================
// collaborator contracts
// ============================================================================

/// A tabular data engine that renders itself.
pub trait TabularSource {
    /// The bare tabular block (`\begin{tabular}...\end{tabular}`),
    /// without any surrounding table environment.
    fn to_latex(&self) -> String;

    /// HTML rendering for display front-ends.
    fn to_html(&self) -> String;
}

/// Regression results that render a self-wrapped LaTeX table — their own
/// `table` environment, caption, and label included.
pub trait RegressionSource {
    fn render_latex(&self) -> String;

    /// HTML rendering for display front-ends.
    fn render_html(&self) -> String;
}

// ============================================================================
// Table
// ============================================================================

/// A data table wrapped in the configured table template.
pub struct Table {
    label: String,
    folder: PathBuf,
    caption: String,
    formatting: String,
    source: Option<Box<dyn TabularSource>>,
}

impl Table {
    /// Create a table in the configured table folder.
    pub fn new(
        label: impl Into<String>,
        source: impl TabularSource + 'static,
        config: &DocConfig,
    ) -> Result<Self> {
        let mut table = Self {
            label: label.into(),
            folder: FolderSpec::from(ConfigField::TabDir).dereference(config),
            caption: String::new(),
            formatting: String::new(),
            source: Some(Box::new(source)),
        };
        if config.auto_save {
            table.save(config)?;
        }
        Ok(table)
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Formatting preamble placed before the tabular block
    /// (`\small`, `\centering` variants, column tweaks).
    pub fn with_formatting(mut self, formatting: impl Into<String>) -> Self {
        self.formatting = formatting.into();
        self
    }

    pub fn with_folder(mut self, folder: impl Into<FolderSpec>, config: &DocConfig) -> Self {
        self.folder = folder.into().dereference(config);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Cross-reference key used inside `\label{}` / `\ref{}`.
    pub fn key(&self, config: &DocConfig) -> String {
        format!("{}{}", config.tab_prefix, self.label)
    }

    pub fn file_name(&self) -> String {
        format!("{}.tex", self.label)
    }

    pub fn resolved_path(&self, config: &DocConfig) -> Result<PathBuf> {
        Ok(config.resolve(&self.folder)?.join(self.file_name()))
    }

    /// The templated file output, if a source is attached.
    pub fn tex(&self, config: &DocConfig) -> Option<String> {
        let source = self.source.as_ref()?;
        let key = self.key(config);
        Some(template::fill(
            &config.tab_template,
            &[
                ("label", key.as_str()),
                ("formatting", &self.formatting),
                ("table", &source.to_latex()),
                ("caption", &self.caption),
            ],
        ))
    }

    pub(crate) fn preview_html(&self) -> Option<Preview<'_>> {
        self.source.as_ref().map(|s| Preview::Html(s.to_html()))
    }

    pub fn save(&mut self, config: &DocConfig) -> Result<()> {
        if !persist_enabled(config) {
            return Ok(());
        }
        let Some(tex) = self.tex(config) else {
            return Err(AssetError::EmptyPayload {
                label: self.label.clone(),
            });
        };
        write_text(&self.resolved_path(config)?, &tex)
    }
}

// ============================================================================
// RegressionTable
// ============================================================================

/// A regression-results table.
///
/// With `use_template` on (the default) the collaborator's own wrapping
/// is stripped and the inner block re-wrapped in the configured table
/// template; with it off the collaborator output passes through
/// verbatim, keeping its own caption and label.
pub struct RegressionTable {
    label: String,
    folder: PathBuf,
    caption: String,
    formatting: String,
    use_template: bool,
    source: Option<Box<dyn RegressionSource>>,
}

impl RegressionTable {
    /// Create a regression table in the configured table folder.
    pub fn new(
        label: impl Into<String>,
        source: impl RegressionSource + 'static,
        config: &DocConfig,
    ) -> Result<Self> {
        let mut table = Self {
            label: label.into(),
            folder: FolderSpec::from(ConfigField::TabDir).dereference(config),
            caption: String::new(),
            formatting: String::new(),
            use_template: true,
            source: Some(Box::new(source)),
        };
        if config.auto_save {
            table.save(config)?;
        }
        Ok(table)
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_formatting(mut self, formatting: impl Into<String>) -> Self {
        self.formatting = formatting.into();
        self
    }

    pub fn with_folder(mut self, folder: impl Into<FolderSpec>, config: &DocConfig) -> Self {
        self.folder = folder.into().dereference(config);
        self
    }

    /// Toggle templating; off means the collaborator output is written
    /// as-is.
    pub fn set_use_template(&mut self, use_template: bool) {
        self.use_template = use_template;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn key(&self, config: &DocConfig) -> String {
        format!("{}{}", config.tab_prefix, self.label)
    }

    pub fn file_name(&self) -> String {
        format!("{}.tex", self.label)
    }

    pub fn resolved_path(&self, config: &DocConfig) -> Result<PathBuf> {
        Ok(config.resolve(&self.folder)?.join(self.file_name()))
    }

    /// The file output, if a source is attached.
    pub fn tex(&self, config: &DocConfig) -> Option<String> {
        let source = self.source.as_ref()?;
        let raw = source.render_latex();
        if !self.use_template {
            return Some(raw);
        }
        let key = self.key(config);
        Some(template::fill(
            &config.tab_template,
            &[
                ("label", key.as_str()),
                ("formatting", &self.formatting),
                ("table", &strip_regression_wrapping(&raw)),
                ("caption", &self.caption),
            ],
        ))
    }

    pub(crate) fn preview_html(&self) -> Option<Preview<'_>> {
        self.source.as_ref().map(|s| Preview::Html(s.render_html()))
    }

    pub fn save(&mut self, config: &DocConfig) -> Result<()> {
        if !persist_enabled(config) {
            return Ok(());
        }
        let Some(tex) = self.tex(config) else {
            return Err(AssetError::EmptyPayload {
                label: self.label.clone(),
            });
        };
        write_text(&self.resolved_path(config)?, &tex)
    }
}

/// Recover the inner tabular block from a collaborator's self-wrapped
/// output.
///
/// The layout stripped here is the one the collaborator currently emits:
/// two leading lines (`\begin{table}` and its centering header) and one
/// trailing `\end{table}` line. The line counts are wrapping-version
/// sensitive — when the collaborator changes its output shape, this
/// function is the only place to adjust. Output too short to carry that
/// wrapping passes through untouched.
fn strip_regression_wrapping(latex: &str) -> String {
    let lines: Vec<&str> = latex.lines().collect();
    if lines.len() <= 3 {
        return latex.to_string();
    }
    lines[2..lines.len() - 1].join("\n")
}
