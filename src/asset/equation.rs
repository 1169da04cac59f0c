//! Templated display equations.

use std::path::{Path, PathBuf};

use crate::asset::{error::Result, persist_enabled, read_text, write_text, AssetError};
use crate::config::{ConfigField, DocConfig, FolderSpec};
use crate::template;

/// A display equation rendered through the configured equation template.
///
/// The payload is the bare equation body (no delimiters); the rendered
/// `.tex` output wraps it in `\begin{<block>}...\end{<block>}` with a
/// `\label` built from the configured prefix. The inline preview
/// ([`inline`](Equation::inline), `$...$`) is deliberately a different
/// string from the file output.
pub struct Equation {
    label: String,
    folder: PathBuf,
    block: String,
    body: Option<String>,
    tex: Option<String>,
}

impl Equation {
    /// Create an equation in the configured equation folder, with the
    /// default `equation` block environment.
    pub fn new(
        label: impl Into<String>,
        body: impl Into<String>,
        config: &DocConfig,
    ) -> Result<Self> {
        Self::with_block(label, body, "equation", config)
    }

    /// Create an equation with an explicit block environment name
    /// (`align`, `gather`, ...).
    pub fn with_block(
        label: impl Into<String>,
        body: impl Into<String>,
        block: impl Into<String>,
        config: &DocConfig,
    ) -> Result<Self> {
        let mut equation = Self {
            label: label.into(),
            folder: FolderSpec::from(ConfigField::EqDir).dereference(config),
            block: block.into(),
            body: Some(body.into()),
            tex: None,
        };
        equation.render(config);
        if config.auto_save {
            equation.save(config)?;
        }
        Ok(equation)
    }

    /// Create an empty equation to be filled by [`load`](Equation::load).
    pub fn open(label: impl Into<String>, config: &DocConfig) -> Result<Self> {
        let mut equation = Self {
            label: label.into(),
            folder: FolderSpec::from(ConfigField::EqDir).dereference(config),
            block: "equation".to_string(),
            body: None,
            tex: None,
        };
        if config.auto_load {
            equation.load(config)?;
        }
        Ok(equation)
    }

    /// Store in another folder (dereferenced now, like any folder
    /// reference).
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

    /// The rendered file output, if a body has been set or a file loaded.
    pub fn tex(&self) -> Option<&str> {
        self.tex.as_deref()
    }

    /// Cross-reference key used inside `\label{}` / `\ref{}`.
    pub fn key(&self, config: &DocConfig) -> String {
        format!("{}{}", config.eq_prefix, self.label)
    }

    /// Inline math preview (`$...$`) — not the file representation.
    pub fn inline(&self) -> Option<String> {
        self.body.as_ref().map(|body| format!("${body}$"))
    }

    /// Replace the equation body and re-render the file output.
    pub fn set_body(&mut self, body: impl Into<String>, config: &DocConfig) {
        self.body = Some(body.into());
        self.render(config);
    }

    /// Render the file output from the current body. Bodies are indented
    /// one tab stop inside the block environment for readability.
    fn render(&mut self, config: &DocConfig) {
        if let Some(body) = &self.body {
            let key = self.key(config);
            let indented = template::indent(body, "\t");
            self.tex = Some(template::fill(
                &config.eq_template,
                &[("label", key.as_str()), ("block", &self.block), ("eq", &indented)],
            ));
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.tex", self.label)
    }

    pub fn resolved_path(&self, config: &DocConfig) -> Result<PathBuf> {
        Ok(config.resolve(&self.folder)?.join(self.file_name()))
    }

    pub fn save(&mut self, config: &DocConfig) -> Result<()> {
        if !persist_enabled(config) {
            return Ok(());
        }
        let Some(tex) = &self.tex else {
            return Err(AssetError::EmptyPayload {
                label: self.label.clone(),
            });
        };
        write_text(&self.resolved_path(config)?, tex)
    }

    /// Read the rendered file back. Only the file representation is
    /// recoverable; the bare body stays unknown.
    pub fn load(&mut self, config: &DocConfig) -> Result<()> {
        self.tex = Some(read_text(&self.resolved_path(config)?)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DocConfig) {
        let dir = TempDir::new().unwrap();
        let mut config = DocConfig::default();
        config.set_doc_root(dir.path().canonicalize().unwrap());
        config.make_folders().unwrap();
        (dir, config)
    }

    #[test]
    fn test_default_template_output_is_exact() {
        let (_dir, config) = setup();

        let mut eq = Equation::new("test_eq", "a_b", &config).unwrap();
        eq.save(&config).unwrap();

        let saved = fs::read_to_string(eq.resolved_path(&config).unwrap()).unwrap();
        assert_eq!(
            saved,
            "\\begin{equation}\\label{eq:test_eq}\n\ta_b\n\\end{equation}"
        );
    }

    #[test]
    fn test_saves_into_eq_folder() {
        let (dir, config) = setup();

        let mut eq = Equation::new("test_eq", "a_b", &config).unwrap();
        eq.save(&config).unwrap();

        assert!(dir.path().join("eq/test_eq.tex").exists());
    }

    #[test]
    fn test_custom_block_environment() {
        let (_dir, config) = setup();

        let eq = Equation::with_block("sys", "x &= y \\\\\ny &= z", "align", &config).unwrap();
        let tex = eq.tex().unwrap();
        assert!(tex.starts_with("\\begin{align}\\label{eq:sys}\n"));
        assert!(tex.ends_with("\n\\end{align}"));
        assert!(tex.contains("\tx &= y \\\\\n\ty &= z"));
    }

    #[test]
    fn test_inline_preview_differs_from_file_output() {
        let (_dir, config) = setup();

        let eq = Equation::new("test_eq", "a_b", &config).unwrap();
        assert_eq!(eq.inline().unwrap(), "$a_b$");
        assert_ne!(eq.inline().unwrap(), eq.tex().unwrap());
    }

    #[test]
    fn test_set_body_rerenders() {
        let (_dir, config) = setup();

        let mut eq = Equation::new("test_eq", "a_b", &config).unwrap();
        eq.set_body("c_d", &config);
        assert!(eq.tex().unwrap().contains("\tc_d"));
        assert!(!eq.tex().unwrap().contains("a_b"));
    }

    #[test]
    fn test_custom_prefix_in_key() {
        let (_dir, mut config) = setup();
        config.eq_prefix = "eqn:".to_string();

        let eq = Equation::new("test_eq", "a_b", &config).unwrap();
        assert_eq!(eq.key(&config), "eqn:test_eq");
        assert!(eq.tex().unwrap().contains("\\label{eqn:test_eq}"));
    }

    #[test]
    fn test_load_recovers_rendered_form() {
        let (_dir, config) = setup();

        Equation::new("test_eq", "a_b", &config)
            .unwrap()
            .save(&config)
            .unwrap();

        let mut fresh = Equation::open("test_eq", &config).unwrap();
        fresh.load(&config).unwrap();
        assert!(fresh.tex().unwrap().contains("\\label{eq:test_eq}"));
        assert!(fresh.inline().is_none());
    }

    #[test]
    fn test_save_without_body_fails() {
        let (_dir, config) = setup();

        let mut eq = Equation::open("missing", &config).unwrap();
        let err = eq.save(&config).unwrap_err();
        assert!(matches!(err, AssetError::EmptyPayload { .. }));
    }
}
