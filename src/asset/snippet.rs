//! Raw `.tex` text fragments.

use std::path::{Path, PathBuf};

use crate::asset::{error::Result, persist_enabled, read_text, write_text, AssetError};
use crate::config::{ConfigField, DocConfig, FolderSpec};

/// A verbatim LaTeX fragment saved as `<label>.tex`.
///
/// Snippets land in the configured snippet folder (the document root by
/// default) and round-trip: [`load`](Snippet::load) reads the file back
/// verbatim.
pub struct Snippet {
    label: String,
    folder: PathBuf,
    tex: Option<String>,
}

impl Snippet {
    /// Create a snippet with text in the configured snippet folder.
    ///
    /// Saved immediately when `config.auto_save` is on.
    pub fn new(
        label: impl Into<String>,
        tex: impl Into<String>,
        config: &DocConfig,
    ) -> Result<Self> {
        Self::with_folder(label, tex, ConfigField::SnipDir, config)
    }

    /// Create a snippet in an explicit folder (literal path or config
    /// field reference).
    pub fn with_folder(
        label: impl Into<String>,
        tex: impl Into<String>,
        folder: impl Into<FolderSpec>,
        config: &DocConfig,
    ) -> Result<Self> {
        let mut snippet = Self {
            label: label.into(),
            folder: folder.into().dereference(config),
            tex: Some(tex.into()),
        };
        if config.auto_save {
            snippet.save(config)?;
        }
        Ok(snippet)
    }

    /// Create an empty snippet to be filled by [`load`](Snippet::load).
    ///
    /// Loaded immediately when `config.auto_load` is on.
    pub fn open(label: impl Into<String>, config: &DocConfig) -> Result<Self> {
        let mut snippet = Self {
            label: label.into(),
            folder: FolderSpec::from(ConfigField::SnipDir).dereference(config),
            tex: None,
        };
        if config.auto_load {
            snippet.load(config)?;
        }
        Ok(snippet)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// The current payload, if any.
    pub fn tex(&self) -> Option<&str> {
        self.tex.as_deref()
    }

    /// Replace the payload.
    pub fn set_tex(&mut self, tex: impl Into<String>) {
        self.tex = Some(tex.into());
    }

    pub fn file_name(&self) -> String {
        format!("{}.tex", self.label)
    }

    pub fn resolved_path(&self, config: &DocConfig) -> Result<PathBuf> {
        Ok(config.resolve(&self.folder)?.join(self.file_name()))
    }

    /// The text as it goes to disk: the payload, `%`-terminated when the
    /// config asks for it and the text does not already end in an
    /// unescaped `%`.
    fn output(&self, config: &DocConfig) -> Option<String> {
        let tex = self.tex.as_ref()?;
        if config.percent_terminate && !ends_with_unescaped_percent(tex) {
            Some(format!("{tex}%"))
        } else {
            Some(tex.clone())
        }
    }

    pub fn save(&mut self, config: &DocConfig) -> Result<()> {
        if !persist_enabled(config) {
            return Ok(());
        }
        let Some(out) = self.output(config) else {
            return Err(AssetError::EmptyPayload {
                label: self.label.clone(),
            });
        };
        write_text(&self.resolved_path(config)?, &out)
    }

    /// Read the file verbatim into the payload.
    pub fn load(&mut self, config: &DocConfig) -> Result<()> {
        self.tex = Some(read_text(&self.resolved_path(config)?)?);
        Ok(())
    }
}

/// `%` termination suppresses the spurious space a trailing newline
/// injects at the `\input` site. An escaped `\%` is a literal percent
/// sign, not a comment, so it does not count.
fn ends_with_unescaped_percent(text: &str) -> bool {
    if !text.ends_with('%') {
        return false;
    }
    let backslashes = text[..text.len() - 1]
        .chars()
        .rev()
        .take_while(|c| *c == '\\')
        .count();
    backslashes % 2 == 0
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
    fn test_round_trip() {
        let (_dir, config) = setup();

        Snippet::new("note", "\\emph{written by hand}", &config)
            .unwrap()
            .save(&config)
            .unwrap();

        let mut fresh = Snippet::open("note", &config).unwrap();
        fresh.load(&config).unwrap();
        assert_eq!(fresh.tex(), Some("\\emph{written by hand}"));
    }

    #[test]
    fn test_round_trip_with_percent_termination() {
        let (_dir, mut config) = setup();
        config.percent_terminate = true;

        Snippet::new("note", "some text", &config)
            .unwrap()
            .save(&config)
            .unwrap();

        let mut fresh = Snippet::open("note", &config).unwrap();
        fresh.load(&config).unwrap();
        assert_eq!(fresh.tex(), Some("some text%"));
    }

    #[test]
    fn test_percent_not_doubled() {
        let (_dir, mut config) = setup();
        config.percent_terminate = true;

        let mut snippet = Snippet::new("note", "already terminated%", &config).unwrap();
        snippet.save(&config).unwrap();

        let saved = fs::read_to_string(snippet.resolved_path(&config).unwrap()).unwrap();
        assert_eq!(saved, "already terminated%");
    }

    #[test]
    fn test_escaped_percent_still_terminated() {
        let (_dir, mut config) = setup();
        config.percent_terminate = true;

        // trailing \% is a literal percent sign, so a comment % is added
        let mut snippet = Snippet::new("note", "fifty \\%", &config).unwrap();
        snippet.save(&config).unwrap();

        let saved = fs::read_to_string(snippet.resolved_path(&config).unwrap()).unwrap();
        assert_eq!(saved, "fifty \\%%");
    }

    #[test]
    fn test_save_disabled_is_silent_noop() {
        let (_dir, mut config) = setup();
        config.save_enabled = false;

        let mut snippet = Snippet::new("note", "text", &config).unwrap();
        snippet.save(&config).unwrap();

        assert!(!snippet.resolved_path(&config).unwrap().exists());
    }

    #[test]
    fn test_save_empty_payload_fails() {
        let (_dir, config) = setup();

        let mut snippet = Snippet::open("nothing", &config).unwrap();
        let err = snippet.save(&config).unwrap_err();
        assert!(matches!(err, AssetError::EmptyPayload { .. }));
    }

    #[test]
    fn test_auto_save_at_construction() {
        let (_dir, mut config) = setup();
        config.auto_save = true;

        let snippet = Snippet::new("note", "text", &config).unwrap();
        assert!(snippet.resolved_path(&config).unwrap().exists());
    }

    #[test]
    fn test_save_into_missing_folder_is_io_error() {
        let mut config = DocConfig::default();
        config.check_dirs = false;
        config.set_doc_root("directorydoesnotexist");

        let mut snippet = Snippet::new("note", "text", &config).unwrap();
        let err = snippet.save(&config).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn test_unescaped_percent_detection() {
        assert!(ends_with_unescaped_percent("x%"));
        assert!(!ends_with_unescaped_percent("x\\%"));
        assert!(ends_with_unescaped_percent("x\\\\%"));
        assert!(!ends_with_unescaped_percent("x"));
    }
}
