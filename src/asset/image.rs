//! Binary image assets.

use std::path::{Path, PathBuf};

use crate::asset::{error::Result, persist_enabled, read_bytes, write_bytes, AssetError};
use crate::config::{ConfigField, DocConfig, FolderSpec};

/// Where an image's bytes come from.
///
/// Inline images carry no source: there is nothing to refresh from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An existing local file.
    File(PathBuf),
    /// A remote resource, fetched on load.
    Url(String),
}

/// An encoded image saved verbatim as `<label>.<format>`.
///
/// The label may be left unset and propagated later by a wrapping
/// [`Figure`](crate::asset::Figure); saving an unlabeled image directly
/// is [`AssetError::Unlabeled`]. The extension is explicit or inferred
/// from the encoded data's magic bytes.
pub struct Image {
    label: Option<String>,
    folder: PathBuf,
    format: Option<String>,
    source: Option<ImageSource>,
    data: Option<Vec<u8>>,
}

impl Image {
    /// Create an image from inline bytes, unlabeled, in the configured
    /// image folder. The format is inferred from the data unless
    /// [`with_format`](Image::with_format) overrides it.
    pub fn from_bytes(data: Vec<u8>, config: &DocConfig) -> Self {
        Self {
            label: None,
            folder: FolderSpec::from(ConfigField::ImgDir).dereference(config),
            format: None,
            source: None,
            data: Some(data),
        }
    }

    /// Create an image backed by an existing local file.
    ///
    /// The label defaults to the file stem and the format to the file
    /// extension. The bytes are read by [`load`](Image::load) — invoked
    /// immediately when `config.auto_load` is on.
    pub fn from_file(path: impl Into<PathBuf>, config: &DocConfig) -> Result<Self> {
        let path = path.into();
        let label = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
        let format = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());
        let mut image = Self {
            label,
            folder: FolderSpec::from(ConfigField::ImgDir).dereference(config),
            format,
            source: Some(ImageSource::File(path)),
            data: None,
        };
        if config.auto_load {
            image.load(config)?;
        }
        Ok(image)
    }

    /// Create an image backed by a remote resource.
    ///
    /// Fetched by [`load`](Image::load) — invoked immediately when
    /// `config.auto_load` is on.
    pub fn from_url(
        label: impl Into<String>,
        url: impl Into<String>,
        config: &DocConfig,
    ) -> Result<Self> {
        let mut image = Self {
            label: Some(label.into()),
            folder: FolderSpec::from(ConfigField::ImgDir).dereference(config),
            format: None,
            source: Some(ImageSource::Url(url.into())),
            data: None,
        };
        if config.auto_load {
            image.load(config)?;
        }
        Ok(image)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Override the file extension instead of inferring it.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
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

    /// The current payload bytes, if any.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    fn label_or_kind(&self) -> String {
        self.label.clone().unwrap_or_else(|| "image".to_string())
    }

    pub fn file_name(&self) -> Result<String> {
        let label = self
            .label
            .as_deref()
            .ok_or(AssetError::Unlabeled { kind: "image" })?;
        let format = match &self.format {
            Some(format) => format.clone(),
            None => self
                .data
                .as_deref()
                .and_then(infer_format)
                .ok_or_else(|| AssetError::UnknownImageFormat {
                    label: label.to_string(),
                })?,
        };
        Ok(format!("{label}.{format}"))
    }

    pub fn resolved_path(&self, config: &DocConfig) -> Result<PathBuf> {
        Ok(config.resolve(&self.folder)?.join(self.file_name()?))
    }

    /// Write the payload bytes verbatim.
    pub fn save(&self, config: &DocConfig) -> Result<()> {
        if !persist_enabled(config) {
            return Ok(());
        }
        let Some(data) = &self.data else {
            return Err(AssetError::EmptyPayload {
                label: self.label_or_kind(),
            });
        };
        write_bytes(&self.resolved_path(config)?, data)
    }

    /// Refresh the payload from the construction source: re-read the
    /// file, re-fetch the URL, or, for inline bytes, do nothing.
    pub fn load(&mut self, _config: &DocConfig) -> Result<()> {
        let Some(source) = self.source.clone() else {
            return Ok(());
        };
        let data = match source {
            ImageSource::File(path) => read_bytes(&path)?,
            ImageSource::Url(url) => fetch(&url)?,
        };
        if self.format.is_none() {
            self.format = infer_format(&data);
        }
        self.data = Some(data);
        Ok(())
    }
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    let fetch_err = |source| AssetError::Fetch {
        url: url.to_string(),
        source,
    };
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(fetch_err)?;
    let bytes = response.bytes().map_err(fetch_err)?;
    Ok(bytes.to_vec())
}

/// Sniff the extension from the encoded data's magic bytes.
fn infer_format(data: &[u8]) -> Option<String> {
    image::guess_format(data)
        .ok()
        .and_then(|format| format.extensions_str().first())
        .map(|ext| (*ext).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // Smallest prefix that identifies a PNG stream.
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn setup() -> (TempDir, DocConfig) {
        let dir = TempDir::new().unwrap();
        let mut config = DocConfig::default();
        config.set_doc_root(dir.path().canonicalize().unwrap());
        config.make_folders().unwrap();
        (dir, config)
    }

    #[test]
    fn test_bytes_saved_verbatim() {
        let (dir, config) = setup();

        let mut payload = PNG_MAGIC.to_vec();
        payload.extend_from_slice(b"not really pixels");

        let image = Image::from_bytes(payload.clone(), &config).with_label("logo");
        image.save(&config).unwrap();

        let saved = fs::read(dir.path().join("img/logo.png")).unwrap();
        assert_eq!(saved, payload);
    }

    #[test]
    fn test_format_inferred_from_magic_bytes() {
        let (_dir, config) = setup();

        let image = Image::from_bytes(PNG_MAGIC.to_vec(), &config).with_label("logo");
        assert_eq!(image.file_name().unwrap(), "logo.png");
    }

    #[test]
    fn test_explicit_format_wins() {
        let (_dir, config) = setup();

        let image = Image::from_bytes(PNG_MAGIC.to_vec(), &config)
            .with_label("logo")
            .with_format("pdf");
        assert_eq!(image.file_name().unwrap(), "logo.pdf");
    }

    #[test]
    fn test_unlabeled_save_fails() {
        let (_dir, config) = setup();

        let image = Image::from_bytes(PNG_MAGIC.to_vec(), &config);
        let err = image.save(&config).unwrap_err();
        assert!(matches!(err, AssetError::Unlabeled { kind: "image" }));
    }

    #[test]
    fn test_unknown_format_is_an_error() {
        let (_dir, config) = setup();

        let image = Image::from_bytes(vec![0, 1, 2, 3], &config).with_label("mystery");
        let err = image.file_name().unwrap_err();
        assert!(matches!(err, AssetError::UnknownImageFormat { .. }));
    }

    #[test]
    fn test_from_file_load_and_resave() {
        let (dir, config) = setup();

        let original = dir.path().join("plot.png");
        let mut payload = PNG_MAGIC.to_vec();
        payload.extend_from_slice(b"pixels");
        fs::write(&original, &payload).unwrap();

        let mut image = Image::from_file(&original, &config).unwrap();
        assert_eq!(image.label(), Some("plot"));
        assert!(image.data().is_none());

        image.load(&config).unwrap();
        image.save(&config).unwrap();

        let saved = fs::read(dir.path().join("img/plot.png")).unwrap();
        assert_eq!(saved, payload);
    }

    #[test]
    fn test_inline_load_is_a_noop() {
        let (_dir, config) = setup();

        let mut image = Image::from_bytes(PNG_MAGIC.to_vec(), &config).with_label("logo");
        image.load(&config).unwrap();
        assert_eq!(image.data(), Some(PNG_MAGIC));
    }

    #[test]
    fn test_label_propagation_respects_existing() {
        let (_dir, config) = setup();

        let mut image = Image::from_bytes(PNG_MAGIC.to_vec(), &config).with_label("kept");
        image.label_if_unset("ignored");
        assert_eq!(image.label(), Some("kept"));
    }
}
