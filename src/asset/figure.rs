//! Composite figure assets wrapping an image or plot.

use std::path::{Path, PathBuf};

use crate::asset::{
    error::Result, persist_enabled, write_text, AssetError, Image, Plot, Preview,
};
use crate::config::{ConfigField, DocConfig, FolderSpec};
use crate::template;
use crate::utils::path::relative_between;

/// The graphic nested inside a [`Figure`].
pub enum Graphic {
    Image(Image),
    Plot(Plot),
}

impl Graphic {
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Image(image) => image.label(),
            Self::Plot(plot) => plot.label(),
        }
    }

    fn label_if_unset(&mut self, label: &str) {
        match self {
            Self::Image(image) => image.label_if_unset(label),
            Self::Plot(plot) => plot.label_if_unset(label),
        }
    }

    pub fn folder(&self) -> &Path {
        match self {
            Self::Image(image) => image.folder(),
            Self::Plot(plot) => plot.folder(),
        }
    }

    pub fn file_name(&self) -> Result<String> {
        match self {
            Self::Image(image) => image.file_name(),
            Self::Plot(plot) => plot.file_name(),
        }
    }

    fn save(&mut self, config: &DocConfig) -> Result<()> {
        match self {
            Self::Image(image) => image.save(config),
            Self::Plot(plot) => plot.save(config),
        }
    }

    fn preview(&self) -> Option<Preview<'_>> {
        match self {
            Self::Image(image) => image.data().map(Preview::Bytes),
            Self::Plot(_) => None,
        }
    }
}

impl From<Image> for Graphic {
    fn from(image: Image) -> Self {
        Self::Image(image)
    }
}

impl From<Plot> for Graphic {
    fn from(plot: Plot) -> Self {
        Self::Plot(plot)
    }
}

/// A `.tex` figure fragment plus the graphic it includes.
///
/// The figure exclusively owns its nested graphic. Saving is a
/// two-artifact protocol: the graphic is written into its own folder
/// first, then the fragment referencing it by relative path. A crash
/// between the two leaves the image on disk with no fragment — both
/// writes are idempotent, so re-invoking `save` repairs the pair.
pub struct Figure {
    label: String,
    folder: PathBuf,
    caption: String,
    incl_args: String,
    graphic: Option<Graphic>,
}

impl Figure {
    /// Create a figure in the configured figure folder.
    pub fn new(
        label: impl Into<String>,
        graphic: impl Into<Graphic>,
        config: &DocConfig,
    ) -> Result<Self> {
        let mut figure = Self {
            label: label.into(),
            folder: FolderSpec::from(ConfigField::FigDir).dereference(config),
            caption: String::new(),
            incl_args: "width=.8\\linewidth".to_string(),
            graphic: Some(graphic.into()),
        };
        if config.auto_save {
            figure.save(config)?;
        }
        Ok(figure)
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Arguments for `\includegraphics[...]`.
    pub fn with_incl_args(mut self, incl_args: impl Into<String>) -> Self {
        self.incl_args = incl_args.into();
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
        format!("{}{}", config.fig_prefix, self.label)
    }

    pub fn file_name(&self) -> String {
        format!("{}.tex", self.label)
    }

    pub fn resolved_path(&self, config: &DocConfig) -> Result<PathBuf> {
        Ok(config.resolve(&self.folder)?.join(self.file_name()))
    }

    pub(crate) fn preview(&self) -> Option<Preview<'_>> {
        self.graphic.as_ref().and_then(Graphic::preview)
    }

    /// Detach the nested graphic. The figure cannot save again until a
    /// new one is attached.
    pub fn take_graphic(&mut self) -> Option<Graphic> {
        self.graphic.take()
    }

    pub fn set_graphic(&mut self, graphic: impl Into<Graphic>) {
        self.graphic = Some(graphic.into());
    }

    /// The include path written into the fragment: the graphic's file,
    /// relative to the figure's own folder.
    ///
    /// The two folders are siblings in the default layout, so this must
    /// be a relative path between arbitrary directories, not a
    /// `strip_prefix` relation.
    pub fn img_rel_path(&self, config: &DocConfig) -> Result<PathBuf> {
        let Some(graphic) = &self.graphic else {
            return Err(AssetError::EmptyPayload {
                label: self.label.clone(),
            });
        };
        let graphic_abs = config.resolve(graphic.folder())?;
        let figure_abs = config.resolve(&self.folder)?;
        Ok(relative_between(&graphic_abs, &figure_abs).join(graphic.file_name()?))
    }

    fn render(&self, config: &DocConfig) -> Result<String> {
        let rel = self.img_rel_path(config)?;
        // LaTeX wants forward slashes regardless of platform
        let img_path = rel.to_string_lossy().replace('\\', "/");
        let key = self.key(config);
        Ok(template::fill(
            &config.fig_template,
            &[
                ("label", key.as_str()),
                ("incl_args", &self.incl_args),
                ("img_path", &img_path),
                ("caption", &self.caption),
            ],
        ))
    }

    /// Save the graphic, then the fragment referencing it.
    ///
    /// In order: precondition (graphic present — atomic no-op
    /// otherwise), one-directional label propagation when the graphic is
    /// unlabeled, graphic save, fragment render + write. No rollback
    /// between the two writes; see the type-level docs.
    pub fn save(&mut self, config: &DocConfig) -> Result<()> {
        if !persist_enabled(config) {
            return Ok(());
        }
        let Some(graphic) = self.graphic.as_mut() else {
            return Err(AssetError::EmptyPayload {
                label: self.label.clone(),
            });
        };
        graphic.label_if_unset(&self.label);
        graphic.save(config)?;

        let tex = self.render(config)?;
        write_text(&self.resolved_path(config)?, &tex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{PlotBackend, PlotOptions, PlotSaveError};
    use std::fs;
    use tempfile::TempDir;

    struct FakePlot;

    impl PlotBackend for FakePlot {
        fn render_to_file(
            &self,
            path: &Path,
            _options: &PlotOptions,
        ) -> Result<(), PlotSaveError> {
            fs::write(path, "%PDF-fake")?;
            Ok(())
        }
    }

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn setup() -> (TempDir, DocConfig) {
        let dir = TempDir::new().unwrap();
        let mut config = DocConfig::default();
        config.set_doc_root(dir.path().canonicalize().unwrap());
        config.make_folders().unwrap();
        (dir, config)
    }

    #[test]
    fn test_save_writes_both_artifacts() {
        let (dir, config) = setup();

        let plot = Plot::new(FakePlot, &config);
        let mut figure = Figure::new("test_fig", plot, &config).unwrap();
        figure.save(&config).unwrap();

        assert!(dir.path().join("img/test_fig.pdf").exists());
        assert!(dir.path().join("fig/test_fig.tex").exists());
    }

    #[test]
    fn test_fragment_references_sibling_image() {
        let (dir, config) = setup();

        let plot = Plot::new(FakePlot, &config);
        let mut figure = Figure::new("test_fig", plot, &config).unwrap();
        figure.save(&config).unwrap();

        let tex = fs::read_to_string(dir.path().join("fig/test_fig.tex")).unwrap();
        assert!(tex.contains("\\includegraphics[width=.8\\linewidth]{../img/test_fig.pdf}"));
        assert!(tex.contains("\\label{fig:test_fig}"));
    }

    #[test]
    fn test_label_propagates_to_unlabeled_graphic() {
        let (_dir, config) = setup();

        let plot = Plot::new(FakePlot, &config);
        let mut figure = Figure::new("test_fig", plot, &config).unwrap();
        figure.save(&config).unwrap();

        let Some(Graphic::Plot(plot)) = &figure.graphic else {
            panic!("graphic should still be a plot");
        };
        assert_eq!(plot.label(), Some("test_fig"));
    }

    #[test]
    fn test_existing_graphic_label_is_kept() {
        let (dir, config) = setup();

        let plot = Plot::new(FakePlot, &config).with_label("named_plot");
        let mut figure = Figure::new("test_fig", plot, &config).unwrap();
        figure.save(&config).unwrap();

        assert!(dir.path().join("img/named_plot.pdf").exists());
        let tex = fs::read_to_string(dir.path().join("fig/test_fig.tex")).unwrap();
        assert!(tex.contains("{../img/named_plot.pdf}"));
    }

    #[test]
    fn test_image_backed_figure() {
        let (dir, config) = setup();

        let image = Image::from_bytes(PNG_MAGIC.to_vec(), &config);
        let mut figure = Figure::new("photo", image, &config)
            .unwrap()
            .with_caption("A photo");
        figure.save(&config).unwrap();

        assert!(dir.path().join("img/photo.png").exists());
        let tex = fs::read_to_string(dir.path().join("fig/photo.tex")).unwrap();
        assert!(tex.contains("{../img/photo.png}"));
        assert!(tex.contains("\\caption{A photo}"));
    }

    #[test]
    fn test_save_disabled_writes_nothing() {
        let (dir, mut config) = setup();
        config.save_enabled = false;

        let plot = Plot::new(FakePlot, &config);
        let mut figure = Figure::new("test_fig", plot, &config).unwrap();
        figure.save(&config).unwrap();

        assert!(!dir.path().join("img/test_fig.pdf").exists());
        assert!(!dir.path().join("fig/test_fig.tex").exists());
    }

    #[test]
    fn test_missing_graphic_is_an_atomic_noop() {
        let (dir, config) = setup();

        let plot = Plot::new(FakePlot, &config);
        let mut figure = Figure::new("test_fig", plot, &config).unwrap();
        figure.take_graphic();

        let err = figure.save(&config).unwrap_err();
        assert!(matches!(err, AssetError::EmptyPayload { .. }));
        assert!(!dir.path().join("img/test_fig.pdf").exists());
        assert!(!dir.path().join("fig/test_fig.tex").exists());
    }

    #[test]
    fn test_retry_after_partial_save_repairs() {
        let (dir, config) = setup();

        let plot = Plot::new(FakePlot, &config);
        let mut figure = Figure::new("test_fig", plot, &config).unwrap();
        figure.save(&config).unwrap();

        // simulate the crash window: fragment missing, image present
        fs::remove_file(dir.path().join("fig/test_fig.tex")).unwrap();
        figure.save(&config).unwrap();

        assert!(dir.path().join("fig/test_fig.tex").exists());
    }
}
