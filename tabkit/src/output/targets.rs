//! Parameters for exporters that live outside this crate.
//!
//! Rasterizing a table, or embedding it in a word-processor document or a
//! slide deck, needs a format encoder tabkit does not ship. These types
//! carry the settings such an exporter expects, validated up front so a bad
//! setting fails before any file is produced.

use serde::{Deserialize, Serialize};

use crate::error::TabkitError;
use crate::render::RenderModel;
use crate::Result;

/// Settings for rendering a table to an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageExportOptions {
    /// Scale multiplier applied when rasterizing
    pub zoom: f64,
    /// Whitespace around the table, in pixels
    pub expand_px: u32,
}

impl Default for ImageExportOptions {
    fn default() -> Self {
        Self {
            zoom: 2.0,
            expand_px: 5,
        }
    }
}

impl ImageExportOptions {
    pub fn new(zoom: f64, expand_px: u32) -> Result<Self> {
        let options = Self { zoom, expand_px };
        options.validate()?;
        Ok(options)
    }

    /// Check that zoom is a positive, finite number
    pub fn validate(&self) -> Result<()> {
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(TabkitError::config(format!(
                "image zoom must be a positive number, got {}",
                self.zoom
            )));
        }
        Ok(())
    }
}

/// Paper size for document export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl PageSize {
    /// Portrait width and height in inches
    pub fn dimensions_in(&self) -> (f64, f64) {
        match self {
            PageSize::Letter => (8.5, 11.0),
            PageSize::A4 => (8.27, 11.69),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// Same margin on every side
    pub fn uniform(inches: f64) -> Self {
        Self {
            top: inches,
            right: inches,
            bottom: inches,
            left: inches,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// Settings for embedding a table in a word-processor document.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentExportOptions {
    pub page: PageSize,
    pub orientation: Orientation,
    pub margins: Margins,
}

impl DocumentExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set page size
    pub fn page(mut self, page: PageSize) -> Self {
        self.page = page;
        self
    }

    /// Builder: set orientation
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Builder: set margins
    pub fn margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Page width and height in inches, after orientation
    pub fn page_dimensions_in(&self) -> (f64, f64) {
        let (w, h) = self.page.dimensions_in();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Width available for the table between the side margins
    pub fn content_width_in(&self) -> f64 {
        self.page_dimensions_in().0 - self.margins.left - self.margins.right
    }

    /// Check margins are non-negative and leave room for content
    pub fn validate(&self) -> Result<()> {
        let m = &self.margins;
        if [m.top, m.right, m.bottom, m.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(TabkitError::config("page margins must be non-negative"));
        }
        let (w, h) = self.page_dimensions_in();
        if m.left + m.right >= w || m.top + m.bottom >= h {
            return Err(TabkitError::config("page margins leave no room for content"));
        }
        Ok(())
    }
}

/// Settings for embedding a table in a slide deck.
///
/// Slide tables cannot hold images, so by default image content is dropped
/// before the model reaches the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideExportOptions {
    pub drop_images: bool,
}

impl Default for SlideExportOptions {
    fn default() -> Self {
        Self { drop_images: true }
    }
}

impl SlideExportOptions {
    /// The model a slide-deck exporter should receive
    pub fn prepare(&self, model: &RenderModel) -> RenderModel {
        if self.drop_images && model.has_images() {
            tracing::warn!("slide export drops image content from table cells");
            model.without_images()
        } else {
            model.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnDescriptor, ColumnSpec, ImageSource};
    use crate::data::Dataset;
    use crate::render::{render, CellContent, Fragment};

    #[test]
    fn test_image_defaults() {
        let options = ImageExportOptions::default();
        assert_eq!(options.zoom, 2.0);
        assert_eq!(options.expand_px, 5);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_image_zoom_validation() {
        assert!(ImageExportOptions::new(4.0, 10).is_ok());
        assert!(ImageExportOptions::new(0.0, 5).is_err());
        assert!(ImageExportOptions::new(-1.0, 5).is_err());
        assert!(ImageExportOptions::new(f64::NAN, 5).is_err());
    }

    #[test]
    fn test_document_dimensions() {
        let options = DocumentExportOptions::new().orientation(Orientation::Landscape);
        assert_eq!(options.page_dimensions_in(), (11.0, 8.5));
        assert_eq!(options.content_width_in(), 9.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_document_margin_validation() {
        let negative = DocumentExportOptions::new().margins(Margins::uniform(-0.5));
        assert!(negative.validate().is_err());

        let huge = DocumentExportOptions::new()
            .page(PageSize::A4)
            .margins(Margins::uniform(5.0));
        assert!(huge.validate().is_err());
    }

    #[test]
    fn test_document_json_defaults() {
        let options: DocumentExportOptions =
            serde_json::from_str(r#"{"page": "a4"}"#).unwrap();
        assert_eq!(options.page, PageSize::A4);
        assert_eq!(options.orientation, Orientation::Portrait);
        assert_eq!(options.margins, Margins::uniform(1.0));
    }

    #[test]
    fn test_slide_prepare_drops_images() {
        let data = Dataset::new(["c"], vec![vec!["se".into()]]).unwrap();
        let spec = ColumnSpec::new()
            .column(ColumnDescriptor::new("c").image(ImageSource::new("{}.png")))
            .column(
                ColumnDescriptor::new("c")
                    .with_id("both")
                    .image_with_label(ImageSource::new("{}.png"), true),
            );
        let model = render(&data, &spec, &[]).unwrap();
        assert!(model.has_images());

        let slide = SlideExportOptions::default().prepare(&model);
        assert!(!slide.has_images());
        assert_eq!(slide.column_count(), 2);
        assert_eq!(slide.cell(0, 0).unwrap().content, CellContent::Text(String::new()));
        assert_eq!(
            slide.cell(0, 1).unwrap().content,
            CellContent::Composite(vec![Fragment::Text("se".into())])
        );

        let kept = SlideExportOptions { drop_images: false }.prepare(&model);
        assert_eq!(kept, model);
    }
}
