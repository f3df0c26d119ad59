//! Column descriptors and column specs.
//!
//! A [`ColumnSpec`] lists the output columns in display order. Each
//! [`ColumnDescriptor`] names the dataset column it reads from and says how
//! the values and header are presented.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use super::number::NumberFormat;
use crate::error::TabkitError;
use crate::Result;

/// Placeholder used for missing values when a descriptor does not set one.
pub const DEFAULT_MISSING_TEXT: &str = "—";

/// Horizontal alignment of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// CSS keyword for this alignment
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Ok(Alignment::Left),
            "center" | "centre" | "c" => Ok(Alignment::Center),
            "right" | "r" => Ok(Alignment::Right),
            _ => Err(format!("Unknown alignment: {}", s)),
        }
    }
}

/// Where an image-valued cell finds its file.
///
/// `{}` in the template is replaced by the cell's raw text. A template
/// without `{}` is treated as a prefix and the raw text is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    /// Path or URL template
    pub template: String,
    /// Display height in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_px: Option<u32>,
}

impl ImageSource {
    /// Create an image source from a path template
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            height_px: None,
        }
    }

    /// Builder: set display height
    pub fn height(mut self, px: u32) -> Self {
        self.height_px = Some(px);
        self
    }

    /// Resolve the image path for a raw cell text
    pub fn resolve(&self, raw: &str) -> String {
        if self.template.contains("{}") {
            self.template.replace("{}", raw)
        } else {
            format!("{}{}", self.template, raw)
        }
    }
}

/// How a raw value becomes cell content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    /// Plain display of the raw value
    #[default]
    Identity,
    /// Numeric formatting; non-numeric values pass through unchanged
    Number(NumberFormat),
    /// Replace the value with an image reference
    Image(ImageSource),
    /// Image and the raw text side by side in one cell
    ImageWithLabel {
        image: ImageSource,
        /// Put the label before the image instead of after it
        #[serde(default)]
        label_first: bool,
    },
}

impl Transform {
    /// Check whether this transform produces image content
    pub fn is_image(&self) -> bool {
        matches!(self, Transform::Image(_) | Transform::ImageWithLabel { .. })
    }
}

/// Configuration for one output column.
///
/// In JSON, `align` sets both sides at once; `header_align` and
/// `body_align` override it per side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DescriptorConfig")]
pub struct ColumnDescriptor {
    /// Dataset column the values come from
    pub source: String,
    /// Identifier used by footnotes and spanners (defaults to `source`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Header label (defaults to `source`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// How raw values become cell content
    #[serde(default)]
    pub transform: Transform,
    /// Explicit header alignment; auto alignment when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_align: Option<Alignment>,
    /// Explicit body alignment; auto alignment when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_align: Option<Alignment>,
    /// Placeholder for missing values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_text: Option<String>,
    /// Width hint for exporters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_px: Option<u32>,
}

/// JSON form of a descriptor, accepting the `align` shorthand.
#[derive(Deserialize)]
struct DescriptorConfig {
    source: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    transform: Transform,
    #[serde(default)]
    align: Option<Alignment>,
    #[serde(default)]
    header_align: Option<Alignment>,
    #[serde(default)]
    body_align: Option<Alignment>,
    #[serde(default)]
    missing_text: Option<String>,
    #[serde(default)]
    width_px: Option<u32>,
}

impl From<DescriptorConfig> for ColumnDescriptor {
    fn from(raw: DescriptorConfig) -> Self {
        Self {
            source: raw.source,
            id: raw.id,
            label: raw.label,
            transform: raw.transform,
            header_align: raw.header_align.or(raw.align),
            body_align: raw.body_align.or(raw.align),
            missing_text: raw.missing_text,
            width_px: raw.width_px,
        }
    }
}

impl ColumnDescriptor {
    /// Column showing `source` as-is
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            id: None,
            label: None,
            transform: Transform::Identity,
            header_align: None,
            body_align: None,
            missing_text: None,
            width_px: None,
        }
    }

    /// Identifier footnotes and spanners use to find this column
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.source)
    }

    /// Text shown in the header cell
    pub fn header_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.source)
    }

    /// Placeholder shown for missing values
    pub fn missing_placeholder(&self) -> &str {
        self.missing_text.as_deref().unwrap_or(DEFAULT_MISSING_TEXT)
    }

    /// Builder: set identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: set header label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder: set value transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder: format numbers
    pub fn number(self, format: NumberFormat) -> Self {
        self.with_transform(Transform::Number(format))
    }

    /// Builder: render values as images
    pub fn image(self, source: ImageSource) -> Self {
        self.with_transform(Transform::Image(source))
    }

    /// Builder: render values as image plus label
    pub fn image_with_label(self, source: ImageSource, label_first: bool) -> Self {
        self.with_transform(Transform::ImageWithLabel {
            image: source,
            label_first,
        })
    }

    /// Builder: align header and body
    pub fn align(mut self, align: Alignment) -> Self {
        self.header_align = Some(align);
        self.body_align = Some(align);
        self
    }

    /// Builder: align the header cell, leaving body alignment as it is
    pub fn align_header(mut self, align: Alignment) -> Self {
        self.header_align = Some(align);
        self
    }

    /// Builder: align body cells, leaving header alignment as it is
    pub fn align_body(mut self, align: Alignment) -> Self {
        self.body_align = Some(align);
        self
    }

    /// Builder: set missing-value placeholder
    pub fn missing_text(mut self, text: impl Into<String>) -> Self {
        self.missing_text = Some(text.into());
        self
    }

    /// Builder: set width hint
    pub fn width_px(mut self, px: u32) -> Self {
        self.width_px = Some(px);
        self
    }

    /// Check settings that would make rendering fail
    pub fn validate(&self) -> Result<()> {
        match &self.transform {
            Transform::Number(format) => format.validate(),
            _ => Ok(()),
        }
    }
}

/// Ordered list of output columns.
///
/// In JSON a column spec is a plain array of descriptors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSpec {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnSpec {
    /// Create an empty column spec
    pub fn new() -> Self {
        Self::default()
    }

    /// Column spec showing the named columns as-is, in the given order
    pub fn select<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(ColumnDescriptor::new).collect()
    }

    /// Builder: append a column
    pub fn column(mut self, descriptor: ColumnDescriptor) -> Self {
        self.columns.push(descriptor);
        self
    }

    /// Parse a column spec from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let spec: ColumnSpec = serde_json::from_str(json)?;
        spec.validate()?;
        tracing::debug!(columns = spec.len(), "parsed column spec");
        Ok(spec)
    }

    /// Check every descriptor's settings
    pub fn validate(&self) -> Result<()> {
        self.columns.iter().try_for_each(ColumnDescriptor::validate)
    }

    /// Load a column spec from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TabkitError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading column spec");
        Self::from_json_str(&text)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check whether no columns are configured
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Descriptors in display order
    pub fn descriptors(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Iterate descriptors in display order
    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDescriptor> {
        self.columns.iter()
    }

    /// Position of the first column with the given key
    pub fn position(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key() == key)
    }
}

impl FromIterator<ColumnDescriptor> for ColumnSpec {
    fn from_iter<T: IntoIterator<Item = ColumnDescriptor>>(iter: T) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ColumnSpec {
    type Item = &'a ColumnDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
