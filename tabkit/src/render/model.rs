//! The render model: a styled table independent of any output format.
//!
//! Exporters read a [`RenderModel`] and never compute anything themselves:
//! every label, alignment, formatted value and footnote mark is already
//! resolved here.

use serde::{Deserialize, Serialize};

use crate::config::Alignment;
use crate::error::TabkitError;

/// Reference to an image file shown in a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_px: Option<u32>,
}

/// One piece of a composite cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Fragment {
    Text(String),
    Image(ImageRef),
}

/// Content of a body cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellContent {
    Text(String),
    Image(ImageRef),
    /// Ordered text and image fragments shown together
    Composite(Vec<Fragment>),
}

impl CellContent {
    /// Text portions of the cell, concatenated; images contribute nothing
    pub fn plain_text(&self) -> String {
        match self {
            CellContent::Text(s) => s.clone(),
            CellContent::Image(_) => String::new(),
            CellContent::Composite(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    Fragment::Text(s) => Some(s.as_str()),
                    Fragment::Image(_) => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Check whether any image is part of this cell
    pub fn has_image(&self) -> bool {
        match self {
            CellContent::Text(_) => false,
            CellContent::Image(_) => true,
            CellContent::Composite(parts) => parts.iter().any(|p| matches!(p, Fragment::Image(_))),
        }
    }

    /// Same content with every image removed.
    ///
    /// An image cell becomes empty text; a composite keeps its text fragments.
    pub fn without_images(&self) -> CellContent {
        match self {
            CellContent::Text(_) => self.clone(),
            CellContent::Image(_) => CellContent::Text(String::new()),
            CellContent::Composite(parts) => CellContent::Composite(
                parts
                    .iter()
                    .filter(|p| matches!(p, Fragment::Text(_)))
                    .cloned()
                    .collect(),
            ),
        }
    }
}

/// A column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCell {
    pub label: String,
    pub align: Alignment,
    /// Footnote marks shown next to the label, in footnote order
    pub footnote_marks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_px: Option<u32>,
}

/// A body cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyCell {
    pub content: CellContent,
    pub align: Alignment,
    pub footnote_marks: Vec<String>,
}

/// A label spanning `span` columns starting at column index `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpannerCell {
    pub label: String,
    pub start: usize,
    pub span: usize,
}

/// A footnote as listed below the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootnoteDef {
    pub mark: String,
    pub text: String,
}

/// Format-independent representation of a styled table.
///
/// Every body row has exactly as many cells as there are headers, and
/// spanners cover non-empty, non-overlapping runs of columns in order.
/// Deserialization rejects models that break either rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ModelParts", into = "ModelParts")]
pub struct RenderModel {
    title: Option<String>,
    subtitle: Option<String>,
    spanners: Vec<SpannerCell>,
    headers: Vec<HeaderCell>,
    rows: Vec<Vec<BodyCell>>,
    footnotes: Vec<FootnoteDef>,
    source_notes: Vec<String>,
}

/// Pieces of a render model as assembled by the renderer, and its serde form.
#[derive(Serialize, Deserialize)]
pub(crate) struct ModelParts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub spanners: Vec<SpannerCell>,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<BodyCell>>,
    #[serde(default)]
    pub footnotes: Vec<FootnoteDef>,
    #[serde(default)]
    pub source_notes: Vec<String>,
}

impl ModelParts {
    fn validate(&self) -> crate::Result<()> {
        let columns = self.headers.len();
        if let Some((i, row)) = self.rows.iter().enumerate().find(|(_, r)| r.len() != columns) {
            return Err(TabkitError::config(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                columns
            )));
        }
        let mut next_free = 0;
        for spanner in &self.spanners {
            let end = spanner.start.checked_add(spanner.span);
            match end {
                Some(end) if spanner.span > 0 && end <= columns && spanner.start >= next_free => {
                    next_free = end;
                }
                _ => {
                    return Err(TabkitError::config(format!(
                        "spanner '{}' at column {} spanning {} does not fit {} columns",
                        spanner.label, spanner.start, spanner.span, columns
                    )))
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<ModelParts> for RenderModel {
    type Error = TabkitError;

    fn try_from(parts: ModelParts) -> crate::Result<Self> {
        parts.validate()?;
        Ok(RenderModel::from_parts(parts))
    }
}

impl From<RenderModel> for ModelParts {
    fn from(model: RenderModel) -> Self {
        ModelParts {
            title: model.title,
            subtitle: model.subtitle,
            spanners: model.spanners,
            headers: model.headers,
            rows: model.rows,
            footnotes: model.footnotes,
            source_notes: model.source_notes,
        }
    }
}

impl RenderModel {
    pub(crate) fn from_parts(parts: ModelParts) -> Self {
        debug_assert!(parts.validate().is_ok());
        RenderModel {
            title: parts.title,
            subtitle: parts.subtitle,
            spanners: parts.spanners,
            headers: parts.headers,
            rows: parts.rows,
            footnotes: parts.footnotes,
            source_notes: parts.source_notes,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn spanners(&self) -> &[SpannerCell] {
        &self.spanners
    }

    pub fn headers(&self) -> &[HeaderCell] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<BodyCell>] {
        &self.rows
    }

    pub fn footnotes(&self) -> &[FootnoteDef] {
        &self.footnotes
    }

    pub fn source_notes(&self) -> &[String] {
        &self.source_notes
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Body cell at a row and column index
    pub fn cell(&self, row: usize, column: usize) -> Option<&BodyCell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Check whether any body cell carries an image
    pub fn has_images(&self) -> bool {
        self.rows.iter().flatten().any(|c| c.content.has_image())
    }

    /// Copy of this model with all image content dropped.
    ///
    /// Slide-deck exporters cannot embed images in table cells; this is the
    /// model they actually show.
    pub fn without_images(&self) -> RenderModel {
        RenderModel {
            rows: self
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| BodyCell {
                            content: cell.content.without_images(),
                            align: cell.align,
                            footnote_marks: cell.footnote_marks.clone(),
                        })
                        .collect()
                })
                .collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(path: &str) -> ImageRef {
        ImageRef {
            path: path.to_string(),
            height_px: None,
        }
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(CellContent::Text("a".into()).plain_text(), "a");
        assert_eq!(CellContent::Image(image("x.png")).plain_text(), "");
        let composite = CellContent::Composite(vec![
            Fragment::Image(image("x.png")),
            Fragment::Text("Sweden".into()),
        ]);
        assert_eq!(composite.plain_text(), "Sweden");
        assert!(composite.has_image());
    }

    #[test]
    fn test_without_images() {
        let composite = CellContent::Composite(vec![
            Fragment::Image(image("x.png")),
            Fragment::Text("Sweden".into()),
        ]);
        assert_eq!(
            composite.without_images(),
            CellContent::Composite(vec![Fragment::Text("Sweden".into())])
        );
        assert_eq!(
            CellContent::Image(image("x.png")).without_images(),
            CellContent::Text(String::new())
        );
    }

    #[test]
    fn test_cell_content_json_shape() {
        let json = serde_json::to_value(CellContent::Text("A".into())).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["value"], "A");
    }

    fn model_json(spanners: &str, rows: &str) -> String {
        format!(
            r#"{{"spanners": {}, "headers": [
                {{"label": "a", "align": "left", "footnote_marks": []}},
                {{"label": "b", "align": "right", "footnote_marks": []}}
            ], "rows": {}}}"#,
            spanners, rows
        )
    }

    #[test]
    fn test_deserialize_valid_model() {
        let row = r#"[[{"content": {"type": "text", "value": "x"}, "align": "left", "footnote_marks": []},
                      {"content": {"type": "text", "value": "1"}, "align": "right", "footnote_marks": []}]]"#;
        let json = model_json(r#"[{"label": "both", "start": 0, "span": 2}]"#, row);
        let model: RenderModel = serde_json::from_str(&json).unwrap();
        assert_eq!(model.column_count(), 2);
        assert_eq!(model.row_count(), 1);
        assert_eq!(model.title(), None);
        assert_eq!(model.spanners()[0].span, 2);
    }

    #[test]
    fn test_deserialize_rejects_ragged_rows() {
        let json = model_json("[]", "[[]]");
        let err = serde_json::from_str::<RenderModel>(&json).unwrap_err();
        assert!(err.to_string().contains("row 0 has 0 cells, expected 2"));
    }

    #[test]
    fn test_deserialize_rejects_bad_spanners() {
        for spanner in [
            r#"[{"label": "wide", "start": 1, "span": 3}]"#,
            r#"[{"label": "empty", "start": 0, "span": 0}]"#,
            r#"[{"label": "x", "start": 0, "span": 2}, {"label": "y", "start": 1, "span": 1}]"#,
        ] {
            let json = model_json(spanner, "[]");
            assert!(serde_json::from_str::<RenderModel>(&json).is_err(), "{}", spanner);
        }
    }
}
