//! Plain-text table exporter for terminals and logs.

use console::{measure_text_width, pad_str, Style};

use super::Exporter;
use crate::config::Alignment;
use crate::render::{CellContent, Fragment, RenderModel, SpannerCell};
use crate::Result;

const COLUMN_GAP: &str = "  ";

/// Writes a render model as a padded monospace grid.
///
/// Images cannot be shown, so they print as `(image: path)`. Footnote marks
/// follow the cell text in brackets and are listed below the table.
#[derive(Debug, Clone, Default)]
pub struct TextExporter {
    bold_headers: bool,
}

impl TextExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: print header labels in bold
    pub fn bold_headers(mut self, bold: bool) -> Self {
        self.bold_headers = bold;
        self
    }
}

fn content_text(content: &CellContent) -> String {
    let fragment = |f: &Fragment| match f {
        Fragment::Text(s) => s.clone(),
        Fragment::Image(image) => format!("(image: {})", image.path),
    };
    match content {
        CellContent::Text(s) => s.clone(),
        CellContent::Image(image) => format!("(image: {})", image.path),
        CellContent::Composite(parts) => parts.iter().map(fragment).collect::<Vec<_>>().join(" "),
    }
}

fn with_marks(text: String, marks: &[String]) -> String {
    if marks.is_empty() {
        text
    } else {
        format!("{}[{}]", text, marks.join(","))
    }
}

fn pad(text: &str, width: usize, align: Alignment) -> String {
    let align = match align {
        Alignment::Left => console::Alignment::Left,
        Alignment::Center => console::Alignment::Center,
        Alignment::Right => console::Alignment::Right,
    };
    pad_str(text, width, align, None).into_owned()
}

/// Column widths wide enough for every header, cell and spanner label.
fn column_widths(model: &RenderModel, headers: &[String], body: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| measure_text_width(h)).collect();
    for row in body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }
    // A spanner wider than its columns widens the last column it covers.
    for spanner in model.spanners() {
        let Some(end) = spanner_end(spanner, widths.len()) else {
            continue;
        };
        let covered = spanned_width(&widths[spanner.start..end]);
        let needed = measure_text_width(&spanner.label);
        if needed > covered {
            widths[end - 1] += needed - covered;
        }
    }
    widths
}

/// End column of a spanner, or `None` if it covers no columns or runs past the table.
fn spanner_end(spanner: &SpannerCell, columns: usize) -> Option<usize> {
    let end = spanner.start.checked_add(spanner.span)?;
    (spanner.span > 0 && end <= columns).then_some(end)
}

fn spanned_width(widths: &[usize]) -> usize {
    widths.iter().sum::<usize>() + COLUMN_GAP.len() * widths.len().saturating_sub(1)
}

fn spanner_line(model: &RenderModel, widths: &[usize]) -> String {
    let mut cells = Vec::new();
    let mut col = 0;
    for spanner in model.spanners() {
        let Some(end) = spanner_end(spanner, widths.len()) else {
            continue;
        };
        if spanner.start < col {
            continue;
        }
        while col < spanner.start {
            cells.push(" ".repeat(widths[col]));
            col += 1;
        }
        let width = spanned_width(&widths[spanner.start..end]);
        cells.push(pad(&spanner.label, width, Alignment::Center));
        col = end;
    }
    cells.join(COLUMN_GAP)
}

impl Exporter for TextExporter {
    fn export(&self, model: &RenderModel) -> Result<String> {
        let headers: Vec<String> = model
            .headers()
            .iter()
            .map(|h| with_marks(h.label.clone(), &h.footnote_marks))
            .collect();
        let body: Vec<Vec<String>> = model
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| with_marks(content_text(&c.content), &c.footnote_marks))
                    .collect()
            })
            .collect();
        let widths = column_widths(model, &headers, &body);
        let header_style = Style::new().bold().force_styling(true);

        let mut lines = Vec::new();
        if let Some(title) = model.title() {
            lines.push(title.to_string());
        }
        if let Some(subtitle) = model.subtitle() {
            lines.push(subtitle.to_string());
        }
        if !model.spanners().is_empty() {
            lines.push(spanner_line(model, &widths));
        }

        let header_line = model
            .headers()
            .iter()
            .zip(&headers)
            .zip(&widths)
            .map(|((h, text), &w)| {
                let padded = pad(text, w, h.align);
                if self.bold_headers {
                    header_style.apply_to(padded).to_string()
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        lines.push(header_line);
        lines.push(
            widths
                .iter()
                .map(|&w| "-".repeat(w))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP),
        );

        for (row, texts) in model.rows().iter().zip(&body) {
            lines.push(
                row.iter()
                    .zip(texts)
                    .zip(&widths)
                    .map(|((cell, text), &w)| pad(text, w, cell.align))
                    .collect::<Vec<_>>()
                    .join(COLUMN_GAP),
            );
        }

        if !model.footnotes().is_empty() || !model.source_notes().is_empty() {
            lines.push(String::new());
        }
        for note in model.footnotes() {
            lines.push(format!("[{}] {}", note.mark, note.text));
        }
        for note in model.source_notes() {
            lines.push(note.clone());
        }

        let mut out = lines
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n");
        out.push('\n');
        Ok(out)
    }
}
