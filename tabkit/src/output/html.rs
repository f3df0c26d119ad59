//! HTML table exporter.

use htmlescape::encode_minimal;
use std::fmt::{self, Write};

use super::Exporter;
use crate::error::TabkitError;
use crate::render::{CellContent, Fragment, ImageRef, RenderModel};
use crate::Result;

/// Writes a render model as a standalone `<table>` element.
///
/// Alignment and width hints become inline styles so the fragment renders
/// the same without an accompanying stylesheet.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    class: Option<String>,
}

impl HtmlExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the `class` attribute of the table element
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

fn image_html(image: &ImageRef) -> String {
    match image.height_px {
        Some(h) => format!(
            "<img src=\"{}\" style=\"height:{}px\">",
            encode_minimal(&image.path),
            h
        ),
        None => format!("<img src=\"{}\">", encode_minimal(&image.path)),
    }
}

fn content_html(content: &CellContent) -> String {
    match content {
        CellContent::Text(s) => encode_minimal(s),
        CellContent::Image(image) => image_html(image),
        CellContent::Composite(parts) => parts
            .iter()
            .map(|p| match p {
                Fragment::Text(s) => encode_minimal(s),
                Fragment::Image(image) => image_html(image),
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn marks_html(marks: &[String]) -> String {
    if marks.is_empty() {
        String::new()
    } else {
        format!(
            "<sup class=\"footnote-mark\">{}</sup>",
            encode_minimal(&marks.join(","))
        )
    }
}

impl HtmlExporter {
    fn write_table(&self, model: &RenderModel, out: &mut String) -> fmt::Result {
        let columns = model.column_count();

        match &self.class {
            Some(class) => writeln!(out, "<table class=\"{}\">", encode_minimal(class))?,
            None => writeln!(out, "<table>")?,
        }

        if model.title().is_some() || model.subtitle().is_some() {
            out.push_str("<caption>");
            if let Some(title) = model.title() {
                write!(out, "<div class=\"title\">{}</div>", encode_minimal(title))?;
            }
            if let Some(subtitle) = model.subtitle() {
                write!(out, "<div class=\"subtitle\">{}</div>", encode_minimal(subtitle))?;
            }
            out.push_str("</caption>\n");
        }

        if model.headers().iter().any(|h| h.width_px.is_some()) {
            out.push_str("<colgroup>");
            for header in model.headers() {
                match header.width_px {
                    Some(w) => write!(out, "<col style=\"width:{}px\">", w)?,
                    None => out.push_str("<col>"),
                }
            }
            out.push_str("</colgroup>\n");
        }

        out.push_str("<thead>\n");
        if !model.spanners().is_empty() {
            out.push_str("<tr class=\"spanners\">");
            let mut col = 0;
            for spanner in model.spanners() {
                while col < spanner.start {
                    out.push_str("<th></th>");
                    col += 1;
                }
                write!(
                    out,
                    "<th colspan=\"{}\" style=\"text-align:center\">{}</th>",
                    spanner.span,
                    encode_minimal(&spanner.label)
                )?;
                col += spanner.span;
            }
            while col < columns {
                out.push_str("<th></th>");
                col += 1;
            }
            out.push_str("</tr>\n");
        }
        out.push_str("<tr>");
        for header in model.headers() {
            write!(
                out,
                "<th style=\"text-align:{}\">{}{}</th>",
                header.align.as_str(),
                encode_minimal(&header.label),
                marks_html(&header.footnote_marks)
            )?;
        }
        out.push_str("</tr>\n</thead>\n<tbody>\n");

        for row in model.rows() {
            out.push_str("<tr>");
            for cell in row {
                write!(
                    out,
                    "<td style=\"text-align:{}\">{}{}</td>",
                    cell.align.as_str(),
                    content_html(&cell.content),
                    marks_html(&cell.footnote_marks)
                )?;
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n");

        if !model.footnotes().is_empty() || !model.source_notes().is_empty() {
            out.push_str("<tfoot>\n");
            for note in model.footnotes() {
                writeln!(
                    out,
                    "<tr><td colspan=\"{}\" class=\"footnote\"><sup>{}</sup> {}</td></tr>",
                    columns,
                    encode_minimal(&note.mark),
                    encode_minimal(&note.text)
                )?;
            }
            for note in model.source_notes() {
                writeln!(
                    out,
                    "<tr><td colspan=\"{}\" class=\"source-note\">{}</td></tr>",
                    columns,
                    encode_minimal(note)
                )?;
            }
            out.push_str("</tfoot>\n");
        }

        out.push_str("</table>\n");
        Ok(())
    }
}

impl Exporter for HtmlExporter {
    fn export(&self, model: &RenderModel) -> Result<String> {
        let mut out = String::new();
        self.write_table(model, &mut out)
            .map_err(|e| TabkitError::Export(e.to_string()))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnDescriptor, ColumnSpec, Footnote, ImageSource, Spanner};
    use crate::data::Dataset;
    use crate::render::TableRenderer;

    fn model() -> RenderModel {
        let data = Dataset::new(
            ["Model", "Maker", "Score"],
            vec![
                vec!["A&B".into(), "acme".into(), 0.5.into()],
                vec!["<C>".into(), "zeta".into(), 0.75.into()],
            ],
        )
        .unwrap();
        let spec = ColumnSpec::new()
            .column(ColumnDescriptor::new("Model").width_px(120))
            .column(ColumnDescriptor::new("Maker").image(ImageSource::new("logos/{}.png").height(16)))
            .column(ColumnDescriptor::new("Score"));
        TableRenderer::new(&data, spec)
            .title("Results")
            .spanner(Spanner::new("Details", ["Maker", "Score"]))
            .footnote(Footnote::header("Score", "higher is better"))
            .source_note("Source: internal runs")
            .render()
            .unwrap()
    }

    #[test]
    fn test_escapes_text() {
        let html = HtmlExporter::new().export(&model()).unwrap();
        assert!(html.contains("A&amp;B"));
        assert!(html.contains("&lt;C&gt;"));
        assert!(!html.contains("<C>"));
    }

    #[test]
    fn test_structure() {
        let html = HtmlExporter::new().class("results").export(&model()).unwrap();
        assert!(html.starts_with("<table class=\"results\">"));
        assert!(html.contains("<caption><div class=\"title\">Results</div></caption>"));
        assert!(html.contains("<col style=\"width:120px\"><col><col>"));
        assert!(html.contains(
            "<tr class=\"spanners\"><th></th><th colspan=\"2\" style=\"text-align:center\">Details</th></tr>"
        ));
        assert!(html.contains(
            "<th style=\"text-align:right\">Score<sup class=\"footnote-mark\">1</sup></th>"
        ));
        assert!(html.contains("<img src=\"logos/acme.png\" style=\"height:16px\">"));
        assert!(html.contains("<td style=\"text-align:right\">0.75</td>"));
        assert!(html.contains("class=\"footnote\"><sup>1</sup> higher is better"));
        assert!(html.contains("class=\"source-note\">Source: internal runs"));
        assert!(html.trim_end().ends_with("</table>"));
    }
}
