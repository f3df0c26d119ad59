//! Output: turn a render model into a concrete artifact.
//!
//! Exporters are a pure presentation layer. They read the resolved labels,
//! alignments and cell content from a [`RenderModel`] and never recompute
//! anything.
//!
//! - **HtmlExporter**: standalone `<table>` element
//! - **TextExporter**: padded monospace grid
//! - **JsonExporter**: the model itself, serialized
//!
//! Image, document and slide-deck exporters need format encoders outside
//! this crate; [`targets`] holds their settings.

pub mod html;
pub mod json;
pub mod targets;
pub mod text;

use std::io::Write;

use crate::render::RenderModel;
use crate::Result;

pub use html::HtmlExporter;
pub use json::JsonExporter;
pub use targets::{
    DocumentExportOptions, ImageExportOptions, Margins, Orientation, PageSize, SlideExportOptions,
};
pub use text::TextExporter;

/// Converts a render model into one output format.
pub trait Exporter {
    /// Produce the artifact as a string
    fn export(&self, model: &RenderModel) -> Result<String>;

    /// Produce the artifact and write it out
    fn write_to(&self, model: &RenderModel, writer: &mut dyn Write) -> Result<()> {
        let output = self.export(model)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }
}
