//! # tabkit
//!
//! Turn a tabular dataset plus column-level presentation directives into a
//! presentation-ready table model, then export it.
//!
//! ## Overview
//!
//! Report tables are usually built by piping a data frame through a chain of
//! formatting calls and saving the result. tabkit splits that into explicit
//! stages:
//!
//! 1. **Dataset**: ordered rows of named scalar values (text, number, missing)
//! 2. **ColumnSpec**: which columns to show, in which order, and how
//!    (labels, alignment, number formats, images, missing-value placeholders)
//! 3. **RenderModel**: the resolved, format-independent table
//! 4. **Exporter**: HTML, plain text, JSON, or an external image/document/slide encoder
//!
//! ## Features
//!
//! - **Pure rendering**: no I/O, no shared state, deterministic output
//! - **Column reuse**: the same source column may appear several times with
//!   different transforms (e.g. a flag image next to the country name)
//! - **Permissive number formats**: numeric directives pass non-numeric values through
//! - **Footnotes and spanners**: validated against the rendered table
//! - **Serde everywhere**: configuration and models load from and save to JSON
//!
//! ## Example
//!
//! ```rust
//! use tabkit::{
//!     Alignment, ColumnDescriptor, ColumnSpec, Dataset, Exporter, Footnote, HtmlExporter,
//!     NumberFormat, TableRenderer,
//! };
//!
//! let data = Dataset::new(
//!     ["Rank", "Model", "Time"],
//!     vec![
//!         vec![1.into(), "A".into(), 2.0.into()],
//!         vec![2.into(), "B".into(), 2.5.into()],
//!         vec![3.into(), "C".into(), 3.1.into()],
//!     ],
//! )
//! .unwrap();
//!
//! let spec = ColumnSpec::new()
//!     .column(ColumnDescriptor::new("Rank"))
//!     .column(ColumnDescriptor::new("Model").align(Alignment::Left))
//!     .column(
//!         ColumnDescriptor::new("Time")
//!             .with_label("Time (s)")
//!             .number(NumberFormat::new().decimals(1)),
//!     );
//!
//! let model = TableRenderer::new(&data, spec)
//!     .title("Leaderboard")
//!     .footnote(Footnote::body("Time", 0, "Best of three runs"))
//!     .render()
//!     .unwrap();
//!
//! assert_eq!(model.headers().len(), 3);
//! assert_eq!(model.cell(0, 2).unwrap().content.plain_text(), "2.0");
//!
//! let html = HtmlExporter::new().export(&model).unwrap();
//! assert!(html.contains("Time (s)"));
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod output;
pub mod render;

pub use config::{
    Alignment, ColumnDescriptor, ColumnSpec, Footnote, FootnoteLocation, ImageSource, NumberFormat,
    Spanner, Transform,
};
pub use data::{Dataset, Scalar};
pub use error::TabkitError;
pub use output::{
    DocumentExportOptions, Exporter, HtmlExporter, ImageExportOptions, JsonExporter, Margins,
    Orientation, PageSize, SlideExportOptions, TextExporter,
};
pub use render::{
    render, BodyCell, CellContent, FootnoteDef, Fragment, HeaderCell, ImageRef, RenderModel,
    SpannerCell, TableRenderer,
};

/// Result type for tabkit operations
pub type Result<T> = std::result::Result<T, TabkitError>;
