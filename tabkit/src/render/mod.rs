//! Rendering: turn a dataset and presentation directives into a table model.
//!
//! The data flow is:
//! 1. Dataset (raw scalar values, supplied by the caller)
//! 2. ColumnSpec + footnotes + spanners (caller configuration)
//! 3. RenderModel (resolved labels, alignments, cell content, marks)
//!
//! The RenderModel is then handed to an exporter in [`crate::output`].

pub mod model;
pub mod renderer;

pub use model::{
    BodyCell, CellContent, FootnoteDef, Fragment, HeaderCell, ImageRef, RenderModel, SpannerCell,
};
pub use renderer::{render, TableRenderer};
