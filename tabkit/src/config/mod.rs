//! Caller-authored presentation directives.
//!
//! Everything here is plain data with builder methods and serde support, so
//! it can be written in code or loaded from JSON:
//!
//! - **ColumnSpec / ColumnDescriptor**: which columns to show and how
//! - **NumberFormat**: decimals, separators, scale, prefix/suffix
//! - **Footnote / Spanner**: annotations placed on the rendered table

pub mod column;
pub mod note;
pub mod number;

pub use column::{
    Alignment, ColumnDescriptor, ColumnSpec, ImageSource, Transform, DEFAULT_MISSING_TEXT,
};
pub use note::{Footnote, FootnoteLocation, Spanner};
pub use number::{NumberFormat, MAX_DECIMALS};
