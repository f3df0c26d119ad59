//! Input data: raw scalar values and immutable datasets.
//!
//! A [`Dataset`] is supplied by whatever loads the source data (a CSV reader,
//! a database query, a hand-built fixture). tabkit never parses files or
//! fetches data itself; it only validates the shape it is given.

pub mod dataset;
pub mod value;

pub use dataset::Dataset;
pub use value::Scalar;
