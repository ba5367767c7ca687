//! Conversion of rule tables into batch job documents.
//!
//! [`normalize_row`] validates a single row against its check kind;
//! [`assemble`] drives a whole table through it, stopping at the first
//! failing row.

pub mod assemble;
pub mod normalize;

pub use assemble::{Assembly, assemble, convert_path, convert_reader};
pub use normalize::normalize_row;
