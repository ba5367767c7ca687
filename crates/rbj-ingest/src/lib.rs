//! Rule table ingestion.
//!
//! Reads semicolon-separated rule tables into [`RawRow`]s and parses the
//! specials mini-language.

pub mod columns;
pub mod reader;
pub mod specials;

pub use columns::{COLUMN_HEADINGS, Column};
pub use reader::{Header, RawRow, RuleTableReader, WidthAdjustment};
pub use specials::parse_specials;
