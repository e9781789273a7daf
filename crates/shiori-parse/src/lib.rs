//! Release-group file name parsing.
//!
//! Decodes names such as `[SubsPlease] Sousou no Frieren - 05 (1080p).mkv`
//! into the group, title, optional season marker and episode number.

pub mod elements;
pub mod error;
pub mod parser;

pub use elements::ParsedFilename;
pub use error::ParseError;
pub use parser::parse;
