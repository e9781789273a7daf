//! Remote library service clients.

pub mod kitsu;
pub mod traits;

pub use traits::{LibraryListEntry, LibraryService, ProgressUpdate};
