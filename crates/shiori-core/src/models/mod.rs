mod library;

pub use library::LibraryEntry;
