//! Core data model: a book split into volumes and chapters, plus the
//! metadata read from the manuscript header.

mod book;

pub use book::{Book, Chapter, DEFAULT_AUTHOR, DEFAULT_TITLE, Metadata, Volume};
