//! Manuscript import.
//!
//! The manuscript dialect is line oriented:
//!
//! ```text
//! ━━━━━━━━━
//! 「书名：书名」
//! 「作者：作者」
//! 「书籍简介：
//! 简介内容
//! [卷名] 第一卷
//! 第一章 标题
//! 　　正文……
//! ```
//!
//! A non-indented line inside a volume starts a new chapter; indented or
//! blank lines belong to the current chapter.

mod builder;
mod classify;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::model::Book;
use crate::util::decode_text;

pub use builder::{Cursor, ParserState, build_book};
pub use classify::{
    AUTHOR_MARKER, DESCRIPTION_MARKER, LineKind, METADATA_DELIMITER, MetadataLine, TITLE_MARKER,
    VOLUME_MARKER, classify_line, classify_metadata_line, is_indented,
};

/// Parse manuscript text that is already in memory.
pub fn parse_txt(text: &str) -> Book {
    build_book(text.lines())
}

/// Read and parse a manuscript file.
///
/// The file must be UTF-8, or carry a UTF-8/UTF-16 byte order mark.
pub fn read_txt<P: AsRef<Path>>(path: P) -> Result<Book> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let text = decode_text(&bytes).ok_or_else(|| Error::Encoding {
        path: path.to_path_buf(),
    })?;

    let book = parse_txt(&text);
    info!(
        title = %book.metadata.title,
        volumes = book.volumes.len(),
        chapters = book.chapter_count(),
        "parsed {}",
        path.display()
    );
    Ok(book)
}
