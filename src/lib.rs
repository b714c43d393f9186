//! # txt2epub
//!
//! Convert plain-text novel manuscripts into EPUB 2 books.
//!
//! ## Features
//!
//! - Metadata header block (`「书名：`, `「作者：`, `「书籍简介：`)
//! - Volumes (`[卷名] ...`) and chapters (non-indented lines)
//! - Inline `[img=W,H]src[/img]` tags, with referenced images bundled
//! - Consistent chapter documents, NCX navigation and OPF package
//!
//! ## Quick Start
//!
//! ```no_run
//! // Convert a manuscript in one call
//! txt2epub::convert("novel.txt", "novel.epub")?;
//! # Ok::<(), txt2epub::Error>(())
//! ```
//!
//! ## Working with Books
//!
//! ```
//! use txt2epub::parse_txt;
//!
//! let book = parse_txt("[卷名] 第一卷\n第一章 起\n　　正文\n");
//! assert_eq!(book.volumes.len(), 1);
//! assert_eq!(book.volumes[0].chapters[0].title, "第一章 起");
//! ```

pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod transform;
pub(crate) mod util;

pub use error::{Error, Result};
pub use export::{EmptyVolumePolicy, EpubConfig, EpubExporter, Exporter, convert, convert_with_config};
pub use import::{parse_txt, read_txt};
pub use model::{Book, Chapter, Metadata, Volume};
