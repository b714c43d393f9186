//! EPUB generation.
//!
//! Generation runs in a fixed order: chapter documents first (which also
//! fill the manifest and spine), then the NCX navigation map, then the OPF
//! package descriptor, and finally the zip archive.
//!
//! # Example
//!
//! ```no_run
//! use txt2epub::export::{EpubExporter, Exporter};
//! use std::fs::File;
//!
//! let book = txt2epub::read_txt("novel.txt")?;
//! let mut file = File::create("novel.epub")?;
//! EpubExporter::new().export(&book, &mut file)?;
//! # Ok::<(), txt2epub::Error>(())
//! ```

use std::io::{Seek, Write};

use crate::error::Result;
use crate::model::Book;

mod archive;
mod chapter;
mod epub;
mod ncx;
mod opf;

pub use archive::{MIMETYPE, archive_tree};
pub use chapter::{ContentDocument, generate_documents, render_chapter, render_title_page};
pub use epub::{EpubConfig, EpubExporter, convert, convert_with_config};
pub use ncx::generate_ncx;
pub use opf::{PackageInfo, generate_opf};

/// Media type of every generated content document.
pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// Navigation map file name, relative to `OEBPS/`.
pub const NCX_HREF: &str = "toc.ncx";

/// Package descriptor file name, relative to `OEBPS/`.
pub const OPF_HREF: &str = "content.opf";

/// Trait for exporting books.
pub trait Exporter {
    /// Export the book to the provided writer.
    fn export<W: Write + Seek>(&self, book: &Book, writer: &mut W) -> Result<()>;
}

/// How volumes without any chapter appear in the generated book.
///
/// Volumes have no document of their own, so a volume's navigation point
/// normally targets its first chapter. An empty volume has no such target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyVolumePolicy {
    /// Generate a `vol{N}.xhtml` page holding the volume title, add it to
    /// the manifest and spine, and point the navigation entry at it.
    #[default]
    TitlePage,
    /// Leave the volume out of the navigation map.
    Skip,
}

/// One `<item>` of the package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
}

/// Manifest and spine entries, in the order documents were generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageLedger {
    pub manifest: Vec<ManifestItem>,
    /// `idref`s in reading order.
    pub spine: Vec<String>,
}

impl PackageLedger {
    /// Record a content document in both the manifest and the spine.
    pub fn add_document(&mut self, id: impl Into<String>, href: impl Into<String>) {
        let id = id.into();
        self.manifest.push(ManifestItem {
            id: id.clone(),
            href: href.into(),
            media_type: XHTML_MEDIA_TYPE.to_string(),
        });
        self.spine.push(id);
    }

    /// Record a non-document resource (manifest only).
    pub fn add_resource(
        &mut self,
        id: impl Into<String>,
        href: impl Into<String>,
        media_type: impl Into<String>,
    ) {
        self.manifest.push(ManifestItem {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
        });
    }

    pub fn contains_href(&self, href: &str) -> bool {
        self.manifest.iter().any(|item| item.href == href)
    }
}

/// Id of the document for chapter `chapter` of volume `volume` (both 1-based).
pub fn chapter_id(volume: usize, chapter: usize) -> String {
    format!("vol{volume}_chap{chapter}")
}

/// Id of the title page generated for an empty volume (1-based).
pub fn volume_page_id(volume: usize) -> String {
    format!("vol{volume}")
}

/// Id of the page generated when nothing else would be in the spine.
pub const TITLE_PAGE_ID: &str = "title";

/// True when `book` yields no chapter or volume document under `policy`,
/// so only a book title page is generated.
pub fn is_title_only(book: &Book, policy: EmptyVolumePolicy) -> bool {
    book.chapter_count() == 0
        && (book.volumes.is_empty() || policy == EmptyVolumePolicy::Skip)
}

/// File name of the document with the given id.
pub fn document_href(id: &str) -> String {
    format!("{id}.xhtml")
}
