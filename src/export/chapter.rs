//! Chapter content documents.

use tracing::{debug, warn};

use crate::model::{Book, Chapter};
use crate::transform::render_paragraph;
use crate::util::escape_xml;

use super::{
    EmptyVolumePolicy, PackageLedger, TITLE_PAGE_ID, chapter_id, document_href, is_title_only,
    volume_page_id,
};

/// A generated XHTML document, ready to be written under `OEBPS/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDocument {
    pub id: String,
    pub href: String,
    pub content: String,
}

/// Render every chapter in reading order.
///
/// Each document is recorded in `ledger` (manifest and spine) in the same
/// order it is returned. Empty volumes get a title page when the policy asks
/// for one. A book with nothing else to read gets a single page holding the
/// book title, so the spine is never empty.
pub fn generate_documents(
    book: &Book,
    policy: EmptyVolumePolicy,
    ledger: &mut PackageLedger,
) -> Vec<ContentDocument> {
    if is_title_only(book, policy) {
        warn!("book has no chapters; writing a title page only");
        let content = render_title_page(&book.metadata.title);
        return vec![record(ledger, TITLE_PAGE_ID.to_string(), content)];
    }

    let mut documents = Vec::with_capacity(book.chapter_count());

    for (v, volume) in book.volumes.iter().enumerate() {
        let vol_idx = v + 1;

        if volume.chapters.is_empty() {
            match policy {
                EmptyVolumePolicy::TitlePage => {
                    let id = volume_page_id(vol_idx);
                    let content = render_title_page(&volume.title);
                    documents.push(record(ledger, id, content));
                }
                EmptyVolumePolicy::Skip => {}
            }
            continue;
        }

        for (c, chapter) in volume.chapters.iter().enumerate() {
            let id = chapter_id(vol_idx, c + 1);
            let content = render_chapter(chapter);
            documents.push(record(ledger, id, content));
        }
    }

    documents
}

fn record(ledger: &mut PackageLedger, id: String, content: String) -> ContentDocument {
    let href = document_href(&id);
    debug!(%href, bytes = content.len(), "generated document");
    ledger.add_document(id.as_str(), href.as_str());
    ContentDocument { id, href, content }
}

/// Render a chapter: title, heading, then one paragraph per content line.
pub fn render_chapter(chapter: &Chapter) -> String {
    let mut body = String::new();
    for line in &chapter.content {
        body.push_str(&render_paragraph(line));
    }
    xhtml_document(&chapter.title, &body)
}

/// Render a page holding only a heading, used for empty volumes and for
/// books without chapters.
pub fn render_title_page(title: &str) -> String {
    xhtml_document(title, "")
}

fn xhtml_document(title: &str, paragraphs: &str) -> String {
    let title = escape_xml(title);
    let mut doc = String::new();

    doc.push_str(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
  <title>"#,
    );
    doc.push_str(&title);
    doc.push_str("</title>\n</head>\n<body>\n  <h2>");
    doc.push_str(&title);
    doc.push_str("</h2>\n");
    if !paragraphs.is_empty() {
        doc.push_str("  ");
        doc.push_str(paragraphs);
        doc.push('\n');
    }
    doc.push_str("</body>\n</html>\n");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Volume;

    fn sample_book() -> Book {
        let mut book = Book::new();
        book.volumes.push(
            Volume::new("第一卷")
                .with_chapter(Chapter::new("第一章").with_line("　　你好").with_line(""))
                .with_chapter(Chapter::new("第二章")),
        );
        book.volumes.push(Volume::new("空卷"));
        book.volumes
            .push(Volume::new("第三卷").with_chapter(Chapter::new("终章")));
        book
    }

    #[test]
    fn test_render_chapter() {
        let chapter = Chapter::new("第一章 <开始>")
            .with_line("　　他说：好")
            .with_line("")
            .with_line("[img=100,200]pic.png[/img]");
        let doc = render_chapter(&chapter);

        assert!(doc.contains("<title>第一章 &lt;开始&gt;</title>"));
        assert!(doc.contains("<h2>第一章 &lt;开始&gt;</h2>"));
        assert!(doc.contains(concat!(
            "<p>　　他说:好</p><p>&#160;</p>",
            r#"<p><img src="pic.png" alt="" width="100" height="200"/></p>"#
        )));
    }

    #[test]
    fn test_paragraph_count_matches_content_lines() {
        let chapter = Chapter::new("章")
            .with_line("")
            .with_line("　　a")
            .with_line("   ")
            .with_line("");
        let doc = render_chapter(&chapter);
        assert_eq!(doc.matches("<p>").count(), 4);
        assert_eq!(doc.matches("<p>&#160;</p>").count(), 3);
    }

    #[test]
    fn test_generate_documents_with_title_pages() {
        let mut ledger = PackageLedger::default();
        let docs = generate_documents(&sample_book(), EmptyVolumePolicy::TitlePage, &mut ledger);

        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["vol1_chap1", "vol1_chap2", "vol2", "vol3_chap1"]);
        assert_eq!(ledger.spine, ids);
        assert_eq!(docs[2].href, "vol2.xhtml");
        assert!(docs[2].content.contains("<h2>空卷</h2>"));
    }

    #[test]
    fn test_generate_documents_skipping_empty_volumes() {
        let mut ledger = PackageLedger::default();
        let docs = generate_documents(&sample_book(), EmptyVolumePolicy::Skip, &mut ledger);

        let hrefs: Vec<_> = docs.iter().map(|d| d.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec!["vol1_chap1.xhtml", "vol1_chap2.xhtml", "vol3_chap1.xhtml"]
        );
        let manifest: Vec<_> = ledger.manifest.iter().map(|i| i.href.as_str()).collect();
        assert_eq!(manifest, hrefs);
    }

    #[test]
    fn test_book_without_chapters_gets_title_page() {
        let mut book = Book::new();
        book.metadata = crate::model::Metadata::new("只有书名");
        let mut ledger = PackageLedger::default();
        let docs = generate_documents(&book, EmptyVolumePolicy::TitlePage, &mut ledger);

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].href, "title.xhtml");
        assert!(docs[0].content.contains("<h2>只有书名</h2>"));
        assert_eq!(ledger.spine, vec!["title"]);
    }

    #[test]
    fn test_skipped_empty_volumes_fall_back_to_title_page() {
        let mut book = Book::new();
        book.volumes.push(Volume::new("空卷"));

        let mut ledger = PackageLedger::default();
        let docs = generate_documents(&book, EmptyVolumePolicy::Skip, &mut ledger);
        assert_eq!(ledger.spine, vec!["title"]);
        assert_eq!(docs[0].id, "title");

        let mut ledger = PackageLedger::default();
        generate_documents(&book, EmptyVolumePolicy::TitlePage, &mut ledger);
        assert_eq!(ledger.spine, vec!["vol1"]);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let book = sample_book();
        let mut a = PackageLedger::default();
        let mut b = PackageLedger::default();
        assert_eq!(
            generate_documents(&book, EmptyVolumePolicy::TitlePage, &mut a),
            generate_documents(&book, EmptyVolumePolicy::TitlePage, &mut b)
        );
        assert_eq!(a, b);
    }
}
