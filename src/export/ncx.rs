//! NCX navigation map.

use tracing::warn;

use crate::model::Book;
use crate::util::escape_xml;

use super::{
    EmptyVolumePolicy, TITLE_PAGE_ID, chapter_id, document_href, is_title_only, volume_page_id,
};

/// Generate `toc.ncx` from the book tree.
///
/// Each volume gets a navigation point targeting its first chapter, with
/// one nested point per chapter. Play order is assigned depth-first,
/// starting at 1. Targets are derived from the same positions used by
/// [`generate_documents`](super::generate_documents); a book without
/// chapters gets one point for its title page.
pub fn generate_ncx(book: &Book, identifier: &str, policy: EmptyVolumePolicy) -> String {
    let mut ncx = String::new();

    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content=""#,
    );
    ncx.push_str(&escape_xml(identifier));
    ncx.push_str(
        r#""/>
    <meta name="dtb:depth" content="2"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
    <text>"#,
    );
    ncx.push_str(&escape_xml(&book.metadata.title));
    ncx.push_str(
        r#"</text>
  </docTitle>
  <navMap>
"#,
    );

    let mut play_order = 1;
    if is_title_only(book, policy) {
        let href = document_href(TITLE_PAGE_ID);
        open_nav_point(&mut ncx, &book.metadata.title, &href, &mut play_order, 2);
        close_nav_point(&mut ncx, 2);
    }
    for (v, volume) in book.volumes.iter().enumerate() {
        let vol_idx = v + 1;
        let target = if volume.chapters.is_empty() {
            match policy {
                EmptyVolumePolicy::TitlePage => document_href(&volume_page_id(vol_idx)),
                EmptyVolumePolicy::Skip => {
                    warn!(volume = %volume.title, "skipping navigation point for empty volume");
                    continue;
                }
            }
        } else {
            document_href(&chapter_id(vol_idx, 1))
        };

        open_nav_point(&mut ncx, &volume.title, &target, &mut play_order, 2);
        for (c, chapter) in volume.chapters.iter().enumerate() {
            let href = document_href(&chapter_id(vol_idx, c + 1));
            open_nav_point(&mut ncx, &chapter.title, &href, &mut play_order, 3);
            close_nav_point(&mut ncx, 3);
        }
        close_nav_point(&mut ncx, 2);
    }

    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

fn open_nav_point(ncx: &mut String, label: &str, src: &str, play_order: &mut usize, indent: usize) {
    let indent_str = "  ".repeat(indent);

    ncx.push_str(&format!(
        "{}<navPoint id=\"nav{}\" playOrder=\"{}\">\n",
        indent_str, play_order, play_order
    ));
    ncx.push_str(&format!(
        "{}  <navLabel><text>{}</text></navLabel>\n",
        indent_str,
        escape_xml(label)
    ));
    ncx.push_str(&format!(
        "{}  <content src=\"{}\"/>\n",
        indent_str,
        escape_xml(src)
    ));

    *play_order += 1;
}

fn close_nav_point(ncx: &mut String, indent: usize) {
    ncx.push_str(&"  ".repeat(indent));
    ncx.push_str("</navPoint>\n");
}
