//! OPF package descriptor.

use crate::model::Metadata;
use crate::util::escape_xml;

use super::{NCX_HREF, PackageLedger};

/// Book-level values written into the package metadata.
#[derive(Debug, Clone, Copy)]
pub struct PackageInfo<'a> {
    pub metadata: &'a Metadata,
    pub identifier: &'a str,
    pub language: &'a str,
    /// `YYYY-MM-DD`
    pub date: &'a str,
}

/// Generate `content.opf`.
///
/// The NCX item comes first in the manifest, followed by the ledger's
/// items in insertion order. Spine order is the ledger's spine order.
pub fn generate_opf(info: &PackageInfo<'_>, ledger: &PackageLedger) -> String {
    let mut opf = String::new();

    opf.push_str(
        r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="BookId" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
    );

    opf.push_str(&format!(
        "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
        escape_xml(info.identifier)
    ));
    opf.push_str(&format!(
        "    <dc:title>{}</dc:title>\n",
        escape_xml(&info.metadata.title)
    ));
    opf.push_str(&format!(
        "    <dc:language>{}</dc:language>\n",
        escape_xml(info.language)
    ));
    opf.push_str(&format!(
        "    <dc:creator opf:role=\"aut\">{}</dc:creator>\n",
        escape_xml(&info.metadata.author)
    ));
    opf.push_str(&format!(
        "    <dc:date>{}</dc:date>\n",
        escape_xml(info.date)
    ));
    opf.push_str(&format!(
        "    <dc:description>{}</dc:description>\n",
        escape_xml(&info.metadata.description)
    ));

    opf.push_str("  </metadata>\n  <manifest>\n");
    opf.push_str(&format!(
        "    <item id=\"toc\" href=\"{}\" media-type=\"application/x-dtbncx+xml\"/>\n",
        NCX_HREF
    ));
    for item in &ledger.manifest {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
            escape_xml(&item.id),
            escape_xml(&item.href),
            escape_xml(&item.media_type)
        ));
    }
    opf.push_str("  </manifest>\n");

    opf.push_str("  <spine toc=\"toc\">\n");
    for idref in &ledger.spine {
        opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", escape_xml(idref)));
    }
    opf.push_str("  </spine>\n");

    opf.push_str("</package>\n");
    opf
}
