//! Small shared helpers: escaping, decoding, image media types, identifiers.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

/// Escape text for use in XML character data or attribute values.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}

/// Decode manuscript bytes.
///
/// A UTF-8 or UTF-16 byte order mark selects the encoding and is dropped;
/// without one the bytes must be UTF-8. Returns `None` on malformed input
/// instead of substituting replacement characters.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(decode_text(b"\xEF\xBB\xBFabc").as_deref(), Some("abc"));
/// assert_eq!(decode_text(b"\xC3\x28"), None);
/// ```
pub fn decode_text(bytes: &[u8]) -> Option<Cow<'_, str>> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
}

// ============================================================================
// Image media types
// ============================================================================

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Media types keyed by lowercase file extension.
const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
];

/// Leading signatures for files whose extension says nothing.
const IMAGE_SIGNATURES: &[(&[u8], &str)] = &[
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"\x89PNG\r\n\x1A\n", "image/png"),
    (b"GIF8", "image/gif"),
];

/// Manifest media type for a bundled image.
///
/// The extension of `src` wins; otherwise the leading bytes of `data` are
/// checked (WebP needs the `RIFF....WEBP` container header).
pub fn image_media_type(src: &str, data: &[u8]) -> &'static str {
    let extension = Path::new(src)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    if let Some(ext) = extension
        && let Some(&(_, media_type)) = IMAGE_EXTENSIONS.iter().find(|(e, _)| *e == ext)
    {
        return media_type;
    }

    if let Some(&(_, media_type)) = IMAGE_SIGNATURES
        .iter()
        .find(|(magic, _)| data.starts_with(magic))
    {
        return media_type;
    }
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return "image/webp";
    }

    FALLBACK_MEDIA_TYPE
}

// ============================================================================
// Identifiers
// ============================================================================

/// Namespace for name-based book identifiers.
const BOOK_NAMESPACE: [u8; 16] = [
    0x6b, 0xa7, 0xb8, 0x12, 0x9d, 0xad, 0x11, 0xd1, 0x80, 0xb4, 0x00, 0xc0, 0x4f, 0xd4, 0x30,
    0xc8,
];

/// Derive a stable `urn:uuid:` identifier from a book's title and author.
///
/// Uses the name-based SHA-1 (version 5) UUID layout so the same book
/// always gets the same identifier.
pub fn book_identifier(title: &str, author: &str) -> String {
    let mut hasher = sha1_smol::Sha1::new();
    hasher.update(&BOOK_NAMESPACE);
    hasher.update(title.as_bytes());
    hasher.update(&[0]);
    hasher.update(author.as_bytes());
    let digest = hasher.digest().bytes();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    bytes[6] = (bytes[6] & 0x0f) | 0x50;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "urn:uuid:{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

// ============================================================================
// Tests
// ============================================================================
