//! Line classification for the manuscript dialect.
//!
//! Classification is context free: the same line always yields the same
//! [`LineKind`]. Whether a heading actually opens a chapter, or a body line
//! is kept at all, is decided by the builder based on its current state.

/// Line that opens the metadata block.
pub const METADATA_DELIMITER: &str = "━━━━━━━━━";

/// Prefix of the book title field inside the metadata block.
pub const TITLE_MARKER: &str = "「书名：";

/// Prefix of the author field inside the metadata block.
pub const AUTHOR_MARKER: &str = "「作者：";

/// Prefix of the line announcing that the description follows.
pub const DESCRIPTION_MARKER: &str = "「书籍简介：";

/// Prefix of a volume header. The title follows directly.
pub const VOLUME_MARKER: &str = "[卷名] ";

const FIELD_CLOSE: char = '」';

/// Classification of a line outside the metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// The metadata block delimiter.
    Delimiter,
    /// A volume header carrying the volume title.
    Volume(&'a str),
    /// A non-indented, non-blank line; the trimmed text is the candidate
    /// chapter title.
    Heading(&'a str),
    /// Anything else: indented prose or a blank line.
    Body,
}

/// Classification of a line inside the metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataLine<'a> {
    Delimiter,
    Title(&'a str),
    Author(&'a str),
    /// The description itself is on the following line.
    DescriptionMarker,
    Other,
}

/// Classify a line read while scanning for volumes and chapters.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if line == METADATA_DELIMITER {
        return LineKind::Delimiter;
    }
    if let Some(title) = line.strip_prefix(VOLUME_MARKER)
        && !title.is_empty()
    {
        return LineKind::Volume(title);
    }

    let trimmed = line.trim();
    if !trimmed.is_empty() && !is_indented(line) {
        LineKind::Heading(trimmed)
    } else {
        LineKind::Body
    }
}

/// Classify a line read inside the metadata block.
pub fn classify_metadata_line(line: &str) -> MetadataLine<'_> {
    if line == METADATA_DELIMITER {
        MetadataLine::Delimiter
    } else if let Some(rest) = line.strip_prefix(TITLE_MARKER) {
        MetadataLine::Title(field_value(rest))
    } else if let Some(rest) = line.strip_prefix(AUTHOR_MARKER) {
        MetadataLine::Author(field_value(rest))
    } else if line.starts_with(DESCRIPTION_MARKER) {
        MetadataLine::DescriptionMarker
    } else {
        MetadataLine::Other
    }
}

/// Whether the line starts with an ASCII or ideographic space.
pub fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\u{3000}'])
}

/// Strip the closing bracket from a field value, if present.
fn field_value(rest: &str) -> &str {
    let rest = rest.trim_end();
    rest.strip_suffix(FIELD_CLOSE).unwrap_or(rest)
}
