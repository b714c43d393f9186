/// Placeholder title used when the manuscript has no `「书名：` line.
pub const DEFAULT_TITLE: &str = "默认标题";

/// Placeholder author used when the manuscript has no `「作者：` line.
pub const DEFAULT_AUTHOR: &str = "默认作者";

/// In-memory representation of a parsed manuscript.
///
/// Volumes and chapters are kept in the order they appear in the source
/// text; that order is also the reading order of the generated EPUB.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    pub metadata: Metadata,
    pub volumes: Vec<Volume>,
}

/// Book metadata read from the header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub description: String,
}

/// A volume (`[卷名] ...`) and the chapters that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub title: String,
    pub chapters: Vec<Chapter>,
}

/// A chapter: its heading line plus the raw body lines beneath it.
///
/// Body lines are stored verbatim, including blank lines and leading
/// indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub content: Vec<String>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of chapters across all volumes.
    pub fn chapter_count(&self) -> usize {
        self.volumes.iter().map(|v| v.chapters.len()).sum()
    }

    /// Iterate chapters in reading order with their 1-based
    /// `(volume, chapter)` positions.
    pub fn chapters(&self) -> impl Iterator<Item = (usize, usize, &Chapter)> {
        self.volumes.iter().enumerate().flat_map(|(v, volume)| {
            volume
                .chapters
                .iter()
                .enumerate()
                .map(move |(c, chapter)| (v + 1, c + 1, chapter))
        })
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            description: String::new(),
        }
    }
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Volume {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            chapters: Vec::new(),
        }
    }

    pub fn with_chapter(mut self, chapter: Chapter) -> Self {
        self.chapters.push(chapter);
        self
    }
}

impl Chapter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.content.push(line.into());
        self
    }
}
