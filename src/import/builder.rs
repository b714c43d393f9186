//! State machine that assembles a [`Book`] from classified lines.

use tracing::warn;

use crate::model::{Book, Chapter, Volume};

use super::classify::{LineKind, MetadataLine, classify_line, classify_metadata_line};

/// Where body lines currently go, as indices into `Book::volumes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// No volume yet; headings and body lines are dropped.
    #[default]
    Preamble,
    /// Inside a volume but before its first chapter; body lines are dropped.
    Volume { volume: usize },
    /// Body lines are appended to this chapter.
    Chapter { volume: usize, chapter: usize },
}

/// Parser state. Each variant remembers the cursor to resume with once the
/// metadata block ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Scanning(Cursor),
    Metadata(Cursor),
    /// The previous line was the description marker. The next line is
    /// copied into the description and then scanned like any other.
    Description(Cursor),
}

impl Default for ParserState {
    fn default() -> Self {
        ParserState::Scanning(Cursor::Preamble)
    }
}

impl ParserState {
    /// Consume one line, mutating `book` as needed, and return the next state.
    pub fn step(self, line: &str, book: &mut Book) -> ParserState {
        match self {
            ParserState::Description(cursor) => {
                book.metadata.description = line.trim().to_string();
                ParserState::Scanning(cursor).step(line, book)
            }
            ParserState::Metadata(cursor) => match classify_metadata_line(line) {
                MetadataLine::Title(title) => {
                    book.metadata.title = title.to_string();
                    self
                }
                MetadataLine::Author(author) => {
                    book.metadata.author = author.to_string();
                    self
                }
                MetadataLine::DescriptionMarker => ParserState::Description(cursor),
                MetadataLine::Delimiter | MetadataLine::Other => self,
            },
            ParserState::Scanning(cursor) => match classify_line(line) {
                LineKind::Delimiter => ParserState::Metadata(cursor),
                LineKind::Volume(title) => {
                    book.volumes.push(Volume::new(title));
                    ParserState::Scanning(Cursor::Volume {
                        volume: book.volumes.len() - 1,
                    })
                }
                LineKind::Heading(title) => match cursor {
                    Cursor::Preamble => self,
                    Cursor::Volume { volume } | Cursor::Chapter { volume, .. } => {
                        let chapters = &mut book.volumes[volume].chapters;
                        chapters.push(Chapter::new(title));
                        ParserState::Scanning(Cursor::Chapter {
                            volume,
                            chapter: chapters.len() - 1,
                        })
                    }
                },
                LineKind::Body => {
                    if let Cursor::Chapter { volume, chapter } = cursor {
                        book.volumes[volume].chapters[chapter]
                            .content
                            .push(line.to_string());
                    }
                    self
                }
            },
        }
    }

    /// Finish parsing. A dangling description marker leaves the
    /// description empty.
    pub fn finish(self, book: &mut Book) {
        if let ParserState::Description(_) = self {
            warn!("description marker is the last line; description left empty");
            book.metadata.description.clear();
        }
    }
}

/// Run the state machine over every line of `text`.
pub fn build_book<'a>(lines: impl IntoIterator<Item = &'a str>) -> Book {
    let mut book = Book::new();
    let mut state = ParserState::default();
    for line in lines {
        state = state.step(line, &mut book);
    }
    state.finish(&mut book);
    book
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DEFAULT_AUTHOR, DEFAULT_TITLE};

    fn build(text: &str) -> Book {
        build_book(text.lines())
    }

    #[test]
    fn test_step_volume_resets_chapter() {
        let mut book = Book::new();
        let state = ParserState::Scanning(Cursor::Preamble)
            .step("[卷名] 一", &mut book)
            .step("第一章", &mut book);
        assert_eq!(
            state,
            ParserState::Scanning(Cursor::Chapter {
                volume: 0,
                chapter: 0
            })
        );

        let state = state.step("[卷名] 二", &mut book);
        assert_eq!(state, ParserState::Scanning(Cursor::Volume { volume: 1 }));
    }

    #[test]
    fn test_step_metadata_keeps_cursor() {
        let mut book = Book::new();
        let cursor = Cursor::Chapter {
            volume: 0,
            chapter: 0,
        };
        book.volumes
            .push(Volume::new("一").with_chapter(Chapter::new("c")));

        let state = ParserState::Scanning(cursor).step("━━━━━━━━━", &mut book);
        assert_eq!(state, ParserState::Metadata(cursor));
        let state = state.step("「书籍简介：", &mut book);
        assert_eq!(state, ParserState::Description(cursor));
        let state = state.step("  简介  ", &mut book);
        assert_eq!(state, ParserState::Scanning(cursor));
        assert_eq!(book.metadata.description, "简介");
        // Indented, so it is also a body line of the open chapter
        assert_eq!(book.volumes[0].chapters[0].content, vec!["  简介  "]);
    }

    #[test]
    fn test_description_line_is_scanned_again() {
        let book = build("━━━━━━━━━\n「书籍简介：\n[卷名] 一\n第一章\n　　正文\n");
        assert_eq!(book.metadata.description, "[卷名] 一");
        assert_eq!(book.volumes.len(), 1);
        assert_eq!(book.volumes[0].title, "一");
        assert_eq!(book.volumes[0].chapters.len(), 1);
        assert_eq!(book.volumes[0].chapters[0].content, vec!["　　正文"]);
    }

    #[test]
    fn test_description_line_can_reopen_metadata() {
        let book = build("━━━━━━━━━\n「书籍简介：\n━━━━━━━━━\n「作者：乙」\n");
        assert_eq!(book.metadata.description, "━━━━━━━━━");
        assert_eq!(book.metadata.author, "乙");
    }

    #[test]
    fn test_description_line_as_heading_in_volume() {
        let book = build("[卷名] 一\n━━━━━━━━━\n「书籍简介：\n简介也是标题\n　　内容\n");
        assert_eq!(book.metadata.description, "简介也是标题");
        let chapters = &book.volumes[0].chapters;
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "简介也是标题");
        assert_eq!(chapters[0].content, vec!["　　内容"]);
    }

    #[test]
    fn test_metadata_block() {
        let book = build("━━━━━━━━━\n「书名：测试书」\n「作者：测试作者」\n「书籍简介：\n一个测试简介\n");
        assert_eq!(book.metadata.title, "测试书");
        assert_eq!(book.metadata.author, "测试作者");
        assert_eq!(book.metadata.description, "一个测试简介");
        assert!(book.volumes.is_empty());
    }

    #[test]
    fn test_metadata_ignores_other_lines() {
        let book = build("━━━━━━━━━\n随便\n━━━━━━━━━\n「书名：甲」\n[卷名] 不是卷\n");
        assert_eq!(book.metadata.title, "甲");
        assert_eq!(book.metadata.author, DEFAULT_AUTHOR);
        assert!(book.volumes.is_empty());
    }

    #[test]
    fn test_description_taken_even_if_blank() {
        let book = build("━━━━━━━━━\n「书籍简介：\n\n[卷名] 一\n");
        assert_eq!(book.metadata.description, "");
        assert_eq!(book.volumes.len(), 1);
    }

    #[test]
    fn test_description_marker_at_end() {
        let book = build("━━━━━━━━━\n「书名：甲」\n「书籍简介：");
        assert_eq!(book.metadata.title, "甲");
        assert_eq!(book.metadata.description, "");
    }

    #[test]
    fn test_defaults_without_metadata() {
        let book = build("[卷名] 一\n第一章\n　　内容\n");
        assert_eq!(book.metadata.title, DEFAULT_TITLE);
        assert_eq!(book.metadata.author, DEFAULT_AUTHOR);
    }

    #[test]
    fn test_lines_before_volume_are_dropped() {
        let book = build("序言\n　　一些文字\n[卷名] 一\n第一章\n　　内容\n");
        assert_eq!(book.volumes.len(), 1);
        assert_eq!(book.volumes[0].chapters.len(), 1);
        assert_eq!(book.volumes[0].chapters[0].title, "第一章");
    }

    #[test]
    fn test_body_before_chapter_is_dropped() {
        let book = build("[卷名] 一\n　　卷首语\n\n第一章\n　　内容\n");
        let volume = &book.volumes[0];
        assert_eq!(volume.chapters.len(), 1);
        assert_eq!(volume.chapters[0].content, vec!["　　内容"]);
    }

    #[test]
    fn test_body_lines_kept_verbatim() {
        let book = build("[卷名] 一\n第一章\n　　第一段\n\n  第二段  \n　　\n");
        let content = &book.volumes[0].chapters[0].content;
        assert_eq!(content, &vec!["　　第一段", "", "  第二段  ", "　　"]);
    }

    #[test]
    fn test_every_non_indented_line_is_a_heading() {
        let book = build("[卷名] 一\n第一章\n　　内容\n第二章\n第三章\n　　更多\n");
        let titles: Vec<_> = book.volumes[0]
            .chapters
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(titles, vec!["第一章", "第二章", "第三章"]);
        assert!(book.volumes[0].chapters[1].content.is_empty());
    }

    #[test]
    fn test_empty_volume() {
        let book = build("[卷名] 一\n[卷名] 二\n第一章\n");
        assert_eq!(book.volumes.len(), 2);
        assert!(book.volumes[0].chapters.is_empty());
        assert_eq!(book.volumes[1].chapters.len(), 1);
    }

    #[test]
    fn test_volume_title_verbatim() {
        let book = build("[卷名]  两个空格 \n");
        assert_eq!(book.volumes[0].title, " 两个空格 ");
    }
}
