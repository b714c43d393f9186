//! Inline markup in body lines: `[img=W,H]src[/img]` image tags and
//! full-width colon normalization.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::util::escape_xml;

/// `[img=W,H]src[/img]`; the size separator may be `,`, `，` or spaces.
static IMG_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[img=([0-9]+)[，, ]+([0-9]+)\](.*?)\[/img\]").unwrap()
});

/// Replace full-width colons with ASCII ones.
pub fn normalize_colons(text: &str) -> Cow<'_, str> {
    if text.contains('：') {
        Cow::Owned(text.replace('：', ":"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Render one body line as escaped XHTML, turning image tags into `<img>`.
///
/// Colons are normalized before tags are matched.
pub fn render_inline(text: &str) -> String {
    let text = normalize_colons(text);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in IMG_TAG.captures_iter(&text) {
        let (Some(whole), Some(width), Some(height), Some(src)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        out.push_str(&escape_xml(&text[last..whole.start()]));
        out.push_str(&format!(
            "<img src=\"{}\" alt=\"\" width=\"{}\" height=\"{}\"/>",
            escape_xml(src.as_str()),
            width.as_str(),
            height.as_str()
        ));
        last = whole.end();
    }
    out.push_str(&escape_xml(&text[last..]));
    out
}

/// Render one body line as a paragraph. Blank lines become a paragraph
/// holding a single no-break space.
pub fn render_paragraph(line: &str) -> String {
    if line.trim().is_empty() {
        "<p>&#160;</p>".to_string()
    } else {
        format!("<p>{}</p>", render_inline(line))
    }
}

/// Image sources referenced by the tags in `text`, in order of appearance.
pub fn image_sources(text: &str) -> Vec<String> {
    let text = normalize_colons(text);
    IMG_TAG
        .captures_iter(&text)
        .filter_map(|caps| caps.get(3).map(|m| m.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_image() {
        assert_eq!(
            render_inline("[img=100,200]pic.png[/img]"),
            r#"<img src="pic.png" alt="" width="100" height="200"/>"#
        );
    }

    #[test]
    fn test_case_insensitive_space_separator() {
        assert_eq!(
            render_inline("[IMG=100 200]x[/img]"),
            r#"<img src="x" alt="" width="100" height="200"/>"#
        );
    }

    #[test]
    fn test_full_width_comma_separator() {
        assert_eq!(
            render_inline("[img=640，480]a.jpg[/IMG]"),
            r#"<img src="a.jpg" alt="" width="640" height="480"/>"#
        );
    }

    #[test]
    fn test_multiple_images() {
        assert_eq!(
            render_inline("前[img=1,2]a.png[/img]中[img=3,4]b.png[/img]后"),
            concat!(
                "前",
                r#"<img src="a.png" alt="" width="1" height="2"/>"#,
                "中",
                r#"<img src="b.png" alt="" width="3" height="4"/>"#,
                "后"
            )
        );
    }

    #[test]
    fn test_no_tag_passes_through() {
        assert_eq!(render_inline("没有图片"), "没有图片");
    }

    #[test]
    fn test_full_width_colon_normalized() {
        assert_eq!(render_inline("他说：好"), "他说:好");
    }

    #[test]
    fn test_colon_normalized_inside_tag() {
        assert_eq!(
            render_inline("[img=10,20]http：//example.com/a.png[/img]"),
            r#"<img src="http://example.com/a.png" alt="" width="10" height="20"/>"#
        );
    }

    #[test]
    fn test_markup_is_escaped() {
        assert_eq!(render_inline("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(
            render_inline(r#"[img=1,1]"x".png[/img]"#),
            r#"<img src="&quot;x&quot;.png" alt="" width="1" height="1"/>"#
        );
    }

    #[test]
    fn test_malformed_tag_is_text() {
        assert_eq!(render_inline("[img=a,b]x[/img]"), "[img=a,b]x[/img]");
        assert_eq!(render_inline("[img=1,2]x"), "[img=1,2]x");
    }

    #[test]
    fn test_render_paragraph() {
        assert_eq!(render_paragraph(""), "<p>&#160;</p>");
        assert_eq!(render_paragraph("　　"), "<p>&#160;</p>");
        assert_eq!(render_paragraph("　　正文"), "<p>　　正文</p>");
    }

    #[test]
    fn test_image_sources() {
        assert_eq!(
            image_sources("[img=1,2]a.png[/img] [img=3 4]img/b.jpg[/img]"),
            vec!["a.png", "img/b.jpg"]
        );
        assert!(image_sources("没有图片").is_empty());
    }

    proptest! {
        #[test]
        fn prop_plain_text_is_only_escaped(s in "[a-z0-9\u{4e00}-\u{4e20} ]{0,40}") {
            prop_assert_eq!(render_inline(&s), s);
        }

        #[test]
        fn prop_image_tag_dimensions_preserved(w in 1u32..5000, h in 1u32..5000, name in "[a-z]{1,8}") {
            let line = format!("[img={w},{h}]{name}.png[/img]");
            let expected = format!("<img src=\"{name}.png\" alt=\"\" width=\"{w}\" height=\"{h}\"/>");
            prop_assert_eq!(render_inline(&line), expected);
        }
    }
}
