//! HTML to Markdown Conversion
//!
//! Journal content arrives as rich HTML; Discord renders Markdown.
//! This is a single-pass, regex-driven conversion covering the tag set
//! the tabletop editor actually emits: atx headings, bold/italic,
//! links, list items, rules, and paragraph breaks. Images are dropped
//! entirely (they are exported separately as embed images). Anything
//! unrecognized is stripped, so the output is always plain Markdown.

use std::sync::LazyLock;

use regex::Regex;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([1-6])[^>]*>(.*?)</h[1-6]>").unwrap());

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:strong|b)[^>]*>(.*?)</(?:strong|b)>").unwrap());

static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:em|i)[^>]*>(.*?)</(?:em|i)>").unwrap());

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#).unwrap()
});

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li>").unwrap());

static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<img[^>]*>").unwrap());

static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<hr[^>]*>").unwrap());

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<br[^>]*>|</p>").unwrap());

static REMAINING_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Convert an HTML fragment to Discord-flavoured Markdown.
///
/// Deterministic and total; plain text passes through unchanged apart
/// from whitespace normalization.
pub fn to_markdown(html: &str) -> String {
    let text = IMAGE.replace_all(html, "");
    let text = HEADING.replace_all(&text, |caps: &regex::Captures| {
        let level: usize = caps[1].parse().unwrap_or(1);
        format!("\n{} {}\n", "#".repeat(level), caps[2].trim())
    });
    let text = BOLD.replace_all(&text, "**$1**");
    let text = ITALIC.replace_all(&text, "*$1*");
    let text = LINK.replace_all(&text, "[$2]($1)");
    let text = LIST_ITEM.replace_all(&text, |caps: &regex::Captures| {
        format!("- {}\n", caps[1].trim())
    });
    let text = HORIZONTAL_RULE.replace_all(&text, "\n---\n");
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = REMAINING_TAG.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = EXCESS_BLANK_LINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passthrough() {
        assert_eq!(to_markdown("Just words."), "Just words.");
    }

    #[test]
    fn test_atx_headings() {
        assert_eq!(to_markdown("<h1>Title</h1>"), "# Title");
        assert_eq!(to_markdown("<h3 class=\"x\">Sub</h3>"), "### Sub");
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(to_markdown("<strong>A</strong> <em>B</em>"), "**A** *B*");
        assert_eq!(to_markdown("<b>A</b> <i>B</i>"), "**A** *B*");
    }

    #[test]
    fn test_links() {
        assert_eq!(
            to_markdown(r#"<a href="https://example.invalid/x">here</a>"#),
            "[here](https://example.invalid/x)"
        );
    }

    #[test]
    fn test_images_dropped() {
        assert_eq!(
            to_markdown(r#"before <img src="map.png" alt="map"> after"#),
            "before  after"
        );
    }

    #[test]
    fn test_list_items() {
        let md = to_markdown("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(md, "- one\n- two");
    }

    #[test]
    fn test_paragraphs_become_line_breaks() {
        let md = to_markdown("<p>first</p><p>second</p>");
        assert_eq!(md, "first\nsecond");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(to_markdown("Fish &amp; Chips &lt;hot&gt;"), "Fish & Chips <hot>");
    }

    #[test]
    fn test_unknown_tags_stripped() {
        assert_eq!(to_markdown("<section><span>inner</span></section>"), "inner");
    }

    #[test]
    fn test_blank_lines_collapsed() {
        let md = to_markdown("<p>a</p><br><br><br><p>b</p>");
        assert!(!md.contains("\n\n\n"));
    }
}
