//! Markdown bodies of blog posts and static pages.

use super::html::escape;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;
use std::sync::LazyLock;

/// A level-one heading at the very start of the document, with the blank
/// lines after it. A heading on the last line without a newline is left alone.
static LEADING_H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s+.+\n+").expect("valid regex"));
static H1_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#\s+").expect("valid regex"));

/// Drop the leading H1 when it only repeats `title`.
///
/// The heading text is compared with emphasis asterisks removed and
/// surrounding whitespace trimmed. A different heading is kept.
pub fn strip_duplicate_h1<'a>(content: &'a str, title: &str) -> &'a str {
    let Some(found) = LEADING_H1.find(content) else {
        return content;
    };
    let heading = H1_MARKER.replace(found.as_str(), "");
    if heading.replace('*', "").trim() == title {
        &content[found.end()..]
    } else {
        content
    }
}

/// Render markdown to HTML. Links open in a new tab.
pub fn render(content: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let events = Parser::new_ext(content, options).map(|event| match event {
        Event::Start(Tag::Link {
            dest_url, title, ..
        }) => Event::InlineHtml(CowStr::from(open_link(&dest_url, &title))),
        Event::End(TagEnd::Link) => Event::InlineHtml(CowStr::Borrowed("</a>")),
        other => other,
    });

    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn open_link(href: &str, title: &str) -> String {
    let title = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape(title))
    };
    format!(
        r#"<a href="{}"{title} target="_blank" rel="noopener noreferrer">"#,
        escape(href)
    )
}

/// Whitespace-separated word count, used for `BlogPosting.wordCount`.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_matching_h1() {
        let body = "# Welcome\n\nFirst paragraph.\n";
        assert_eq!(strip_duplicate_h1(body, "Welcome"), "First paragraph.\n");
    }

    #[test]
    fn test_strip_h1_with_emphasis_and_leading_space() {
        let body = "\n  # **Welcome** \n\nBody";
        assert_eq!(strip_duplicate_h1(body, "Welcome"), "Body");
    }

    #[test]
    fn test_keep_different_h1() {
        let body = "# Introduction\n\nBody";
        assert_eq!(strip_duplicate_h1(body, "Welcome"), body);
    }

    #[test]
    fn test_keep_non_leading_or_h2() {
        let body = "Intro\n# Welcome\n";
        assert_eq!(strip_duplicate_h1(body, "Welcome"), body);
        let body = "## Welcome\n\nBody";
        assert_eq!(strip_duplicate_h1(body, "Welcome"), body);
        // no trailing newline: nothing to strip
        assert_eq!(strip_duplicate_h1("# Welcome", "Welcome"), "# Welcome");
    }

    #[test]
    fn test_render_basic() {
        let html = render("## Topics\n\n- **AI** agents\n- ~~old~~ new\n");
        assert!(html.contains("<h2>Topics</h2>"));
        assert!(html.contains("<strong>AI</strong>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn test_render_links_open_new_tab() {
        let html = render("See [the show](https://example.com/?a=1&b=2 \"Show\").");
        assert!(html.contains(
            r#"<a href="https://example.com/?a=1&amp;b=2" title="Show" target="_blank" rel="noopener noreferrer">the show</a>"#
        ));
    }

    #[test]
    fn test_render_table() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two  three\nfour"), 4);
        assert_eq!(word_count("   "), 0);
    }
}
