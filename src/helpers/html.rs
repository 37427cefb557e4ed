//! HTML helper functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Undo the entity escaping pulldown-cmark applies to text
pub fn html_unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Plain text of rendered HTML with whitespace collapsed.
///
/// Tags become word boundaries, unlike [`strip_html`].
pub fn plain_text(html: &str) -> String {
    let text = html_unescape(&TAG.replace_all(html, " "));
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Truncate a string to a specified number of characters
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.chars().count()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}

/// Count words in HTML content (strips tags first)
pub fn count_words(html: &str) -> usize {
    plain_text(html).split_whitespace().count()
}

/// Open Graph meta tags for a page
pub fn open_graph(
    title: &str,
    description: &str,
    url: &str,
    image: Option<&str>,
    site_name: &str,
    article: bool,
) -> String {
    let og_type = if article { "article" } else { "website" };
    let mut tags = vec![
        format!(r#"<meta property="og:type" content="{}">"#, og_type),
        format!(
            r#"<meta property="og:title" content="{}">"#,
            html_escape(title)
        ),
        format!(r#"<meta property="og:url" content="{}">"#, url),
        format!(
            r#"<meta property="og:site_name" content="{}">"#,
            html_escape(site_name)
        ),
    ];

    if !description.is_empty() {
        tags.push(format!(
            r#"<meta property="og:description" content="{}">"#,
            html_escape(description)
        ));
    }

    if let Some(img) = image {
        tags.push(format!(r#"<meta property="og:image" content="{}">"#, img));
    }

    tags.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            plain_text("<p>Tom &amp; Jerry</p>\n\n<p>  again </p>"),
            "Tom & Jerry again"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 8, None), "Hello...");
        assert_eq!(truncate("Hi", 10, None), "Hi");
        assert_eq!(truncate("안녕하세요 반갑습니다", 6, Some("…")), "안녕하세요…");
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("<p>one two</p><p>셋 넷 다섯</p>"), 5);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_open_graph_article() {
        let tags = open_graph("A \"quoted\" title", "", "https://x.dev/a/", None, "x", true);
        assert!(tags.contains(r#"content="article""#));
        assert!(tags.contains("&quot;quoted&quot;"));
        assert!(!tags.contains("og:description"));
    }
}
