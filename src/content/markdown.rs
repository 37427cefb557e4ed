//! Markdown rendering with syntax highlighting and heading anchors

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::{heading_id, html_escape, HeadingSlugger};

const EXCERPT_MARKER: &str = "<!-- more -->";

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
    aliases: HashMap<String, String>,
}

/// Per-document rendering switches
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Drop inline images; the section shows them in a gallery instead
    pub strip_images: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_config(&HighlightConfig::default())
    }

    /// Create from the site's highlight settings
    pub fn with_config(config: &HighlightConfig) -> Self {
        let theme_set = ThemeSet::load_defaults();
        let theme_name = if theme_set.themes.contains_key(&config.theme) {
            config.theme.clone()
        } else {
            tracing::warn!(
                "Unknown highlight theme {:?}, using base16-ocean.dark",
                config.theme
            );
            "base16-ocean.dark".to_string()
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set,
            theme_name,
            line_numbers: config.line_number,
            aliases: config.aliases.clone(),
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        self.render_with(markdown, RenderOptions::default())
    }

    /// Render markdown to HTML with per-document options
    pub fn render_with(&self, markdown: &str, opts: RenderOptions) -> Result<String> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;
        let mut image_depth = 0usize;

        for event in parser {
            if image_depth > 0 {
                match event {
                    Event::Start(Tag::Image { .. }) => image_depth += 1,
                    Event::End(TagEnd::Image) => image_depth -= 1,
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::Start(Tag::Image { .. }) if opts.strip_images => {
                    image_depth = 1;
                }
                _ => events.push(event),
            }
        }

        assign_heading_ids(&mut events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let lang = self.aliases.get(lang).map(String::as_str).unwrap_or(lang);

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .and_then(|theme| {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
            });

        match highlighted {
            Some(highlighted) if self.line_numbers => self.add_line_numbers(&highlighted, lang),
            Some(highlighted) => format!(
                r#"<div class="highlight language-{}">{}</div>"#,
                lang, highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                html_escape(code)
            ),
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        // syntect wraps the block in <pre style=..>...</pre>; keep only the lines
        let inner = code
            .find('>')
            .map(|start| &code[start + 1..])
            .unwrap_or(code);
        let inner = inner
            .trim_start_matches('\n')
            .trim_end()
            .trim_end_matches("</pre>");

        let lines: Vec<&str> = inner.lines().collect();

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight language-{}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
            lang,
            gutter,
            lines.join("\n")
        )
    }

    /// Parse excerpt from content (split by <!-- more -->)
    pub fn split_excerpt(content: &str) -> (Option<String>, String) {
        if let Some(pos) = content.find(EXCERPT_MARKER) {
            let excerpt = content[..pos].trim().to_string();
            let remaining = content[pos + EXCERPT_MARKER.len()..].trim().to_string();
            let full = format!("{}\n\n{}", excerpt, remaining);
            (Some(excerpt), full)
        } else {
            (None, content.to_string())
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Give every heading an anchor id, keeping explicit `{#id}` attributes
fn assign_heading_ids(events: &mut [Event]) {
    let mut slugger = HeadingSlugger::new();

    for i in 0..events.len() {
        let explicit = match &events[i] {
            Event::Start(Tag::Heading { id, .. }) => id.as_ref().map(|id| id.to_string()),
            _ => continue,
        };

        let anchor = match explicit {
            Some(id) => slugger.unique(&id),
            None => {
                let text = heading_text(&events[i + 1..]);
                let base = heading_id(&text);
                if base.is_empty() {
                    continue;
                }
                slugger.unique(&base)
            }
        };

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(anchor));
        }
    }
}

/// Plain text of a heading up to its closing tag
fn heading_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_heading_ids_are_unique() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("## 준비물\n\ntext\n\n## 준비물\n\n### Custom {#mine}\n")
            .unwrap();
        assert!(html.contains(r#"<h2 id="준비물">"#));
        assert!(html.contains(r#"<h2 id="준비물-1">"#));
        assert!(html.contains(r#"<h3 id="mine">"#));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains("highlight"));
        assert!(html.contains("language-rust"));
        assert!(html.contains("line-number"));
    }

    #[test]
    fn test_code_alias() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```sh\necho hi\n```").unwrap();
        assert!(html.contains("language-bash"));
    }

    #[test]
    fn test_strip_images() {
        let renderer = MarkdownRenderer::new();
        let md = "Before ![a *photo*](./beach.jpg) after";
        let kept = renderer.render(md).unwrap();
        assert!(kept.contains("<img"));

        let stripped = renderer
            .render_with(md, RenderOptions { strip_images: true })
            .unwrap();
        assert!(!stripped.contains("<img"));
        assert!(!stripped.contains("photo"));
        assert!(stripped.contains("Before"));
        assert!(stripped.contains("after"));
    }

    #[test]
    fn test_split_excerpt() {
        let content = "This is excerpt.\n<!-- more -->\nThis is more content.";
        let (excerpt, full) = MarkdownRenderer::split_excerpt(content);
        assert_eq!(excerpt, Some("This is excerpt.".to_string()));
        assert!(full.contains("This is excerpt."));
        assert!(full.contains("This is more content."));
    }
}
