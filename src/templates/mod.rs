//! Built-in theme templates using the Tera template engine
//!
//! Templates, styles and scripts are embedded in the binary; a site needs
//! no theme directory of its own.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SearchConfig;
use crate::helpers::{html_escape, strip_html, truncate, TocItem};

/// Static assets written to the public directory as-is
pub const ASSETS: &[(&str, &str)] = &[
    ("css/style.css", include_str!("theme/assets/style.css")),
    ("js/search.js", include_str!("theme/assets/search.js")),
    ("js/toc.js", include_str!("theme/assets/toc.js")),
    ("js/gallery.js", include_str!("theme/assets/gallery.js")),
];

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all theme templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping would also escape `/` in URLs; text fields go through
        // the `escape_html` filter instead
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("macros.html", include_str!("theme/macros.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("category.html", include_str!("theme/category.html")),
            ("page.html", include_str!("theme/page.html")),
            // Partials
            ("partials/head.html", include_str!("theme/partials/head.html")),
            (
                "partials/header.html",
                include_str!("theme/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("theme/partials/footer.html"),
            ),
            ("partials/toc.html", include_str!("theme/partials/toc.html")),
            (
                "partials/post_nav.html",
                include_str!("theme/partials/post_nav.html"),
            ),
            (
                "partials/gallery.html",
                include_str!("theme/partials/gallery.html"),
            ),
            (
                "partials/comments.html",
                include_str!("theme/partials/comments.html"),
            ),
        ])?;

        // Register custom filters
        tera.register_filter("escape_html", escape_html_filter);
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: escape text for HTML content and attributes
fn escape_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("escape_html", "value", String, value);
    Ok(tera::Value::String(html_escape(&s)))
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 120,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    Ok(tera::Value::String(truncate(&s, length, Some(&omission))))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub root: String,
    pub language: String,
    pub current_year: String,
    pub sections: Vec<NavSection>,
    pub search: SearchConfig,
}

/// A navigation entry for a category listing
#[derive(Debug, Clone, Serialize)]
pub struct NavSection {
    pub key: String,
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeoData {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub canonical: String,
    /// Pre-rendered Open Graph meta tags
    pub open_graph: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub date: String,
    pub date_iso: String,
    /// Formatted "modified" label, only when it differs from `date`
    pub modified: Option<String>,
    pub category: String,
    pub section: String,
    pub section_title: String,
    pub path: String,
    pub tags: Vec<String>,
    pub excerpt: String,
    pub thumbnail: Option<String>,
    pub content: String,
    pub reading_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
    pub date: String,
}

/// Previous/next links within a category
#[derive(Debug, Clone, Serialize)]
pub struct PostNavData {
    pub previous_label: String,
    pub next_label: String,
    pub no_previous: String,
    pub no_next: String,
    pub previous: Option<NavPost>,
    pub next: Option<NavPost>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GalleryData {
    /// `bento` or `wall`
    pub layout: String,
    pub images: Vec<GalleryItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GalleryItem {
    pub index: usize,
    pub url: String,
    pub file_name: String,
    pub class: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TocData {
    pub items: Vec<TocItem>,
    pub scroll_offset: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryData {
    pub name: String,
    pub section: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub path: String,
    pub count: String,
    pub posts: Vec<PostData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentData {
    pub window: String,
    pub tabs: Vec<RecentTabData>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentTabData {
    pub key: String,
    pub label: String,
    pub count: usize,
    pub posts: Vec<PostData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub title: String,
    pub path: String,
    pub content: String,
    pub not_found: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_filters() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(8));
        let out = truncate_chars_filter(&tera::Value::from("Hello World"), &args).unwrap();
        assert_eq!(out, tera::Value::from("Hello..."));

        let out = strip_html_filter(&tera::Value::from("<b>bold</b> text"), &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::from("bold text"));
    }

    #[test]
    fn test_page_escapes_title() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: "Blog".into(),
                description: String::new(),
                author: String::new(),
                url: "http://example.com".into(),
                root: "/".into(),
                language: "ko".into(),
                current_year: "2024".into(),
                sections: vec![],
                search: SearchConfig::default(),
            },
        );
        context.insert(
            "seo",
            &SeoData {
                title: "A <b> page".into(),
                description: String::new(),
                keywords: String::new(),
                canonical: "http://example.com/a/".into(),
                open_graph: String::new(),
            },
        );
        context.insert("t", &crate::i18n::I18n::new("ko").get_all_translations());
        context.insert(
            "page",
            &PageData {
                title: "A <b> page".into(),
                path: "/a/".into(),
                content: "<p>body</p>".into(),
                not_found: false,
            },
        );
        let html = renderer.render("page.html", &context).unwrap();
        assert!(html.contains("A &lt;b&gt; page"));
        assert!(html.contains("<p>body</p>"));
    }
}
