//! Post and Page models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::gallery::GalleryImage;
use crate::helpers::TocItem;

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date (wall clock in the site timezone)
    pub date: NaiveDateTime,

    /// Last modified date
    pub modified: Option<NaiveDateTime>,

    /// Raw category as written in front-matter
    pub category: String,

    /// Navigation section the category maps to (`devLog`, `lifeLog`, ...)
    pub section: String,

    /// Post tags
    pub tags: Vec<String>,

    /// Summary shown in listings and search
    pub excerpt: String,

    /// Thumbnail URL
    pub thumbnail: Option<String>,

    /// Thumbnail file to copy next to the page, when it is a local file
    #[serde(skip)]
    pub thumbnail_source: Option<PathBuf>,

    /// URL path without trailing slash, e.g. `/devLog/rust-async`
    pub slug: String,

    /// Source file path (relative to the content directory)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Headings of the rendered content
    pub toc: Vec<TocItem>,

    /// Reading time in minutes
    pub reading_time: usize,

    pub word_count: usize,

    /// Images living next to the source file
    pub gallery: Vec<GalleryImage>,

    pub draft: bool,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: String, date: NaiveDateTime, source: String) -> Self {
        Self {
            title,
            date,
            modified: None,
            category: String::new(),
            section: String::new(),
            tags: Vec::new(),
            excerpt: String::new(),
            thumbnail: None,
            thumbnail_source: None,
            slug: String::new(),
            source: source.clone(),
            full_source: PathBuf::from(&source),
            raw: String::new(),
            content: String::new(),
            toc: Vec::new(),
            reading_time: 1,
            word_count: 0,
            gallery: Vec::new(),
            draft: false,
            extra: HashMap::new(),
        }
    }

    /// Directory-style URL path of the post page
    pub fn path(&self) -> String {
        format!("{}/", self.slug)
    }

    /// Modified date, only when it differs from the publication date
    pub fn modified_if_changed(&self) -> Option<NaiveDateTime> {
        self.modified.filter(|m| m.date() != self.date.date())
    }
}

/// Reading time in whole minutes, never less than one
pub fn reading_time(words: usize, words_per_minute: usize) -> usize {
    let wpm = words_per_minute.max(1);
    words.div_ceil(wpm).max(1)
}

/// A standalone page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page title
    pub title: String,

    /// File stem, e.g. `about`
    pub name: String,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Source file path (relative to the content directory)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Page {
    /// Create a new page with minimal required fields
    pub fn new(title: String, name: String, source: String) -> Self {
        Self {
            title,
            name,
            raw: String::new(),
            content: String::new(),
            source: source.clone(),
            full_source: PathBuf::from(&source),
            extra: HashMap::new(),
        }
    }

    /// The `404` page is written as `404.html` at the site root
    pub fn is_not_found(&self) -> bool {
        self.name == "404"
    }

    /// URL path of the page
    pub fn path(&self) -> String {
        if self.is_not_found() {
            "/404.html".to_string()
        } else {
            format!("/{}/", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time(0, 200), 1);
        assert_eq!(reading_time(200, 200), 1);
        assert_eq!(reading_time(201, 200), 2);
        assert_eq!(reading_time(1000, 200), 5);
        assert_eq!(reading_time(10, 0), 10);
    }

    #[test]
    fn test_modified_if_changed() {
        let mut post = Post::new("t".into(), at(2024, 3, 1), "posts/t.md".into());
        assert_eq!(post.modified_if_changed(), None);

        post.modified = Some(at(2024, 3, 1));
        assert_eq!(post.modified_if_changed(), None);

        post.modified = Some(at(2024, 3, 5));
        assert_eq!(post.modified_if_changed(), Some(at(2024, 3, 5)));
    }

    #[test]
    fn test_paths() {
        let mut post = Post::new("t".into(), at(2024, 3, 1), "posts/t.md".into());
        post.slug = "/devLog/t".into();
        assert_eq!(post.path(), "/devLog/t/");

        let about = Page::new("About".into(), "about".into(), "pages/about.md".into());
        assert_eq!(about.path(), "/about/");
        let missing = Page::new("404".into(), "404".into(), "pages/404.md".into());
        assert!(missing.is_not_found());
        assert_eq!(missing.path(), "/404.html");
    }

    #[test]
    fn test_post_with_toc_survives_json() {
        let mut post = Post::new("t".into(), at(2024, 3, 1), "posts/t.md".into());
        post.slug = "/devLog/t".into();
        post.toc = crate::helpers::toc("<h2 id=\"intro\">Intro</h2>", 6);

        let json = serde_json::to_string(&post).unwrap();
        let back: Post = serde_json::from_str(&json).unwrap();
        assert_eq!(back.slug, "/devLog/t");
        assert_eq!(back.toc, post.toc);
        assert_eq!(back.toc[0].id, "intro");
    }
}
