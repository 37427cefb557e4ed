//! In-memory post search, shared by the CLI and the generated `search.json`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::{SearchConfig, SiteConfig};
use crate::content::Post;
use crate::helpers::{date_iso, format_date, url_for};

/// One searchable post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEntry {
    pub title: String,
    pub excerpt: String,
    pub slug: String,
    /// Page URL including the site root
    pub url: String,
    pub category: String,
    pub section: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Display date
    pub date: String,
    /// ISO date, for `<time datetime>`
    pub date_iso: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl SearchEntry {
    /// Text matched by the search box
    fn haystack(&self) -> String {
        format!("{} {} {}", self.title, self.excerpt, self.tags.join(" ")).to_lowercase()
    }
}

/// Post list in index order (newest first) with the configured limits
#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
    limits: SearchConfig,
}

impl SearchIndex {
    /// Build the index from posts already sorted newest first
    pub fn from_posts(posts: &[Post], config: &SiteConfig) -> Self {
        let entries = posts
            .iter()
            .map(|post| SearchEntry {
                title: post.title.clone(),
                excerpt: post.excerpt.clone(),
                slug: post.slug.clone(),
                url: url_for(config, &post.path()),
                category: post.category.clone(),
                section: post.section.clone(),
                tags: post.tags.clone(),
                date: format_date(&post.date, &config.date_format),
                date_iso: date_iso(&post.date),
                thumbnail: post.thumbnail.clone(),
            })
            .collect();

        Self {
            entries,
            limits: config.search.clone(),
        }
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Search box: title, excerpt and tags, for queries of at least
    /// `min_query_chars` characters
    pub fn search(&self, query: &str) -> Vec<&SearchEntry> {
        if query.chars().count() < self.limits.min_query_chars {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.haystack().contains(&needle))
            .take(self.limits.max_results)
            .collect()
    }

    /// Search dialog: titles only, for any non-blank query
    pub fn search_titles(&self, query: &str) -> Vec<&SearchEntry> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.title.to_lowercase().contains(&needle))
            .take(self.limits.dialog_max_results)
            .collect()
    }

    /// Serialize the entries as a JSON array
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Write `search.json`
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!(entries = self.entries.len(), "Wrote search index");
        Ok(())
    }
}

/// Dialog selection after ArrowDown; wraps to the first result
pub fn select_next(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        Some(i) if i + 1 < len => Some(i + 1),
        _ => Some(0),
    }
}

/// Dialog selection after ArrowUp; wraps to the last result
pub fn select_prev(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        Some(i) if i > 0 => Some(i.min(len) - 1),
        _ => Some(len - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::post;

    fn index() -> SearchIndex {
        let mut posts = vec![
            post("rust-async", "기술", "2024-05-01"),
            post("jeju", "일상", "2024-04-01"),
            post("tokio-tips", "기술", "2024-03-01"),
        ];
        posts[0].title = "Rust Async 입문".into();
        posts[0].excerpt = "Futures and executors".into();
        posts[1].title = "제주 여행".into();
        posts[1].excerpt = "바다와 오름".into();
        posts[1].tags = vec!["travel".into()];
        posts[2].title = "Tokio tips".into();
        posts[2].tags = vec!["rust".into()];
        SearchIndex::from_posts(&posts, &SiteConfig::default())
    }

    #[test]
    fn test_search_matches_title_excerpt_tags() {
        let index = index();
        let hits: Vec<_> = index.search("RUST").iter().map(|e| e.slug.clone()).collect();
        assert_eq!(hits, vec!["/devLog/rust-async", "/devLog/tokio-tips"]);

        let hits = index.search("오름");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slug, "/lifeLog/jeju");

        assert_eq!(index.search("travel").len(), 1);
        assert!(index.search("python").is_empty());
    }

    #[test]
    fn test_search_needs_two_chars() {
        let index = index();
        assert!(index.search("").is_empty());
        assert!(index.search("r").is_empty());
        assert!(index.search("제").is_empty());
        assert_eq!(index.search("제주").len(), 1);
    }

    #[test]
    fn test_search_limits() {
        let posts: Vec<_> = (0..12)
            .map(|i| {
                let mut p = post(&format!("note-{i}"), "기술", "2024-01-01");
                p.title = format!("Note {i}");
                p
            })
            .collect();
        let index = SearchIndex::from_posts(&posts, &SiteConfig::default());
        assert_eq!(index.search("note").len(), 5);
        assert_eq!(index.search_titles("note").len(), 8);
        assert_eq!(index.search("note")[0].title, "Note 0");
    }

    #[test]
    fn test_search_titles_only() {
        let index = index();
        assert!(index.search_titles("   ").is_empty());
        assert!(index.search_titles("futures").is_empty());
        assert_eq!(index.search_titles("t").len(), 2);
        assert_eq!(index.search_titles("tokio")[0].slug, "/devLog/tokio-tips");
    }

    #[test]
    fn test_json_shape() {
        let json = index().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value[0];
        assert_eq!(first["slug"], "/devLog/rust-async");
        assert_eq!(first["url"], "/devLog/rust-async/");
        assert_eq!(first["section"], "devLog");
        assert_eq!(first["date"], "2024년 05월 01일");
        assert!(first.get("thumbnail").is_none());
    }

    #[test]
    fn test_selection_wraps() {
        assert_eq!(select_next(None, 3), Some(0));
        assert_eq!(select_next(Some(1), 3), Some(2));
        assert_eq!(select_next(Some(2), 3), Some(0));
        assert_eq!(select_prev(None, 3), Some(2));
        assert_eq!(select_prev(Some(0), 3), Some(2));
        assert_eq!(select_prev(Some(2), 3), Some(1));
        assert_eq!(select_next(None, 0), None);
    }
}
