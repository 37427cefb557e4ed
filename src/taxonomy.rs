//! Category mapping, category grouping and in-category navigation

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::Post;
use crate::i18n::I18n;

/// Raw category of a document, falling back to the configured default
pub fn resolve_category<'a>(raw: Option<&'a str>, config: &'a SiteConfig) -> &'a str {
    match raw.map(str::trim) {
        Some(category) if !category.is_empty() => category,
        _ => &config.default_category,
    }
}

/// Navigation section for a raw category: the configured mapping,
/// otherwise the lower-cased category
pub fn map_category(category: &str, config: &SiteConfig) -> String {
    config
        .category_map
        .get(category)
        .cloned()
        .unwrap_or_else(|| category.to_lowercase())
}

/// URL slug of a post: `/{section}/{file stem}`
pub fn post_slug(section: &str, file_stem: &str) -> String {
    let stem = if file_stem.is_empty() {
        "untitled"
    } else {
        file_stem
    };
    format!("/{}/{}", section, stem)
}

/// Posts sharing one raw category
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Raw category as written in front-matter
    pub name: String,
    /// Mapped navigation section, also the listing path
    pub section: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    /// Indices into the site's post list, newest first
    pub posts: Vec<usize>,
}

impl Category {
    pub fn path(&self) -> String {
        format!("/{}/", self.section)
    }
}

/// Neighbouring posts inside one category
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighbors {
    /// The next-older post
    pub previous: Option<usize>,
    /// The next-newer post
    pub next: Option<usize>,
}

/// All categories of a site in order of their newest post
#[derive(Debug, Clone, Default)]
pub struct Categories {
    list: Vec<Category>,
}

impl Categories {
    /// Group posts (already sorted newest first) by raw category
    pub fn build(posts: &[Post], config: &SiteConfig, i18n: &I18n) -> Self {
        let mut list: Vec<Category> = Vec::new();

        for (idx, post) in posts.iter().enumerate() {
            if let Some(category) = list.iter_mut().find(|c| c.name == post.category) {
                category.posts.push(idx);
                continue;
            }

            let (title, subtitle, description) = match config.section(&post.category) {
                Some(section) => (
                    section.title.clone(),
                    section.subtitle.clone(),
                    section.description.clone(),
                ),
                None => (
                    post.category.clone(),
                    String::new(),
                    i18n.format("category.description", &[("category", &post.category)]),
                ),
            };

            list.push(Category {
                name: post.category.clone(),
                section: post.section.clone(),
                title,
                subtitle,
                description,
                posts: vec![idx],
            });
        }

        Self { list }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Look a category up by its raw name
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.list.iter().find(|c| c.name == name)
    }

    /// Display title of a category's section
    pub fn title_of<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).map(|c| c.title.as_str()).unwrap_or(name)
    }

    /// Older/newer neighbours of post `idx` within its own category
    pub fn neighbors(&self, posts: &[Post], idx: usize) -> Neighbors {
        let Some(category) = posts.get(idx).and_then(|p| self.get(&p.category)) else {
            return Neighbors::default();
        };
        let Some(pos) = category.posts.iter().position(|&i| i == idx) else {
            return Neighbors::default();
        };

        Neighbors {
            previous: category.posts.get(pos + 1).copied(),
            next: pos.checked_sub(1).map(|p| category.posts[p]),
        }
    }
}
