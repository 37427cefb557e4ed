//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub static_dir: String,
    pub i18n_dir: String,
    #[serde(default)]
    pub exclude: Vec<String>,

    // Writing
    pub render_drafts: bool,
    pub words_per_minute: usize,
    pub excerpt_length: usize,
    pub date_format: String,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Category
    pub default_category: String,
    #[serde(default = "default_category_map")]
    pub category_map: IndexMap<String, String>,
    #[serde(default = "default_sections")]
    pub sections: IndexMap<String, SectionConfig>,

    // Features
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub recent: RecentConfig,
    #[serde(default)]
    pub toc: TocConfig,
    #[serde(default)]
    pub comments: CommentsConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: "개발 과정에서 배운 것들과 일상의 소중한 순간들을 나누는 개인 블로그입니다."
                .to_string(),
            author: "@blogauthor".to_string(),
            language: "ko".to_string(),
            timezone: "Asia/Seoul".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),
            i18n_dir: "languages".to_string(),
            exclude: Vec::new(),

            render_drafts: false,
            words_per_minute: 200,
            excerpt_length: 160,
            date_format: "YYYY년 MM월 DD일".to_string(),
            highlight: HighlightConfig::default(),

            default_category: "posts".to_string(),
            category_map: default_category_map(),
            sections: default_sections(),

            search: SearchConfig::default(),
            recent: RecentConfig::default(),
            toc: TocConfig::default(),
            comments: CommentsConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Section metadata for a raw category, if one is configured
    pub fn section(&self, category: &str) -> Option<&SectionConfig> {
        self.sections.get(category)
    }

    /// Parsed timezone; falls back to UTC when the name is unknown
    pub fn tz(&self) -> chrono_tz::Tz {
        match self.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                if !self.timezone.is_empty() {
                    tracing::warn!("Unknown timezone {:?}, using UTC", self.timezone);
                }
                chrono_tz::UTC
            }
        }
    }
}

fn default_category_map() -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    map.insert("기술".to_string(), "devLog".to_string());
    map.insert("일상".to_string(), "lifeLog".to_string());
    map
}

fn default_sections() -> IndexMap<String, SectionConfig> {
    let mut sections = IndexMap::new();
    sections.insert(
        "기술".to_string(),
        SectionConfig {
            title: "DevLog".to_string(),
            subtitle: "개발 여정의 기록".to_string(),
            description: "코드로 문제를 해결하고, 새로운 기술을 학습하며, 개발 과정에서 얻은 인사이트를 기록합니다.".to_string(),
            gallery: GalleryLayout::None,
        },
    );
    sections.insert(
        "일상".to_string(),
        SectionConfig {
            title: "LifeLog".to_string(),
            subtitle: "일상 속 소중한 순간들".to_string(),
            description: "여행, 경험, 그리고 삶에서 발견한 작은 기쁨들을 이야기로 나눕니다."
                .to_string(),
            gallery: GalleryLayout::Bento,
        },
    );
    sections
}

/// Navigation section shown for a category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub gallery: GalleryLayout,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            description: String::new(),
            gallery: GalleryLayout::None,
        }
    }
}

/// How a post's directory images are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryLayout {
    /// Bento grid; inline images are shown only in the gallery
    Bento,
    /// Plain grid; inline images are shown only in the gallery
    Wall,
    /// No gallery, images stay inline
    None,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
    #[serde(default = "default_aliases")]
    pub aliases: HashMap<String, String>,
}

fn default_aliases() -> HashMap<String, String> {
    [("sh", "bash"), ("js", "javascript"), ("ts", "typescript")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
            aliases: default_aliases(),
        }
    }
}

/// Search box / dialog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub min_query_chars: usize,
    pub max_results: usize,
    pub dialog_max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_chars: 2,
            max_results: 5,
            dialog_max_results: 8,
        }
    }
}

/// Home page recent activity window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentConfig {
    pub months: u32,
    pub step: u32,
}

impl Default for RecentConfig {
    fn default() -> Self {
        Self { months: 3, step: 3 }
    }
}

/// Table of contents configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    pub enable: bool,
    pub max_depth: u8,
    pub scroll_offset: u32,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            enable: true,
            max_depth: 6,
            scroll_offset: 100,
        }
    }
}

/// Giscus comment widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub repo: String,
    pub repo_id: String,
    pub category: String,
    pub category_id: String,
    pub mapping: String,
    pub reactions_enabled: bool,
    pub emit_metadata: bool,
    pub input_position: String,
    pub theme: String,
    pub lang: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            repo_id: String::new(),
            category: "General".to_string(),
            category_id: String::new(),
            mapping: "pathname".to_string(),
            reactions_enabled: true,
            emit_metadata: false,
            input_position: "bottom".to_string(),
            theme: "preferred_color_scheme".to_string(),
            lang: "ko".to_string(),
        }
    }
}

impl CommentsConfig {
    /// Comments are rendered only for a configured repository
    pub fn enabled(&self) -> bool {
        !self.repo.is_empty()
    }
}
