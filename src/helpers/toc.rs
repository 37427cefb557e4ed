//! Table of contents extraction from rendered post HTML

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::html::{html_unescape, strip_html};

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"(?is)<h([1-6])(\s[^>]*)?>(.*?)</h[1-6]\s*>").unwrap();
    static ref ID_ATTR: Regex = Regex::new(r#"\bid\s*=\s*"([^"]*)""#).unwrap();
    static ref NOT_ID_CHAR: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
}

/// A heading listed in the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocItem {
    pub id: String,
    pub title: String,
    pub level: u8,
    /// 0 for h1, 1 for h2, 2 for anything deeper
    pub indent: u8,
}

impl TocItem {
    fn new(id: String, title: String, level: u8) -> Self {
        let indent = match level {
            1 => 0,
            2 => 1,
            _ => 2,
        };
        Self {
            id,
            title,
            level,
            indent,
        }
    }
}

/// Anchor id for a heading title: lowercase, punctuation dropped,
/// whitespace runs turned into `-`.
pub fn heading_id(title: &str) -> String {
    let lower = title.to_lowercase();
    let kept = NOT_ID_CHAR.replace_all(&lower, "");
    SPACES.replace_all(kept.trim(), "-").into_owned()
}

/// Hands out unique anchor ids within one document
#[derive(Debug, Default)]
pub struct HeadingSlugger {
    seen: HashMap<String, usize>,
}

impl HeadingSlugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `base`, or `base-N` when `base` was already handed out
    pub fn unique(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        while let Some(count) = self.seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{}-{}", base, count);
        }
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}

/// Extract headings `<h1>`..`<h{max_depth}>` in document order
pub fn extract(html: &str, max_depth: u8) -> Vec<TocItem> {
    HEADING
        .captures_iter(html)
        .filter_map(|caps| {
            let level: u8 = caps[1].parse().ok()?;
            if level > max_depth {
                return None;
            }
            let title = html_unescape(strip_html(&caps[3]).trim());
            let id = caps
                .get(2)
                .and_then(|attrs| ID_ATTR.captures(attrs.as_str()))
                .map(|id| id[1].to_string())
                .unwrap_or_else(|| heading_id(&title));
            Some(TocItem::new(id, title, level))
        })
        .collect()
}
