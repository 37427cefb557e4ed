//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::ContentError;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a post or page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub modified: Option<String>,
    pub category: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    pub excerpt: Option<String>,
    pub thumbnail: Option<String>,
    pub draft: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split a document into its front-matter and body.
    ///
    /// The block must open on the first non-blank line with `---` and close
    /// with a line starting with `---`.
    pub fn parse<'a>(path: &Path, content: &'a str) -> Result<(Self, &'a str), ContentError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let Some(rest) = content.strip_prefix("---") else {
            return Err(ContentError::MissingFrontMatter {
                path: path.to_path_buf(),
            });
        };
        let rest = rest.trim_start_matches([' ', '\t']);
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .ok_or_else(|| ContentError::MissingFrontMatter {
                path: path.to_path_buf(),
            })?;

        let (yaml, body) = if rest.starts_with("---") {
            ("", &rest[3..])
        } else if let Some(end_pos) = rest.find("\n---") {
            (&rest[..end_pos], &rest[end_pos + 4..])
        } else {
            return Err(ContentError::MissingFrontMatter {
                path: path.to_path_buf(),
            });
        };

        // Drop the rest of the closing fence line
        let body = match body.find('\n') {
            Some(pos) if body[..pos].trim().is_empty() => &body[pos + 1..],
            None if body.trim().is_empty() => "",
            _ => body,
        };

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml).map_err(|source| {
            ContentError::MalformedFrontMatter {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Ok((fm, body))
    }

    /// Parse the required `date` field
    pub fn parse_date(&self, path: &Path) -> Result<NaiveDateTime, ContentError> {
        let raw = self
            .date
            .as_deref()
            .ok_or_else(|| ContentError::MissingField {
                path: path.to_path_buf(),
                field: "date",
            })?;
        parse_date_string(raw).ok_or_else(|| ContentError::InvalidDate {
            path: path.to_path_buf(),
            field: "date",
            value: raw.to_string(),
        })
    }

    /// Parse the optional `modified` field
    pub fn parse_modified(&self, path: &Path) -> Result<Option<NaiveDateTime>, ContentError> {
        match self.modified.as_deref() {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_date_string(raw)
                .map(Some)
                .ok_or_else(|| ContentError::InvalidDate {
                    path: path.to_path_buf(),
                    field: "modified",
                    value: raw.to_string(),
                }),
        }
    }

    /// The required, non-empty `title` field
    pub fn require_title(&self, path: &Path) -> Result<String, ContentError> {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => Ok(title.to_string()),
            _ => Err(ContentError::MissingField {
                path: path.to_path_buf(),
                field: "title",
            }),
        }
    }
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 keeps the author's wall-clock time
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("content/posts/hello.md")
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
category: 기술
tags:
  - rust
  - blog
excerpt: First post
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(path(), content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.category.as_deref(), Some("기술"));
        assert_eq!(fm.tags, vec!["rust", "blog"]);
        assert_eq!(fm.excerpt.as_deref(), Some("First post"));
        assert!(remaining.contains("This is the content."));
        assert!(!remaining.contains("---"));
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = "---\ntitle: One Tag\ndate: 2024-01-15\ntags: Notes\n---\nBody\n";
        let (fm, body) = FrontMatter::parse(path(), content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_extra_fields_are_kept() {
        let content = "---\ntitle: T\ndate: 2024-01-15\nmood: sunny\n---\n";
        let (fm, body) = FrontMatter::parse(path(), content).unwrap();
        assert_eq!(fm.extra.get("mood").and_then(|v| v.as_str()), Some("sunny"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_missing_block_is_an_error() {
        let err = FrontMatter::parse(path(), "# Just markdown\n").unwrap_err();
        assert!(matches!(err, ContentError::MissingFrontMatter { .. }));

        let err = FrontMatter::parse(path(), "---\ntitle: never closed\n").unwrap_err();
        assert!(matches!(err, ContentError::MissingFrontMatter { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\ndate: 2024-01-01\n---\nBody";
        let err = FrontMatter::parse(path(), content).unwrap_err();
        assert!(matches!(err, ContentError::MalformedFrontMatter { .. }));
        assert!(err.to_string().contains("hello.md"));
    }

    #[test]
    fn test_required_fields() {
        let (fm, _) = FrontMatter::parse(path(), "---\ndate: 2024-01-01\n---\n").unwrap();
        let err = fm.require_title(path()).unwrap_err();
        assert!(err.to_string().contains("`title`"));

        let (fm, _) = FrontMatter::parse(path(), "---\ntitle: x\n---\n").unwrap();
        let err = fm.parse_date(path()).unwrap_err();
        assert!(matches!(
            err,
            ContentError::MissingField { field: "date", .. }
        ));
    }

    #[test]
    fn test_parse_date() {
        let fm = FrontMatter {
            date: Some("2024-01-15 10:30:00".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_date(path()).unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 10:30");

        assert!(parse_date_string("2024/03/02").is_some());
        assert!(parse_date_string("2024-03-02T09:00:00+09:00").is_some());
        assert!(parse_date_string("yesterday").is_none());
    }

    #[test]
    fn test_invalid_modified() {
        let fm = FrontMatter {
            modified: Some("soon".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            fm.parse_modified(path()).unwrap_err(),
            ContentError::InvalidDate {
                field: "modified",
                ..
            }
        ));
        assert_eq!(FrontMatter::default().parse_modified(path()).unwrap(), None);
    }
}
