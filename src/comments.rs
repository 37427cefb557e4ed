//! Giscus comment embed

use serde::Serialize;

use crate::config::CommentsConfig;
use crate::helpers::html_escape;

pub const GISCUS_CLIENT: &str = "https://giscus.app/client.js";

/// A `data-*` attribute of the embed script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub value: String,
}

fn flag(on: bool) -> String {
    if on { "1" } else { "0" }.to_string()
}

/// Ordered `data-*` attributes of the giscus script
pub fn script_attributes(config: &CommentsConfig) -> Vec<Attribute> {
    let attrs = [
        ("data-repo", config.repo.clone()),
        ("data-repo-id", config.repo_id.clone()),
        ("data-category", config.category.clone()),
        ("data-category-id", config.category_id.clone()),
        ("data-mapping", config.mapping.clone()),
        ("data-strict", "0".to_string()),
        ("data-reactions-enabled", flag(config.reactions_enabled)),
        ("data-emit-metadata", flag(config.emit_metadata)),
        ("data-input-position", config.input_position.clone()),
        ("data-theme", config.theme.clone()),
        ("data-lang", config.lang.clone()),
        ("data-loading", "lazy".to_string()),
    ];
    attrs
        .into_iter()
        .map(|(name, value)| Attribute { name, value })
        .collect()
}

/// The `<script>` tag, or nothing when comments are disabled
pub fn script_tag(config: &CommentsConfig) -> String {
    if !config.enabled() {
        return String::new();
    }

    let attrs: String = script_attributes(config)
        .iter()
        .map(|a| format!(r#" {}="{}""#, a.name, html_escape(&a.value)))
        .collect();

    format!(
        r#"<script src="{}"{} crossorigin="anonymous" async></script>"#,
        GISCUS_CLIENT, attrs
    )
}
