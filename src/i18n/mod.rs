//! Internationalization (i18n) of the built-in theme strings

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN: [(&str, &str); 2] = [("ko", include_str!("ko.yml")), ("en", include_str!("en.yml"))];

/// Internationalization handler
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, HashMap<String, serde_yaml::Value>>,
}

impl I18n {
    /// Create a handler with the built-in `ko` and `en` strings
    pub fn new(language: &str) -> Self {
        let mut translations = HashMap::new();
        for (lang, source) in BUILTIN {
            match serde_yaml::from_str(source) {
                Ok(data) => {
                    translations.insert(lang.to_string(), data);
                }
                Err(e) => tracing::error!("Built-in language {} is invalid: {}", lang, e),
            }
        }

        Self {
            language: language.to_string(),
            translations,
        }
    }

    /// Load language overrides (`<lang>.yml`) from a directory.
    ///
    /// Keys present in a file replace the built-in ones; missing keys keep
    /// their built-in value.
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || !matches!(ext, Some("yml") | Some("yaml")) {
                continue;
            }

            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = fs::read_to_string(&path)?;
            match serde_yaml::from_str::<HashMap<String, serde_yaml::Value>>(&content) {
                Ok(data) => {
                    let target = self.translations.entry(lang.to_string()).or_default();
                    for (key, value) in data {
                        merge_value(target.entry(key).or_insert(serde_yaml::Value::Null), value);
                    }
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by key; nested keys use dots like "post.next"
    pub fn get(&self, key: &str) -> String {
        self.get_for_lang(&self.language, key)
    }

    /// Get a translation for a specific language
    pub fn get_for_lang(&self, lang: &str, key: &str) -> String {
        if let Some(lang_data) = self.translations.get(lang) {
            if let Some(value) = get_nested_value(lang_data, key) {
                return yaml_value_to_string(value);
            }
        }

        // Fallback to English
        if lang != "en" {
            if let Some(lang_data) = self.translations.get("en") {
                if let Some(value) = get_nested_value(lang_data, key) {
                    return yaml_value_to_string(value);
                }
            }
        }

        // Return key as fallback
        key.to_string()
    }

    /// Get a translation and fill its `{name}` placeholders
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.get(key), |text, (name, value)| {
                text.replace(&format!("{{{}}}", name), value)
            })
    }

    /// Get all translations for the current language as a flat HashMap
    /// This flattens nested keys using dot notation (e.g., "nav.home")
    pub fn get_all_translations(&self) -> HashMap<String, String> {
        let mut result = HashMap::new();

        if let Some(lang_data) = self.translations.get(&self.language) {
            flatten_translations(lang_data, "", &mut result);
        }

        if self.language != "en" {
            if let Some(en_data) = self.translations.get("en") {
                let mut en_result = HashMap::new();
                flatten_translations(en_data, "", &mut en_result);
                for (k, v) in en_result {
                    result.entry(k).or_insert(v);
                }
            }
        }

        result
    }
}

/// Merge `value` into `target`, descending into mappings
fn merge_value(target: &mut serde_yaml::Value, value: serde_yaml::Value) {
    match (target, value) {
        (serde_yaml::Value::Mapping(existing), serde_yaml::Value::Mapping(incoming)) => {
            for (k, v) in incoming {
                match existing.get_mut(&k) {
                    Some(slot) => merge_value(slot, v),
                    None => {
                        existing.insert(k, v);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(
    data: &'a HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?);

    for part in parts {
        match current {
            Some(serde_yaml::Value::Mapping(map)) => {
                current = map.get(serde_yaml::Value::String(part.to_string()));
            }
            _ => return None,
        }
    }

    current
}

/// Convert a YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

/// Flatten translations into a HashMap with dot-notation keys
fn flatten_translations(
    data: &HashMap<String, serde_yaml::Value>,
    prefix: &str,
    result: &mut HashMap<String, String>,
) {
    for (key, value) in data {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            serde_yaml::Value::Mapping(map) => {
                let nested: HashMap<String, serde_yaml::Value> = map
                    .iter()
                    .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.clone())))
                    .collect();
                flatten_translations(&nested, &full_key, result);
            }
            serde_yaml::Value::Sequence(_) | serde_yaml::Value::Tagged(_) => {}
            scalar => {
                result.insert(full_key, yaml_value_to_string(scalar));
            }
        }
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new("ko")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_strings() {
        let i18n = I18n::new("ko");
        assert_eq!(i18n.get("toc.title"), "목차");
        assert_eq!(i18n.get_for_lang("en", "toc.title"), "Contents");
        assert_eq!(i18n.get("unknown.key"), "unknown.key");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let i18n = I18n::new("fr");
        assert_eq!(i18n.get("nav.home"), "Home");
    }

    #[test]
    fn test_format_placeholders() {
        let i18n = I18n::new("ko");
        assert_eq!(
            i18n.format("post.previous", &[("section", "DevLog")]),
            "이전 DevLog"
        );
        assert_eq!(
            i18n.format("category.description", &[("category", "여행")]),
            "여행 관련 포스트들입니다."
        );
    }

    #[test]
    fn test_load_overrides() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ko.yml"), "toc:\n  title: 차례\n").unwrap();

        let mut i18n = I18n::new("ko");
        i18n.load_languages(dir.path()).unwrap();
        assert_eq!(i18n.get("toc.title"), "차례");
        // siblings of an overridden key survive
        assert_eq!(i18n.get("nav.home"), "홈");
    }

    #[test]
    fn test_get_all_translations() {
        let i18n = I18n::new("ko");
        let all = i18n.get_all_translations();
        assert_eq!(all.get("nav.about"), Some(&"소개".to_string()));
        assert_eq!(all.get("search.placeholder"), Some(&"검색어를 입력하세요...".to_string()));
    }
}
