//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain, percent-encoding the path
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/lifeLog/제주/") // -> "https://example.com/lifeLog/%EC%A0%9C%EC%A3%BC/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, encode_path(&url_for(config, path)))
}

/// Percent-encode a URL path, keeping `/` separators
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &str) -> SiteConfig {
        SiteConfig {
            url: "https://blog.example.com/".to_string(),
            root: root.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_for() {
        assert_eq!(url_for(&config("/"), "/devLog/"), "/devLog/");
        assert_eq!(url_for(&config("/blog/"), "devLog/"), "/blog/devLog/");
        assert_eq!(url_for(&config("/blog/"), ""), "/blog/");
    }

    #[test]
    fn test_full_url_for_encodes_hangul() {
        let url = full_url_for(&config("/"), "/lifeLog/제주 여행/");
        assert_eq!(
            url,
            "https://blog.example.com/lifeLog/%EC%A0%9C%EC%A3%BC%20%EC%97%AC%ED%96%89/"
        );
    }
}
