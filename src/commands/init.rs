//! Initialize a new blog

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Site
title: Logbook
description: 개발 과정에서 배운 것들과 일상의 소중한 순간들을 나누는 개인 블로그입니다.
author: '@blogauthor'
language: ko
timezone: Asia/Seoul

# URL
url: http://example.com
root: /

# Directory
content_dir: content
public_dir: public
static_dir: static
exclude: []

# Writing
render_drafts: false
words_per_minute: 200
excerpt_length: 160
date_format: YYYY년 MM월 DD일
highlight:
  theme: base16-ocean.dark
  line_number: true

# Category
default_category: posts
category_map:
  기술: devLog
  일상: lifeLog
sections:
  기술:
    title: DevLog
    subtitle: 개발 여정의 기록
    description: 코드로 문제를 해결하고, 새로운 기술을 학습하며, 개발 과정에서 얻은 인사이트를 기록합니다.
    gallery: none
  일상:
    title: LifeLog
    subtitle: 일상 속 소중한 순간들
    description: 여행, 경험, 그리고 삶에서 발견한 작은 기쁨들을 이야기로 나눕니다.
    gallery: bento

# Features
search:
  min_query_chars: 2
  max_results: 5
  dialog_max_results: 8
recent:
  months: 3
  step: 3
toc:
  enable: true
  max_depth: 6
  scroll_offset: 100
comments:
  # giscus is enabled once a repository is set
  repo: ''
  repo_id: ''
  category: General
  category_id: ''
"#;

const ABOUT: &str = r#"---
title: 소개
---

안녕하세요! 개발과 일상을 기록하는 블로그입니다.
"#;

/// Initialize a new blog in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("A blog already exists in {:?}", target_dir);
    }

    for dir in [
        "content/posts/devLog",
        "content/posts/lifeLog/first-day",
        "content/pages",
        "static",
    ] {
        let dir = target_dir.join(dir);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    fs::write(&config_path, CONFIG)?;
    fs::write(target_dir.join("content/pages/about.md"), ABOUT)?;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    fs::write(
        target_dir.join("content/posts/devLog/hello-world.md"),
        sample_post("첫 번째 개발 기록", &today, "기술", "## 시작하며\n\n첫 글입니다.\n\n```rust\nfn main() {\n    println!(\"Hello, world!\");\n}\n```\n"),
    )?;
    fs::write(
        target_dir.join("content/posts/lifeLog/first-day/index.md"),
        sample_post("첫 번째 일상 기록", &today, "일상", "오늘의 작은 기쁨을 기록합니다.\n"),
    )?;

    Ok(())
}

fn sample_post(title: &str, date: &str, category: &str, body: &str) -> String {
    format!(
        "---\ntitle: {}\ndate: {}\ncategory: {}\ntags: []\n---\n\n{}",
        title, date, category, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::ContentLoader;
    use crate::Blog;

    #[test]
    fn test_init_creates_loadable_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "Logbook");

        let loader = ContentLoader::new(&blog);
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 2);
        let mut slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        slugs.sort();
        assert_eq!(slugs, ["/devLog/hello-world", "/lifeLog/first-day"]);

        let pages = loader.load_pages().unwrap();
        assert_eq!(pages[0].name, "about");
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
