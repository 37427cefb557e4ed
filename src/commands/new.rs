//! Create a new post

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::config::GalleryLayout;
use crate::taxonomy::{map_category, resolve_category};
use crate::Blog;

/// Create a new post and return its path.
///
/// The file goes to `content/posts/{section}/{slugified title}.md`, or to
/// `{section}/{slugified title}/index.md` for sections with a gallery so the
/// post owns its images. `path` overrides the location (relative to
/// `content/posts`, extension optional).
pub fn create_post(
    blog: &Blog,
    title: &str,
    category: Option<&str>,
    path: Option<&str>,
) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("A post needs a title");
    }

    let category = resolve_category(category, &blog.config);
    let section = map_category(category, &blog.config);

    let file_path = match path {
        Some(p) => {
            let p = p.trim_start_matches('/');
            let mut file = blog.posts_dir().join(p);
            if file.extension().is_none() {
                file.set_extension("md");
            }
            file
        }
        None => {
            let mut stem = slug::slugify(title);
            if stem.is_empty() {
                stem = "untitled".to_string();
            }
            let has_gallery = blog
                .config
                .section(category)
                .is_some_and(|s| s.gallery != GalleryLayout::None);
            let dir = blog.posts_dir().join(&section);
            if has_gallery {
                dir.join(stem).join("index.md")
            } else {
                dir.join(format!("{}.md", stem))
            }
        }
    };

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }

    let now = chrono::Utc::now().with_timezone(&blog.config.tz());
    let content = format!(
        "---\ntitle: {}\ndate: {}\ncategory: {}\ntags: []\n---\n\n",
        yaml_string(title),
        now.format("%Y-%m-%d %H:%M:%S"),
        yaml_string(category),
    );

    fs::write(&file_path, content).with_context(|| format!("Failed to write {:?}", file_path))?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Double-quoted YAML scalar
fn yaml_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
