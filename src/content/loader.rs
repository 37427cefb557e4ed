//! Content loader - loads posts and pages from the content directory

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::post::reading_time;
use super::{ContentError, FrontMatter, MarkdownRenderer, Page, Post, RenderOptions};
use crate::config::GalleryLayout;
use crate::helpers::{count_words, plain_text, toc, truncate};
use crate::taxonomy::{map_category, post_slug, resolve_category};
use crate::{gallery, Blog};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
    exclude: Vec<glob::Pattern>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        let renderer = MarkdownRenderer::with_config(&blog.config.highlight);
        let exclude = blog
            .config
            .exclude
            .iter()
            .filter_map(|pattern| match glob::Pattern::new(pattern) {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!("Ignoring invalid exclude pattern {:?}: {}", pattern, e);
                    None
                }
            })
            .collect();

        Self {
            blog,
            renderer,
            exclude,
        }
    }

    /// Load all posts from content/posts, newest first
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.blog.posts_dir();
        if !posts_dir.exists() {
            tracing::warn!("No posts directory at {:?}", posts_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for path in self.markdown_files(&posts_dir, usize::MAX) {
            let content = read_source(&path)?;
            let (fm, body) = FrontMatter::parse(&path, &content)?;
            // Unfinished drafts may lack a title or date
            if fm.draft && !self.blog.config.render_drafts {
                tracing::debug!("Skipping draft {:?}", path);
                continue;
            }
            posts.push(self.build_post(&path, fm, body)?);
        }

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        check_unique_slugs(&posts)?;

        Ok(posts)
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<Post> {
        let content = read_source(path)?;
        let (fm, body) = FrontMatter::parse(path, &content)?;
        self.build_post(path, fm, body)
    }

    fn build_post(&self, path: &Path, fm: FrontMatter, body: &str) -> Result<Post> {
        let config = &self.blog.config;
        let title = fm.require_title(path)?;
        let date = fm.parse_date(path)?;
        let modified = fm.parse_modified(path)?;

        let category = resolve_category(fm.category.as_deref(), config).to_string();
        let section = map_category(&category, config);
        let slug = post_slug(&section, &post_stem(path));

        let strip_images = config
            .section(&category)
            .map(|s| s.gallery != GalleryLayout::None)
            .unwrap_or(false);

        let (excerpt_md, full_md) = MarkdownRenderer::split_excerpt(body);
        let content_html = self
            .renderer
            .render_with(&full_md, RenderOptions { strip_images })
            .with_context(|| format!("Failed to render {:?}", path))?;

        let excerpt = match (fm.excerpt, excerpt_md) {
            (Some(excerpt), _) if !excerpt.trim().is_empty() => excerpt.trim().to_string(),
            (_, Some(more)) => plain_text(&self.renderer.render(&more)?),
            _ => truncate(&plain_text(&content_html), config.excerpt_length, None),
        };

        let post_dir = path.parent().unwrap_or(Path::new("."));
        // Only a bundle (`{name}/index.md`) owns the images of its directory
        let images = if is_bundle(path) {
            gallery::collect(post_dir, &slug)?
        } else {
            Vec::new()
        };

        let word_count = count_words(&content_html);
        let toc = if config.toc.enable {
            toc(&content_html, config.toc.max_depth)
        } else {
            Vec::new()
        };

        let mut post = Post::new(title, date, self.relative_source(path));
        post.modified = modified;
        if let Some(thumb) = fm.thumbnail.as_deref() {
            match resolve_thumbnail(thumb, post_dir, &slug) {
                Some((url, source)) => {
                    post.thumbnail = Some(url);
                    post.thumbnail_source = source;
                }
                None => tracing::warn!(
                    "{:?}: ignoring thumbnail {:?} outside the post directory",
                    path,
                    thumb
                ),
            }
        }
        post.category = category;
        post.section = section;
        post.tags = fm.tags;
        post.excerpt = excerpt;
        post.slug = slug;
        post.full_source = path.to_path_buf();
        post.raw = body.to_string();
        post.content = content_html;
        post.toc = toc;
        post.reading_time = reading_time(word_count, config.words_per_minute);
        post.word_count = word_count;
        post.gallery = images;
        post.draft = fm.draft;
        post.extra = fm.extra;

        Ok(post)
    }

    /// Load standalone pages from content/pages
    pub fn load_pages(&self) -> Result<Vec<Page>> {
        let pages_dir = self.blog.pages_dir();
        if !pages_dir.exists() {
            return Ok(Vec::new());
        }

        let mut pages = Vec::new();
        for path in self.markdown_files(&pages_dir, 1) {
            pages.push(self.load_page(&path)?);
        }
        pages.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(pages)
    }

    /// Load a single page; front-matter is optional and the title falls
    /// back to the file stem
    fn load_page(&self, path: &Path) -> Result<Page> {
        let content = read_source(path)?;
        let (fm, body) = match FrontMatter::parse(path, &content) {
            Ok(parsed) => parsed,
            Err(ContentError::MissingFrontMatter { .. }) => (FrontMatter::default(), content.as_str()),
            Err(e) => return Err(e.into()),
        };

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled".to_string());
        let title = fm
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| name.clone());

        let mut page = Page::new(title, name, self.relative_source(path));
        page.raw = body.to_string();
        page.content = self
            .renderer
            .render(body)
            .with_context(|| format!("Failed to render {:?}", path))?;
        page.full_source = path.to_path_buf();
        page.extra = fm.extra;

        Ok(page)
    }

    /// Markdown files under `dir` that no exclude pattern matches
    fn markdown_files(&self, dir: &Path, max_depth: usize) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(max_depth)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|path| path.is_file() && is_markdown_file(path))
            .filter(|path| !self.is_excluded(path))
            .collect();
        files.sort();
        files
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path
            .strip_prefix(&self.blog.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        let excluded = self.exclude.iter().any(|p| p.matches(&relative));
        if excluded {
            tracing::debug!("Excluded {}", relative);
        }
        excluded
    }

    /// Source path relative to the content directory
    fn relative_source(&self, path: &Path) -> String {
        path.strip_prefix(&self.blog.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

fn read_source(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Check if a file has a markdown extension
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MARKDOWN_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// `{name}/index.md`: the post owns its directory
fn is_bundle(path: &Path) -> bool {
    path.file_stem().is_some_and(|s| s == "index")
}

/// File stem used in the slug; `index.md` takes its directory's name
fn post_stem(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    if is_bundle(path) {
        if let Some(dir) = path.parent().and_then(|p| p.file_name()) {
            return dir.to_string_lossy().to_string();
        }
    }
    stem
}

/// Thumbnail URL and, for local files, the file to copy.
///
/// Relative paths are normalized and must stay inside the post directory;
/// `None` when they climb out of it.
fn resolve_thumbnail(
    thumb: &str,
    post_dir: &Path,
    slug: &str,
) -> Option<(String, Option<PathBuf>)> {
    if thumb.starts_with("http://") || thumb.starts_with("https://") || thumb.starts_with('/') {
        return Some((thumb.to_string(), None));
    }

    let mut parts: Vec<String> = Vec::new();
    for component in Path::new(thumb).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().to_string()),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }

    let relative = parts.join("/");
    Some((
        format!("{}/{}", slug, relative),
        Some(post_dir.join(&relative)),
    ))
}

/// Every slug must name exactly one post
fn check_unique_slugs(posts: &[Post]) -> Result<(), ContentError> {
    let mut seen: HashMap<&str, &Post> = HashMap::new();
    for post in posts {
        if let Some(first) = seen.insert(&post.slug, post) {
            let (first, second) = if first.full_source <= post.full_source {
                (first, post)
            } else {
                (post, first)
            };
            return Err(ContentError::DuplicateSlug {
                slug: post.slug.clone(),
                first: first.full_source.clone(),
                second: second.full_source.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_markdown_file() {
        assert!(is_markdown_file(Path::new("a/b.md")));
        assert!(is_markdown_file(Path::new("a/b.mdx")));
        assert!(is_markdown_file(Path::new("a/b.MARKDOWN")));
        assert!(!is_markdown_file(Path::new("a/b.txt")));
        assert!(!is_markdown_file(Path::new("a/md")));
    }

    #[test]
    fn test_post_stem() {
        assert_eq!(post_stem(Path::new("posts/dev/rust.md")), "rust");
        assert_eq!(post_stem(Path::new("posts/life/jeju/index.md")), "jeju");
        assert_eq!(post_stem(Path::new("posts/notes.v2.mdx")), "notes.v2");
    }

    #[test]
    fn test_resolve_thumbnail() {
        let dir = Path::new("/site/content/posts/jeju");
        assert_eq!(
            resolve_thumbnail("./cover.jpg", dir, "/lifeLog/jeju"),
            Some((
                "/lifeLog/jeju/cover.jpg".to_string(),
                Some(dir.join("cover.jpg"))
            ))
        );
        assert_eq!(
            resolve_thumbnail("img/../cover.jpg", dir, "/lifeLog/jeju"),
            Some((
                "/lifeLog/jeju/cover.jpg".to_string(),
                Some(dir.join("cover.jpg"))
            ))
        );
        assert_eq!(
            resolve_thumbnail("https://cdn.example.com/a.png", dir, "/lifeLog/jeju"),
            Some(("https://cdn.example.com/a.png".to_string(), None))
        );
    }

    #[test]
    fn test_thumbnail_outside_post_dir_is_rejected() {
        let dir = Path::new("/site/content/posts/devLog/post");
        assert_eq!(resolve_thumbnail("../cover.png", dir, "/devLog/post"), None);
        assert_eq!(
            resolve_thumbnail("./a/../../../../cover.png", dir, "/devLog/post"),
            None
        );
        assert_eq!(resolve_thumbnail(".", dir, "/devLog/post"), None);
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_gallery_belongs_to_bundle_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let post = |title: &str| {
            format!("---\ntitle: {}\ndate: 2024-05-01\ncategory: 일상\n---\n\nbody\n", title)
        };
        write(root, "content/posts/lifeLog/busan.md", &post("Busan"));
        write(root, "content/posts/lifeLog/seoul.md", &post("Seoul"));
        write(root, "content/posts/lifeLog/sea.jpg", "jpg");
        write(root, "content/posts/lifeLog/jeju/index.md", &post("Jeju"));
        write(root, "content/posts/lifeLog/jeju/jeju-sea.jpg", "jpg");

        let blog = Blog::new(root).unwrap();
        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        let gallery_of = |slug: &str| -> Vec<String> {
            posts
                .iter()
                .find(|p| p.slug == slug)
                .unwrap()
                .gallery
                .iter()
                .map(|g| g.file_name.clone())
                .collect()
        };

        assert!(gallery_of("/lifeLog/busan").is_empty());
        assert!(gallery_of("/lifeLog/seoul").is_empty());
        assert_eq!(gallery_of("/lifeLog/jeju"), vec!["jeju-sea.jpg"]);
    }

    #[test]
    fn test_unfinished_draft_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            "content/posts/devLog/idea.md",
            "---\ndraft: true\n---\n\nsomeday\n",
        );
        write(
            root,
            "content/posts/devLog/done.md",
            "---\ntitle: Done\ndate: 2024-05-01\ncategory: 기술\n---\n\nbody\n",
        );

        let blog = Blog::new(root).unwrap();
        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "/devLog/done");

        // rendering drafts requires them to be complete
        let mut blog = blog;
        blog.config.render_drafts = true;
        assert!(ContentLoader::new(&blog).load_posts().is_err());
    }
}
