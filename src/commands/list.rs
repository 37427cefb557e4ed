//! List site content

use anyhow::Result;
use indexmap::IndexMap;

use crate::content::loader::ContentLoader;
use crate::i18n::I18n;
use crate::taxonomy::Categories;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(blog);

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} {} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.slug,
                    post.source
                );
            }
        }
        "page" | "pages" => {
            let pages = loader.load_pages()?;
            println!("Pages ({}):", pages.len());
            for page in pages {
                println!("  {} {} [{}]", page.title, page.path(), page.source);
            }
        }
        "tag" | "tags" => {
            let posts = loader.load_posts()?;
            let tags = count_tags(posts.iter().flat_map(|p| p.tags.iter()));
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "category" | "categories" => {
            let posts = loader.load_posts()?;
            let i18n = I18n::new(&blog.config.language);
            let categories = Categories::build(&posts, &blog.config, &i18n);
            println!("Categories ({}):", categories.len());
            for category in categories.iter() {
                println!(
                    "  {} -> /{}/ ({})",
                    category.name,
                    category.section,
                    category.posts.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, tag, category",
                content_type
            );
        }
    }

    Ok(())
}

/// Tag counts, most used first, ties in first-seen order
fn count_tags<'a>(tags: impl Iterator<Item = &'a String>) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for tag in tags {
        *counts.entry(tag.clone()).or_insert(0) += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tags() {
        let tags: Vec<String> = ["rust", "async", "rust", "life"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let counts = count_tags(tags.iter());
        assert_eq!(
            counts,
            vec![
                ("rust".to_string(), 2),
                ("async".to_string(), 1),
                ("life".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert!(run(&blog, "routes").is_err());
        assert!(run(&blog, "post").is_ok());
    }
}
