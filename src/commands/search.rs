//! Search posts from the command line

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::search::{SearchEntry, SearchIndex};
use crate::Blog;

/// Run a query against the site's posts and return the matches.
///
/// `titles` switches from the search box rules (title, excerpt and tags)
/// to the title-only dialog rules.
pub fn find(blog: &Blog, query: &str, titles: bool) -> Result<Vec<SearchEntry>> {
    let posts = ContentLoader::new(blog).load_posts()?;
    let index = SearchIndex::from_posts(&posts, &blog.config);

    let hits = if titles {
        index.search_titles(query)
    } else {
        index.search(query)
    };
    Ok(hits.into_iter().cloned().collect())
}

/// Print matches for a query
pub fn run(blog: &Blog, query: &str, titles: bool) -> Result<()> {
    let hits = find(blog, query, titles)?;

    if hits.is_empty() {
        if !titles && query.chars().count() < blog.config.search.min_query_chars {
            println!(
                "Query too short (at least {} characters)",
                blog.config.search.min_query_chars
            );
        } else {
            println!("No results for {:?}", query);
        }
        return Ok(());
    }

    println!("Results ({}):", hits.len());
    for entry in hits {
        println!("  {} - {} {}", entry.date_iso, entry.title, entry.url);
    }

    Ok(())
}
