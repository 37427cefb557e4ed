//! Content module - handles posts, pages, and content processing

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use error::ContentError;
pub use frontmatter::{parse_date_string, FrontMatter};
pub use markdown::{MarkdownRenderer, RenderOptions};
pub use post::{reading_time, Page, Post};
