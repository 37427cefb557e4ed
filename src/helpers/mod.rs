//! Helper functions shared by the loader, generator and templates

mod date;
mod html;
pub mod toc;
mod url;

pub use date::*;
pub use html::*;
pub use toc::{extract as toc, heading_id, HeadingSlugger, TocItem};
pub use url::*;
