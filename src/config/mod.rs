//! Configuration module

mod site;

pub use site::CommentsConfig;
pub use site::GalleryLayout;
pub use site::HighlightConfig;
pub use site::RecentConfig;
pub use site::SearchConfig;
pub use site::SectionConfig;
pub use site::SiteConfig;
pub use site::TocConfig;
