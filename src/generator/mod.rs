//! Generator module - generates static HTML files using built-in Tera templates

use anyhow::{Context as _, Result};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::comments;
use crate::config::GalleryLayout;
use crate::content::{ContentError, Page, Post};
use crate::gallery::bento_class;
use crate::helpers::{date_iso, format_date, full_url_for, open_graph, url_for};
use crate::i18n::I18n;
use crate::recent::RecentActivity;
use crate::search::SearchIndex;
use crate::taxonomy::{map_category, Categories, Category};
use crate::templates::{
    CategoryData, GalleryData, GalleryItem, NavPost, NavSection, PageData, PostData, PostNavData,
    RecentData, RecentTabData, SeoData, SiteData, TemplateRenderer, TocData, ASSETS,
};
use crate::Blog;

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    i18n: I18n,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let mut i18n = I18n::new(&blog.config.language);
        i18n.load_languages(blog.base_dir.join(&blog.config.i18n_dir))?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
            i18n,
        })
    }

    /// Generate the entire site, using today's date in the site timezone
    pub fn generate(&self, posts: &[Post], pages: &[Page]) -> Result<()> {
        let today = chrono::Utc::now()
            .with_timezone(&self.blog.config.tz())
            .date_naive();
        self.generate_on(posts, pages, today)
    }

    /// Generate the entire site as of `today`
    pub fn generate_on(&self, posts: &[Post], pages: &[Page], today: NaiveDate) -> Result<()> {
        let categories = Categories::build(posts, &self.blog.config, &self.i18n);
        let listings = self.category_listings(&categories);
        check_output_paths(posts, &listings, pages)?;

        let public_dir = &self.blog.public_dir;
        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {:?}", public_dir))?;

        // Theme assets first so static/ can override them
        self.write_assets()?;
        self.copy_static_files()?;

        let site_data = self.build_site_data(today);

        self.generate_index_page(posts, &categories, &site_data, today)?;
        self.generate_post_pages(posts, &categories, &site_data)?;
        self.generate_category_pages(posts, &categories, &listings, &site_data)?;
        self.generate_page_pages(pages, &site_data)?;

        SearchIndex::from_posts(posts, &self.blog.config)
            .write_to_file(&public_dir.join("search.json"))?;
        tracing::info!("Generated search.json");

        self.copy_post_assets(posts)?;

        Ok(())
    }

    /// Build site data for templates
    fn build_site_data(&self, today: NaiveDate) -> SiteData {
        let config = &self.blog.config;
        let sections = config
            .sections
            .iter()
            .map(|(category, section)| {
                let key = map_category(category, config);
                NavSection {
                    path: url_for(config, &format!("/{}/", key)),
                    key,
                    title: section.title.clone(),
                }
            })
            .collect();

        SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.clone(),
            root: url_for(config, "/"),
            language: config.language.clone(),
            current_year: today.year().to_string(),
            sections,
            search: config.search.clone(),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self, site_data: &SiteData, seo: &SeoData) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("seo", seo);
        context.insert("t", &self.i18n.get_all_translations());
        context
    }

    /// SEO head data for a page at `path`
    fn seo(
        &self,
        title: Option<&str>,
        description: &str,
        keywords: &[String],
        image: Option<&str>,
        path: &str,
        article: bool,
    ) -> SeoData {
        let config = &self.blog.config;
        let meta_title = match title {
            Some(title) => format!("{} | {}", title, config.title),
            None => config.title.clone(),
        };
        let description = if description.trim().is_empty() {
            config.description.clone()
        } else {
            description.to_string()
        };
        let canonical = full_url_for(config, path);
        let image = match image {
            Some(img) if img.starts_with("http://") || img.starts_with("https://") => {
                img.to_string()
            }
            Some(img) => full_url_for(config, img),
            None => full_url_for(config, "/og-default.png"),
        };

        SeoData {
            open_graph: open_graph(
                &meta_title,
                &description,
                &canonical,
                Some(&image),
                &config.title,
                article,
            ),
            title: meta_title,
            description,
            keywords: keywords.join(", "),
            canonical,
        }
    }

    /// Template data for a post; listings leave out the body
    fn post_data(&self, post: &Post, categories: &Categories, with_content: bool) -> PostData {
        let config = &self.blog.config;
        PostData {
            title: post.title.clone(),
            date: format_date(&post.date, &config.date_format),
            date_iso: date_iso(&post.date),
            modified: post.modified_if_changed().map(|m| {
                let date = format_date(&m, &config.date_format);
                self.i18n.format("post.modified", &[("date", &date)])
            }),
            category: post.category.clone(),
            section: post.section.clone(),
            section_title: categories.title_of(&post.category).to_string(),
            path: url_for(config, &post.path()),
            tags: post.tags.clone(),
            excerpt: post.excerpt.clone(),
            thumbnail: post.thumbnail.as_deref().map(|t| self.asset_url(t)),
            content: if with_content {
                post.content.clone()
            } else {
                String::new()
            },
            reading_time: self.i18n.format(
                "post.reading_time",
                &[("minutes", &post.reading_time.to_string())],
            ),
        }
    }

    fn nav_post(&self, post: &Post) -> NavPost {
        NavPost {
            title: post.title.clone(),
            path: url_for(&self.blog.config, &post.path()),
            date: format_date(&post.date, &self.blog.config.date_format),
        }
    }

    /// Site-relative URLs get the root prefix; external ones pass through
    fn asset_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            url_for(&self.blog.config, url)
        }
    }

    /// Generate the home page with the recent activity block
    fn generate_index_page(
        &self,
        posts: &[Post],
        categories: &Categories,
        site_data: &SiteData,
        today: NaiveDate,
    ) -> Result<()> {
        let recent = RecentActivity::compute(posts, today, &self.blog.config, &self.i18n);
        let recent_data = RecentData {
            window: self
                .i18n
                .format("recent.window", &[("months", &recent.months.to_string())]),
            tabs: recent
                .tabs
                .iter()
                .map(|tab| RecentTabData {
                    key: tab.key.clone(),
                    label: tab.label.clone(),
                    count: tab.count,
                    posts: tab
                        .posts
                        .iter()
                        .map(|&i| self.post_data(&posts[i], categories, false))
                        .collect(),
                })
                .collect(),
            has_more: recent.has_more,
        };

        let seo = self.seo(None, "", &[], None, "/", false);
        let mut context = self.create_base_context(site_data, &seo);
        context.insert("recent", &recent_data);

        let html = self.renderer.render("index.html", &context)?;
        self.write_output("index.html", &html)?;
        tracing::debug!("Generated index.html");

        Ok(())
    }

    /// Generate individual post pages
    fn generate_post_pages(
        &self,
        posts: &[Post],
        categories: &Categories,
        site_data: &SiteData,
    ) -> Result<()> {
        let config = &self.blog.config;
        let comments = comments::script_tag(&config.comments);

        for (i, post) in posts.iter().enumerate() {
            let section_title = categories.title_of(&post.category);
            let neighbors = categories.neighbors(posts, i);
            let label = |key: &str| self.i18n.format(key, &[("section", section_title)]);
            let nav = PostNavData {
                previous_label: label("post.previous"),
                next_label: label("post.next"),
                no_previous: label("post.no_previous"),
                no_next: label("post.no_next"),
                previous: neighbors.previous.map(|p| self.nav_post(&posts[p])),
                next: neighbors.next.map(|n| self.nav_post(&posts[n])),
            };

            let layout = config
                .section(&post.category)
                .map(|s| s.gallery)
                .unwrap_or(GalleryLayout::None);
            let gallery = match layout {
                GalleryLayout::None => None,
                _ if post.gallery.is_empty() => None,
                GalleryLayout::Bento | GalleryLayout::Wall => {
                    let total = post.gallery.len();
                    Some(GalleryData {
                        layout: if layout == GalleryLayout::Bento {
                            "bento".to_string()
                        } else {
                            "wall".to_string()
                        },
                        images: post
                            .gallery
                            .iter()
                            .enumerate()
                            .map(|(index, image)| GalleryItem {
                                index,
                                url: url_for(config, &image.url),
                                file_name: image.file_name.clone(),
                                class: if layout == GalleryLayout::Bento {
                                    bento_class(index, total).to_string()
                                } else {
                                    String::new()
                                },
                            })
                            .collect(),
                    })
                }
            };

            let toc = TocData {
                items: post.toc.clone(),
                scroll_offset: config.toc.scroll_offset,
            };

            let seo = self.seo(
                Some(&post.title),
                &post.excerpt,
                &post.tags,
                post.thumbnail.as_deref(),
                &post.path(),
                true,
            );
            let mut context = self.create_base_context(site_data, &seo);
            context.insert("post", &self.post_data(post, categories, true));
            context.insert(
                "category_path",
                &url_for(config, &format!("/{}/", post.section)),
            );
            context.insert("nav", &nav);
            context.insert("toc", &toc);
            context.insert("gallery", &gallery);
            context.insert(
                "comments",
                &(!comments.is_empty()).then(|| comments.clone()),
            );

            let html = self.renderer.render("post.html", &context)?;
            let output = format!("{}/index.html", post.slug.trim_start_matches('/'));
            self.write_output(&output, &html)?;
            tracing::debug!("Generated post: {}", output);
        }

        tracing::info!("Generated {} posts", posts.len());
        Ok(())
    }

    /// One listing per category, plus empty listings for configured
    /// sections without posts
    fn category_listings(&self, categories: &Categories) -> Vec<Category> {
        let config = &self.blog.config;
        let mut listings: Vec<Category> = categories.iter().cloned().collect();

        for (name, section) in &config.sections {
            if categories.get(name).is_none() {
                listings.push(Category {
                    name: name.clone(),
                    section: map_category(name, config),
                    title: section.title.clone(),
                    subtitle: section.subtitle.clone(),
                    description: section.description.clone(),
                    posts: Vec::new(),
                });
            }
        }

        listings
    }

    /// Generate the category listings
    fn generate_category_pages(
        &self,
        posts: &[Post],
        categories: &Categories,
        listings: &[Category],
        site_data: &SiteData,
    ) -> Result<()> {
        let config = &self.blog.config;

        for category in listings {
            let data = CategoryData {
                name: category.name.clone(),
                section: category.section.clone(),
                title: category.title.clone(),
                subtitle: category.subtitle.clone(),
                description: category.description.clone(),
                path: url_for(config, &category.path()),
                count: self.i18n.format(
                    "category.count",
                    &[("count", &category.posts.len().to_string())],
                ),
                posts: category
                    .posts
                    .iter()
                    .map(|&i| self.post_data(&posts[i], categories, false))
                    .collect(),
            };

            let seo = self.seo(
                Some(&category.title),
                &category.description,
                &[],
                None,
                &category.path(),
                false,
            );
            let mut context = self.create_base_context(site_data, &seo);
            context.insert("category", &data);

            let html = self.renderer.render("category.html", &context)?;
            self.write_output(&format!("{}/index.html", category.section), &html)?;
        }

        tracing::info!("Generated {} category pages", listings.len());
        Ok(())
    }

    /// Generate standalone pages; a default 404 page is written when the
    /// site has none
    fn generate_page_pages(&self, pages: &[Page], site_data: &SiteData) -> Result<()> {
        for page in pages {
            self.render_page(
                &PageData {
                    title: page.title.clone(),
                    path: url_for(&self.blog.config, &page.path()),
                    content: page.content.clone(),
                    not_found: page.is_not_found(),
                },
                &page.path(),
                site_data,
            )?;
        }

        if !pages.iter().any(Page::is_not_found) {
            self.render_page(
                &PageData {
                    title: self.i18n.get("not_found.title"),
                    path: url_for(&self.blog.config, "/404.html"),
                    content: String::new(),
                    not_found: true,
                },
                "/404.html",
                site_data,
            )?;
        }

        Ok(())
    }

    fn render_page(&self, page: &PageData, path: &str, site_data: &SiteData) -> Result<()> {
        let seo = self.seo(Some(&page.title), "", &[], None, path, false);
        let mut context = self.create_base_context(site_data, &seo);
        context.insert("page", page);

        let html = self.renderer.render("page.html", &context)?;
        let output = if page.not_found {
            "404.html".to_string()
        } else {
            format!("{}index.html", path.trim_start_matches('/'))
        };
        self.write_output(&output, &html)?;
        tracing::debug!("Generated page: {}", output);
        Ok(())
    }

    /// Write the embedded theme assets
    fn write_assets(&self) -> Result<()> {
        for (path, content) in ASSETS {
            self.write_output(path, content)?;
        }
        Ok(())
    }

    /// Copy static/ into the public directory
    fn copy_static_files(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(static_dir)?;
            copy_file(path, &self.blog.public_dir.join(relative))?;
        }

        Ok(())
    }

    /// Copy gallery images and local thumbnails next to each post page
    fn copy_post_assets(&self, posts: &[Post]) -> Result<()> {
        let public_dir = &self.blog.public_dir;
        let mut copied = 0;

        for post in posts {
            for image in &post.gallery {
                copy_file(&image.source, &public_dir.join(image.url.trim_start_matches('/')))?;
                copied += 1;
            }

            if let (Some(source), Some(url)) = (&post.thumbnail_source, &post.thumbnail) {
                let dest = public_dir.join(url.trim_start_matches('/'));
                if dest.exists() {
                    continue;
                }
                if source.is_file() {
                    copy_file(source, &dest)?;
                    copied += 1;
                } else {
                    tracing::warn!("Thumbnail {:?} of {} not found", source, post.source);
                }
            }
        }

        tracing::debug!("Copied {} post assets", copied);
        Ok(())
    }

    /// Write a file relative to the public directory
    fn write_output(&self, relative: &str, content: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, content)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        Ok(())
    }
}

/// Posts, category listings and pages must each get their own page path
fn check_output_paths(
    posts: &[Post],
    listings: &[Category],
    pages: &[Page],
) -> Result<(), ContentError> {
    let owners = posts
        .iter()
        .map(|p| (p.path(), format!("post {}", p.source)))
        .chain(
            listings
                .iter()
                .map(|c| (c.path(), format!("category {:?}", c.name))),
        )
        .chain(pages.iter().map(|p| (p.path(), format!("page {}", p.source))));

    let mut seen: HashMap<String, String> = HashMap::new();
    for (path, owner) in owners {
        if let Some(first) = seen.get(&path) {
            return Err(ContentError::OutputConflict {
                path,
                first: first.clone(),
                second: owner,
            });
        }
        seen.insert(path, owner);
    }
    Ok(())
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;
    Ok(())
}
