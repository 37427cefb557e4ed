//! Post image galleries: collection, bento layout and viewer navigation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// An image that sits next to a post's source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub file_name: String,
    /// Public URL, `{slug}/{file_name}`
    pub url: String,
    #[serde(skip)]
    pub source: PathBuf,
}

/// Whether a path names a gallery image (by extension, case-insensitive)
pub fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Collect the images of the directory `dir` for the post at `slug`,
/// sorted by file name
pub fn collect(dir: &Path, slug: &str) -> Result<Vec<GalleryImage>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut images = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))? {
        let path = entry?.path();
        if !path.is_file() || !is_image(&path) {
            continue;
        }
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        images.push(GalleryImage {
            url: format!("{}/{}", slug.trim_end_matches('/'), file_name),
            file_name,
            source: path,
        });
    }

    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(images)
}

/// Grid span classes of image `index` in a bento grid of `total` images
pub fn bento_class(index: usize, total: usize) -> &'static str {
    const LARGE: &str = "row-span-2 col-span-2";
    const WIDE: &str = "row-span-1 col-span-2";
    const TALL: &str = "row-span-2 col-span-1";
    const SMALL: &str = "row-span-1 col-span-1";

    match total {
        0 | 1 => LARGE,
        2 => {
            if index == 0 {
                LARGE
            } else {
                WIDE
            }
        }
        3 => {
            if index == 0 {
                LARGE
            } else {
                SMALL
            }
        }
        _ => match index % 6 {
            0 => LARGE,
            3 => WIDE,
            4 => TALL,
            _ => SMALL,
        },
    }
}

/// Index shown after "previous" in the viewer, wrapping to the last image
pub fn wrap_prev(index: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else if index == 0 {
        total - 1
    } else {
        (index - 1).min(total - 1)
    }
}

/// Index shown after "next" in the viewer, wrapping to the first image
pub fn wrap_next(index: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        (index + 1) % total
    }
}

/// Viewer position label, e.g. `3 / 7`
pub fn counter(index: usize, total: usize) -> String {
    format!("{} / {}", index + 1, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("a/photo.JPG")));
        assert!(is_image(Path::new("beach.webp")));
        assert!(is_image(Path::new("anim.gif")));
        assert!(!is_image(Path::new("index.md")));
        assert!(!is_image(Path::new("noext")));
    }

    #[test]
    fn test_collect_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "post.md", "c.TXT"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let images = collect(dir.path(), "/lifeLog/jeju").unwrap();
        let names: Vec<_> = images.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
        assert_eq!(images[0].url, "/lifeLog/jeju/a.jpg");
    }

    #[test]
    fn test_collect_missing_dir() {
        let images = collect(Path::new("/definitely/not/here"), "/x").unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn test_bento_small_sets() {
        assert_eq!(bento_class(0, 1), "row-span-2 col-span-2");

        assert_eq!(bento_class(0, 2), "row-span-2 col-span-2");
        assert_eq!(bento_class(1, 2), "row-span-1 col-span-2");

        assert_eq!(bento_class(0, 3), "row-span-2 col-span-2");
        assert_eq!(bento_class(1, 3), "row-span-1 col-span-1");
        assert_eq!(bento_class(2, 3), "row-span-1 col-span-1");
    }

    #[test]
    fn test_bento_pattern_repeats() {
        let classes: Vec<_> = (0..8).map(|i| bento_class(i, 8)).collect();
        assert_eq!(
            classes,
            vec![
                "row-span-2 col-span-2",
                "row-span-1 col-span-1",
                "row-span-1 col-span-1",
                "row-span-1 col-span-2",
                "row-span-2 col-span-1",
                "row-span-1 col-span-1",
                "row-span-2 col-span-2",
                "row-span-1 col-span-1",
            ]
        );
    }

    #[test]
    fn test_viewer_wraps() {
        assert_eq!(wrap_prev(0, 4), 3);
        assert_eq!(wrap_prev(2, 4), 1);
        assert_eq!(wrap_next(3, 4), 0);
        assert_eq!(wrap_next(1, 4), 2);
        assert_eq!(wrap_next(0, 1), 0);
        assert_eq!(wrap_prev(0, 0), 0);
        assert_eq!(counter(2, 7), "3 / 7");
    }
}
