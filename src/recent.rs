//! Recent activity window shown on the home page

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::months_before;
use crate::i18n::I18n;
use crate::taxonomy::map_category;

/// One tab of the recent activity block
#[derive(Debug, Clone, Serialize)]
pub struct RecentTab {
    /// `all` or a section such as `devLog`
    pub key: String,
    pub label: String,
    pub count: usize,
    /// Indices into the site's post list, newest first
    pub posts: Vec<usize>,
}

/// Posts published within the last `months` months
#[derive(Debug, Clone, Serialize)]
pub struct RecentActivity {
    pub months: u32,
    /// First day inside the window
    pub cutoff: NaiveDate,
    pub tabs: Vec<RecentTab>,
    /// Whether older posts exist in the next `step` months before the cutoff
    pub has_more: bool,
}

impl RecentActivity {
    /// Compute the window ending at `today` over posts sorted newest first
    pub fn compute(posts: &[Post], today: NaiveDate, config: &SiteConfig, i18n: &I18n) -> Self {
        let months = config.recent.months;
        let cutoff = months_before(today, months);
        let next_cutoff = months_before(today, months + config.recent.step);

        let in_window: Vec<usize> = posts
            .iter()
            .enumerate()
            .filter(|(_, p)| p.date.date() >= cutoff)
            .map(|(i, _)| i)
            .collect();

        let has_more = posts.iter().any(|p| {
            let day = p.date.date();
            day >= next_cutoff && day < cutoff
        });

        let mut tabs = vec![RecentTab {
            key: "all".to_string(),
            label: i18n.get("recent.all"),
            count: in_window.len(),
            posts: in_window.clone(),
        }];

        for (category, section) in &config.sections {
            let key = map_category(category, config);
            let posts: Vec<usize> = in_window
                .iter()
                .copied()
                .filter(|&i| posts[i].category == *category)
                .collect();
            tabs.push(RecentTab {
                key,
                label: section.title.clone(),
                count: posts.len(),
                posts,
            });
        }

        Self {
            months,
            cutoff,
            tabs,
            has_more,
        }
    }

    /// Posts of the `all` tab
    pub fn all(&self) -> &[usize] {
        self.tabs.first().map(|t| t.posts.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::post;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
    }

    #[test]
    fn test_window_and_tabs() {
        let posts = vec![
            post("a", "기술", "2024-05-20"),
            post("b", "일상", "2024-04-10"),
            post("c", "Travel", "2024-03-01"),
            post("d", "기술", "2024-02-29"),
            post("e", "기술", "2023-12-01"),
        ];
        let recent =
            RecentActivity::compute(&posts, today(), &SiteConfig::default(), &I18n::new("ko"));

        assert_eq!(recent.months, 3);
        assert_eq!(recent.cutoff, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(recent.all(), &[0, 1, 2, 3]);

        let summary: Vec<_> = recent
            .tabs
            .iter()
            .map(|t| (t.key.as_str(), t.label.as_str(), t.count))
            .collect();
        assert_eq!(
            summary,
            vec![("all", "전체", 4), ("devLog", "DevLog", 2), ("lifeLog", "LifeLog", 1)]
        );
        assert!(recent.has_more);
    }

    #[test]
    fn test_no_more_beyond_next_step() {
        let posts = vec![
            post("a", "기술", "2024-05-01"),
            post("old", "기술", "2023-06-01"),
        ];
        let recent =
            RecentActivity::compute(&posts, today(), &SiteConfig::default(), &I18n::new("ko"));
        assert_eq!(recent.all(), &[0]);
        assert!(!recent.has_more);
    }

    #[test]
    fn test_empty_site() {
        let recent =
            RecentActivity::compute(&[], today(), &SiteConfig::default(), &I18n::new("ko"));
        assert!(recent.all().is_empty());
        assert!(!recent.has_more);
        assert!(recent.tabs.iter().all(|t| t.count == 0));
    }
}
