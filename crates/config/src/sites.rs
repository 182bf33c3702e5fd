//! Per-site navigation profiles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Locators and scroll options for one host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Locator of the "next chapter" control
    #[serde(default)]
    pub next: Option<String>,

    /// Locator of the "previous chapter" control
    #[serde(default)]
    pub prev: Option<String>,

    /// Locator of the "all chapters" / series page link
    #[serde(default)]
    pub all_chapters: Option<String>,

    /// Scroll distance multiplier for this site
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed: f64,

    /// Locator of a nested scrollable element; the viewport when unset
    #[serde(default)]
    pub scroll_container: Option<String>,
}

fn default_scroll_speed() -> f64 {
    defaults::SCROLL_SPEED
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            next: None,
            prev: None,
            all_chapters: None,
            scroll_speed: default_scroll_speed(),
            scroll_container: None,
        }
    }
}

impl SiteProfile {
    /// Profile with next/prev locators and nothing else.
    pub fn new(next: impl Into<String>, prev: impl Into<String>) -> Self {
        Self {
            next: Some(next.into()),
            prev: Some(prev.into()),
            ..Self::default()
        }
    }

    pub fn with_all_chapters(mut self, locator: impl Into<String>) -> Self {
        self.all_chapters = Some(locator.into());
        self
    }

    pub fn with_scroll_container(mut self, locator: impl Into<String>) -> Self {
        self.scroll_container = Some(locator.into());
        self
    }

    pub fn with_scroll_speed(mut self, speed: f64) -> Self {
        self.scroll_speed = speed;
        self
    }
}

/// Built-in site table.
pub fn default_sites() -> BTreeMap<String, SiteProfile> {
    let mut sites = BTreeMap::new();

    sites.insert(
        "westmanga.me".to_string(),
        SiteProfile::new(
            "div.max-w-screen-xl:nth-child(2) > div:nth-child(2) > div:nth-child(1) > div:nth-child(2) > button:nth-child(2)",
            "div.max-w-screen-xl:nth-child(2) > div:nth-child(2) > div:nth-child(1) > div:nth-child(2) > button:nth-child(1)",
        )
        .with_all_chapters(".text-primary"),
    );
    sites.insert(
        "v1.komikcast.fit".to_string(),
        SiteProfile::new(
            r"button.hover\:bg-accent:nth-child(6)",
            r".md\:gap-5 > button:nth-child(1)",
        )
        .with_all_chapters("a.text-foreground")
        .with_scroll_container("div.flex-col:nth-child(2)"),
    );
    sites.insert(
        "www.webtoons.com".to_string(),
        SiteProfile::new(".paginate .pg_next", ".paginate .pg_prev")
            .with_all_chapters(".subj_info .subj"),
    );
    sites.insert(
        "aquareader.net".to_string(),
        SiteProfile::new("a.btn.next_page", "a.btn.prev_page")
            .with_all_chapters(".breadcrumb > li:nth-child(2) > a:nth-child(1)"),
    );
    sites.insert(
        "kiryuu03.com".to_string(),
        SiteProfile::new("a.justify-center:nth-child(3)", "a.px-4:nth-child(1)")
            .with_all_chapters("button.ring-offset-accent"),
    );
    sites.insert(
        "mangaku.lat".to_string(),
        SiteProfile::new(
            r#"button.glho.glkn_1:-soup-contains("NEXT")"#,
            r#"button.glho.glkp_1:-soup-contains("PREV")"#,
        ),
    );
    sites.insert(
        "manhwatop.com".to_string(),
        SiteProfile::new(".next_page", ".prev_page")
            .with_all_chapters("ol.breadcrumb li:nth-child(2) a"),
    );
    sites.insert(
        "komiku.org".to_string(),
        SiteProfile::new("div.nxpr > a.rl:last-of-type", "div.nxpr > a.rl:first-of-type")
            .with_all_chapters(
                "div.perapih:nth-child(3) > div:nth-child(1) > div:nth-child(1) > a:nth-child(1)",
            ),
    );
    sites.insert(
        "www.mikoroku.com".to_string(),
        SiteProfile::new(
            r#"a[rel="next"][type="button"]"#,
            r#"a[rel="prev"][type="button"]"#,
        )
        .with_all_chapters(r#"a[rel="home"][type="button"]"#),
    );

    // Terminal reader
    sites.insert(
        defaults::LOCAL_SITE.to_string(),
        SiteProfile::new("button.next", "button.prev").with_all_chapters("a.index"),
    );

    sites
}
