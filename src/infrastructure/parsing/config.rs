//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors for the listing and detail pages, so a markup
//! change upstream is a configuration edit rather than a code change.

use serde::{Deserialize, Serialize};

/// Main parsing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    pub listing: ListingSelectors,
    pub detail: DetailSelectors,
}

/// CSS selectors for the search listing page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// One node per catalog entry
    pub item: String,

    /// Title link inside an item on a genre listing
    pub category_anchor: String,

    /// Title link inside an item on a keyword result page
    pub keyword_anchor: String,

    /// The "load more" button driven by the listing expander
    pub load_more: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            item: "li.ipc-metadata-list-summary-item".to_string(),
            category_anchor: "a.ipc-title-link-wrapper".to_string(),
            keyword_anchor: "a.ipc-metadata-list-summary-item__t".to_string(),
            load_more: "button.ipc-see-more__button".to_string(),
        }
    }
}

/// CSS selectors for a title detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    pub title: String,

    /// Preferred plot element
    pub plot_extended: String,
    /// Used when the extended plot is missing
    pub plot_short: String,

    pub cast_member: String,
    pub release_info: String,

    /// Rating container; the value is its first descendant `span`
    pub rating_container: String,
    pub rating_value: String,

    pub directed_by: String,
    /// Writer credits, minus the more specific writer-detail links
    pub written_by: String,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            title: "span.hero__primary-text".to_string(),
            plot_extended: r#"span[data-testid="plot-xl"]"#.to_string(),
            plot_short: r#"span[data-testid="plot"]"#.to_string(),
            cast_member: r#"a[data-testid="title-cast-item__actor"]"#.to_string(),
            release_info: r#"a[href*="releaseinfo"]"#.to_string(),
            rating_container: r#"div[data-testid="hero-rating-bar__aggregate-rating__score"]"#
                .to_string(),
            rating_value: "span".to_string(),
            directed_by: r#"a[href*="tt_ov_dr"]"#.to_string(),
            written_by: r#"a[href*="tt_ov_wr"]:not([href*="tt_ov_wr_"])"#.to_string(),
        }
    }
}
