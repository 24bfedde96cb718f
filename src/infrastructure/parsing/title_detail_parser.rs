//! Title detail parser
//!
//! Extracts the six output fields from one title page. Only the title is
//! required; every other field degrades to `None` (or an empty cast) when the
//! page does not carry it.

#![allow(clippy::uninlined_format_args)]

use super::{
    ContextualParser, DetailParseContext, DetailSelectors, ParsingError, ParsingResult,
    compile_selector, element_text,
};
use crate::domain::DetailRecord;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use tracing::debug;

/// Parser for title detail pages
pub struct TitleDetailParser {
    title_selector: Selector,
    plot_extended_selector: Selector,
    plot_short_selector: Selector,
    cast_selector: Selector,
    release_selector: Selector,
    rating_container_selector: Selector,
    rating_value_selector: Selector,
    directed_by_selector: Selector,
    written_by_selector: Selector,
}

impl TitleDetailParser {
    /// Create a new detail parser with default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&DetailSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &DetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            title_selector: compile_selector(&selectors.title)?,
            plot_extended_selector: compile_selector(&selectors.plot_extended)?,
            plot_short_selector: compile_selector(&selectors.plot_short)?,
            cast_selector: compile_selector(&selectors.cast_member)?,
            release_selector: compile_selector(&selectors.release_info)?,
            rating_container_selector: compile_selector(&selectors.rating_container)?,
            rating_value_selector: compile_selector(&selectors.rating_value)?,
            directed_by_selector: compile_selector(&selectors.directed_by)?,
            written_by_selector: compile_selector(&selectors.written_by)?,
        })
    }

    /// Parses raw detail markup. Pure function of its input.
    pub fn parse(&self, markup: &str, context: &DetailParseContext) -> ParsingResult<DetailRecord> {
        let html = Html::parse_document(markup);
        self.parse_with_context(&html, context)
    }

    fn first_text(html: &Html, selector: &Selector) -> Option<String> {
        html.select(selector).next().map(|element| element_text(&element))
    }

    /// Extended plot, falling back to the short plot
    fn extract_summary(&self, html: &Html) -> Option<String> {
        Self::first_text(html, &self.plot_extended_selector)
            .or_else(|| Self::first_text(html, &self.plot_short_selector))
    }

    /// Actor credits joined with commas, in page order
    fn extract_cast(&self, html: &Html) -> String {
        html.select(&self.cast_selector)
            .map(|element| element_text(&element))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn extract_rating(&self, html: &Html) -> Option<String> {
        let container = html.select(&self.rating_container_selector).next()?;
        container
            .select(&self.rating_value_selector)
            .next()
            .map(|value| element_text(&value))
    }

    /// Director credits; when there are none, writer credits take their place
    /// (director-or-writer-fallback). Names are deduplicated.
    fn extract_directors(&self, html: &Html) -> Option<String> {
        let mut names: BTreeSet<String> = html
            .select(&self.directed_by_selector)
            .map(|element| element_text(&element))
            .collect();

        if names.is_empty() {
            names = html
                .select(&self.written_by_selector)
                .map(|element| element_text(&element))
                .collect();
            if !names.is_empty() {
                debug!("No director credits, using {} writer credits", names.len());
            }
        }

        if names.is_empty() {
            return None;
        }
        Some(names.into_iter().collect::<Vec<_>>().join(","))
    }
}

impl ContextualParser for TitleDetailParser {
    type Output = DetailRecord;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        debug!("Parsing title detail from: {}", context.url);

        let title = Self::first_text(html, &self.title_selector)
            .ok_or_else(|| ParsingError::required_field_missing("title", &context.url))?;

        let record = DetailRecord {
            title,
            release_year: Self::first_text(html, &self.release_selector),
            rating: self.extract_rating(html),
            directors: self.extract_directors(html),
            cast: self.extract_cast(html),
            summary: self.extract_summary(html),
        };

        debug!("Extracted title details for: {}", record);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAGE: &str = r#"
        <html><body>
          <h1><span class="hero__primary-text">The Shawshank Redemption</span></h1>
          <ul><li><a href="/title/tt0111161/releaseinfo?ref_=tt_ov_rdat">1994</a></li></ul>
          <div data-testid="hero-rating-bar__aggregate-rating__score"><span>9.3</span><span>/10</span></div>
          <span data-testid="plot-xl">Two imprisoned men bond over a number of years.</span>
          <span data-testid="plot">Two men bond.</span>
          <a href="/name/nm0001104/?ref_=tt_ov_dr">Frank Darabont</a>
          <a href="/name/nm0001104/?ref_=tt_ov_dr">Frank Darabont</a>
          <a href="/name/nm0000175/?ref_=tt_ov_wr">Stephen King</a>
          <a data-testid="title-cast-item__actor" href="/name/nm0000209/">Tim Robbins</a>
          <a data-testid="title-cast-item__actor" href="/name/nm0000151/">Morgan Freeman</a>
        </body></html>
    "#;

    fn context() -> DetailParseContext {
        DetailParseContext::new("https://www.imdb.com/title/tt0111161/")
    }

    fn page(body: &str) -> String {
        format!(
            r#"<html><body><h1><span class="hero__primary-text">Some Title</span></h1>{body}</body></html>"#
        )
    }

    #[test]
    fn test_parser_creation() {
        assert!(TitleDetailParser::new().is_ok());
    }

    #[test]
    fn test_full_page_extraction() {
        let parser = TitleDetailParser::new().unwrap();
        let record = parser.parse(FULL_PAGE, &context()).unwrap();

        assert_eq!(record.title, "The Shawshank Redemption");
        assert_eq!(record.release_year.as_deref(), Some("1994"));
        assert_eq!(record.rating.as_deref(), Some("9.3"));
        assert_eq!(record.directors.as_deref(), Some("Frank Darabont"));
        assert_eq!(record.cast, "Tim Robbins,Morgan Freeman");
        assert_eq!(
            record.summary.as_deref(),
            Some("Two imprisoned men bond over a number of years.")
        );
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let parser = TitleDetailParser::new().unwrap();
        let first = parser.parse(FULL_PAGE, &context()).unwrap();
        let second = parser.parse(FULL_PAGE, &context()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_title_fails_record() {
        let parser = TitleDetailParser::new().unwrap();
        let err = parser
            .parse("<html><body><span data-testid=\"plot\">x</span></body></html>", &context())
            .unwrap_err();
        assert!(matches!(err, ParsingError::RequiredFieldMissing { ref field, .. } if field == "title"));
    }

    #[test]
    fn test_summary_falls_back_to_short_plot() {
        let parser = TitleDetailParser::new().unwrap();
        let record = parser
            .parse(&page(r#"<span data-testid="plot">Short plot.</span>"#), &context())
            .unwrap();
        assert_eq!(record.summary.as_deref(), Some("Short plot."));
    }

    #[test]
    fn test_summary_absent() {
        let parser = TitleDetailParser::new().unwrap();
        let record = parser.parse(&page(""), &context()).unwrap();
        assert_eq!(record.summary, None);
        assert_eq!(record.release_year, None);
        assert_eq!(record.rating, None);
        assert_eq!(record.directors, None);
        assert_eq!(record.cast, "");
    }

    #[test]
    fn test_rating_container_without_value() {
        let parser = TitleDetailParser::new().unwrap();
        let record = parser
            .parse(
                &page(r#"<div data-testid="hero-rating-bar__aggregate-rating__score"></div>"#),
                &context(),
            )
            .unwrap();
        assert_eq!(record.rating, None);
    }

    #[test]
    fn test_directors_fall_back_to_writers() {
        let parser = TitleDetailParser::new().unwrap();
        let record = parser
            .parse(
                &page(
                    r#"<a href="/name/nm1/?ref_=tt_ov_wr">Writer One</a>
                       <a href="/name/nm2/?ref_=tt_ov_wr">Writer Two</a>
                       <a href="/name/nm1/?ref_=tt_ov_wr">Writer One</a>
                       <a href="/name/nm3/?ref_=tt_ov_wr_sm">Screenplay Detail</a>"#,
                ),
                &context(),
            )
            .unwrap();
        assert_eq!(record.directors.as_deref(), Some("Writer One,Writer Two"));
    }

    #[test]
    fn test_directors_ignore_writers_when_directed_by_present() {
        let parser = TitleDetailParser::new().unwrap();
        let record = parser
            .parse(
                &page(
                    r#"<a href="/name/nm9/?ref_=tt_ov_dr">Director Nine</a>
                       <a href="/name/nm1/?ref_=tt_ov_wr">Writer One</a>"#,
                ),
                &context(),
            )
            .unwrap();
        assert_eq!(record.directors.as_deref(), Some("Director Nine"));
    }

    #[test]
    fn test_only_writer_detail_links_give_no_directors() {
        let parser = TitleDetailParser::new().unwrap();
        let record = parser
            .parse(&page(r#"<a href="/name/nm3/?ref_=tt_ov_wr_sm">Screenplay Detail</a>"#), &context())
            .unwrap();
        assert_eq!(record.directors, None);
    }
}
