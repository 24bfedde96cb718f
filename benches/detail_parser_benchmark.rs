//! Detail and listing parser throughput
//!
//! Detail parsing runs once per listed title, so it dominates CPU time in a
//! large batch; the listing parse runs once per search over a large document.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use imdb_scraper_lib::domain::SearchMode;
use imdb_scraper_lib::infrastructure::parsing::{
    DetailParseContext, ListingParseContext, ListingParser, TitleDetailParser,
};

fn detail_markup() -> String {
    let cast: String = (0..40)
        .map(|i| format!(r#"<a data-testid="title-cast-item__actor" href="/name/nm{i}/">Actor {i}</a>"#))
        .collect();
    format!(
        r#"<html><head><title>Heat (1995)</title></head><body>
        <h1><span class="hero__primary-text">Heat</span></h1>
        <ul><li><a href="/title/tt0113277/releaseinfo?ref_=tt_ov_rdat">1995</a></li></ul>
        <div data-testid="hero-rating-bar__aggregate-rating__score"><span>8.3</span><span>/10</span></div>
        <span data-testid="plot">A group of high-end professional thieves start to feel the heat.</span>
        <span data-testid="plot-xl">A group of high-end professional thieves start to feel the heat from the LAPD.</span>
        <a href="/name/nm0000520/?ref_=tt_ov_dr">Michael Mann</a>
        <a href="/name/nm0000520/?ref_=tt_ov_wr">Michael Mann</a>
        {cast}
        </body></html>"#
    )
}

fn listing_markup(items: usize) -> String {
    let body: String = (0..items)
        .map(|i| {
            format!(
                r#"<li class="ipc-metadata-list-summary-item"><div><a class="ipc-title-link-wrapper" href="/title/tt{i:07}/?ref_=sr_t_{i}"><h3>{i}. Title</h3></a></div></li>"#
            )
        })
        .collect();
    format!(r#"<html><body><ul>{body}</ul></body></html>"#)
}

fn parser_benchmarks(c: &mut Criterion) {
    let detail_parser = TitleDetailParser::new().unwrap();
    let detail = detail_markup();
    let context = DetailParseContext::new("/title/tt0113277/");

    c.bench_function("title detail parse", |b| {
        b.iter(|| black_box(detail_parser.parse(black_box(&detail), &context).unwrap()))
    });

    let listing_parser = ListingParser::new().unwrap();
    let listing = listing_markup(300);
    let listing_context = ListingParseContext::new(SearchMode::ByCategory, "https://www.imdb.com/search/title/?genres=drama");

    c.bench_function("listing parse (300 items)", |b| {
        b.iter(|| black_box(listing_parser.parse(black_box(&listing), &listing_context).unwrap()))
    });
}

criterion_group!(benches, parser_benchmarks);
criterion_main!(benches);
