//! New-feature articles: one row per "What's New in Python X.Y" page.

use crate::error::{Result, ScrapeError};
use crate::fetcher;
use crate::locator::{find_all_tags, find_tag, text_of, TagFilter};
use crate::modes::{join_url, ModeContext};
use crate::output::ResultSet;
use crate::ui::progress::finish_progress_with_summary;
use scraper::Html;
use std::time::Instant;

const HEADER: [&str; 3] = ["Article link", "Title", "Editor, Author"];

pub fn run(ctx: &ModeContext<'_>) -> Result<Option<ResultSet>> {
    let whats_new_url = join_url(&ctx.config.urls.docs_base, "whatsnew/")?;
    ctx.formatter
        .start_operation(&format!("Collecting new-feature articles from {}", whats_new_url));

    let index = fetcher::parse(ctx.session, &whats_new_url)?;
    let links = article_links(&index, &whats_new_url)?;

    let mut results = ResultSet::new(HEADER);
    let started = Instant::now();
    let pb = ctx.progress.create_item_progress(links.len() as u64);

    for link in links {
        ctx.shutdown.check_shutdown()?;
        pb.set_message(link.clone());

        match scrape_article(ctx, &link) {
            Ok(row) => results.push_row(row)?,
            Err(error) => ctx.handle_item_error(error, &link)?,
        }
        pb.inc(1);
    }

    finish_progress_with_summary(
        &pb,
        &format!("Collected {} articles", results.len()),
        started.elapsed(),
    );

    Ok(Some(results))
}

/// Article links from the whatsnew/ index: every top-level toctree entry
/// under the "What's New in Python" section, resolved against the index URL.
fn article_links(index: &Html, index_url: &str) -> Result<Vec<String>> {
    let section = find_tag(
        index.root_element(),
        &TagFilter::new("section").with_attr("id", "what-s-new-in-python"),
    )?;
    let toctree = find_tag(
        section,
        &TagFilter::new("div").with_attr("class", "toctree-wrapper"),
    )?;
    let entries = find_all_tags(toctree, &TagFilter::new("li").with_attr("class", "toctree-l1"));

    let mut links = Vec::with_capacity(entries.len());
    for entry in entries {
        let anchor = find_tag(entry, &TagFilter::new("a"))?;
        let href = anchor
            .value()
            .attr("href")
            .ok_or_else(|| ScrapeError::ContentNotFound {
                context: "toctree anchor without href".to_string(),
            })?;
        links.push(join_url(index_url, href)?);
    }
    Ok(links)
}

fn scrape_article(ctx: &ModeContext<'_>, link: &str) -> Result<[String; 3]> {
    let page = fetcher::parse(ctx.session, link)?;
    article_row(&page, link)
}

/// One table row from an article page: its link, `<h1>` title, and the
/// editor/author `<dl>` with line breaks flattened.
fn article_row(page: &Html, link: &str) -> Result<[String; 3]> {
    let title = text_of(find_tag(page.root_element(), &TagFilter::new("h1"))?);
    let credits = text_of(find_tag(page.root_element(), &TagFilter::new("dl"))?)
        .replace('\n', " ");
    Ok([link.to_string(), title, credits])
}
