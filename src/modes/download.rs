//! PDF archive download: no result table, just a saved file.

use crate::error::{Result, ScrapeError};
use crate::fetcher;
use crate::locator::{find_tag, TagFilter};
use crate::modes::{join_url, ModeContext};
use crate::output::ResultSet;
use regex::Regex;
use scraper::Html;
use std::fs;

pub fn run(ctx: &ModeContext<'_>) -> Result<Option<ResultSet>> {
    let downloads_url = join_url(&ctx.config.urls.docs_base, "download.html")?;
    ctx.formatter
        .start_operation(&format!("Locating PDF archive on {}", downloads_url));

    let document = fetcher::parse(ctx.session, &downloads_url)?;
    let archive_url = archive_url(&document, &downloads_url)?;

    let filename = archive_filename(&archive_url);
    let downloads_dir = ctx.config.downloads_directory();
    fs::create_dir_all(&downloads_dir)?;
    let archive_path = downloads_dir.join(filename);

    let spinner = ctx
        .progress
        .create_spinner(&format!("Downloading {}", filename));
    let response = fetcher::fetch(ctx.session, &archive_url)?;
    ctx.formatter.debug(&format!(
        "Fetched {} ({} bytes)",
        response.url(),
        response.bytes().len()
    ));
    fs::write(&archive_path, response.bytes())?;
    spinner.finish_and_clear();

    ctx.formatter
        .success(&format!("Archive saved to: {}", archive_path.display()));

    Ok(None)
}

/// The A4 PDF bundle link from the download page's docutils table,
/// resolved against the page URL.
fn archive_url(document: &Html, page_url: &str) -> Result<String> {
    let main = find_tag(
        document.root_element(),
        &TagFilter::new("div").with_attr("role", "main"),
    )?;
    let table = find_tag(main, &TagFilter::new("table").with_attr("class", "docutils"))?;

    let pattern = Regex::new(r".+pdf-a4\.zip$").expect("archive pattern is a valid regex");
    let anchor = find_tag(table, &TagFilter::new("a").with_attr_pattern("href", pattern))?;

    let href = anchor
        .value()
        .attr("href")
        .ok_or_else(|| ScrapeError::ContentNotFound {
            context: "archive anchor without href".to_string(),
        })?;

    join_url(page_url, href)
}

/// Final path segment of the archive URL.
fn archive_filename(archive_url: &str) -> &str {
    archive_url
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("archive.zip")
}
