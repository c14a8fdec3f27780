//! Version and status listing from the docs index sidebar.

use crate::error::{Result, ScrapeError};
use crate::fetcher;
use crate::locator::{find_all_tags, find_tag, text_of, TagFilter};
use crate::modes::ModeContext;
use crate::output::ResultSet;
use regex::Regex;
use scraper::Html;

const HEADER: [&str; 3] = ["Documentation link", "Version", "Status"];

pub fn run(ctx: &ModeContext<'_>) -> Result<Option<ResultSet>> {
    let docs_url = &ctx.config.urls.docs_base;
    ctx.formatter
        .start_operation(&format!("Collecting version listing from {}", docs_url));

    let document = fetcher::parse(ctx.session, docs_url)?;
    Ok(Some(versions_table(&document)?))
}

/// The sidebar `<ul>` whose text mentions "All versions" carries one
/// anchor per documentation version, labelled `Python X.Y (status)`.
/// Anchors without that shape keep their full text as the version and
/// an empty status.
fn versions_table(document: &Html) -> Result<ResultSet> {
    let sidebar = find_tag(
        document.root_element(),
        &TagFilter::new("div").with_attr("class", "sphinxsidebarwrapper"),
    )?;

    let anchors = find_all_tags(sidebar, &TagFilter::new("ul"))
        .into_iter()
        .find(|ul| text_of(*ul).contains("All versions"))
        .map(|ul| find_all_tags(ul, &TagFilter::new("a")))
        .ok_or_else(|| ScrapeError::ContentNotFound {
            context: "sidebar list containing \"All versions\"".to_string(),
        })?;

    let pattern = Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)")
        .expect("version pattern is a valid regex");

    let mut results = ResultSet::new(HEADER);
    for anchor in anchors {
        let text = text_of(anchor);
        let (version, status) = match pattern.captures(&text) {
            Some(captures) => (captures["version"].to_string(), captures["status"].to_string()),
            None => (text.clone(), String::new()),
        };
        let href = anchor
            .value()
            .attr("href")
            .ok_or_else(|| ScrapeError::ContentNotFound {
                context: format!("version anchor {:?} without href", text),
            })?;
        results.push_row([href.to_string(), version, status])?;
    }

    Ok(results)
}
