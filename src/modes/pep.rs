//! PEP status counts: cross-check each card's status against the
//! abbreviation in the numerical index, then tally.

use crate::error::{Result, ScrapeError};
use crate::fetcher;
use crate::locator::{find_tag, next_sibling_element, text_of, TagFilter};
use crate::modes::{join_url, ModeContext};
use crate::output::ResultSet;
use crate::ui::progress::finish_progress_with_summary;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::time::Instant;

const HEADER: [&str; 2] = ["Status", "Count"];

/// Allowed card statuses per index abbreviation (the second letter of
/// the first cell; the first letter is the PEP type).
fn expected_statuses(code: &str) -> Option<&'static [&'static str]> {
    match code {
        "A" => Some(&["Active", "Accepted"]),
        "D" => Some(&["Deferred"]),
        "F" => Some(&["Final"]),
        "P" => Some(&["Provisional"]),
        "R" => Some(&["Rejected"]),
        "S" => Some(&["Superseded"]),
        "W" => Some(&["Withdrawn"]),
        "" => Some(&["Draft", "Active"]),
        _ => None,
    }
}

struct PepCard {
    link: String,
    status: String,
    expected: &'static [&'static str],
}

pub fn run(ctx: &ModeContext<'_>) -> Result<Option<ResultSet>> {
    let peps_url = &ctx.config.urls.peps_base;
    ctx.formatter
        .start_operation(&format!("Counting PEP statuses from {}", peps_url));

    let index = fetcher::parse(ctx.session, peps_url)?;
    let row_selector = selector("#numerical-index tbody tr");
    let rows: Vec<_> = index.select(&row_selector).collect();

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut mismatches: Vec<String> = Vec::new();
    let mut skipped = 0usize;
    let started = Instant::now();
    let pb = ctx.progress.create_item_progress(rows.len() as u64);

    for row in rows {
        ctx.shutdown.check_shutdown()?;

        match scrape_card(ctx, peps_url, row) {
            Ok(card) => {
                pb.set_message(card.link.clone());
                if card.expected.contains(&card.status.as_str()) {
                    *counts.entry(card.status).or_insert(0) += 1;
                } else {
                    mismatches.push(format!(
                        "Mismatched status for {}: card says {:?}, expected one of {:?}",
                        card.link, card.status, card.expected
                    ));
                }
            }
            Err(error) => {
                ctx.handle_item_error(error, "PEP index row")?;
                skipped += 1;
            }
        }
        pb.inc(1);
    }

    let checked = counts.values().sum::<usize>() + mismatches.len();
    finish_progress_with_summary(&pb, &summary_line(checked, skipped), started.elapsed());

    for mismatch in &mismatches {
        ctx.warn(mismatch);
    }

    Ok(Some(counts_table(&counts)?))
}

fn scrape_card(ctx: &ModeContext<'_>, base: &str, row: ElementRef<'_>) -> Result<PepCard> {
    let (code, link) = index_row_parts(row, base)?;
    let expected = expected_statuses(&code)
        .ok_or(ScrapeError::UnknownStatusCode { code })?;

    let page = fetcher::parse(ctx.session, &link)?;
    let status = card_status(&page)?;

    Ok(PepCard {
        link,
        status,
        expected,
    })
}

/// Status abbreviation and card link from one index row.
fn index_row_parts(row: ElementRef<'_>, base: &str) -> Result<(String, String)> {
    let first_cell = find_tag(row, &TagFilter::new("td"))?;
    let cell_text = text_of(first_cell);
    let code: String = cell_text.trim().chars().skip(1).collect();

    let anchor = row
        .select(&selector("td a.pep.reference.internal"))
        .next()
        .ok_or_else(|| ScrapeError::TagNotFound {
            tag: "a".to_string(),
            attrs: "class=\"pep reference internal\"".to_string(),
        })?;
    let href = anchor
        .value()
        .attr("href")
        .ok_or_else(|| ScrapeError::ContentNotFound {
            context: "PEP anchor without href".to_string(),
        })?;

    Ok((code, join_url(base, href)?))
}

/// The `<dd>` following the `Status` entry of the card's RFC 2822 field
/// list. An absent entry yields an empty status, which never matches an
/// expected set and is reported as a mismatch.
fn card_status(page: &Html) -> Result<String> {
    let field_list = page
        .select(&selector("dl.rfc2822.field-list.simple"))
        .next()
        .ok_or_else(|| ScrapeError::TagNotFound {
            tag: "dl".to_string(),
            attrs: "class=\"rfc2822 field-list simple\"".to_string(),
        })?;

    let status_pattern = Regex::new(r"^Status").expect("status pattern is a valid regex");
    for dt in field_list.select(&selector("dt")) {
        let label = text_of(dt);
        if !status_pattern.is_match(label.trim()) {
            continue;
        }
        if let Some(dd) = next_sibling_element(dt) {
            return Ok(text_of(dd).trim().to_string());
        }
    }
    Ok(String::new())
}

fn summary_line(checked: usize, skipped: usize) -> String {
    if skipped == 0 {
        format!("Checked {} PEP cards", checked)
    } else {
        format!("Checked {} PEP cards, skipped {}", checked, skipped)
    }
}

/// Sorted status counts plus a final Total row.
fn counts_table(counts: &BTreeMap<String, usize>) -> Result<ResultSet> {
    let mut results = ResultSet::new(HEADER);
    for (status, count) in counts {
        results.push_row([status.clone(), count.to_string()])?;
    }
    results.push_row([
        "Total".to_string(),
        counts.values().sum::<usize>().to_string(),
    ])?;
    Ok(results)
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("selector literal is valid CSS")
}
