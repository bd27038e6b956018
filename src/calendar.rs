//! calendar.rs
//!
//! Extracts the contribution calendar from a GitHub profile page.
//!
//! Each day of the graph is rendered as a cell carrying a `data-date`
//! (`YYYY-MM-DD`) and a `data-count` attribute, in chronological order.
//! The count is best-effort: a missing or malformed `data-count` is read as
//! zero rather than failing the whole page. A page without the graph yields
//! an empty sequence.

use chrono::NaiveDate;
use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::stats::ContributionDay;

const DAY_SELECTOR: &str = ".js-calendar-graph-svg .day[data-date]";
const DATE_FORMAT: &str = "%Y-%m-%d";

static DAY_CELLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(DAY_SELECTOR).expect("day selector is valid"));

/// Returns the calendar days found in `html`, in document order.
pub fn extract(html: &str) -> Vec<ContributionDay> {
    let document = Html::parse_document(html);
    let mut days = Vec::new();

    for cell in document.select(&DAY_CELLS) {
        let element = cell.value();

        let Some(raw_date) = element.attr("data-date") else {
            continue;
        };
        let date = match NaiveDate::parse_from_str(raw_date.trim(), DATE_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!(date = raw_date, "skipping calendar cell with bad date: {e}");
                continue;
            }
        };

        days.push(ContributionDay::new(date, parse_count(element.attr("data-count"), date)));
    }

    tracing::debug!(days = days.len(), "extracted contribution calendar");
    days
}

fn parse_count(raw: Option<&str>, date: NaiveDate) -> u32 {
    match raw.map(|r| r.trim().parse::<u32>()) {
        Some(Ok(count)) => count,
        Some(Err(e)) => {
            tracing::debug!(%date, "unreadable data-count ({e}), using 0");
            0
        }
        None => {
            tracing::debug!(%date, "missing data-count, using 0");
            0
        }
    }
}
