//! stats.rs
//!
//! Contribution statistics derived from the scraped calendar.
//!
//! Everything here is a pure function of the day sequence and a reference
//! date. Cells dated after the reference date (the calendar sometimes renders
//! "tomorrow" depending on the viewer's timezone) never count.

use chrono::NaiveDate;
use std::collections::VecDeque;

/// Number of trailing days summed into `last_week_total`.
pub const WEEK_WINDOW: usize = 7;

/// A single calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
}

impl ContributionDay {
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContributionStats {
    /// Count of the most recent day not after the reference date.
    pub latest_count: u32,
    /// Consecutive non-zero days ending at the most recent day.
    pub current_streak: u32,
    pub longest_streak: u32,
    pub year_total: u32,
    pub last_week_total: u32,
}

/// Computes the stats in a single left-to-right pass over `days`.
pub fn compute(days: &[ContributionDay], today: NaiveDate) -> ContributionStats {
    let mut stats = ContributionStats::default();
    let mut window: VecDeque<u32> = VecDeque::with_capacity(WEEK_WINDOW + 1);

    for day in days.iter().filter(|d| d.date <= today) {
        stats.latest_count = day.count;
        stats.year_total = stats.year_total.saturating_add(day.count);

        if day.count > 0 {
            stats.current_streak = stats.current_streak.saturating_add(1);
            stats.longest_streak = stats.longest_streak.max(stats.current_streak);
        } else {
            stats.current_streak = 0;
        }

        window.push_back(day.count);
        if window.len() > WEEK_WINDOW {
            window.pop_front();
        }
    }

    stats.last_week_total = window.iter().fold(0u32, |acc, c| acc.saturating_add(*c));
    stats
}
