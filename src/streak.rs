use chrono::{Duration, Local, NaiveDate};
use std::collections::BTreeSet;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a strict, zero-padded `YYYY-MM-DD` key. Anything else is not a date
/// as far as completion logs are concerned.
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

fn normalize(completed_dates: &[String]) -> BTreeSet<NaiveDate> {
    completed_dates
        .iter()
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| parse_date_key(entry))
        .collect()
}

pub fn current_streak_today(completed_dates: &[String]) -> u32 {
    current_streak(completed_dates, Local::now().date_naive())
}

/// Length of the run of completed days ending at `today`, or at yesterday when
/// today has not been checked in yet.
pub fn current_streak(completed_dates: &[String], today: NaiveDate) -> u32 {
    let days = normalize(completed_dates);
    let Some(&last) = days.last() else {
        return 0;
    };

    let yesterday = today - Duration::days(1);
    if last != today && last != yesterday {
        return 0;
    }

    let mut cursor = if days.contains(&today) { today } else { yesterday };
    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

/// Longest run of consecutive days anywhere in the log.
pub fn longest_streak(completed_dates: &[String]) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in normalize(completed_dates) {
        run = match previous {
            Some(prev) if day - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }
    best
}

/// Flips `date` in the log and returns whether it is now marked complete.
pub fn toggle_date(completed_dates: &mut Vec<String>, date: NaiveDate) -> bool {
    let key = date_key(date);
    let before = completed_dates.len();
    completed_dates.retain(|entry| entry != &key);

    let added = completed_dates.len() == before;
    if added {
        completed_dates.push(key);
    }
    completed_dates.sort();
    added
}
