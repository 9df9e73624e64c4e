//! Weekly and monthly completion-rate reports.
//!
//! Reports are derived rows: they are recomputed from the habit completion
//! audit rows and upserted per `(user, window start)`, so a stored report can
//! always be rebuilt from the logs.

use crate::models::{AppData, Frequency, Habit, HabitCompletion, ReportWindow};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weekly habits count as four slots in a monthly window.
const WEEKLY_SLOTS_PER_MONTH: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Week,
    Month,
}

pub fn window_bounds(kind: ReportKind, date: NaiveDate) -> (NaiveDate, NaiveDate) {
    match kind {
        ReportKind::Week => {
            let start = week_start(date);
            (start, start + Duration::days(6))
        }
        ReportKind::Month => {
            let start = date.with_day(1).unwrap_or(date);
            let next = if start.month() == 12 {
                NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
            };
            let end = next.map(|first| first - Duration::days(1)).unwrap_or(start);
            (start, end)
        }
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// A user's habits bucketed by how often they are expected to be done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FrequencyBuckets {
    pub daily: u32,
    pub weekly: u32,
}

impl FrequencyBuckets {
    pub fn classify<'a>(habits: impl IntoIterator<Item = &'a Habit>) -> Self {
        habits
            .into_iter()
            .fold(Self::default(), |mut buckets, habit| {
                match habit.frequency {
                    Frequency::Daily => buckets.daily += 1,
                    Frequency::Weekly => buckets.weekly += 1,
                }
                buckets
            })
    }

    pub fn total(&self) -> u32 {
        self.daily + self.weekly
    }

    pub fn max_possible(&self, kind: ReportKind, start: NaiveDate, end: NaiveDate) -> u32 {
        let days = ((end - start).num_days() + 1).max(0) as u32;
        let weekly_slots = match kind {
            ReportKind::Week => 1,
            ReportKind::Month => WEEKLY_SLOTS_PER_MONTH,
        };
        self.daily * days + self.weekly * weekly_slots
    }
}

/// Rounded percentage; not clamped, so over-completion can exceed 100.
pub fn completion_rate(completed: u32, max_possible: u32) -> u32 {
    if max_possible == 0 {
        return 0;
    }
    let completed = u64::from(completed);
    let max = u64::from(max_possible);
    ((completed * 200 + max) / (max * 2)) as u32
}

pub fn compute_report(
    user_id: &str,
    habits: &[&Habit],
    completions: &[HabitCompletion],
    kind: ReportKind,
    date: NaiveDate,
) -> Option<ReportWindow> {
    let buckets = FrequencyBuckets::classify(habits.iter().copied());
    if buckets.total() == 0 {
        return None;
    }

    let (start, end) = window_bounds(kind, date);
    let total_completed = completions
        .iter()
        .filter(|row| row.user_id == user_id && row.date >= start && row.date <= end)
        .count() as u32;
    let max_possible = buckets.max_possible(kind, start, end);

    Some(ReportWindow {
        user_id: user_id.to_string(),
        window_start: start,
        window_end: end,
        total_habits: buckets.total(),
        total_completed,
        completion_rate: completion_rate(total_completed, max_possible),
        updated_at: Utc::now(),
    })
}

fn table_mut(data: &mut AppData, kind: ReportKind) -> &mut Vec<ReportWindow> {
    match kind {
        ReportKind::Week => &mut data.weekly_reports,
        ReportKind::Month => &mut data.monthly_reports,
    }
}

pub fn upsert_report(data: &mut AppData, kind: ReportKind, report: ReportWindow) {
    let table = table_mut(data, kind);
    match table
        .iter_mut()
        .find(|row| row.user_id == report.user_id && row.window_start == report.window_start)
    {
        Some(existing) => *existing = report,
        None => table.push(report),
    }
}

/// Recomputes the report for the window containing `date` and stores it.
/// Leaves `data` untouched and returns `None` when the user owns no habits.
pub fn generate_report(
    data: &mut AppData,
    user_id: &str,
    kind: ReportKind,
    date: NaiveDate,
) -> Option<ReportWindow> {
    let habits: Vec<&Habit> = data.habits_for(user_id).collect();
    let report = compute_report(user_id, &habits, &data.completions, kind, date)?;

    debug!(
        user_id,
        window_start = %report.window_start,
        rate = report.completion_rate,
        "upserting {kind:?} report"
    );
    upsert_report(data, kind, report.clone());
    Some(report)
}
