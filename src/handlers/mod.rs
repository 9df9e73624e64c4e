mod habits;
mod planner;
mod reports;

pub use habits::{create_habit, delete_habit, get_habit, list_habits, toggle_habit, update_habit};
pub use planner::{
    create_event, create_goal, create_task, delete_event, delete_goal, delete_task, list_events,
    list_goals, list_tasks, update_event, update_goal, update_task,
};
pub use reports::{due_reminders, list_reports, monthly_report, weekly_report};

use crate::errors::AppError;
use crate::models::Owned;
use crate::ui::render_index;
use axum::response::Html;
use chrono::{DateTime, Local, NaiveDate, Utc};
use std::collections::BTreeMap;

pub async fn index() -> Html<String> {
    Html(render_index(&today().to_string()))
}

pub async fn health() -> &'static str {
    "ok"
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Looks up a row and hides rows owned by anyone else behind a 404.
fn owned<'a, T: Owned>(
    rows: &'a BTreeMap<String, T>,
    id: &str,
    user_id: &str,
    what: &str,
) -> Result<&'a T, AppError> {
    rows.get(id)
        .filter(|row| row.owner() == user_id)
        .ok_or_else(|| AppError::not_found(what))
}

fn owned_mut<'a, T: Owned>(
    rows: &'a mut BTreeMap<String, T>,
    id: &str,
    user_id: &str,
    what: &str,
) -> Result<&'a mut T, AppError> {
    rows.get_mut(id)
        .filter(|row| row.owner() == user_id)
        .ok_or_else(|| AppError::not_found(what))
}

fn list_owned<T: Owned + Clone>(rows: &BTreeMap<String, T>, user_id: &str) -> Vec<T> {
    rows.values()
        .filter(|row| row.owner() == user_id)
        .cloned()
        .collect()
}

#[cfg(test)]
fn test_state(data_path: std::path::PathBuf, data: crate::models::AppData) -> crate::state::AppState {
    let config = crate::config::Config {
        port: 0,
        data_path,
        reminder_window_minutes: 5,
    };
    crate::state::AppState::new(&config, data)
}

/// A data path whose parent directory does not exist, so every write fails.
#[cfg(test)]
fn unwritable_path(name: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("habit_tracker_missing_{}_{name}", std::process::id()));
    path.push("nested/state.json");
    path
}

#[cfg(test)]
fn writable_path(name: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("habit_tracker_handlers_{}_{name}.json", std::process::id()));
    path
}
