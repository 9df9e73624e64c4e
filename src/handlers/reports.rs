use super::today;
use crate::auth::UserId;
use crate::errors::AppError;
use crate::models::{DueReminder, ReminderQuery, ReportQuery, ReportWindow, ReportsResponse};
use crate::reminders;
use crate::reports::{generate_report, ReportKind};
use crate::state::AppState;
use crate::validation;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Local, NaiveDateTime};
use tracing::info;

pub async fn weekly_report(
    State(state): State<AppState>,
    user: UserId,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Option<ReportWindow>>, AppError> {
    refresh_report(&state, &user, ReportKind::Week, query).await
}

pub async fn monthly_report(
    State(state): State<AppState>,
    user: UserId,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Option<ReportWindow>>, AppError> {
    refresh_report(&state, &user, ReportKind::Month, query).await
}

async fn refresh_report(
    state: &AppState,
    user: &UserId,
    kind: ReportKind,
    query: ReportQuery,
) -> Result<Json<Option<ReportWindow>>, AppError> {
    let date = match query.date.as_deref() {
        Some(value) => validation::date(value)?,
        None => today(),
    };

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let Some(report) = generate_report(&mut next, user.as_str(), kind, date) else {
        info!(user_id = user.as_str(), "no habits, skipping {kind:?} report");
        return Ok(Json(None));
    };
    state.commit(&mut data, next).await?;

    info!(
        user_id = user.as_str(),
        window_start = %report.window_start,
        completion_rate = report.completion_rate,
        "{kind:?} report refreshed"
    );
    Ok(Json(Some(report)))
}

pub async fn list_reports(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<ReportsResponse>, AppError> {
    let data = state.data.lock().await;
    let mine = |rows: &[ReportWindow]| -> Vec<ReportWindow> {
        let mut rows: Vec<ReportWindow> = rows
            .iter()
            .filter(|row| row.user_id == user.as_str())
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.window_start.cmp(&b.window_start));
        rows
    };

    Ok(Json(ReportsResponse {
        weekly: mine(&data.weekly_reports),
        monthly: mine(&data.monthly_reports),
    }))
}

pub async fn due_reminders(
    State(state): State<AppState>,
    user: UserId,
    Query(query): Query<ReminderQuery>,
) -> Result<Json<Vec<DueReminder>>, AppError> {
    let at = match query.at.as_deref() {
        Some(value) => NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%dT%H:%M")
            .map_err(|_| AppError::bad_request(format!("invalid time '{value}', expected YYYY-MM-DDTHH:MM")))?,
        None => Local::now().naive_local(),
    };

    let data = state.data.lock().await;
    let events = data.events.values().filter(|event| event.user_id == user.as_str());
    let due = reminders::due_reminders(events, at, state.reminder_window_minutes);

    if !due.is_empty() {
        info!(user_id = user.as_str(), count = due.len(), "reminders due");
    }
    Ok(Json(due))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{test_state, unwritable_path, writable_path};
    use crate::models::{AppData, Frequency, Habit};
    use chrono::{NaiveDate, Utc};

    fn with_habit() -> AppData {
        let mut data = AppData::default();
        data.habits.insert(
            "h1".to_string(),
            Habit {
                id: "h1".to_string(),
                user_id: "u1".to_string(),
                title: "Read".to_string(),
                frequency: Frequency::Daily,
                completed_dates: Vec::new(),
                streak: 0,
                color: "#4f46e5".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
        data
    }

    fn query(date: &str) -> ReportQuery {
        ReportQuery {
            date: Some(date.to_string()),
        }
    }

    #[tokio::test]
    async fn failed_write_stores_no_report_row() {
        let state = test_state(unwritable_path("report"), with_habit());
        let user = UserId("u1".to_string());

        let result = refresh_report(&state, &user, ReportKind::Week, query("2024-01-03")).await;
        assert!(result.is_err());
        assert!(state.data.lock().await.weekly_reports.is_empty());
    }

    #[tokio::test]
    async fn zero_habits_answers_null_without_writing() {
        let path = unwritable_path("report_empty");
        let state = test_state(path, AppData::default());
        let user = UserId("u1".to_string());

        let Ok(Json(report)) = refresh_report(&state, &user, ReportKind::Month, query("2024-01-03")).await else {
            panic!("a user without habits is not an error");
        };
        assert!(report.is_none());
        assert!(state.data.lock().await.monthly_reports.is_empty());
    }

    #[tokio::test]
    async fn successful_refresh_is_stored() {
        let path = writable_path("report_ok");
        let state = test_state(path.clone(), with_habit());
        let user = UserId("u1".to_string());

        refresh_report(&state, &user, ReportKind::Week, query("2024-01-03")).await.unwrap();
        assert_eq!(state.data.lock().await.weekly_reports.len(), 1);
        let _ = tokio::fs::remove_file(&path).await;
    }
}
