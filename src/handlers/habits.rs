use super::{new_id, now, owned, owned_mut, today};
use crate::auth::UserId;
use crate::errors::AppError;
use crate::models::{
    Habit, HabitCompletion, HabitPatch, HabitResponse, NewHabit, ToggleRequest,
};
use crate::state::AppState;
use crate::streak::{current_streak, date_key, longest_streak, toggle_date};
use crate::validation::{self, DEFAULT_COLOR};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use tracing::info;

/// Streak figures are derived from the log against `today`, so a habit left
/// untouched for days reads as broken without another write.
fn to_response(mut habit: Habit, today: NaiveDate) -> HabitResponse {
    let key = date_key(today);
    habit.streak = current_streak(&habit.completed_dates, today);
    HabitResponse {
        longest_streak: longest_streak(&habit.completed_dates),
        completed_today: habit.completed_dates.iter().any(|entry| entry == &key),
        habit,
    }
}

pub async fn list_habits(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<Vec<HabitResponse>>, AppError> {
    let today = today();
    let data = state.data.lock().await;
    let mut habits: Vec<Habit> = data.habits_for(user.as_str()).cloned().collect();
    habits.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    Ok(Json(
        habits
            .into_iter()
            .map(|habit| to_response(habit, today))
            .collect(),
    ))
}

pub async fn get_habit(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
) -> Result<Json<HabitResponse>, AppError> {
    let data = state.data.lock().await;
    let habit = owned(&data.habits, &id, user.as_str(), "habit")?;
    Ok(Json(to_response(habit.clone(), today())))
}

pub async fn create_habit(
    State(state): State<AppState>,
    user: UserId,
    Json(payload): Json<NewHabit>,
) -> Result<(StatusCode, Json<HabitResponse>), AppError> {
    let today = today();
    let title = validation::title(&payload.title)?;
    let color = validation::color(payload.color.as_deref().unwrap_or(DEFAULT_COLOR))?;
    let start_date = payload.start_date.unwrap_or(today);
    validation::date_range(start_date, payload.end_date)?;

    let created_at = now();
    let habit = Habit {
        id: new_id(),
        user_id: user.0,
        title,
        frequency: payload.frequency,
        completed_dates: Vec::new(),
        streak: 0,
        color,
        start_date,
        end_date: payload.end_date,
        created_at,
        updated_at: created_at,
    };

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    next.habits.insert(habit.id.clone(), habit.clone());
    state.commit(&mut data, next).await?;

    info!(habit_id = %habit.id, user_id = %habit.user_id, "habit created");
    Ok((StatusCode::CREATED, Json(to_response(habit, today))))
}

pub async fn update_habit(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
    Json(patch): Json<HabitPatch>,
) -> Result<Json<HabitResponse>, AppError> {
    let title = patch.title.as_deref().map(validation::title).transpose()?;
    let color = patch.color.as_deref().map(validation::color).transpose()?;

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let habit = owned_mut(&mut next.habits, &id, user.as_str(), "habit")?;
    if let Some(end_date) = patch.end_date {
        validation::date_range(habit.start_date, end_date)?;
        habit.end_date = end_date;
    }
    if let Some(title) = title {
        habit.title = title;
    }
    if let Some(color) = color {
        habit.color = color;
    }
    if let Some(frequency) = patch.frequency {
        habit.frequency = frequency;
    }
    habit.updated_at = now();
    let updated = habit.clone();

    state.commit(&mut data, next).await?;
    Ok(Json(to_response(updated, today())))
}

/// Flips one date in the completion log; the audit rows and the cached streak
/// are rewritten in the same persisted update.
pub async fn toggle_habit(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<HabitResponse>, AppError> {
    let today = today();
    let request: ToggleRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ToggleRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|err| AppError::bad_request(err.to_string()))?
    };
    let date = match request.date.as_deref() {
        Some(value) => validation::not_in_future(validation::date(value)?, today)?,
        None => today,
    };

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let habit = owned_mut(&mut next.habits, &id, user.as_str(), "habit")?;
    let added = toggle_date(&mut habit.completed_dates, date);
    habit.streak = current_streak(&habit.completed_dates, today);
    habit.updated_at = now();
    let updated = habit.clone();

    if added {
        next.completions.push(HabitCompletion {
            habit_id: updated.id.clone(),
            user_id: updated.user_id.clone(),
            date,
        });
    } else {
        next.completions
            .retain(|row| !(row.habit_id == updated.id && row.date == date));
    }

    state.commit(&mut data, next).await?;

    info!(
        habit_id = %updated.id,
        %date,
        completed = added,
        streak = updated.streak,
        "habit toggled"
    );
    Ok(Json(to_response(updated, today)))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    owned(&data.habits, &id, user.as_str(), "habit")?;

    let mut next = data.clone();
    next.habits.remove(&id);
    next.completions.retain(|row| row.habit_id != id);
    state.commit(&mut data, next).await?;

    info!(habit_id = %id, "habit deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{test_state, unwritable_path, writable_path};
    use crate::models::{AppData, Frequency};
    use chrono::{Duration, Utc};

    fn habit(id: &str, completed_dates: &[NaiveDate], streak: u32) -> Habit {
        Habit {
            id: id.to_string(),
            user_id: "u1".to_string(),
            title: "Read".to_string(),
            frequency: Frequency::Daily,
            completed_dates: completed_dates.iter().map(|day| date_key(*day)).collect(),
            streak,
            color: DEFAULT_COLOR.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn seeded(habit: Habit) -> AppData {
        let mut data = AppData::default();
        data.habits.insert(habit.id.clone(), habit);
        data
    }

    fn user() -> UserId {
        UserId("u1".to_string())
    }

    #[tokio::test]
    async fn failed_write_leaves_toggle_unapplied() {
        let state = test_state(unwritable_path("toggle"), seeded(habit("h1", &[], 0)));

        let result = toggle_habit(State(state.clone()), user(), Path("h1".to_string()), Bytes::new()).await;
        let Err(err) = result else {
            panic!("toggle should fail when the data file cannot be written");
        };
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let data = state.data.lock().await;
        let stored = &data.habits["h1"];
        assert!(stored.completed_dates.is_empty());
        assert_eq!(stored.streak, 0);
        assert!(data.completions.is_empty());
    }

    #[tokio::test]
    async fn failed_write_leaves_delete_unapplied() {
        let state = test_state(unwritable_path("delete"), seeded(habit("h1", &[], 0)));

        let result = delete_habit(State(state.clone()), user(), Path("h1".to_string())).await;
        assert!(result.is_err());
        assert!(state.data.lock().await.habits.contains_key("h1"));
    }

    #[tokio::test]
    async fn successful_toggle_writes_log_streak_and_audit_row_together() {
        let path = writable_path("toggle_ok");
        let state = test_state(path.clone(), seeded(habit("h1", &[], 0)));

        let Ok(Json(response)) =
            toggle_habit(State(state.clone()), user(), Path("h1".to_string()), Bytes::new()).await
        else {
            panic!("toggle should succeed");
        };
        assert_eq!(response.habit.streak, 1);

        let data = state.data.lock().await;
        assert_eq!(data.habits["h1"].completed_dates.len(), 1);
        assert_eq!(data.completions.len(), 1);
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn future_dates_are_rejected() {
        let state = test_state(writable_path("future"), seeded(habit("h1", &[], 0)));
        let tomorrow = date_key(today() + Duration::days(1));
        let body = Bytes::from(format!(r#"{{ "date": "{tomorrow}" }}"#));

        let result = toggle_habit(State(state.clone()), user(), Path("h1".to_string()), body).await;
        let Err(err) = result else {
            panic!("future toggle should be rejected");
        };
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(state.data.lock().await.habits["h1"].completed_dates.is_empty());
    }

    #[test]
    fn stale_cached_streak_is_recomputed_on_read() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let run: Vec<NaiveDate> = (3..=5).map(|offset| today - Duration::days(offset)).collect();

        let response = to_response(habit("h1", &run, 3), today);
        assert_eq!(response.habit.streak, 0);
        assert_eq!(response.longest_streak, 3);
        assert!(!response.completed_today);
    }
}
