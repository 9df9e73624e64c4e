use super::{list_owned, new_id, now, owned, owned_mut};
use crate::auth::UserId;
use crate::errors::AppError;
use crate::models::{Event, EventPatch, Goal, GoalPatch, NewEvent, NewGoal, NewTask, Task, TaskPatch};
use crate::state::AppState;
use crate::validation;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

fn normalized_time(value: &str) -> Result<String, AppError> {
    Ok(validation::time(value)?.format("%H:%M").to_string())
}

pub async fn list_goals(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<Vec<Goal>>, AppError> {
    let data = state.data.lock().await;
    let mut goals = list_owned(&data.goals, user.as_str());
    goals.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(Json(goals))
}

pub async fn create_goal(
    State(state): State<AppState>,
    user: UserId,
    Json(payload): Json<NewGoal>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let title = validation::title(&payload.title)?;
    let created_at = now();
    let goal = Goal {
        id: new_id(),
        user_id: user.0,
        title,
        description: payload.description.unwrap_or_default().trim().to_string(),
        target_date: payload.target_date,
        progress: 0,
        completed: false,
        created_at,
        updated_at: created_at,
    };

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    next.goals.insert(goal.id.clone(), goal.clone());
    state.commit(&mut data, next).await?;

    info!(goal_id = %goal.id, "goal created");
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
    Json(patch): Json<GoalPatch>,
) -> Result<Json<Goal>, AppError> {
    let title = patch.title.as_deref().map(validation::title).transpose()?;
    let progress = patch.progress.map(validation::progress).transpose()?;

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let goal = owned_mut(&mut next.goals, &id, user.as_str(), "goal")?;
    if let Some(title) = title {
        goal.title = title;
    }
    if let Some(description) = patch.description {
        goal.description = description.trim().to_string();
    }
    if let Some(target_date) = patch.target_date {
        goal.target_date = target_date;
    }
    if let Some(progress) = progress {
        goal.progress = progress;
        goal.completed = progress == 100;
    }
    if let Some(completed) = patch.completed {
        goal.completed = completed;
        if completed {
            goal.progress = 100;
        }
    }
    goal.updated_at = now();
    let updated = goal.clone();

    state.commit(&mut data, next).await?;
    Ok(Json(updated))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    owned(&data.goals, &id, user.as_str(), "goal")?;
    let mut next = data.clone();
    next.goals.remove(&id);
    state.commit(&mut data, next).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tasks(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<Vec<Task>>, AppError> {
    let data = state.data.lock().await;
    let mut tasks = list_owned(&data.tasks, user.as_str());
    // Open tasks first, then by due date with undated tasks last.
    tasks.sort_by_key(|task| (task.completed, task.due_date.is_none(), task.due_date, task.created_at));
    Ok(Json(tasks))
}

pub async fn create_task(
    State(state): State<AppState>,
    user: UserId,
    Json(payload): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let title = validation::title(&payload.title)?;
    let created_at = now();
    let task = Task {
        id: new_id(),
        user_id: user.0,
        title,
        due_date: payload.due_date,
        priority: payload.priority.unwrap_or_default(),
        completed: false,
        created_at,
        updated_at: created_at,
    };

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    next.tasks.insert(task.id.clone(), task.clone());
    state.commit(&mut data, next).await?;

    info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, AppError> {
    let title = patch.title.as_deref().map(validation::title).transpose()?;

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let task = owned_mut(&mut next.tasks, &id, user.as_str(), "task")?;
    if let Some(title) = title {
        task.title = title;
    }
    if let Some(due_date) = patch.due_date {
        task.due_date = due_date;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(completed) = patch.completed {
        task.completed = completed;
    }
    task.updated_at = now();
    let updated = task.clone();

    state.commit(&mut data, next).await?;
    Ok(Json(updated))
}

pub async fn delete_task(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    owned(&data.tasks, &id, user.as_str(), "task")?;
    let mut next = data.clone();
    next.tasks.remove(&id);
    state.commit(&mut data, next).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_events(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Json<Vec<Event>>, AppError> {
    let data = state.data.lock().await;
    let mut events = list_owned(&data.events, user.as_str());
    events.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    user: UserId,
    Json(payload): Json<NewEvent>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let title = validation::title(&payload.title)?;
    let time = payload.time.as_deref().map(normalized_time).transpose()?;
    validation::date_range(payload.date, payload.end_date)?;

    let created_at = now();
    let event = Event {
        id: new_id(),
        user_id: user.0,
        title,
        date: payload.date,
        time,
        recurrence: payload.recurrence.unwrap_or_default(),
        end_date: payload.end_date,
        reminder_minutes: payload.reminder_minutes,
        created_at,
        updated_at: created_at,
    };

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    next.events.insert(event.id.clone(), event.clone());
    state.commit(&mut data, next).await?;

    info!(event_id = %event.id, recurrence = ?event.recurrence, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, AppError> {
    let title = patch.title.as_deref().map(validation::title).transpose()?;
    let time = match patch.time {
        Some(Some(value)) => Some(Some(normalized_time(&value)?)),
        Some(None) => Some(None),
        None => None,
    };

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let event = owned_mut(&mut next.events, &id, user.as_str(), "event")?;
    let date = patch.date.unwrap_or(event.date);
    let end_date = patch.end_date.unwrap_or(event.end_date);
    validation::date_range(date, end_date)?;

    event.date = date;
    event.end_date = end_date;
    if let Some(title) = title {
        event.title = title;
    }
    if let Some(time) = time {
        event.time = time;
    }
    if let Some(recurrence) = patch.recurrence {
        event.recurrence = recurrence;
    }
    if let Some(reminder_minutes) = patch.reminder_minutes {
        event.reminder_minutes = reminder_minutes;
    }
    event.updated_at = now();
    let updated = event.clone();

    state.commit(&mut data, next).await?;
    Ok(Json(updated))
}

pub async fn delete_event(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    owned(&data.events, &id, user.as_str(), "event")?;
    let mut next = data.clone();
    next.events.remove(&id);
    state.commit(&mut data, next).await?;
    Ok(StatusCode::NO_CONTENT)
}
