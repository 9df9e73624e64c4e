use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, patch, post}, Router};
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route(
            "/api/habits/:id",
            get(handlers::get_habit)
                .patch(handlers::update_habit)
                .delete(handlers::delete_habit),
        )
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit))
        .route("/api/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route("/api/goals/:id", patch(handlers::update_goal).delete(handlers::delete_goal))
        .route("/api/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route("/api/tasks/:id", patch(handlers::update_task).delete(handlers::delete_task))
        .route("/api/events", get(handlers::list_events).post(handlers::create_event))
        .route("/api/events/:id", patch(handlers::update_event).delete(handlers::delete_event))
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/reports/weekly", post(handlers::weekly_report))
        .route("/api/reports/monthly", post(handlers::monthly_report))
        .route("/api/reminders/due", get(handlers::due_reminders))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
