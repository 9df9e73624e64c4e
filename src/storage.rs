use crate::errors::AppError;
use crate::models::AppData;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error, warn};

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<AppData>(&bytes) {
            Ok(data) => {
                debug!(
                    habits = data.habits.len(),
                    goals = data.goals.len(),
                    tasks = data.tasks.len(),
                    events = data.events.len(),
                    "loaded data file"
                );
                data
            }
            Err(err) => {
                error!("failed to parse data file {}: {err}", path.display());
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("no data file at {}, starting empty", path.display());
            AppData::default()
        }
        Err(err) => {
            error!("failed to read data file {}: {err}", path.display());
            AppData::default()
        }
    }
}

/// Writes the whole document through a sibling temp file so a failed write
/// never truncates the previous state.
pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, payload).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HabitCompletion;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("habit_tracker_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn persisted_data_loads_back() {
        let path = temp_path("roundtrip");
        let mut data = AppData::default();
        data.completions.push(HabitCompletion {
            habit_id: "h1".into(),
            user_id: "u1".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        });

        persist_data(&path, &data).await.unwrap();
        let loaded = load_data(&path).await;
        assert_eq!(loaded.completions, data.completions);
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn missing_or_corrupt_file_loads_empty() {
        let path = temp_path("corrupt");
        assert!(load_data(&path).await.habits.is_empty());

        fs::write(&path, b"{ not json").await.unwrap();
        assert!(load_data(&path).await.completions.is_empty());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn write_failure_is_surfaced() {
        let mut path = temp_path("missing_dir");
        path.push("nested/state.json");
        assert!(persist_data(&path, &AppData::default()).await.is_err());
    }
}
