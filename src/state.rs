use crate::config::Config;
use crate::errors::AppError;
use crate::models::AppData;
use crate::storage::persist_data;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub reminder_window_minutes: u32,
}

impl AppState {
    pub fn new(config: &Config, data: AppData) -> Self {
        Self {
            data_path: config.data_path.clone(),
            data: Arc::new(Mutex::new(data)),
            reminder_window_minutes: config.reminder_window_minutes,
        }
    }

    /// Writes `next` to disk and only then installs it as the live document.
    /// On a failed write `live` is left exactly as it was.
    pub async fn commit(&self, live: &mut AppData, next: AppData) -> Result<(), AppError> {
        persist_data(&self.data_path, &next).await?;
        *live = next;
        Ok(())
    }
}
