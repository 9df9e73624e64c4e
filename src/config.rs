use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_REMINDER_WINDOW_MINUTES: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    /// Width of the look-back window used when matching due reminders.
    pub reminder_window_minutes: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| lookup(key).map(|value| value.trim().to_string());
        Self {
            port: parse("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            data_path: parse("APP_DATA_PATH")
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            reminder_window_minutes: parse("REMINDER_WINDOW_MINUTES")
                .and_then(|value| value.parse::<u32>().ok())
                .filter(|minutes| *minutes > 0)
                .unwrap_or(DEFAULT_REMINDER_WINDOW_MINUTES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/state.json"));
        assert_eq!(config.reminder_window_minutes, 5);
    }

    #[test]
    fn values_are_read_and_bad_ones_fall_back() {
        let config = config(&[
            ("PORT", " 9090 "),
            ("APP_DATA_PATH", "/tmp/habits.json"),
            ("REMINDER_WINDOW_MINUTES", "0"),
        ]);
        assert_eq!(config.port, 9090);
        assert_eq!(config.data_path, PathBuf::from("/tmp/habits.json"));
        assert_eq!(config.reminder_window_minutes, 5);

        assert_eq!(config_port("not-a-port"), 8080);
    }

    fn config_port(value: &str) -> u16 {
        config(&[("PORT", value)]).port
    }
}
