use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
    /// Daily rolling JSON log files are written here when set.
    pub dir: Option<PathBuf>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(crate::env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };
        let dir = lookup("LOG_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self { level, format, dir }
    }

    /// Default filter: the chosen level for Quill crates, quieter for libraries.
    pub fn filter_directive(&self) -> String {
        format!(
            "quill={level},quill_core={level},quill_auth={level},quill_db={level},tower_http=warn,sqlx=warn",
            level = self.level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::from_lookup(|_| None);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.dir.is_none());
        assert!(config.filter_directive().starts_with("quill=info"));
    }

    #[test]
    fn test_json_and_dir() {
        let config = LogConfig::from_lookup(|key| match key {
            "LOG_FORMAT" => Some("json".into()),
            "LOG_DIR" => Some("storage/logs".into()),
            "LOG_LEVEL" => Some("debug".into()),
            _ => None,
        });
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.dir, Some(PathBuf::from("storage/logs")));
        assert!(config.filter_directive().contains("quill_auth=debug"));
    }
}
