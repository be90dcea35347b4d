use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use std::env;

use crate::error::Result;
use crate::jobs::timer_jobs;
use crate::routing::TagPattern;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Notification hub name, used in log fields
    #[serde(default = "default_hub_name")]
    pub name: String,
    /// Hub connection string for an external sink (never logged)
    pub connection_string: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// Tag pattern for queue-routed notifications, one `{name}` placeholder
    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    /// Timer jobs to run, by name
    #[serde(default = "default_enabled_jobs")]
    pub enabled: Vec<String>,
    /// Buffer size of the in-process queue feeding the queue job
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_hub_name() -> String {
    "notification-hub".to_string()
}

fn default_tag_pattern() -> String {
    "{userIdTag}".to_string()
}

fn default_enabled_jobs() -> Vec<String> {
    timer_jobs().iter().map(|job| job.name.to_string()).collect()
}

fn default_queue_capacity() -> usize {
    64
}

impl Settings {
    pub fn new() -> std::result::Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Self::load("config", &run_mode, None)
    }

    /// Load `{config_dir}/default` and `{config_dir}/{run_mode}` over the
    /// defaults, then environment variables over both.
    ///
    /// `env_vars` replaces the process environment when given.
    pub fn load(
        config_dir: &str,
        run_mode: &str,
        env_vars: Option<Map<String, String>>,
    ) -> std::result::Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("hub.name", default_hub_name())?
            .set_default("routing.tag_pattern", default_tag_pattern())?
            .set_default("jobs.enabled", default_enabled_jobs())?
            .set_default("jobs.queue_capacity", default_queue_capacity() as i64)?
            // Load config file if exists
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // HUB__NAME, HUB__CONNECTION_STRING, ROUTING__TAG_PATTERN, JOBS__ENABLED, JOBS__QUEUE_CAPACITY
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("jobs.enabled")
                    .source(env_vars),
            );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the runtime cannot start with
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.jobs.queue_capacity == 0 {
            return Err(ConfigError::Message(
                "jobs.queue_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Validated tag pattern for the queue job
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::parse(&self.routing.tag_pattern)
    }

    pub fn has_connection(&self) -> bool {
        self.hub
            .connection_string
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            name: default_hub_name(),
            connection_string: None,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            tag_pattern: default_tag_pattern(),
        }
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_jobs(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use uuid::Uuid;

    use crate::error::NotifyError;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.hub.name, "notification-hub");
        assert_eq!(settings.routing.tag_pattern, "{userIdTag}");
        assert_eq!(settings.jobs.queue_capacity, 64);
        assert_eq!(settings.jobs.enabled.len(), timer_jobs().len());
        assert!(!settings.has_connection());
    }

    #[test]
    fn test_tag_pattern_validation() {
        let mut settings = Settings::default();
        assert_eq!(settings.tag_pattern().unwrap().placeholder(), "userIdTag");

        settings.routing.tag_pattern = "no placeholder".to_string();
        assert!(matches!(
            settings.tag_pattern(),
            Err(NotifyError::InvalidTagPattern(_))
        ));
    }

    #[test]
    fn test_blank_connection_counts_as_absent() {
        let mut settings = Settings::default();
        settings.hub.connection_string = Some("  ".to_string());
        assert!(!settings.has_connection());

        settings.hub.connection_string = Some("Endpoint=sb://example/".to_string());
        assert!(settings.has_connection());
    }

    fn config_dir(files: &[(&str, &str)]) -> PathBuf {
        let dir = env::temp_dir().join(format!("hub-settings-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        for (name, contents) in files {
            fs::write(dir.join(name), contents).unwrap();
        }
        dir
    }

    fn no_env() -> Option<Map<String, String>> {
        Some(Map::new())
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        let dir = config_dir(&[]);
        let settings = Settings::load(dir.to_str().unwrap(), "development", no_env()).unwrap();

        assert_eq!(settings.hub.name, "notification-hub");
        assert_eq!(settings.routing.tag_pattern, "{userIdTag}");
        assert_eq!(settings.jobs.queue_capacity, 64);
        assert_eq!(settings.jobs.enabled.len(), timer_jobs().len());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_reads_documented_keys_from_file() {
        let dir = config_dir(&[(
            "default.toml",
            r#"
[hub]
connection_string = "Endpoint=sb://example/"

[routing]
tag_pattern = "user:{tag}"

[jobs]
queue_capacity = 8
enabled = ["send_windows_toast"]
"#,
        )]);
        let settings = Settings::load(dir.to_str().unwrap(), "development", no_env()).unwrap();

        assert!(settings.has_connection());
        assert_eq!(settings.routing.tag_pattern, "user:{tag}");
        assert_eq!(settings.jobs.queue_capacity, 8);
        assert_eq!(settings.jobs.enabled, vec!["send_windows_toast".to_string()]);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_layers_run_mode_then_env() {
        let dir = config_dir(&[
            (
                "default.toml",
                "[hub]\nname = \"from-default\"\n\n[routing]\ntag_pattern = \"default:{tag}\"\n\n[jobs]\nqueue_capacity = 8\n",
            ),
            (
                "staging.toml",
                "[routing]\ntag_pattern = \"staging:{tag}\"\n\n[jobs]\nqueue_capacity = 16\n",
            ),
        ]);

        let mut env_vars = Map::new();
        env_vars.insert("JOBS__QUEUE_CAPACITY".to_string(), "32".to_string());
        env_vars.insert(
            "JOBS__ENABLED".to_string(),
            "send_windows_toast,send_with_batch".to_string(),
        );

        let settings = Settings::load(dir.to_str().unwrap(), "staging", Some(env_vars)).unwrap();

        // default file only
        assert_eq!(settings.hub.name, "from-default");
        // run mode file over default file
        assert_eq!(settings.routing.tag_pattern, "staging:{tag}");
        // environment over both files
        assert_eq!(settings.jobs.queue_capacity, 32);
        assert_eq!(
            settings.jobs.enabled,
            vec!["send_windows_toast".to_string(), "send_with_batch".to_string()]
        );

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_rejects_zero_queue_capacity() {
        let dir = config_dir(&[("default.toml", "[jobs]\nqueue_capacity = 0\n")]);
        let result = Settings::load(dir.to_str().unwrap(), "development", no_env());

        assert!(matches!(result, Err(ConfigError::Message(_))));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_validate_zero_queue_capacity() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.jobs.queue_capacity = 0;
        assert!(settings.validate().is_err());
    }
}
