//! Workflow config: model credentials, data directory and state store. Filled from env / .env.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::llm::DEFAULT_MODEL;
use crate::memory::{PersistenceConfig, DEFAULT_COLLECTION};

/// Default directory searched for the dataset CSV.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Everything needed to build an [`AgentWorkflow`](crate::AgentWorkflow).
#[derive(Clone, Debug, PartialEq)]
pub struct WorkflowConfig {
    /// OpenAI API key.
    pub api_key: String,
    /// Base URL for OpenAI-compatible backends. `None` uses the client default.
    pub api_base: Option<String>,
    /// Model name, e.g. `gpt-4o-mini`.
    pub model: String,
    /// Directory holding exactly one CSV file.
    pub data_dir: PathBuf,
    pub persistence: PersistenceConfig,
}

impl WorkflowConfig {
    /// Config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: None,
            model: DEFAULT_MODEL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            persistence: PersistenceConfig::default(),
        }
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_persistence(mut self, persistence: PersistenceConfig) -> Self {
        self.persistence = persistence;
        self
    }

    /// Fill config from env vars. Call `dotenv::dotenv().ok()` first to pick up `.env`.
    ///
    /// `OPENAI_API_KEY` required. `OPENAI_MODEL`, `DATA_DIR`, `STATE_COLLECTION` have
    /// defaults; `OPENAI_API_BASE` (or `OPENAI_BASE_URL`) and `STATE_PERSIST_DIR` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = non_empty_var("OPENAI_API_KEY").ok_or(ConfigError::MissingEnv("OPENAI_API_KEY"))?;
        let api_base = non_empty_var("OPENAI_API_BASE").or_else(|| non_empty_var("OPENAI_BASE_URL"));
        let model = non_empty_var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let data_dir = non_empty_var("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let persistence = PersistenceConfig {
            persist_directory: non_empty_var("STATE_PERSIST_DIR").map(PathBuf::from),
            collection_name: non_empty_var("STATE_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        };
        Ok(Self {
            api_key,
            api_base,
            model,
            data_dir: PathBuf::from(data_dir),
            persistence,
        })
    }

    /// Chat model client for this config.
    #[cfg(feature = "openai")]
    pub fn chat_model(&self) -> crate::llm::ChatOpenAI {
        crate::llm::ChatOpenAI::from_credentials(&self.api_key, self.api_base.as_deref(), &self.model)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    const VARS: &[&str] = &[
        "OPENAI_API_KEY",
        "OPENAI_API_BASE",
        "OPENAI_BASE_URL",
        "OPENAI_MODEL",
        "DATA_DIR",
        "STATE_PERSIST_DIR",
        "STATE_COLLECTION",
    ];

    /// Lock used by tests that mutate the environment so they run serially and do not race.
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Runs `f` with only `vars` set among [`VARS`], restoring the previous values after.
    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = env_lock();
        let saved: Vec<(&str, Option<String>)> =
            VARS.iter().map(|k| (*k, std::env::var(k).ok())).collect();
        for k in VARS {
            std::env::remove_var(k);
        }
        for (k, v) in vars {
            std::env::set_var(k, v);
        }
        let out = f();
        for (k, v) in saved {
            match v {
                Some(v) => std::env::set_var(k, v),
                None => std::env::remove_var(k),
            }
        }
        out
    }

    /// **Scenario**: Missing OPENAI_API_KEY is a configuration error naming the variable.
    #[test]
    fn from_env_fails_when_api_key_is_missing() {
        let result = with_env(&[], WorkflowConfig::from_env);
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("OPENAI_API_KEY")));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    /// **Scenario**: A blank key counts as missing.
    #[test]
    fn from_env_treats_blank_key_as_missing() {
        let result = with_env(&[("OPENAI_API_KEY", "  ")], WorkflowConfig::from_env);
        assert!(result.is_err());
    }

    /// **Scenario**: With only the key set, every other field takes its default.
    #[test]
    fn from_env_defaults() {
        let config = with_env(&[("OPENAI_API_KEY", "k")], WorkflowConfig::from_env).unwrap();
        assert_eq!(config, WorkflowConfig::new("k"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.persistence.persist_directory, None);
        assert_eq!(config.persistence.collection_name, "agent_workflow_states");
    }

    /// **Scenario**: Every variable is honored; OPENAI_BASE_URL is the fallback base.
    #[test]
    fn from_env_reads_all_vars() {
        let config = with_env(
            &[
                ("OPENAI_API_KEY", "k"),
                ("OPENAI_BASE_URL", "http://localhost:8000/v1"),
                ("OPENAI_MODEL", "gpt-4o"),
                ("DATA_DIR", "/srv/data"),
                ("STATE_PERSIST_DIR", "/srv/states"),
                ("STATE_COLLECTION", "states"),
            ],
            WorkflowConfig::from_env,
        )
        .unwrap();
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:8000/v1"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(
            config.persistence.persist_directory,
            Some(PathBuf::from("/srv/states"))
        );
        assert_eq!(config.persistence.collection_name, "states");
    }

    /// **Scenario**: OPENAI_API_BASE wins over OPENAI_BASE_URL.
    #[test]
    fn from_env_prefers_api_base() {
        let config = with_env(
            &[
                ("OPENAI_API_KEY", "k"),
                ("OPENAI_API_BASE", "http://a/v1"),
                ("OPENAI_BASE_URL", "http://b/v1"),
            ],
            WorkflowConfig::from_env,
        )
        .unwrap();
        assert_eq!(config.api_base.as_deref(), Some("http://a/v1"));
    }
}
