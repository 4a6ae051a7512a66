//! HTTP server exposing the query workflow at `/v1/agent-workflow`.
//!
//! Configure via env: OPENAI_API_KEY, OPENAI_MODEL, OPENAI_API_BASE, DATA_DIR,
//! STATE_PERSIST_DIR, STATE_COLLECTION, LISTEN, LOG_FILE. Load .env with dotenv.

mod logging;
mod routes;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use queryflow::{AgentWorkflow, LlmClient, WorkflowConfig};
use tracing::info;

use routes::AppState;

/// First `.env` in `start` or its parent directory.
fn find_dotenv(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(2)
        .map(|dir| dir.join(".env"))
        .find(|candidate| candidate.is_file())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let dotenv_path = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_dotenv(&cwd))
        .filter(|path| dotenv::from_path(path).is_ok());

    logging::init_tracing()?;
    if let Some(path) = &dotenv_path {
        info!(path = %path.display(), "loaded environment file");
    }

    let config = WorkflowConfig::from_env()?;
    info!(
        model = %config.model,
        base_url = ?config.api_base,
        data_dir = %config.data_dir.display(),
        persist_dir = ?config.persistence.persist_directory,
        collection = %config.persistence.collection_name,
        "workflow config loaded"
    );

    let llm: Arc<dyn LlmClient> = Arc::new(config.chat_model());
    let workflow = AgentWorkflow::from_config(&config, llm)?;
    let app = routes::router(Arc::new(AppState { workflow }));

    let listen = std::env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:8123".to_string());
    info!("listening on http://{}", listen);
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: `.env` in the working directory wins over one in the parent.
    #[test]
    fn find_dotenv_prefers_current_dir() {
        let root = tempfile::tempdir().unwrap();
        let child = root.path().join("server");
        std::fs::create_dir(&child).unwrap();
        std::fs::write(root.path().join(".env"), "A=1").unwrap();
        assert_eq!(find_dotenv(&child), Some(root.path().join(".env")));

        std::fs::write(child.join(".env"), "A=2").unwrap();
        assert_eq!(find_dotenv(&child), Some(child.join(".env")));
    }

    /// **Scenario**: Nothing is found when neither directory has a `.env`.
    #[test]
    fn find_dotenv_stops_at_parent() {
        let root = tempfile::tempdir().unwrap();
        let deep = root.path().join("a").join("b");
        std::fs::create_dir_all(&deep).unwrap();
        std::fs::write(root.path().join(".env"), "A=1").unwrap();
        assert_eq!(find_dotenv(&deep), None);
    }
}
