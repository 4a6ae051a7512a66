use std::path::Path;
use std::sync::Arc;

use queryflow::{AgentWorkflow, MockLlm, PersistenceConfig, WorkflowConfig};
use tempfile::TempDir;

pub const SALES_CSV: &str = "region,month,amount\neast,1,10\nwest,1,5\neast,2,7\n";

/// Temp data dir holding `sales.csv`.
pub fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sales.csv"), SALES_CSV).unwrap();
    dir
}

pub fn workflow(data: &Path, persist: Option<&Path>, replies: Vec<&str>) -> (AgentWorkflow, Arc<MockLlm>) {
    let config = WorkflowConfig::new("test-key")
        .with_data_dir(data)
        .with_persistence(PersistenceConfig {
            persist_directory: persist.map(Path::to_path_buf),
            ..Default::default()
        });
    let llm = Arc::new(MockLlm::new(replies.into_iter().map(String::from)));
    let workflow = AgentWorkflow::from_config(&config, llm.clone()).unwrap();
    (workflow, llm)
}
