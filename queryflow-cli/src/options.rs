//! Optional overrides for a run (CLI args or programmatic).

use std::path::PathBuf;

use queryflow::WorkflowConfig;

/// Overrides applied on top of the env-based [`WorkflowConfig`]. Only set fields override.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Directory holding the dataset CSV.
    pub data_dir: Option<PathBuf>,
    /// Keep snapshots in a SQLite file under this directory.
    pub persist_dir: Option<PathBuf>,
    /// Model name override.
    pub model: Option<String>,
    /// Tag snapshots with this id instead of a generated one.
    pub state_id: Option<String>,
}

impl RunOptions {
    pub fn apply(&self, config: &mut WorkflowConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(dir) = &self.persist_dir {
            config.persistence.persist_directory = Some(dir.clone());
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
    }
}
