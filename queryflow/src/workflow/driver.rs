//! Workflow driver: classify, run one branch node, snapshot before and after.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::WorkflowConfig;
use crate::error::{AgentError, ConfigError};
use crate::llm::LlmClient;
use crate::memory::{DocumentStatePersistence, Metadata, StatePersistence, StoreError};
use crate::result::QueryResult;
use crate::tools::{DataAnalystAgent, SqlDataAnalystAgent};

use super::classifier::{QueryClassifier, Route};
use super::logging;
use super::node::{Node, UseDataAgent, UseSqlAgent};
use super::state::{AgentKind, AgentState};

/// Metadata value for the snapshot taken before routing.
pub const START_NODE: &str = "start";

/// Payload returned for one processed query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub result: QueryResult,
    pub agent_used: AgentKind,
}

/// Routes each query to the SQL or data-analysis branch and returns its result.
///
/// Branch tools and the dataset are built once and shared across queries; each query gets
/// fresh [`AgentState`] and its own SQL working copy, so runs do not see each other.
///
/// **Interaction**: Served by `queryflow-server` and `queryflow-cli`; snapshots go through
/// [`StatePersistence`].
pub struct AgentWorkflow {
    classifier: QueryClassifier,
    sql_node: UseSqlAgent,
    data_node: UseDataAgent,
    persistence: Arc<dyn StatePersistence<AgentState>>,
}

impl AgentWorkflow {
    pub fn new(
        sql_agent: Arc<SqlDataAnalystAgent>,
        data_agent: Arc<DataAnalystAgent>,
        persistence: Arc<dyn StatePersistence<AgentState>>,
    ) -> Self {
        Self {
            classifier: QueryClassifier,
            sql_node: UseSqlAgent::new(sql_agent),
            data_node: UseDataAgent::new(data_agent),
            persistence,
        }
    }

    /// Loads the dataset, wires both branches to `llm` and opens the state store.
    ///
    /// # Errors
    ///
    /// [`ConfigError::CsvFileCount`] unless `config.data_dir` holds exactly one CSV file;
    /// [`ConfigError::StateStore`] if the persist directory cannot be opened.
    pub fn from_config(config: &WorkflowConfig, llm: Arc<dyn LlmClient>) -> Result<Self, ConfigError> {
        let sql_agent = SqlDataAnalystAgent::new(&config.data_dir, Arc::clone(&llm))?;
        let data_agent = DataAnalystAgent::with_default_agent(sql_agent.shared_data(), llm);
        let store = config.persistence.open_document_store()?;
        let persistence: Arc<dyn StatePersistence<AgentState>> =
            Arc::new(DocumentStatePersistence::<AgentState>::new(store));
        Ok(Self::new(Arc::new(sql_agent), Arc::new(data_agent), persistence))
    }

    /// Processes a query under a freshly generated state id.
    pub async fn process_query(&self, query: &str) -> Result<QueryResponse, AgentError> {
        let state_id = uuid::Uuid::new_v4().to_string();
        self.process_query_with_id(query, &state_id).await
    }

    /// Processes a query, tagging its snapshots with `state_id`.
    ///
    /// Snapshot failures are logged and do not fail the query.
    pub async fn process_query_with_id(
        &self,
        query: &str,
        state_id: &str,
    ) -> Result<QueryResponse, AgentError> {
        logging::log_workflow_start(state_id, query);
        let state = AgentState::new(query);
        self.snapshot(state_id, &state, START_NODE).await;

        let scores = self.classifier.scores(&state.query);
        let route = self.classifier.classify(&state.query);
        logging::log_route(state_id, route, scores);

        let node: &dyn Node = match route {
            Route::UseSqlAgent => &self.sql_node,
            Route::UseDataAgent => &self.data_node,
        };
        logging::log_node_start(node.id());
        let state = match node.run(state).await {
            Ok(state) => state,
            Err(e) => {
                logging::log_workflow_error(state_id, &e);
                return Err(e);
            }
        };
        logging::log_node_complete(node.id());
        self.snapshot(state_id, &state, node.id()).await;

        match (state.result, state.agent_used) {
            (Some(result), Some(agent_used)) => {
                logging::log_workflow_complete(state_id, agent_used, result.is_error());
                Ok(QueryResponse { result, agent_used })
            }
            _ => {
                let e = AgentError::ExecutionFailed(format!(
                    "node {} finished without a result",
                    node.id()
                ));
                logging::log_workflow_error(state_id, &e);
                Err(e)
            }
        }
    }

    /// A stored snapshot for `state_id`, if any.
    pub async fn load_state(&self, state_id: &str) -> Result<Option<AgentState>, StoreError> {
        self.persistence.load_state(state_id).await
    }

    /// Removes stored snapshots for `state_id`.
    pub async fn delete_state(&self, state_id: &str) -> Result<(), StoreError> {
        self.persistence.delete_state(state_id).await
    }

    async fn snapshot(&self, state_id: &str, state: &AgentState, node_id: &str) {
        let mut metadata = Metadata::new();
        metadata.insert("node".into(), node_id.into());
        if let Err(e) = self
            .persistence
            .save_state(state_id, state, Some(metadata))
            .await
        {
            logging::log_snapshot_failed(state_id, node_id, &e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{AnalystResponse, DataAnalyst, SqlAgent, SqlAgentOutput, WrangledData};
    use crate::dataset::DataFrame;
    use crate::memory::{DocumentStore, InMemoryDocumentStore};
    use crate::result::{AnalysisResult, SqlResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSqlAgent {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl SqlAgent for FixedSqlAgent {
        async fn invoke(&self, _instructions: &str) -> Result<SqlAgentOutput, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AgentError::ExecutionFailed("Test error".into()));
            }
            Ok(SqlAgentOutput {
                sql_query: "SELECT * FROM data".into(),
                data: Some(frame()),
            })
        }
    }

    struct FixedAnalyst {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DataAnalyst for FixedAnalyst {
        async fn invoke(
            &self,
            _instructions: &str,
            data: &DataFrame,
        ) -> Result<Option<AnalystResponse>, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(AnalystResponse {
                routing_preprocessor_decision: Some("table".into()),
                data_wrangled: Some(WrangledData::Frame(data.clone())),
                ..Default::default()
            }))
        }
    }

    /// Persistence that always fails, to check snapshots never break a query.
    struct BrokenPersistence;

    #[async_trait]
    impl StatePersistence<AgentState> for BrokenPersistence {
        async fn save_state(
            &self,
            _state_id: &str,
            _state: &AgentState,
            _metadata: Option<Metadata>,
        ) -> Result<(), StoreError> {
            Err(StoreError::Storage("disk full".into()))
        }

        async fn load_state(&self, _state_id: &str) -> Result<Option<AgentState>, StoreError> {
            Err(StoreError::Storage("disk full".into()))
        }

        async fn delete_state(&self, _state_id: &str) -> Result<(), StoreError> {
            Err(StoreError::Storage("disk full".into()))
        }
    }

    fn frame() -> DataFrame {
        DataFrame::new(
            vec!["col1".into(), "col2".into()],
            vec![vec![json!(1), json!(3)], vec![json!(2), json!(4)]],
        )
        .unwrap()
    }

    struct Harness {
        workflow: AgentWorkflow,
        store: Arc<InMemoryDocumentStore>,
        sql: Arc<FixedSqlAgent>,
        analyst: Arc<FixedAnalyst>,
    }

    fn harness(sql_fails: bool) -> Harness {
        let data = Arc::new(frame());
        let sql = Arc::new(FixedSqlAgent {
            calls: AtomicUsize::new(0),
            fail: sql_fails,
        });
        let analyst = Arc::new(FixedAnalyst {
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(InMemoryDocumentStore::new());
        let workflow = AgentWorkflow::new(
            Arc::new(SqlDataAnalystAgent::with_agent(data.clone(), sql.clone())),
            Arc::new(DataAnalystAgent::with_agent(data, analyst.clone())),
            Arc::new(DocumentStatePersistence::<AgentState>::new(
                store.clone() as Arc<dyn DocumentStore>
            )),
        );
        Harness {
            workflow,
            store,
            sql,
            analyst,
        }
    }

    /// **Scenario**: SQL-leaning query runs only the SQL branch.
    #[tokio::test]
    async fn sql_query_runs_sql_branch_only() {
        let h = harness(false);
        let response = h
            .workflow
            .process_query("count records in the table")
            .await
            .unwrap();
        assert_eq!(response.agent_used, AgentKind::SqlDataAnalyst);
        assert!(matches!(
            response.result,
            QueryResult::Sql(SqlResult::Success { .. })
        ));
        assert_eq!(h.sql.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.analyst.calls.load(Ordering::SeqCst), 0);
    }

    /// **Scenario**: Analysis-leaning and tied queries run only the analysis branch.
    #[tokio::test]
    async fn analysis_and_tie_run_data_branch() {
        let h = harness(false);
        for query in ["plot the trend", "sql chart", "hello"] {
            let response = h.workflow.process_query(query).await.unwrap();
            assert_eq!(response.agent_used, AgentKind::DataAnalyst, "{}", query);
            assert!(matches!(
                response.result,
                QueryResult::Analysis(AnalysisResult::Table { .. })
            ));
        }
        assert_eq!(h.sql.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.analyst.calls.load(Ordering::SeqCst), 3);
    }

    /// **Scenario**: Response serializes as `{result, agent_used}`.
    #[tokio::test]
    async fn response_json_shape() {
        let h = harness(false);
        let response = h.workflow.process_query("select count").await.unwrap();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "result": {
                    "status": "success",
                    "sql_query": "SELECT * FROM data",
                    "data": [{"col1": 1, "col2": 3}, {"col1": 2, "col2": 4}]
                },
                "agent_used": "sql_data_analyst"
            })
        );
    }

    /// **Scenario**: A run stores a start snapshot and a final snapshot under its id.
    #[tokio::test]
    async fn run_saves_start_and_final_snapshots() {
        let h = harness(false);
        h.workflow
            .process_query_with_id("select count", "s1")
            .await
            .unwrap();

        let mut filter = Metadata::new();
        filter.insert("state_id".into(), json!("s1"));
        let docs = h.store.query(&filter, 10).await.unwrap();
        assert_eq!(docs.len(), 2);

        let start = docs.iter().find(|d| d.metadata["node"] == json!("start")).unwrap();
        let start: AgentState = serde_json::from_str(&start.document).unwrap();
        assert_eq!(start, AgentState::new("select count"));

        let done = docs
            .iter()
            .find(|d| d.metadata["node"] == json!("use_sql_agent"))
            .unwrap();
        let done: AgentState = serde_json::from_str(&done.document).unwrap();
        assert_eq!(done.agent_used, Some(AgentKind::SqlDataAnalyst));
        assert!(done.result.is_some());

        assert!(h.workflow.load_state("s1").await.unwrap().is_some());
        h.workflow.delete_state("s1").await.unwrap();
        assert!(h.workflow.load_state("s1").await.unwrap().is_none());
    }

    /// **Scenario**: Agent failure is an error record, not a workflow error.
    #[tokio::test]
    async fn agent_failure_is_error_record() {
        let h = harness(true);
        let response = h.workflow.process_query("select count").await.unwrap();
        assert_eq!(
            response.result,
            QueryResult::Sql(SqlResult::error("Error processing query: Test error"))
        );
        assert!(response.result.is_error());
    }

    /// **Scenario**: Persistence failures are logged and the query still succeeds.
    #[tokio::test]
    async fn persistence_failure_does_not_fail_query() {
        let data = Arc::new(frame());
        let workflow = AgentWorkflow::new(
            Arc::new(SqlDataAnalystAgent::with_agent(
                data.clone(),
                Arc::new(FixedSqlAgent {
                    calls: AtomicUsize::new(0),
                    fail: false,
                }),
            )),
            Arc::new(DataAnalystAgent::with_agent(
                data,
                Arc::new(FixedAnalyst {
                    calls: AtomicUsize::new(0),
                }),
            )),
            Arc::new(BrokenPersistence),
        );
        let response = workflow.process_query("select count").await.unwrap();
        assert_eq!(response.agent_used, AgentKind::SqlDataAnalyst);
        assert!(workflow.load_state("x").await.is_err());
    }

    /// **Scenario**: Building from config fails before any query when the CSV count is wrong.
    #[test]
    fn from_config_requires_single_csv() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkflowConfig::new("k").with_data_dir(dir.path());
        let llm = Arc::new(crate::llm::MockLlm::with_reply(""));
        assert!(matches!(
            AgentWorkflow::from_config(&config, llm),
            Err(ConfigError::CsvFileCount { found: 0, .. })
        ));
    }
}
