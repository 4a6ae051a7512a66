use queryflow::{AgentKind, QueryResult};

use crate::common::{data_dir, workflow};

/// **Scenario**: Snapshots written to a persist directory survive a rebuilt workflow.
#[tokio::test]
async fn snapshots_survive_restart() {
    let data = data_dir();
    let states = tempfile::tempdir().unwrap();
    {
        let (wf, _) = workflow(data.path(), Some(states.path()), vec!["SELECT COUNT(*) AS n FROM data"]);
        wf.process_query_with_id("count rows", "run-1").await.unwrap();
    }

    let (wf, _) = workflow(data.path(), Some(states.path()), vec!["unused"]);
    let state = wf.load_state("run-1").await.unwrap().expect("snapshot");
    assert_eq!(state.query, "count rows");
    // Either the start or the final snapshot may come back first.
    if let Some(agent) = state.agent_used {
        assert_eq!(agent, AgentKind::SqlDataAnalyst);
        assert!(matches!(state.result, Some(QueryResult::Sql(_))));
    }

    wf.delete_state("run-1").await.unwrap();
    assert!(wf.load_state("run-1").await.unwrap().is_none());
}

/// **Scenario**: Runs under different ids do not see each other's snapshots.
#[tokio::test]
async fn snapshots_are_keyed_by_state_id() {
    let data = data_dir();
    let (wf, _) = workflow(data.path(), None, vec!["SELECT COUNT(*) AS n FROM data"]);
    wf.process_query_with_id("count rows", "a").await.unwrap();
    wf.process_query_with_id("count the table", "b").await.unwrap();

    assert_eq!(wf.load_state("a").await.unwrap().unwrap().query, "count rows");
    assert_eq!(wf.load_state("b").await.unwrap().unwrap().query, "count the table");
    wf.delete_state("a").await.unwrap();
    assert!(wf.load_state("a").await.unwrap().is_none());
    assert!(wf.load_state("b").await.unwrap().is_some());
}
