use queryflow::{AgentKind, AnalysisResult, QueryResult, SqlResult};
use serde_json::json;

use crate::common::{data_dir, workflow};

/// **Scenario**: SQL-leaning question runs generated SQL on the dataset.
#[tokio::test]
async fn sql_question_returns_rows() {
    let dir = data_dir();
    let (wf, llm) = workflow(
        dir.path(),
        None,
        vec!["SELECT region, SUM(amount) AS total FROM data GROUP BY region ORDER BY region"],
    );

    let response = wf
        .process_query("sum of amount per region from the table")
        .await
        .unwrap();

    assert_eq!(response.agent_used, AgentKind::SqlDataAnalyst);
    assert_eq!(llm.calls().len(), 1);
    match response.result {
        QueryResult::Sql(SqlResult::Success { data, .. }) => {
            assert_eq!(
                serde_json::to_value(data).unwrap(),
                json!([{"region": "east", "total": 17}, {"region": "west", "total": 5}])
            );
        }
        other => panic!("expected sql success, got {:?}", other),
    }
}

/// **Scenario**: SQL that matches nothing is reported as no data.
#[tokio::test]
async fn sql_question_with_empty_result() {
    let dir = data_dir();
    let (wf, _) = workflow(
        dir.path(),
        None,
        vec!["SELECT * FROM data WHERE region = 'north'"],
    );
    let response = wf.process_query("select north records").await.unwrap();
    assert_eq!(
        response.result,
        QueryResult::Sql(SqlResult::error("No data returned from the query"))
    );
}

/// **Scenario**: Invalid generated SQL becomes an error record carrying the database message.
#[tokio::test]
async fn sql_question_with_invalid_sql() {
    let dir = data_dir();
    let (wf, _) = workflow(dir.path(), None, vec!["SELECT nope FROM data"]);
    let response = wf.process_query("select nope").await.unwrap();
    match response.result {
        QueryResult::Sql(SqlResult::Error { message }) => {
            assert!(message.starts_with("Error processing query: "), "{}", message);
            assert!(message.contains("nope"), "{}", message);
        }
        other => panic!("expected sql error, got {:?}", other),
    }
}

/// **Scenario**: Chart question goes through routing, wrangling and visualization steps.
#[tokio::test]
async fn chart_question_returns_figure() {
    let dir = data_dir();
    let figure = json!({"data": [{"type": "bar", "x": ["east", "west"], "y": [17, 5]}]});
    let routing = json!({
        "user_instructions_data_wrangling": "total amount per region",
        "user_instructions_data_visualization": "bar chart of totals",
        "routing_preprocessor_decision": "chart"
    })
    .to_string();
    let figure_text = figure.to_string();
    let (wf, llm) = workflow(
        dir.path(),
        None,
        vec![
            routing.as_str(),
            "SELECT region, SUM(amount) AS total FROM data GROUP BY region",
            figure_text.as_str(),
        ],
    );

    let response = wf.process_query("plot a bar chart of amount by region").await.unwrap();
    assert_eq!(response.agent_used, AgentKind::DataAnalyst);
    assert_eq!(llm.calls().len(), 3);
    assert_eq!(
        response.result,
        QueryResult::Analysis(AnalysisResult::Chart { data: figure })
    );
}

/// **Scenario**: Table decision skips visualization and returns the wrangled rows.
#[tokio::test]
async fn table_question_returns_rows() {
    let dir = data_dir();
    let routing = json!({
        "user_instructions_data_wrangling": "rows for east",
        "user_instructions_data_visualization": "",
        "routing_preprocessor_decision": "table"
    })
    .to_string();
    let (wf, llm) = workflow(
        dir.path(),
        None,
        vec![routing.as_str(), "SELECT month, amount FROM data WHERE region = 'east'"],
    );

    let response = wf.process_query("analyze the east trend").await.unwrap();
    assert_eq!(llm.calls().len(), 2);
    assert_eq!(
        serde_json::to_value(&response.result).unwrap(),
        json!({"type": "table", "data": [{"month": 1, "amount": 10}, {"month": 2, "amount": 7}]})
    );
}
