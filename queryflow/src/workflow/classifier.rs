//! Keyword classifier that picks the branch for a query.

/// Keywords that suggest SQL operations.
pub const SQL_KEYWORDS: &[&str] = &[
    "sql",
    "query",
    "table",
    "database",
    "select",
    "join",
    "where",
    "group by",
    "order by",
    "having",
    "count",
    "sum",
    "average",
    "filter",
    "find records",
    "search records",
];

/// Keywords that suggest analysis or visualization.
pub const DATA_KEYWORDS: &[&str] = &[
    "analyze",
    "chart",
    "graph",
    "plot",
    "visualization",
    "trend",
    "pattern",
    "correlation",
    "distribution",
    "histogram",
    "scatter plot",
    "bar chart",
    "pie chart",
    "dashboard",
];

/// Branch chosen by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    UseSqlAgent,
    UseDataAgent,
}

impl Route {
    /// Node id of the branch, also used as snapshot metadata.
    pub fn node_id(&self) -> &'static str {
        match self {
            Route::UseSqlAgent => "use_sql_agent",
            Route::UseDataAgent => "use_data_agent",
        }
    }
}

/// Keyword scores for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scores {
    pub sql: usize,
    pub data: usize,
}

/// Scores a query against both keyword lists.
///
/// Matching is case-insensitive substring containment; each keyword counts once no matter
/// how often it occurs. SQL wins only on a strictly higher score, ties go to analysis.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryClassifier;

impl QueryClassifier {
    pub fn scores(&self, query: &str) -> Scores {
        let query = query.to_lowercase();
        let count = |keywords: &[&str]| keywords.iter().filter(|k| query.contains(*k)).count();
        Scores {
            sql: count(SQL_KEYWORDS),
            data: count(DATA_KEYWORDS),
        }
    }

    pub fn classify(&self, query: &str) -> Route {
        let scores = self.scores(query);
        if scores.sql > scores.data {
            Route::UseSqlAgent
        } else {
            Route::UseDataAgent
        }
    }
}
