//! `queryflow` binary: parse the query from the command line, route it, print the response JSON.

use std::path::PathBuf;

use clap::Parser;
use queryflow_cli::{run_with_options, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "queryflow")]
#[command(about = "Route an analytics question to the SQL or data-analysis agent")]
struct Args {
    /// Query text (can also be given as positional arguments)
    #[arg(short, long, value_name = "TEXT")]
    query: Option<String>,

    /// Directory holding exactly one CSV file (overrides DATA_DIR)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Persist state snapshots under this directory (overrides STATE_PERSIST_DIR)
    #[arg(long, value_name = "DIR")]
    persist_dir: Option<PathBuf>,

    /// Model name (overrides OPENAI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Tag snapshots with this state id
    #[arg(long)]
    state_id: Option<String>,

    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,

    /// Positional query words (when -q/--query is not used)
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

impl Args {
    fn query(&self) -> Option<String> {
        if let Some(q) = &self.query {
            return Some(q.clone());
        }
        let joined = self.rest.join(" ").trim().to_string();
        (!joined.is_empty()).then_some(joined)
    }

    fn options(&self) -> RunOptions {
        RunOptions {
            data_dir: self.data_dir.clone(),
            persist_dir: self.persist_dir.clone(),
            model: self.model.clone(),
            state_id: self.state_id.clone(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "queryflow=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let Some(query) = args.query() else {
        eprintln!("error: no query given; use -q \"<query>\"");
        std::process::exit(2);
    };

    let response = match run_with_options(&query, &args.options()).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    if response.result.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: -q takes precedence over positional words.
    #[test]
    fn query_flag_wins() {
        let args = Args::try_parse_from(["queryflow", "-q", "count rows", "ignored"]).unwrap();
        assert_eq!(args.query().as_deref(), Some("count rows"));
    }

    /// **Scenario**: Positional words are joined into the query.
    #[test]
    fn positional_words_join() {
        let args = Args::try_parse_from(["queryflow", "plot", "the", "trend"]).unwrap();
        assert_eq!(args.query().as_deref(), Some("plot the trend"));
        assert!(Args::try_parse_from(["queryflow"]).unwrap().query().is_none());
    }

    /// **Scenario**: Flags map onto run options.
    #[test]
    fn flags_map_to_options() {
        let args = Args::try_parse_from([
            "queryflow",
            "--data-dir",
            "d",
            "--persist-dir",
            "p",
            "--model",
            "m",
            "--state-id",
            "s",
            "-q",
            "x",
        ])
        .unwrap();
        let o = args.options();
        assert_eq!(o.data_dir, Some(PathBuf::from("d")));
        assert_eq!(o.persist_dir, Some(PathBuf::from("p")));
        assert_eq!(o.model.as_deref(), Some("m"));
        assert_eq!(o.state_id.as_deref(), Some("s"));
    }

    /// **Scenario**: Unknown flags are rejected.
    #[test]
    fn invalid_flag_errors() {
        assert!(Args::try_parse_from(["queryflow", "--invalid-flag-xyz"]).is_err());
    }
}
