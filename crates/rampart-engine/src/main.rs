//! CLI entry point for the rampart-engine risk calculator.
//!
//! Designed for subprocess invocation from an orchestration layer:
//! reads a JSON request from stdin, writes a JSON result to stdout.
//! Logs go to stderr so stdout stays machine-readable.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use rampart_core::EngineSettings;
use rampart_engine::types::EvaluationRequest;
use rampart_engine::{paths, plan, RiskEngine};
use rampart_graph::{build_attack_graph, INTERNET_ID};

#[derive(Parser)]
#[command(name = "rampart-engine")]
#[command(about = "Attack-graph risk engine: breach paths, risk score, remediation plan")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: rampart).
    #[arg(short, long, default_value = "rampart", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one scenario end-to-end (reads a JSON request from stdin).
    Evaluate,
    /// Evaluate many independent scenarios concurrently (reads a JSON array).
    Batch,
    /// Enumerate attack paths from the internet to a specific node.
    Paths {
        /// Target node id (e.g. "Asset:db-1" or "Service:http-1").
        #[arg(long)]
        target: String,
        /// Number of paths to enumerate.
        #[arg(long)]
        k: Option<usize>,
    },
    /// Generate a remediation plan without the full report.
    Plan {
        /// Remediation budget.
        #[arg(long)]
        max_actions: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let settings = EngineSettings::load(&cli.config)?;

    match cli.command {
        Command::Evaluate => {
            let request: EvaluationRequest = read_request()?;
            let report = RiskEngine::new(settings).evaluate(&request)?;
            println!("{}", serde_json::to_string(&report)?);
        }
        Command::Batch => {
            let requests: Vec<EvaluationRequest> = read_request()?;

            // Scenario evaluations are independent and share no graph state;
            // each gets its own blocking task.
            let mut handles = Vec::with_capacity(requests.len());
            for request in requests {
                let engine = RiskEngine::new(settings.clone());
                handles.push(tokio::task::spawn_blocking(move || engine.evaluate(&request)));
            }

            let mut reports = Vec::with_capacity(handles.len());
            for handle in handles {
                reports.push(handle.await??);
            }
            println!("{}", serde_json::to_string(&reports)?);
        }
        Command::Paths { target, k } => {
            let request: EvaluationRequest = read_request()?;
            let graph = build_attack_graph(
                &request.assets,
                &request.services,
                &request.findings,
                &request.actions,
            )?;
            let found = paths::k_shortest_paths(
                &graph,
                INTERNET_ID,
                &target,
                k.unwrap_or(settings.default_k),
            );
            println!("{}", serde_json::to_string(&found)?);
        }
        Command::Plan { max_actions } => {
            let request: EvaluationRequest = read_request()?;
            let graph = build_attack_graph(
                &request.assets,
                &request.services,
                &request.findings,
                &request.actions,
            )?;

            let mut all_paths = Vec::new();
            for target in graph.crown_jewel_ids() {
                all_paths.extend(paths::k_shortest_paths(
                    &graph,
                    INTERNET_ID,
                    &target,
                    settings.default_k,
                ));
            }

            let selected = plan::plan(
                &all_paths,
                &request.actions,
                max_actions.unwrap_or(settings.default_max_actions),
            );
            println!("{}", serde_json::to_string(&selected)?);
        }
    }

    Ok(())
}

fn read_request<T: serde::de::DeserializeOwned>() -> anyhow::Result<T> {
    let input = std::io::read_to_string(std::io::stdin())?;
    Ok(serde_json::from_str(&input)?)
}
