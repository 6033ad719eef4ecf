#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use nullresults_client::{
    run_detail_flow, run_list_flow, run_submit_flow, render_detail, render_list, render_submit,
    ExperimentForm, ExperimentsClient,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nullresults")]
#[command(about = "Browse and submit failed-experiment write-ups")]
struct Cli {
    /// Base URL of the nullresults server.
    #[arg(long, global = true, default_value = "http://127.0.0.1:8080")]
    base_url: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the most recent experiments.
    Browse,
    /// Show one experiment in full.
    Show {
        /// Experiment identifier as it appears in the list.
        id: String,
    },
    /// Submit a new failed experiment.
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        summary: String,
        #[arg(long)]
        what_tried: String,
        #[arg(long)]
        what_went_wrong: String,
        #[arg(long)]
        what_learned: String,
        /// Comma-separated labels, e.g. "ml, hardware".
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value = "")]
        author_name: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let client = ExperimentsClient::new(&cli.base_url);

    match cli.command {
        Commands::Browse => {
            let state = run_list_flow(&client).await;
            println!("{}", render_list(&state));
            exit_for_failure(matches!(
                state,
                nullresults_client::ListState::Failed { .. }
            ))
        }
        Commands::Show { id } => {
            let state = run_detail_flow(&client, &id).await;
            println!("{}", render_detail(&state));
            exit_for_failure(matches!(
                state,
                nullresults_client::DetailState::Failed { .. }
                    | nullresults_client::DetailState::NotFound
            ))
        }
        Commands::Submit {
            title,
            summary,
            what_tried,
            what_went_wrong,
            what_learned,
            tags,
            author_name,
        } => {
            let form = ExperimentForm {
                title,
                summary,
                what_tried,
                what_went_wrong,
                what_learned,
                tags,
                author_name,
            };
            let state = run_submit_flow(&client, form).await;
            println!("{}", render_submit(&state));
            exit_for_failure(matches!(
                state,
                nullresults_client::SubmitState::Error { .. }
            ))
        }
    }
}

fn exit_for_failure(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
