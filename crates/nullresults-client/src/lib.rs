#![forbid(unsafe_code)]
//! Client flows over the experiment store endpoint.
//!
//! Each flow is an async fn whose awaited result is pattern-matched into an
//! explicit tagged view state; rendering matches those states exhaustively.
//! No flow coordinates with another, and nothing here retries.

mod api_client;
mod flows;
mod render;

pub use api_client::{ClientError, ExperimentForm, ExperimentsClient};
pub use flows::{run_detail_flow, run_list_flow, run_submit_flow, DetailState, ListState, SubmitState};
pub use render::{render_detail, render_list, render_submit};

pub const CRATE_NAME: &str = "nullresults-client";
