#![forbid(unsafe_code)]
//! nullresults model SSOT.
//!
//! One entity, one lifecycle: an experiment write-up is created once and
//! read forever after. Everything the wire, the store, and the views agree
//! on lives here.

mod experiment;
mod presentation;

pub use experiment::{
    parse_experiment_id, Experiment, ExperimentSummary, NewExperiment, ValidationError,
    REQUIRED_FIELDS,
};
pub use presentation::{display_author, format_created_at, parse_tags};

pub const CRATE_NAME: &str = "nullresults-model";
