#![forbid(unsafe_code)]
//! Wire contract for the experiment store endpoint: error envelope,
//! response shapes, and the OpenAPI document. Status codes are part of the
//! contract and live here, next to the codes they map from.

mod errors;
mod openapi;
mod wire;

pub use errors::{map_error_status, ApiError, ApiErrorCode};
pub use openapi::openapi_v1_spec;
pub use wire::{CreatedResponse, ExperimentListResponse, ExperimentResponse};

pub const CRATE_NAME: &str = "nullresults-api";
pub const API_VERSION: &str = "v1";
