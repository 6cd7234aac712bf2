pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod geojson;
pub mod infra;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod types;

pub use config::Config;
pub use error::{AliasError, Result};
pub use normalize::normalize_name;
pub use pipeline::{Pipeline, PipelineResult};
pub use types::{Context, Neighborhood};
