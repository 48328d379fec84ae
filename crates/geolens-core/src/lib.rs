//! Shared data model and configuration for geolens.
//!
//! Everything the visibility engine consumes (runs, query results, snapshots,
//! mentions) is defined here as plain serializable records, along with the
//! projects file and env-driven application config.

mod app_config;
mod config;
mod error;
mod projects;
mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use projects::{load_projects, parse_projects, ProjectConfig, ProjectsFile};
pub use types::{
    brand_key, AnalysisRun, Citation, Mention, ProjectSnapshot, QueryOutcome, QueryResult,
    RawMention, Sentiment,
};
