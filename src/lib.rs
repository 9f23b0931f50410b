pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use adapters::http::HttpFetcher;
pub use core::{
    aligner::{align, AlignOptions},
    etl::EtlEngine,
    pipeline::GameLogPipeline,
};
pub use domain::model::{AlignedRecord, Location, RawColumnSet, StatValue};
pub use utils::error::{Result, ScrapeError};
