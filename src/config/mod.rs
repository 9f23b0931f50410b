pub mod cli;
pub mod toml_config;

use crate::core::roster;
use crate::domain::ports::ConfigProvider;
use crate::domain::stats::{
    to_owned_list, DEFAULT_ADVANCED_STATS, DEFAULT_ADVANCED_TABLE, DEFAULT_BASIC_STATS,
    DEFAULT_BASIC_TABLE, DEFAULT_LOCATION_COLUMN, DEFAULT_PRESENCE_KEY, DEFAULT_ROSTER_TABLE,
    DEFAULT_SUMMARY_STATS,
};
use crate::utils::error::{Result, ScrapeError};
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_BASE_URL: &str = "https://www.basketball-reference.com";
pub const OUTPUT_FORMATS: &[&str] = &["csv", "tsv", "json"];

/// `NAME=PATH` 形式的球員路徑覆寫
pub fn parse_player_path(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{}'", raw))?;
    let (name, path) = (name.trim(), path.trim());
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=PATH, got '{}'", raw));
    }
    Ok((name.to_string(), path.to_string()))
}

/// 兩個覆寫名稱正規化後相同時，無法決定該用哪個路徑
fn validate_player_paths(overrides: &HashMap<String, String>) -> Result<()> {
    let mut names: Vec<&String> = overrides.keys().collect();
    names.sort();

    let mut seen: HashMap<String, &String> = HashMap::new();
    for name in names {
        validation::validate_non_empty_string("player_paths", &overrides[name])?;
        if let Some(previous) = seen.insert(roster::normalize_name(name), name) {
            return Err(ScrapeError::InvalidConfigValueError {
                field: "player_paths".to_string(),
                value: name.clone(),
                reason: format!("Conflicts with override for '{}'", previous),
            });
        }
    }
    Ok(())
}

/// CLI 與 TOML 共用的驗證規則
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validation::validate_url("base_url", config.base_url())?;
    validation::validate_non_empty_string("team", config.team())?;
    validation::validate_range("season", config.season(), 1947, 2100)?;
    validation::validate_name_list("players", config.players())?;
    validation::validate_stat_list("basic_stats", config.basic_stats(), config.presence_key())?;
    if config.advanced_enabled() {
        validation::validate_stat_list(
            "advanced_stats",
            config.advanced_stats(),
            config.presence_key(),
        )?;
    }
    validate_player_paths(&config.player_paths())?;
    validation::validate_positive_number("concurrent_requests", config.concurrent_requests(), 1)?;
    validation::validate_path("output_path", config.output_path())?;

    for format in config.output_formats() {
        if !OUTPUT_FORMATS.contains(&format.as_str()) {
            return Err(ScrapeError::InvalidConfigValueError {
                field: "output_formats".to_string(),
                value: format.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    OUTPUT_FORMATS.join(", ")
                ),
            });
        }
    }
    validation::validate_name_list("output_formats", config.output_formats())?;

    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "gamelog-scraper")]
#[command(about = "Pull per-game basic and advanced stats for players on a team roster")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, help = "Team abbreviation, e.g. LAL")]
    pub team: String,

    #[arg(long, help = "Season end year, e.g. 2024")]
    pub season: u16,

    #[arg(long, value_delimiter = ',', required = true)]
    pub players: Vec<String>,

    #[arg(long = "player-path", value_parser = parse_player_path, help = "Skip roster lookup: NAME=/players/x/xxxx01.html")]
    pub player_path: Vec<(String, String)>,

    #[arg(long, default_value = DEFAULT_ROSTER_TABLE)]
    pub roster_table: String,

    #[arg(long, default_value = DEFAULT_BASIC_TABLE)]
    pub basic_table: String,

    #[arg(long, default_value = DEFAULT_ADVANCED_TABLE)]
    pub advanced_table: String,

    #[arg(long, value_delimiter = ',', default_values_t = to_owned_list(DEFAULT_BASIC_STATS))]
    pub basic_stats: Vec<String>,

    #[arg(long, value_delimiter = ',', default_values_t = to_owned_list(DEFAULT_ADVANCED_STATS))]
    pub advanced_stats: Vec<String>,

    #[arg(long, help = "Skip the advanced game log page")]
    pub no_advanced: bool,

    #[arg(long, default_value = DEFAULT_PRESENCE_KEY)]
    pub presence_key: String,

    #[arg(long, default_value = DEFAULT_LOCATION_COLUMN)]
    pub location_column: String,

    #[arg(long, value_delimiter = ',', default_values_t = to_owned_list(DEFAULT_SUMMARY_STATS))]
    pub summary_stats: Vec<String>,

    #[arg(long, default_value = "3")]
    pub concurrent_requests: usize,

    #[arg(long, help = "Process players one at a time")]
    pub sequential: bool,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_values_t = to_owned_list(OUTPUT_FORMATS))]
    pub output_formats: Vec<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn team(&self) -> &str {
        &self.team
    }

    fn season(&self) -> u16 {
        self.season
    }

    fn players(&self) -> &[String] {
        &self.players
    }

    fn player_paths(&self) -> HashMap<String, String> {
        self.player_path.iter().cloned().collect()
    }

    fn roster_table(&self) -> &str {
        &self.roster_table
    }

    fn basic_table(&self) -> &str {
        &self.basic_table
    }

    fn advanced_table(&self) -> &str {
        &self.advanced_table
    }

    fn basic_stats(&self) -> &[String] {
        &self.basic_stats
    }

    fn advanced_stats(&self) -> &[String] {
        &self.advanced_stats
    }

    fn advanced_enabled(&self) -> bool {
        !self.no_advanced
    }

    fn presence_key(&self) -> &str {
        &self.presence_key
    }

    fn location_column(&self) -> &str {
        &self.location_column
    }

    fn summary_stats(&self) -> &[String] {
        &self.summary_stats
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn sequential(&self) -> bool {
        self.sequential
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)
    }
}
