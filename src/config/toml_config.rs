use crate::config::{validate_provider, DEFAULT_BASE_URL, OUTPUT_FORMATS};
use crate::domain::ports::ConfigProvider;
use crate::domain::stats::{
    to_owned_list, DEFAULT_ADVANCED_STATS, DEFAULT_ADVANCED_TABLE, DEFAULT_BASIC_STATS,
    DEFAULT_BASIC_TABLE, DEFAULT_LOCATION_COLUMN, DEFAULT_PRESENCE_KEY, DEFAULT_ROSTER_TABLE,
    DEFAULT_SUMMARY_STATS,
};
use crate::utils::error::{Result, ScrapeError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub team: String,
    pub season: u16,
    pub players: Vec<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default = "default_roster_table")]
    pub table_id: String,
    #[serde(default)]
    pub player_paths: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_basic_table")]
    pub basic_table: String,
    #[serde(default = "default_advanced_table")]
    pub advanced_table: String,
    #[serde(default = "default_basic_stats")]
    pub basic: Vec<String>,
    #[serde(default = "default_advanced_stats")]
    pub advanced: Vec<String>,
    #[serde(default = "default_true")]
    pub advanced_enabled: bool,
    #[serde(default = "default_presence_key")]
    pub presence_key: String,
    #[serde(default = "default_location_column")]
    pub location_column: String,
    #[serde(default = "default_summary_stats")]
    pub summary: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,
    #[serde(default)]
    pub sequential: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_roster_table() -> String {
    DEFAULT_ROSTER_TABLE.to_string()
}

fn default_basic_table() -> String {
    DEFAULT_BASIC_TABLE.to_string()
}

fn default_advanced_table() -> String {
    DEFAULT_ADVANCED_TABLE.to_string()
}

fn default_basic_stats() -> Vec<String> {
    to_owned_list(DEFAULT_BASIC_STATS)
}

fn default_advanced_stats() -> Vec<String> {
    to_owned_list(DEFAULT_ADVANCED_STATS)
}

fn default_true() -> bool {
    true
}

fn default_presence_key() -> String {
    DEFAULT_PRESENCE_KEY.to_string()
}

fn default_location_column() -> String {
    DEFAULT_LOCATION_COLUMN.to_string()
}

fn default_summary_stats() -> Vec<String> {
    to_owned_list(DEFAULT_SUMMARY_STATS)
}

fn default_concurrent_requests() -> usize {
    3
}

fn default_output_formats() -> Vec<String> {
    to_owned_list(OUTPUT_FORMATS)
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            table_id: default_roster_table(),
            player_paths: HashMap::new(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            basic_table: default_basic_table(),
            advanced_table: default_advanced_table(),
            basic: default_basic_stats(),
            advanced: default_advanced_stats(),
            advanced_enabled: true,
            presence_key: default_presence_key(),
            location_column: default_location_column(),
            summary: default_summary_stats(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: default_concurrent_requests(),
            sequential: false,
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScrapeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ScrapeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SCRAPE_TEAM})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.scrape.base_url
    }

    fn team(&self) -> &str {
        &self.scrape.team
    }

    fn season(&self) -> u16 {
        self.scrape.season
    }

    fn players(&self) -> &[String] {
        &self.scrape.players
    }

    fn player_paths(&self) -> HashMap<String, String> {
        self.roster.player_paths.clone()
    }

    fn roster_table(&self) -> &str {
        &self.roster.table_id
    }

    fn basic_table(&self) -> &str {
        &self.stats.basic_table
    }

    fn advanced_table(&self) -> &str {
        &self.stats.advanced_table
    }

    fn basic_stats(&self) -> &[String] {
        &self.stats.basic
    }

    fn advanced_stats(&self) -> &[String] {
        &self.stats.advanced
    }

    fn advanced_enabled(&self) -> bool {
        self.stats.advanced_enabled
    }

    fn presence_key(&self) -> &str {
        &self.stats.presence_key
    }

    fn location_column(&self) -> &str {
        &self.stats.location_column
    }

    fn summary_stats(&self) -> &[String] {
        &self.stats.summary
    }

    fn concurrent_requests(&self) -> usize {
        self.extract.concurrent_requests
    }

    fn sequential(&self) -> bool {
        self.extract.sequential
    }

    fn timeout_seconds(&self) -> u64 {
        self.scrape.timeout_seconds
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        validation::validate_range("scrape.timeout_seconds", self.scrape.timeout_seconds, 1, 300)?;
        for (name, path) in &self.roster.player_paths {
            validation::validate_non_empty_string(&format!("roster.player_paths.{}", name), path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[scrape]
team = "LAL"
season = 2024
players = ["LeBron James", "Anthony Davis"]

[load]
output_path = "./test-output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.team(), "LAL");
        assert_eq!(config.players().len(), 2);
        assert_eq!(config.presence_key(), "game_season");
        assert_eq!(config.basic_table(), "pgl_basic");
        assert!(config.advanced_enabled());
        assert_eq!(config.concurrent_requests(), 3);
        assert_eq!(config.output_formats(), &["csv", "tsv", "json"]);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[scrape]
base_url = "http://localhost:9000"
team = "BOS"
season = 2023
players = ["Jayson Tatum"]
timeout_seconds = 10

[roster]
table_id = "roster"

[roster.player_paths]
"Jayson Tatum" = "/players/t/tatumja01.html"

[stats]
basic = ["game_season", "pts"]
advanced_enabled = false

[extract]
sequential = true

[load]
output_path = "./out"
output_formats = ["csv"]

[monitoring]
enabled = true
json_logs = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.season(), 2023);
        assert_eq!(config.basic_stats(), &["game_season", "pts"]);
        assert!(!config.advanced_enabled());
        assert_eq!(config.effective_concurrency(), 1);
        assert_eq!(
            config.player_paths().get("Jayson Tatum").map(String::as_str),
            Some("/players/t/tatumja01.html")
        );
        assert!(config.monitoring_enabled());
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GAMELOG_TEST_TEAM", "DEN");

        let toml_content = r#"
[scrape]
team = "${GAMELOG_TEST_TEAM}"
season = 2024
players = ["Nikola Jokic"]

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.team(), "DEN");

        std::env::remove_var("GAMELOG_TEST_TEAM");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[scrape]
base_url = "invalid-url"
team = "LAL"
season = 2024
players = ["LeBron James"]

[load]
output_path = "./output"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[scrape]
team = "LAL"
season = 2024
players = []

[load]
output_path = "./output"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[scrape]
team = "LAL"
season = 2024
players = ["LeBron James"]

[extract]
concurrent_requests = 0

[load]
output_path = "./output"
output_formats = ["xlsx"]
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[scrape\nteam =").unwrap_err();
        assert!(matches!(err, ScrapeError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[scrape]
team = "GSW"
season = 2024
players = ["Stephen Curry"]

[load]
output_path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.team(), "GSW");
    }
}
