use crate::core::aligner::{align, AlignOptions};
use crate::core::report::{self, PlayerSummary};
use crate::core::roster::{self, Roster};
use crate::core::{extract, merge};
use crate::domain::model::{
    DataIssue, FailureStage, PartialColumn, PlayerFailure, PlayerFetchResult, PlayerIdentity,
    PlayerPages, RawColumnSet, StatPage, TransformResult,
};
use crate::domain::ports::{ConfigProvider, PageFetcher, Pipeline, Storage};
use crate::utils::error::{Result, ScrapeError};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// 球隊名單 -> 球員 game log -> 對齊 -> 報表
pub struct GameLogPipeline<S: Storage, C: ConfigProvider, F: PageFetcher> {
    storage: S,
    config: C,
    fetcher: F,
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    generated_at: String,
    team: &'a str,
    season: u16,
    players_requested: usize,
    players_succeeded: usize,
    players_failed: usize,
    summaries: Vec<PlayerSummary>,
}

fn partial_issues(page: StatPage, partial: &[PartialColumn]) -> Vec<DataIssue> {
    partial
        .iter()
        .map(|p| DataIssue::PartialColumn {
            page,
            column: p.column.clone(),
            expected: p.expected,
            actual: p.actual,
        })
        .collect()
}

impl<S: Storage, C: ConfigProvider, F: PageFetcher> GameLogPipeline<S, C, F> {
    pub fn new(storage: S, config: C, fetcher: F) -> Self {
        Self {
            storage,
            config,
            fetcher,
        }
    }

    fn align_options(&self) -> AlignOptions {
        AlignOptions::new(
            self.config.presence_key(),
            Some(self.config.location_column().to_string()),
        )
    }

    pub fn bundle_name(&self) -> String {
        format!(
            "gamelogs_{}_{}.zip",
            self.config.team().to_uppercase(),
            self.config.season()
        )
    }

    async fn fetch_roster(&self) -> Result<Roster> {
        let url = roster::roster_url(self.config.base_url(), self.config.team(), self.config.season());
        tracing::info!("📋 Fetching roster: {}", url);
        let html = self.fetcher.fetch_page(&url).await?;
        let entries = extract::roster_entries(&html, &url, self.config.roster_table())?;
        Ok(Roster::new(self.config.team().to_uppercase(), entries))
    }

    /// 手動指定路徑的球員不需要名單頁；名單頁失敗只影響需要它的球員
    async fn resolve_players(&self) -> Vec<(String, Result<PlayerIdentity>)> {
        let overrides = self.config.player_paths();
        let team = self.config.team().to_uppercase();

        let needs_roster = self
            .config
            .players()
            .iter()
            .any(|name| roster::path_override(&overrides, name, &team).is_none());

        let roster = if needs_roster {
            match self.fetch_roster().await {
                Ok(roster) => {
                    tracing::info!("✅ Roster for {} has {} players", team, roster.len());
                    Ok(roster)
                }
                Err(e) => {
                    tracing::error!("❌ Roster lookup failed: {}", e);
                    Err(e.to_string())
                }
            }
        } else {
            tracing::info!("⏭️ All players have path overrides, skipping roster page");
            Ok(Roster::default())
        };

        self.config
            .players()
            .iter()
            .map(|name| {
                let identity = match roster::path_override(&overrides, name, &team) {
                    Some(identity) => Ok(identity),
                    None => match &roster {
                        Ok(roster) => roster.find(name),
                        Err(message) => Err(ScrapeError::ExtractionError {
                            url: roster::roster_url(
                                self.config.base_url(),
                                &team,
                                self.config.season(),
                            ),
                            message: message.clone(),
                        }),
                    },
                };
                (name.clone(), identity)
            })
            .collect()
    }

    async fn fetch_columns(&self, url: &str, table_id: &str, stats: &[String]) -> Result<RawColumnSet> {
        let html = self.fetcher.fetch_page(url).await?;
        extract::stat_columns(&html, url, table_id, stats)
    }

    /// 同一位球員先抓基本數據，再抓進階數據
    async fn fetch_player(&self, name: String, identity: Result<PlayerIdentity>) -> PlayerPages {
        let player = match identity {
            Ok(player) => player,
            Err(e) => {
                return PlayerPages {
                    name,
                    player: Err(e),
                    basic: None,
                    advanced: None,
                }
            }
        };

        let base_url = self.config.base_url();
        let season = self.config.season();

        let basic_url = roster::gamelog_url(base_url, &player.path, season);
        tracing::info!("📥 {}: fetching basic game log", player.name);
        let basic = self
            .fetch_columns(&basic_url, self.config.basic_table(), self.config.basic_stats())
            .await;

        let advanced = if self.config.advanced_enabled() && basic.is_ok() {
            let advanced_url = roster::advanced_gamelog_url(base_url, &player.path, season);
            tracing::info!("📥 {}: fetching advanced game log", player.name);
            Some(
                self.fetch_columns(
                    &advanced_url,
                    self.config.advanced_table(),
                    self.config.advanced_stats(),
                )
                .await,
            )
        } else {
            None
        };

        PlayerPages {
            name,
            player: Ok(player),
            basic: Some(basic),
            advanced,
        }
    }

    /// 單一球員的對齊；失敗以 PlayerFailure 回傳，不影響其他球員
    fn align_player(&self, pages: PlayerPages) -> std::result::Result<PlayerFetchResult, PlayerFailure> {
        let failure = |stage: FailureStage, message: String| PlayerFailure {
            player: pages.name.clone(),
            stage,
            message,
        };

        let player = pages
            .player
            .map_err(|e| failure(FailureStage::Roster, e.to_string()))?;

        let basic_columns = match pages.basic {
            Some(Ok(columns)) => columns,
            Some(Err(e)) => return Err(failure(FailureStage::Fetch, e.to_string())),
            None => {
                return Err(failure(
                    FailureStage::Fetch,
                    "basic game log was not fetched".to_string(),
                ))
            }
        };

        let options = self.align_options();
        let basic = align(&basic_columns, &options).map_err(|e| failure(FailureStage::Align, e.to_string()))?;
        let mut issues = partial_issues(StatPage::Basic, &basic.partial);

        let advanced = match pages.advanced {
            None => Vec::new(),
            Some(Err(e)) => {
                tracing::warn!("⚠️ {}: advanced stats unavailable: {}", player.name, e);
                issues.push(DataIssue::AdvancedUnavailable {
                    reason: e.to_string(),
                });
                Vec::new()
            }
            Some(Ok(columns)) => match align(&columns, &options) {
                Ok(alignment) => {
                    issues.extend(partial_issues(StatPage::Advanced, &alignment.partial));
                    if let Some(drift) = merge::detect_drift(&basic.records, &alignment.records) {
                        tracing::warn!(
                            "⚠️ {}: advanced game log does not line up with basic game log: {:?}",
                            player.name,
                            drift
                        );
                        issues.push(drift);
                    }
                    alignment.records
                }
                Err(e) => {
                    tracing::warn!("⚠️ {}: advanced stats could not be aligned: {}", player.name, e);
                    issues.push(DataIssue::AdvancedUnavailable {
                        reason: e.to_string(),
                    });
                    Vec::new()
                }
            },
        };

        Ok(PlayerFetchResult {
            player,
            basic: basic.records,
            advanced,
            issues,
        })
    }

    fn summaries(&self, players: &[PlayerFetchResult]) -> Vec<PlayerSummary> {
        players
            .iter()
            .map(|player| report::summarize(player, self.config.summary_stats()))
            .collect()
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: PageFetcher> Pipeline for GameLogPipeline<S, C, F> {
    async fn extract(&self) -> Result<Vec<PlayerPages>> {
        let concurrency = self.config.effective_concurrency();
        tracing::info!(
            "🚀 Extracting game logs for {} players ({} {}, concurrency {})",
            self.config.players().len(),
            self.config.team().to_uppercase(),
            self.config.season(),
            concurrency
        );

        let identities = self.resolve_players().await;

        // buffered 保留原本的球員順序
        let pages: Vec<PlayerPages> = stream::iter(identities)
            .map(|(name, identity)| self.fetch_player(name, identity))
            .buffered(concurrency)
            .collect()
            .await;

        Ok(pages)
    }

    async fn transform(&self, pages: Vec<PlayerPages>) -> Result<TransformResult> {
        tracing::info!("🔧 Aligning game logs for {} players", pages.len());

        let mut players = Vec::new();
        let mut failures = Vec::new();

        for page in pages {
            match self.align_player(page) {
                Ok(result) => {
                    tracing::info!(
                        "✅ {}: {} games ({} advanced), {} issues",
                        result.player.name,
                        result.basic.len(),
                        result.advanced.len(),
                        result.issues.len()
                    );
                    players.push(result);
                }
                Err(failure) => {
                    tracing::error!(
                        "❌ {} failed at {:?}: {}",
                        failure.player,
                        failure.stage,
                        failure.message
                    );
                    failures.push(failure);
                }
            }
        }

        Ok(TransformResult {
            csv_output: report::render_csv(&players)?,
            tsv_output: report::render_tsv(&players)?,
            players,
            failures,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let bundle_name = self.bundle_name();
        let output_path = format!("{}/{}", self.config.output_path(), bundle_name);
        tracing::info!("💾 Writing bundle {}", bundle_name);

        let summary = RunSummary {
            generated_at: chrono::Utc::now().to_rfc3339(),
            team: self.config.team(),
            season: self.config.season(),
            players_requested: self.config.players().len(),
            players_succeeded: result.players.len(),
            players_failed: result.failures.len(),
            summaries: self.summaries(&result.players),
        };

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            if self.wants("csv") {
                zip.start_file::<_, ()>("gamelogs.csv", FileOptions::default())?;
                zip.write_all(result.csv_output.as_bytes())?;
            }

            if self.wants("tsv") {
                zip.start_file::<_, ()>("gamelogs.tsv", FileOptions::default())?;
                zip.write_all(result.tsv_output.as_bytes())?;
            }

            if self.wants("json") {
                zip.start_file::<_, ()>("players.json", FileOptions::default())?;
                let json_data = serde_json::to_string_pretty(&result.players)?;
                zip.write_all(json_data.as_bytes())?;
            }

            if !result.failures.is_empty() {
                zip.start_file::<_, ()>("failures.json", FileOptions::default())?;
                let json_data = serde_json::to_string_pretty(&result.failures)?;
                zip.write_all(json_data.as_bytes())?;
            }

            zip.start_file::<_, ()>("summary.json", FileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&summary)?.as_bytes())?;

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing bundle ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&bundle_name, &zip_data).await?;

        tracing::info!("📦 Bundle saved: {}", output_path);
        Ok(output_path)
    }
}
