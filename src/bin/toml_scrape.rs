use clap::Parser;
use gamelog_scraper::core::roster;
use gamelog_scraper::domain::ports::ConfigProvider;
use gamelog_scraper::utils::error::ErrorSeverity;
use gamelog_scraper::utils::{logger, validation::Validate};
use gamelog_scraper::{EtlEngine, GameLogPipeline, HttpFetcher, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-scrape")]
#[command(about = "Game log scraper driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "scrape.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override sequential setting from config
    #[arg(long)]
    sequential: Option<bool>,

    /// Show which pages would be fetched without fetching them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based game log scraper");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(sequential) = args.sequential {
        config.extract.sequential = sequential;
        tracing::info!("🔧 Sequential mode overridden to: {}", sequential);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No pages will be fetched");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let fetcher = HttpFetcher::new(config.timeout_seconds())?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = GameLogPipeline::new(storage, config, fetcher);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Scrape completed successfully!");
            println!("✅ Scrape completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Scrape failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Site: {}", config.base_url());
    println!("  Team: {} ({})", config.team().to_uppercase(), config.season());
    println!("  Players: {}", config.players().join(", "));
    println!("  Basic stats: {}", config.basic_stats().join(", "));
    if config.advanced_enabled() {
        println!("  Advanced stats: {}", config.advanced_stats().join(", "));
    } else {
        println!("  Advanced stats: disabled");
    }
    println!("  Concurrency: {}", config.effective_concurrency());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    let overrides = config.player_paths();
    let team = config.team().to_uppercase();
    let needs_roster = config
        .players()
        .iter()
        .any(|name| roster::path_override(&overrides, name, &team).is_none());

    println!("📡 Pages:");
    if needs_roster {
        println!(
            "  Roster: {}",
            roster::roster_url(config.base_url(), &team, config.season())
        );
    }

    for name in config.players() {
        match roster::path_override(&overrides, name, &team) {
            Some(player) => {
                println!(
                    "  {}: {}",
                    name,
                    roster::gamelog_url(config.base_url(), &player.path, config.season())
                );
                if config.advanced_enabled() {
                    println!(
                        "  {}: {}",
                        name,
                        roster::advanced_gamelog_url(config.base_url(), &player.path, config.season())
                    );
                }
            }
            None => println!("  {}: resolved from roster table '{}'", name, config.roster_table()),
        }
    }

    println!();
    println!("✅ Dry run analysis complete.");
}
