use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting scrape run...");
        self.monitor.log_stats("Start");

        // Extract
        let pages = self.pipeline.extract().await?;
        tracing::info!("Fetched pages for {} players", pages.len());
        self.monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(pages).await?;
        tracing::info!(
            "Aligned {} players, {} failed",
            result.players.len(),
            result.failures.len()
        );
        for failure in &result.failures {
            tracing::warn!("Player '{}' skipped: {}", failure.player, failure.message);
        }
        self.monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
