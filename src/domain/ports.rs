use crate::domain::model::{PlayerPages, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 抓取頁面的能力：給 URL，回傳 HTML 文字
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn team(&self) -> &str;
    fn season(&self) -> u16;
    fn players(&self) -> &[String];
    fn player_paths(&self) -> HashMap<String, String>;
    fn roster_table(&self) -> &str;
    fn basic_table(&self) -> &str;
    fn advanced_table(&self) -> &str;
    fn basic_stats(&self) -> &[String];
    fn advanced_stats(&self) -> &[String];
    fn advanced_enabled(&self) -> bool;
    fn presence_key(&self) -> &str;
    fn location_column(&self) -> &str;
    fn summary_stats(&self) -> &[String];
    fn concurrent_requests(&self) -> usize;
    fn sequential(&self) -> bool;
    fn timeout_seconds(&self) -> u64;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];

    /// 實際使用的並發數；sequential 模式固定為 1
    fn effective_concurrency(&self) -> usize {
        if self.sequential() {
            1
        } else {
            self.concurrent_requests().max(1)
        }
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<PlayerPages>>;
    async fn transform(&self, pages: Vec<PlayerPages>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
