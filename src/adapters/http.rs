use crate::domain::ports::PageFetcher;
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("gamelog-scraper/", env!("CARGO_PKG_VERSION"));

/// reqwest 實作的頁面抓取
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        tracing::debug!("Fetching page: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Response status {} for {}", status, url);

        if !status.is_success() {
            return Err(ScrapeError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_page_success() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/teams/LAL/2024.html");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<html><body>roster</body></html>");
        });

        let fetcher = HttpFetcher::new(5).unwrap();
        let body = fetcher
            .fetch_page(&server.url("/teams/LAL/2024.html"))
            .await
            .unwrap();

        page_mock.assert();
        assert!(body.contains("roster"));
    }

    #[tokio::test]
    async fn test_fetch_page_error_status() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let fetcher = HttpFetcher::new(5).unwrap();
        let err = fetcher.fetch_page(&server.url("/missing")).await.unwrap_err();

        page_mock.assert();
        assert!(matches!(err, ScrapeError::HttpStatusError { status: 404, .. }));
    }
}
