// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::CrawlerConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Pause between requests; a zero delay does not yield.
pub async fn polite_delay(delay_ms: u64) {
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_async_client() {
        assert!(create_async_client(&CrawlerConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_zero_delay_returns_immediately() {
        let start = std::time::Instant::now();
        polite_delay(0).await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
