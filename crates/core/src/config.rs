use crate::models::DEFAULT_PAGE_SIZE;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8002";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub browse_stale_after: Duration,
    pub search_stale_after: Duration,
    pub catalog_stale_after: Duration,
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browse_stale_after: Duration::from_secs(30),
            search_stale_after: Duration::from_secs(15),
            catalog_stale_after: Duration::from_secs(60),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
