use super::client::HttpClient;
use async_trait::async_trait;
use std::time::Duration;

/// Upper bound for downloading one dataset document.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Plain `reqwest` client with a download timeout and a crate user agent.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await?.error_for_status()
    }
}
