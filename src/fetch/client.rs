use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport used to download a dataset published over HTTP.
///
/// Kept as a trait so callers can wrap the client (for headers, retries or
/// test doubles) without touching the loader.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
