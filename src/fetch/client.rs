use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes HTTP requests for the dataset loader. Tests substitute their own
/// implementation to serve canned payloads.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
