use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared request. Every outbound call to the record store or
/// the mail service goes through this trait, so tests can swap in a fake.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

#[async_trait]
impl<'a, C: HttpClient + ?Sized> HttpClient for &'a C {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        (**self).execute(req).await
    }
}
