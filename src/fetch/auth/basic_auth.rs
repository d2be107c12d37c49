use crate::fetch::client::HttpClient;
use anyhow::Result;
use async_trait::async_trait;

/// An [`HttpClient`] wrapper that adds HTTP basic credentials.
///
/// Acuity's authenticated API uses the account's user id as the username and
/// its API key as the password.
pub struct BasicAuth<C> {
    inner: C,
    username: String,
    password: String,
    builder: reqwest::Client,
}

impl<C> BasicAuth<C> {
    /// `builder` only lends `RequestBuilder::basic_auth`; requests are still
    /// sent through `inner`.
    pub fn new(inner: C, username: String, password: String) -> Result<Self> {
        let builder = reqwest::Client::builder().build()?;
        Ok(Self {
            inner,
            username,
            password,
            builder,
        })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for BasicAuth<C> {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let req = reqwest::RequestBuilder::from_parts(self.builder.clone(), req)
            .basic_auth(&self.username, Some(&self.password))
            .build()?;
        self.inner.execute(req).await
    }
}
