//! Outbound HTTP plumbing shared by every upstream client.
//!
//! Clients are composed: a [`BasicClient`] does the I/O and the wrappers in
//! [`auth`] decorate each request with credentials before handing it down.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use bytes::Bytes;
use serde::de::DeserializeOwned;

/// Sends `req` and returns the body, treating any non-2xx status as an error.
pub async fn execute<C: HttpClient + ?Sized>(client: &C, req: reqwest::Request) -> Result<Bytes> {
    let url = req.url().clone();
    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("request to {} failed", url.path()))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!(
            "upstream {} returned status {}: {}",
            url.path(),
            status,
            body
        ));
    }

    Ok(resp.bytes().await?)
}

/// Issues a GET to `url` and returns the raw body.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Bytes> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);
    execute(client, req).await
}

/// Issues a GET to `url` and decodes the body as JSON.
pub async fn fetch_json<C, T>(client: &C, url: &str) -> Result<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let bytes = fetch_bytes(client, url).await?;
    serde_json::from_slice(&bytes).with_context(|| format!("invalid JSON from {url}"))
}

/// Sends a prepared request and decodes the body as JSON.
pub async fn execute_json<C, T>(client: &C, req: reqwest::Request) -> Result<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let path = req.url().path().to_string();
    let bytes = execute(client, req).await?;
    serde_json::from_slice(&bytes).with_context(|| format!("invalid JSON from {path}"))
}
