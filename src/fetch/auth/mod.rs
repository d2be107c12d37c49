//! Credential-injecting [`HttpClient`](super::HttpClient) wrappers.

mod api_key;
mod basic_auth;
mod url_param;

pub use api_key::ApiKey;
pub use basic_auth::BasicAuth;
pub use url_param::UrlParam;
