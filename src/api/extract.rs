use axum::extract::FromRequestParts;

use crate::api::ApiError;

/// `axum::extract::Query` whose rejection is an [`ApiError`], so a query
/// string that fails to deserialize still gets a JSON error body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);
