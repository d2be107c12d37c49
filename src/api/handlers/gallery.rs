use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::api::extract::Query;
use crate::directory::{Photo, photos_in_album};

#[derive(Debug, Deserialize)]
pub struct GalleryParams {
    pub album: Option<String>,
}

/// GET /api/gallery
pub async fn gallery_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<GalleryParams>,
) -> Json<Vec<Photo>> {
    let album = params.album.as_deref().map(str::trim).filter(|a| !a.is_empty());
    Json(
        photos_in_album(&state.gallery, album)
            .into_iter()
            .cloned()
            .collect(),
    )
}
