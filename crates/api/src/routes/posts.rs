//! Blog content endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use content::{Post, PostSummary};
use telemetry::metrics;

use crate::response::ApiError;
use crate::state::AppState;

/// GET /api/posts - All posts, newest first.
pub async fn list_handler(State(state): State<AppState>) -> Json<Vec<PostSummary>> {
    let posts = state.posts.list().await;
    Json(posts.as_ref().clone())
}

/// GET /api/posts/:slug - One post with rendered HTML.
pub async fn post_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, ApiError> {
    match state.posts.get(&slug).await? {
        Some(post) => {
            metrics().posts_served.inc();
            Ok(Json(post.as_ref().clone()))
        }
        None => Err(ApiError::not_found("POST_404", "Post not found")),
    }
}
