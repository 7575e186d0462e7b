use std::sync::Arc;

use axum::{
    extract::Path,
    handler::Handler,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    middleware::{auth, AuthUser},
    models::{
        posts::{PostDto, UpdatePost},
        response::MessageResponse,
    },
    AppState, Result,
};

pub fn posts_handler() -> Router {
    Router::new()
        .route(
            "/",
            get(find_all).post(create.layer(middleware::from_fn(auth))),
        )
        .route(
            "/{id}",
            get(find_one)
                .put(update.layer(middleware::from_fn(auth)))
                .delete(remove.layer(middleware::from_fn(auth))),
        )
}

async fn create(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(post): Json<PostDto>,
) -> Result<impl IntoResponse> {
    post.validate()?;

    let post = app_state
        .posts_service
        .create(post, caller.user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

async fn find_all(Extension(app_state): Extension<Arc<AppState>>) -> Result<impl IntoResponse> {
    let posts = app_state.posts_service.find_all().await?;
    Ok((StatusCode::OK, Json(posts)))
}

// A missing post is answered with `null`, not 404.
async fn find_one(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let post = app_state.posts_service.find_one(id).await?;
    Ok((StatusCode::OK, Json(post)))
}

async fn update(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(changes): Json<UpdatePost>,
) -> Result<impl IntoResponse> {
    changes.validate()?;

    app_state
        .posts_service
        .update(id, changes, caller.user.id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Successfully updated")),
    ))
}

async fn remove(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    app_state.posts_service.delete(id, caller.user.id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Successfully deleted")),
    ))
}
