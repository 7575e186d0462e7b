use std::sync::Arc;

use axum::{extract::Request, http::header, middleware::Next, response::IntoResponse};
use axum_extra::extract::CookieJar;

use crate::{models::users::PublicUser, AppState, Error, Result};

/// The authenticated caller, inserted into request extensions by [`auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: PublicUser,
}

pub async fn auth(mut req: Request, next: Next) -> Result<impl IntoResponse> {
    let app_state = req
        .extensions()
        .get::<Arc<AppState>>()
        .cloned()
        .ok_or(Error::Unauthorized)?;

    let cookies = CookieJar::from_headers(req.headers());

    let token = cookies
        .get("token")
        .map(|c| c.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    auth_value
                        .strip_prefix("Bearer ")
                        .map(|stripped| stripped.to_string())
                })
        })
        .ok_or(Error::Unauthorized)?;

    let user_id = app_state.users_service.decode_token(token)?;

    let user = app_state
        .users_service
        .get_user(user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id, "Token refers to an unknown user");
            Error::Unauthorized
        })?;

    req.extensions_mut().insert(AuthUser { user });

    Ok(next.run(req).await)
}
