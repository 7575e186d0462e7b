use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{models::users::PublicUser, repositories::user_repo::UserRepository, Error, Result};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    jwt_secret: String,
    jwt_maxage: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: usize,
    exp: usize,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, jwt_secret: String, jwt_maxage: i64) -> Self {
        Self {
            repo,
            jwt_secret,
            jwt_maxage,
        }
    }

    pub async fn get_user(&self, user_id: i32) -> Result<Option<PublicUser>> {
        self.repo.find_public_user(user_id).await
    }

    /// Signs a token for `user_id` valid for the configured number of minutes.
    pub fn generate_token(&self, user_id: i32) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::minutes(self.jwt_maxage)).timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|err| {
            tracing::error!("Failed to sign token: {:?}", err);
            Error::Unauthorized
        })
    }

    pub fn decode_token<T: Into<String>>(&self, token: T) -> Result<i32> {
        let decoded = decode::<Claims>(
            &token.into(),
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| Error::Unauthorized)?;

        decoded.claims.sub.parse().map_err(|_| Error::Unauthorized)
    }
}
