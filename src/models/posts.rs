use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::users::PublicUser;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub body: String,
    #[serde(rename = "userId")]
    pub user_id: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    /// Owner's public profile. Filled in on reads, absent on a freshly created post.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
}

/// Client input for create. Ownership is never taken from here.
#[derive(Validate, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDto {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
}

impl PostDto {
    pub fn with_owner(self, user_id: i32) -> NewPost {
        NewPost {
            title: self.title,
            body: self.body,
            user_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: i32,
}

/// Partial update: fields left out keep their stored value.
#[derive(Validate, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePost {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Body cannot be empty"))]
    pub body: Option<String>,
}
