use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user row without its password hash. This is the only user shape the
/// crate ever reads from the store.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
pub struct PublicUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
