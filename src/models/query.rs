/// Equality filters applied to the `posts` table. `None` fields do not
/// constrain the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub id: Option<i32>,
    pub user_id: Option<i32>,
}

impl PostFilter {
    pub fn by_id(id: i32) -> Self {
        Self {
            id: Some(id),
            user_id: None,
        }
    }

    /// Matches a post only when it belongs to `user_id`.
    pub fn owned(id: i32, user_id: i32) -> Self {
        Self {
            id: Some(id),
            user_id: Some(user_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.user_id.is_none()
    }
}
