use std::sync::Arc;

use tracing::instrument;

use crate::{
    models::{
        posts::{Post, PostDto, UpdatePost},
        query::PostFilter,
    },
    repositories::posts_repo::PostsRepository,
    Result,
};

#[derive(Clone)]
pub struct PostsService {
    repo: Arc<dyn PostsRepository>,
}

impl PostsService {
    pub fn new(repo: Arc<dyn PostsRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, post))]
    pub async fn create(&self, post: PostDto, user_id: i32) -> Result<Post> {
        self.repo.create(post.with_owner(user_id)).await
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Post>> {
        self.repo.find_all(PostFilter::default()).await
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: i32) -> Result<Option<Post>> {
        self.repo.find_one(PostFilter::by_id(id)).await
    }

    /// Zero when `id` does not exist or belongs to someone else.
    #[instrument(skip(self, data))]
    pub async fn update(&self, id: i32, data: UpdatePost, user_id: i32) -> Result<u64> {
        self.repo
            .update(data, PostFilter::owned(id, user_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32, user_id: i32) -> Result<u64> {
        self.repo.destroy(PostFilter::owned(id, user_id)).await
    }
}
