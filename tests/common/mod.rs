#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use posts_api::{
    models::{
        posts::{NewPost, Post, UpdatePost},
        query::PostFilter,
        users::PublicUser,
    },
    repositories::{posts_repo::PostsRepository, user_repo::UserRepository},
    routes::create_routes,
    services::{posts::PostsService, user::UserService},
    AppState, Result,
};

pub const JWT_SECRET: &str = "test-secret";

/// Table-backed stand-in for Postgres: ids are assigned from 1 and filters
/// are plain equality checks.
#[derive(Default)]
pub struct InMemoryStore {
    posts: Mutex<Vec<Post>>,
    users: Vec<PublicUser>,
}

impl InMemoryStore {
    pub fn with_users(ids: &[i32]) -> Self {
        let now = Utc::now();
        let users = ids
            .iter()
            .map(|&id| PublicUser {
                id,
                name: format!("user{id}"),
                email: format!("user{id}@example.com"),
                created_at: now,
                updated_at: now,
            })
            .collect();

        Self {
            posts: Mutex::new(Vec::new()),
            users,
        }
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    fn matches(post: &Post, filter: &PostFilter) -> bool {
        filter.id.map_or(true, |id| post.id == id)
            && filter.user_id.map_or(true, |user_id| post.user_id == user_id)
    }

    fn with_owner(&self, mut post: Post) -> Post {
        post.user = self.users.iter().find(|u| u.id == post.user_id).cloned();
        post
    }
}

#[async_trait]
impl PostsRepository for InMemoryStore {
    async fn create(&self, post: NewPost) -> Result<Post> {
        let mut posts = self.posts.lock().unwrap();
        let now = Utc::now();
        let created = Post {
            id: posts.iter().map(|p| p.id).max().unwrap_or(0) + 1,
            title: post.title,
            body: post.body,
            user_id: post.user_id,
            created_at: now,
            updated_at: now,
            user: None,
        };
        posts.push(created.clone());
        Ok(created)
    }

    async fn find_all(&self, filter: PostFilter) -> Result<Vec<Post>> {
        let posts = self.posts();
        Ok(posts
            .into_iter()
            .filter(|p| Self::matches(p, &filter))
            .map(|p| self.with_owner(p))
            .collect())
    }

    async fn find_one(&self, filter: PostFilter) -> Result<Option<Post>> {
        let posts = self.posts();
        Ok(posts
            .into_iter()
            .find(|p| Self::matches(p, &filter))
            .map(|p| self.with_owner(p)))
    }

    async fn update(&self, changes: UpdatePost, filter: PostFilter) -> Result<u64> {
        let mut posts = self.posts.lock().unwrap();
        let mut affected = 0;
        for post in posts.iter_mut().filter(|p| Self::matches(p, &filter)) {
            if let Some(title) = &changes.title {
                post.title = title.clone();
            }
            if let Some(body) = &changes.body {
                post.body = body.clone();
            }
            post.updated_at = Utc::now();
            affected += 1;
        }
        Ok(affected)
    }

    async fn destroy(&self, filter: PostFilter) -> Result<u64> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| !Self::matches(p, &filter));
        Ok((before - posts.len()) as u64)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_public_user(&self, user_id: i32) -> Result<Option<PublicUser>> {
        Ok(self.users.iter().find(|u| u.id == user_id).cloned())
    }
}

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn new(user_ids: &[i32]) -> Self {
        let store = Arc::new(InMemoryStore::with_users(user_ids));
        let state = Arc::new(AppState {
            posts_service: PostsService::new(store.clone()),
            users_service: UserService::new(store.clone(), JWT_SECRET.to_string(), 60),
        });
        Self { store, state }
    }

    pub fn router(&self) -> axum::Router {
        create_routes(self.state.clone())
    }

    pub fn token_for(&self, user_id: i32) -> String {
        self.state.users_service.generate_token(user_id).unwrap()
    }
}
