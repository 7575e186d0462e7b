use services::{posts::PostsService, user::UserService};

pub use self::errors::{Error, Result};

pub mod config;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

#[derive(Clone)]
pub struct AppState {
    pub posts_service: PostsService,
    pub users_service: UserService,
}
