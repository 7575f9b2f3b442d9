use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::repository::{PostRepository, UserRepository};
use crate::services::{PostService, UserService};

/// Everything the handlers need, built once at startup. Cloning is cheap:
/// the pool is an Arc internally and the services hold clones of it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
    pub tokens: TokenService,
    pub users: UserService,
    pub posts: PostService,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let tokens = TokenService::new(&config.security);
        let users = UserService::new(UserRepository::new(pool.clone()), tokens.clone());
        let posts = PostService::new(PostRepository::new(pool.clone()));

        Self {
            config: Arc::new(config),
            pool,
            tokens,
            users,
            posts,
        }
    }
}
