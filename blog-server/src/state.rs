use crate::application::{AuthService, BlogService, MediaService};
use crate::data::{
    blog_repository::SqliteBlogRepository, token_repository::SqliteTokenRepository,
    user_repository::SqliteUserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::jwt::JwtService;
use crate::infrastructure::storage::AssetStorage;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub blog_service: Arc<BlogService>,
    pub media_service: Arc<MediaService>,
    /// Same operations as `media_service`, backed by the static-files location.
    pub static_service: Arc<MediaService>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn build(
        pool: SqlitePool,
        config: &AppConfig,
        media_storage: Arc<dyn AssetStorage>,
        static_storage: Arc<dyn AssetStorage>,
    ) -> Result<Self, DomainError> {
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.token_ttl_hours,
        )?);

        let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
        let token_repo = Arc::new(SqliteTokenRepository::new(pool.clone()));
        let blog_repo = Arc::new(SqliteBlogRepository::new(pool));

        Ok(Self {
            auth_service: Arc::new(AuthService::new(user_repo, token_repo, jwt_service)),
            blog_service: Arc::new(BlogService::new(
                blog_repo,
                config.page_size,
                config.delete_policy,
            )),
            media_service: Arc::new(MediaService::new(media_storage)),
            static_service: Arc::new(MediaService::new(static_storage)),
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}
