pub mod auth_service;
pub mod blog_service;
pub mod media_service;

pub use auth_service::AuthService;
pub use blog_service::BlogService;
pub use media_service::MediaService;
