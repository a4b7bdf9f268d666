pub mod blog_repository;
pub mod token_repository;
pub mod user_repository;
