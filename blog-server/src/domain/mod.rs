pub mod blog;
pub mod error;
pub mod slug;
pub mod token;
pub mod user;
pub mod validation;

pub use blog::Blog;
pub use error::DomainError;
pub use token::AuthToken;
pub use user::User;
