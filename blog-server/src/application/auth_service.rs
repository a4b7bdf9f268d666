use crate::data::token_repository::TokenRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::user::{AuthenticatedUser, LoginUserRequest, RegisterUserRequest, UserResponse};
use crate::domain::validation::{validate_login, validate_registration};
use crate::domain::{DomainError, User};
use crate::infrastructure::jwt::JwtService;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use std::sync::Arc;

pub struct AuthService {
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    token_repo: Arc<dyn TokenRepository + Send + Sync>,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        token_repo: Arc<dyn TokenRepository + Send + Sync>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            jwt_service,
        }
    }

    pub async fn register(
        &self,
        req: RegisterUserRequest,
    ) -> Result<(String, UserResponse), DomainError> {
        let new_user = validate_registration(req)?;
        tracing::debug!(
            "Registering username: {}, email: {}",
            new_user.username,
            new_user.email
        );

        match self.user_repo.find_by_username(&new_user.username).await {
            Ok(_) => {
                tracing::warn!("Registration failed: username already exists");
                return Err(DomainError::field(
                    "username",
                    "A user with that username already exists.",
                ));
            }
            Err(DomainError::UserNotFound) => {}
            Err(e) => return Err(e),
        }

        match self.user_repo.find_by_email(&new_user.email).await {
            Ok(_) => {
                tracing::warn!("Registration failed: email already exists");
                return Err(DomainError::field(
                    "email",
                    "A user with that email already exists.",
                ));
            }
            Err(DomainError::UserNotFound) => {}
            Err(e) => return Err(e),
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Password hashing failed: {}", e);
                DomainError::InternalError(format!("Password hashing failed: {}", e))
            })?
            .to_string();

        let user = self.user_repo.create(&new_user, password_hash).await?;
        let token = self.issue_token(&user).await?;

        tracing::info!(
            "User registered successfully: id={}, username={}",
            user.id,
            user.username
        );
        Ok((token, UserResponse::from(user)))
    }

    pub async fn login(
        &self,
        req: LoginUserRequest,
    ) -> Result<(String, UserResponse), DomainError> {
        let (username, password) = validate_login(req)?;
        tracing::debug!("Login attempt for username: {}", username);

        let user = match self.user_repo.find_by_username(&username).await {
            Ok(u) => u,
            Err(DomainError::UserNotFound) => {
                tracing::warn!("Login failed: unknown username {}", username);
                return Err(DomainError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            tracing::error!("Invalid password hash format: {}", e);
            DomainError::InternalError(format!("Invalid password hash: {}", e))
        })?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            tracing::warn!("Invalid password for user {}", user.username);
            return Err(DomainError::InvalidCredentials);
        }

        match self.token_repo.delete_expired(Utc::now()).await {
            Ok(0) => {}
            Ok(n) => tracing::debug!("Purged {} expired tokens", n),
            Err(e) => tracing::warn!("Failed to purge expired tokens: {:?}", e),
        }

        let token = self.issue_token(&user).await?;

        tracing::info!(
            "User logged in successfully: id={}, username={}",
            user.id,
            user.username
        );
        Ok((token, UserResponse::from(user)))
    }

    /// Resolves a bearer token to the user it belongs to.
    ///
    /// The signature and expiry are checked first, then the token's row must
    /// still exist; logging out deletes that row, which is what makes tokens
    /// revocable.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, DomainError> {
        let claims = self.jwt_service.verify_token(token)?;

        let record = self
            .token_repo
            .find(&claims.jti)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Token {} has been revoked", claims.jti);
                DomainError::Unauthorized("Invalid token.".to_string())
            })?;

        if record.is_expired(Utc::now()) {
            self.token_repo.delete(&record.id).await?;
            return Err(DomainError::Unauthorized("Token has expired.".to_string()));
        }

        let user = match self.user_repo.find_by_id(record.user_id).await {
            Ok(user) => user,
            Err(DomainError::UserNotFound) => {
                return Err(DomainError::Unauthorized(
                    "User inactive or deleted.".to_string(),
                ))
            }
            Err(e) => return Err(e),
        };

        Ok(AuthenticatedUser {
            user_id: user.id,
            username: user.username,
            token_id: record.id,
        })
    }

    pub async fn current_user(&self, who: &AuthenticatedUser) -> Result<UserResponse, DomainError> {
        let user = self.user_repo.find_by_id(who.user_id).await?;
        Ok(UserResponse::from(user))
    }

    pub async fn logout(&self, who: &AuthenticatedUser) -> Result<(), DomainError> {
        self.token_repo.delete(&who.token_id).await?;
        tracing::info!("User {} logged out", who.username);
        Ok(())
    }

    pub async fn logout_all(&self, who: &AuthenticatedUser) -> Result<(), DomainError> {
        let revoked = self.token_repo.delete_for_user(who.user_id).await?;
        tracing::info!("User {} logged out of {} sessions", who.username, revoked);
        Ok(())
    }

    async fn issue_token(&self, user: &User) -> Result<String, DomainError> {
        let (token, record) = self.jwt_service.issue(user.id, &user.username)?;
        self.token_repo.insert(&record).await?;
        Ok(token)
    }
}
