use crate::application::AuthService;
use crate::domain::DomainError;
use actix_web::{dev::ServiceRequest, web, Error, HttpMessage};
use actix_web_httpauth::extractors::bearer::{BearerAuth, Config};
use actix_web_httpauth::extractors::AuthenticationError;
use std::sync::Arc;

/// Validator for `HttpAuthentication::bearer`. On success the resolved
/// [`AuthenticatedUser`](crate::domain::user::AuthenticatedUser) is stored in
/// the request extensions for the handlers.
pub async fn bearer_auth_middleware(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let auth_service = match req.app_data::<web::Data<Arc<AuthService>>>() {
        Some(service) => service.get_ref().clone(),
        None => {
            return Err((
                actix_web::error::ErrorInternalServerError("Auth service not configured"),
                req,
            ));
        }
    };

    match auth_service.authenticate(credentials.token()).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(req)
        }
        Err(DomainError::Unauthorized(reason)) => {
            tracing::debug!("Rejected bearer token for {}: {}", req.path(), reason);
            let config = req.app_data::<Config>().cloned().unwrap_or_default();
            Err((AuthenticationError::from(config).into(), req))
        }
        Err(e) => {
            tracing::error!("Authentication lookup failed: {}", e);
            Err((
                actix_web::error::ErrorInternalServerError("Internal server error"),
                req,
            ))
        }
    }
}
