use crate::application::{AuthService, BlogService, MediaService};
use crate::infrastructure::config::CorsPolicy;
use crate::presentation::{http_handlers, middleware::bearer_auth_middleware};
use crate::state::AppState;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{error, web, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use std::sync::Arc;

/// Registers shared state and every route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    let auth_middleware = HttpAuthentication::bearer(bearer_auth_middleware);

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        tracing::debug!("Rejected JSON payload: {}", message);
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    });

    cfg.app_data(web::Data::<Arc<AuthService>>::new(state.auth_service.clone()))
        .app_data(web::Data::<Arc<BlogService>>::new(state.blog_service.clone()))
        .app_data(web::Data::<Arc<MediaService>>::new(state.media_service.clone()))
        .app_data(json_config)
        // Auth: register/login are public, the rest needs a token
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(http_handlers::register))
                .route("/login", web::post().to(http_handlers::login))
                .service(
                    web::resource("/user")
                        .wrap(auth_middleware.clone())
                        .route(web::get().to(http_handlers::current_user)),
                )
                .service(
                    web::resource("/logout")
                        .wrap(auth_middleware.clone())
                        .route(web::post().to(http_handlers::logout)),
                )
                .service(
                    web::resource("/logoutall")
                        .wrap(auth_middleware.clone())
                        .route(web::post().to(http_handlers::logout_all)),
                ),
        )
        .service(
            web::scope("/api/blog")
                .wrap(auth_middleware.clone())
                .route("", web::get().to(http_handlers::list_blogs))
                .route("", web::post().to(http_handlers::create_blog))
                .route("/{slug}", web::get().to(http_handlers::get_blog))
                .route("/{slug}", web::delete().to(http_handlers::delete_blog)),
        )
        .service(
            web::scope("/api/media")
                .wrap(auth_middleware.clone())
                .app_data(web::PayloadConfig::new(state.max_upload_bytes))
                .route("/{key:.*}", web::put().to(http_handlers::upload_media))
                .route("/{key:.*}", web::get().to(http_handlers::media_url)),
        )
        // Static files reuse the media handlers; the scope's own service shadows the app-wide one
        .service(
            web::scope("/api/static")
                .wrap(auth_middleware)
                .app_data(web::Data::<Arc<MediaService>>::new(
                    state.static_service.clone(),
                ))
                .app_data(web::PayloadConfig::new(state.max_upload_bytes))
                .route("/{key:.*}", web::put().to(http_handlers::upload_media))
                .route("/{key:.*}", web::get().to(http_handlers::media_url)),
        );
}

pub fn configure_cors(policy: &CorsPolicy) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::AUTHORIZATION])
        .max_age(3600);

    match policy {
        CorsPolicy::AllowAll => {
            tracing::info!("CORS: allowing any origin");
            cors.allow_any_origin()
        }
        CorsPolicy::Origins(origins) => {
            let mut cors = cors;
            for origin in origins {
                cors = cors.allowed_origin(origin);
                tracing::debug!("Added allowed CORS origin: {}", origin);
            }
            cors
        }
    }
}
