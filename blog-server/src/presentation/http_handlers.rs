use crate::application::{AuthService, BlogService, MediaService};
use crate::domain::blog::{BlogResponse, CreateBlogRequest};
use crate::domain::user::{AuthenticatedUser, LoginUserRequest, RegisterUserRequest, UserResponse};
use crate::domain::DomainError;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;

// Ответ с токеном
#[derive(serde::Serialize)]
struct AuthResponse {
    token: String,
    user: UserResponse,
}

#[derive(serde::Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(serde::Serialize)]
struct BlogListResponse {
    count: i64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<BlogResponse>,
}

fn get_user_from_request(req: &HttpRequest) -> Result<AuthenticatedUser, DomainError> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or(DomainError::Unauthorized(
            "Authentication credentials were not provided.".to_string(),
        ))
}

pub fn error_to_response(err: DomainError) -> HttpResponse {
    let message = err.to_string();

    match err {
        DomainError::Validation(errors) => HttpResponse::BadRequest().json(errors),
        DomainError::InvalidCredentials => HttpResponse::BadRequest()
            .json(serde_json::json!({ "non_field_errors": [message] })),
        _ => match err.to_status_code() {
            400 => HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
            401 => HttpResponse::Unauthorized().json(serde_json::json!({ "error": message })),
            403 => HttpResponse::Forbidden().json(serde_json::json!({ "error": message })),
            404 => HttpResponse::NotFound().json(serde_json::json!({ "error": message })),
            _ => {
                tracing::error!("Request failed: {}", message);
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": "Internal server error" }))
            }
        },
    }
}

fn page_link(req: &HttpRequest, page: i64) -> String {
    let info = req.connection_info();
    format!(
        "{}://{}{}?page={}",
        info.scheme(),
        info.host(),
        req.path(),
        page
    )
}

// ============== Auth Handlers ==============

pub async fn register(
    auth_service: web::Data<Arc<AuthService>>,
    req: web::Json<RegisterUserRequest>,
) -> impl Responder {
    match auth_service.register(req.into_inner()).await {
        Ok((token, user)) => HttpResponse::Created().json(AuthResponse { token, user }),
        Err(err) => error_to_response(err),
    }
}

pub async fn login(
    auth_service: web::Data<Arc<AuthService>>,
    req: web::Json<LoginUserRequest>,
) -> impl Responder {
    match auth_service.login(req.into_inner()).await {
        Ok((token, user)) => HttpResponse::Ok().json(AuthResponse { token, user }),
        Err(err) => error_to_response(err),
    }
}

pub async fn current_user(
    req: HttpRequest,
    auth_service: web::Data<Arc<AuthService>>,
) -> impl Responder {
    let who = match get_user_from_request(&req) {
        Ok(who) => who,
        Err(err) => return error_to_response(err),
    };

    match auth_service.current_user(&who).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => error_to_response(err),
    }
}

pub async fn logout(req: HttpRequest, auth_service: web::Data<Arc<AuthService>>) -> impl Responder {
    let who = match get_user_from_request(&req) {
        Ok(who) => who,
        Err(err) => return error_to_response(err),
    };

    match auth_service.logout(&who).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_to_response(err),
    }
}

pub async fn logout_all(
    req: HttpRequest,
    auth_service: web::Data<Arc<AuthService>>,
) -> impl Responder {
    let who = match get_user_from_request(&req) {
        Ok(who) => who,
        Err(err) => return error_to_response(err),
    };

    match auth_service.logout_all(&who).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_to_response(err),
    }
}

// ============== Blog Handlers ==============

pub async fn list_blogs(
    req: HttpRequest,
    blog_service: web::Data<Arc<BlogService>>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    let page = match query.page.as_deref() {
        None => 1,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(n) => n,
            Err(_) => return error_to_response(DomainError::InvalidPage),
        },
    };

    tracing::debug!("Listing blogs, page={}", page);

    match blog_service.list_blogs(page).await {
        Ok(blog_page) => HttpResponse::Ok().json(BlogListResponse {
            count: blog_page.count,
            next: blog_page
                .has_next
                .then(|| page_link(&req, blog_page.page + 1)),
            previous: blog_page
                .has_previous
                .then(|| page_link(&req, blog_page.page - 1)),
            results: blog_page.results,
        }),
        Err(err) => error_to_response(err),
    }
}

pub async fn get_blog(
    blog_service: web::Data<Arc<BlogService>>,
    path: web::Path<String>,
) -> impl Responder {
    let slug = path.into_inner();

    match blog_service.get_blog(&slug).await {
        Ok(blog) => HttpResponse::Ok().json(blog),
        Err(err) => error_to_response(err),
    }
}

pub async fn create_blog(
    req: HttpRequest,
    blog_service: web::Data<Arc<BlogService>>,
    blog_data: web::Json<CreateBlogRequest>,
) -> impl Responder {
    let who = match get_user_from_request(&req) {
        Ok(who) => who,
        Err(err) => return error_to_response(err),
    };

    tracing::info!("Creating blog for user_id={}", who.user_id);

    match blog_service.create_blog(&who, blog_data.into_inner()).await {
        Ok(blog) => HttpResponse::Created().json(blog),
        Err(err) => error_to_response(err),
    }
}

pub async fn delete_blog(
    req: HttpRequest,
    blog_service: web::Data<Arc<BlogService>>,
    path: web::Path<String>,
) -> impl Responder {
    let slug = path.into_inner();

    let who = match get_user_from_request(&req) {
        Ok(who) => who,
        Err(err) => return error_to_response(err),
    };

    tracing::info!("Deleting blog slug={} for user_id={}", slug, who.user_id);

    match blog_service.destroy_blog(&who, &slug).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_to_response(err),
    }
}

// ============== Media / Static Handlers ==============

pub async fn upload_media(
    req: HttpRequest,
    media_service: web::Data<Arc<MediaService>>,
    path: web::Path<String>,
    body: web::Bytes,
) -> impl Responder {
    let key = path.into_inner();

    let who = match get_user_from_request(&req) {
        Ok(who) => who,
        Err(err) => return error_to_response(err),
    };

    match media_service.upload(&who, &key, body.to_vec()).await {
        Ok(media) => HttpResponse::Created().json(media),
        Err(err) => error_to_response(err),
    }
}

pub async fn media_url(
    media_service: web::Data<Arc<MediaService>>,
    path: web::Path<String>,
) -> impl Responder {
    match media_service.url_for(&path.into_inner()) {
        Ok(media) => HttpResponse::Ok().json(media),
        Err(err) => error_to_response(err),
    }
}
