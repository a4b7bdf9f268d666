mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use blog_server::infrastructure::config::DeletePolicy;
use blog_server::presentation::routes::configure;
use common::{bearer, register, send, setup, setup_with};
use serde_json::json;

#[actix_web::test]
async fn create_then_delete_twice() {
    let ctx = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;
    let token = register(&app, "test", "abc@example.com", "123").await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Test", "description": "This is a Test Blog." }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Test");
    assert_eq!(body["slug"], "test");
    assert_eq!(ctx.state.blog_service.count().await.unwrap(), 1);

    let slug = body["slug"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blog/{}", slug))
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert_eq!(ctx.state.blog_service.count().await.unwrap(), 0);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/blog/{}", slug))
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_succeeds_with_no_blogs() {
    let ctx = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;
    let token = register(&app, "test", "abc@example.com", "123").await;

    let req = test::TestRequest::get()
        .uri("/api/blog")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["results"], json!([]));
    assert!(body["next"].is_null());
    assert!(body["previous"].is_null());
}

#[actix_web::test]
async fn list_and_create_require_a_token() {
    let ctx = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;

    let req = test::TestRequest::get().uri("/api/blog").to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .set_json(json!({ "title": "Test", "description": "Nope" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/blog")
        .insert_header(bearer("garbage.token.value"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(ctx.state.blog_service.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn delete_requires_a_token() {
    let ctx = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;
    let token = register(&app, "test", "abc@example.com", "123").await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Keep Me", "description": "Still here." }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::delete()
        .uri("/api/blog/keep-me")
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::delete()
        .uri("/api/blog/keep-me")
        .insert_header(bearer("garbage.token.value"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(ctx.state.blog_service.count().await.unwrap(), 1);
}

#[actix_web::test]
async fn create_without_description_is_rejected() {
    let ctx = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;
    let token = register(&app, "test", "abc@example.com", "123").await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "This is a Test Blog." }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "description": ["This field is required."] }));
    assert_eq!(ctx.state.blog_service.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn create_without_title_or_with_blank_fields_is_rejected() {
    let ctx = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;
    let token = register(&app, "test", "abc@example.com", "123").await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&token))
        .set_json(json!({ "description": "No title here" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], json!(["This field is required."]));

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "   ", "description": "" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], json!(["This field may not be blank."]));
    assert_eq!(body["description"], json!(["This field may not be blank."]));

    assert_eq!(ctx.state.blog_service.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let ctx = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;
    let token = register(&app, "test", "abc@example.com", "123").await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&token))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn duplicate_titles_get_distinct_slugs() {
    let ctx = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;
    let token = register(&app, "test", "abc@example.com", "123").await;

    let mut slugs = Vec::new();
    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/blog")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "Hello, World!", "description": "again" }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        slugs.push(body["slug"].as_str().unwrap().to_string());
    }

    assert_eq!(slugs, vec!["hello-world", "hello-world-2", "hello-world-3"]);
}

#[actix_web::test]
async fn long_duplicate_titles_keep_getting_fresh_slugs() {
    let ctx = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;
    let token = register(&app, "test", "abc@example.com", "123").await;
    let title = "a".repeat(60);

    let mut slugs = Vec::new();
    for _ in 0..4 {
        let req = test::TestRequest::post()
            .uri("/api/blog")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": title, "description": "d" }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        slugs.push(body["slug"].as_str().unwrap().to_string());
    }

    assert_eq!(
        slugs,
        vec![
            "a".repeat(50),
            "a".repeat(48) + "-2",
            "a".repeat(48) + "-3",
            "a".repeat(48) + "-4",
        ]
    );
    assert_eq!(ctx.state.blog_service.count().await.unwrap(), 4);
}

#[actix_web::test]
async fn blogs_are_retrievable_by_slug() {
    let ctx = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;
    let token = register(&app, "test", "abc@example.com", "123").await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Slug Lookup", "description": "Find me." }))
        .to_request();
    let (_, created) = send(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/blog/slug-lookup")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["description"], "Find me.");
    assert_eq!(body["owner"], created["owner"]);

    let req = test::TestRequest::get()
        .uri("/api/blog/missing")
        .insert_header(bearer(&token))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_pages_three_at_a_time_in_insertion_order() {
    let ctx = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;
    let token = register(&app, "test", "abc@example.com", "123").await;

    for title in ["One", "Two", "Three", "Four"] {
        let req = test::TestRequest::post()
            .uri("/api/blog")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": title, "description": "body" }))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/blog")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
    let titles: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["One", "Two", "Three"]);
    assert!(body["next"].as_str().unwrap().ends_with("/api/blog?page=2"));
    assert!(body["previous"].is_null());

    let req = test::TestRequest::get()
        .uri("/api/blog?page=2")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["results"][0]["title"], "Four");
    assert!(body["next"].is_null());
    assert!(body["previous"].as_str().unwrap().ends_with("/api/blog?page=1"));

    for bad in ["3", "0", "abc"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/blog?page={}", bad))
            .insert_header(bearer(&token))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "page={}", bad);
        assert_eq!(body["error"], "Invalid page.");
    }
}

#[actix_web::test]
async fn any_authenticated_user_may_delete_by_default() {
    let ctx = setup().await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;
    let author = register(&app, "author", "author@example.com", "pw").await;
    let other = register(&app, "other", "other@example.com", "pw").await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&author))
        .set_json(json!({ "title": "Shared", "description": "Anyone can remove this." }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::delete()
        .uri("/api/blog/shared")
        .insert_header(bearer(&other))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn owner_only_policy_forbids_other_users() {
    let ctx = setup_with(DeletePolicy::OwnerOnly).await;
    let app = test::init_service(App::new().configure(|cfg| configure(cfg, &ctx.state))).await;
    let author = register(&app, "author", "author@example.com", "pw").await;
    let other = register(&app, "other", "other@example.com", "pw").await;

    let req = test::TestRequest::post()
        .uri("/api/blog")
        .insert_header(bearer(&author))
        .set_json(json!({ "title": "Mine", "description": "Hands off." }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = test::TestRequest::delete()
        .uri("/api/blog/mine")
        .insert_header(bearer(&other))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(ctx.state.blog_service.count().await.unwrap(), 1);

    let req = test::TestRequest::delete()
        .uri("/api/blog/mine")
        .insert_header(bearer(&author))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(ctx.state.blog_service.count().await.unwrap(), 0);

    let req = test::TestRequest::delete()
        .uri("/api/blog/mine")
        .insert_header(bearer(&author))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
