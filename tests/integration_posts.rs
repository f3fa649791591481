mod common;

use axum::http::{StatusCode, header};
use serde_json::json;

use common::test_app;
use quill::quill_auth::Role;

#[tokio::test]
async fn test_mod_creates_post() {
    let app = test_app();
    let (_, moderator) = app.login_as("moddy", Role::Mod).await;

    let res = app
        .post(
            "/v1/posts",
            Some(&moderator),
            json!({ "title": "Hello world", "body": "First post" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["title"], "Hello world");
    assert_eq!(res.body["createdBy"], "moddy");
    assert_eq!(res.body["updatedBy"], "moddy");
}

#[tokio::test]
async fn test_registered_user_cannot_create_post() {
    let app = test_app();
    let (_, registered) = app.login_as("reader", Role::Registered).await;

    let res = app
        .post(
            "/v1/posts",
            Some(&registered),
            json!({ "title": "Hello world", "body": "First post" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), "un/unauthorized");
}

#[tokio::test]
async fn test_create_post_validates_title_length() {
    let app = test_app();
    let (_, moderator) = app.login_as("moddy", Role::Mod).await;

    let res = app
        .post(
            "/v1/posts",
            Some(&moderator),
            json!({ "title": "This title is far too long", "body": "x" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), "req/validation");
    assert_eq!(res.body["errors"][0]["field"], "title");
}

#[tokio::test]
async fn test_get_post_is_public() {
    let app = test_app();
    let post = app.create_post("Public post", "moddy").await;

    let res = app.get(&format!("/v1/posts/{}", post.id), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["id"], post.id);

    let missing = app.get("/v1/posts/404", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.code(), "post/not-found");

    let zero = app.get("/v1/posts/0", None).await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
    assert_eq!(zero.code(), "com/invalid-id");
}

#[tokio::test]
async fn test_list_posts_pagination_headers() {
    let app = test_app();
    for i in 1..=30 {
        app.create_post(&format!("Post {i}"), "moddy").await;
    }

    let res = app
        .get("/v1/posts?page=4&size=5&sort=createdAt,asc", None)
        .await;

    assert_eq!(res.status, StatusCode::OK);
    let ids: Vec<u64> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, [16, 17, 18, 19, 20]);

    assert_eq!(
        res.header(header::LINK.as_str()),
        "</v1/posts?page=1&size=5&sort=createdAt%2Casc>; rel=\"first\", \
         </v1/posts?page=5&size=5&sort=createdAt%2Casc>; rel=\"next\", \
         </v1/posts?page=3&size=5&sort=createdAt%2Casc>; rel=\"prev\", \
         </v1/posts?page=6&size=5&sort=createdAt%2Casc>; rel=\"last\""
    );
    assert_eq!(res.header("x-total-count"), "30");
    assert_eq!(res.header("x-total-page"), "6");
    assert_eq!(res.header("x-has-next"), "true");
}

#[tokio::test]
async fn test_list_posts_defaults_to_newest_first() {
    let app = test_app();
    for i in 1..=3 {
        app.create_post(&format!("Post {i}"), "moddy").await;
    }

    let res = app.get("/v1/posts?sort=nonsense", None).await;

    assert_eq!(res.status, StatusCode::OK);
    let ids: Vec<u64> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, [3, 2, 1]);
    assert!(
        res.header(header::LINK.as_str())
            .contains("sort=createdAt%2Cdesc")
    );
    assert_eq!(res.header("x-has-next"), "false");
}

#[tokio::test]
async fn test_list_posts_rejects_page_zero() {
    let app = test_app();
    let res = app.get("/v1/posts?page=0", None).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), "req/validation");
}

#[tokio::test]
async fn test_list_posts_rejects_page_past_offset_range() {
    let app = test_app();
    app.create_post("Only post", "author").await;

    let res = app
        .get("/v1/posts?page=9223372036854775807&size=100", None)
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), "req/validation");
    assert_eq!(res.body["errors"][0]["field"], "page");
}

#[tokio::test]
async fn test_update_post_keeps_body_when_empty() {
    let app = test_app();
    let (_, moderator) = app.login_as("editor", Role::Mod).await;
    let post = app.create_post("Original", "author").await;

    let res = app
        .put(
            &format!("/v1/posts/{}", post.id),
            Some(&moderator),
            json!({ "title": "Renamed", "body": "" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["title"], "Renamed");
    assert_eq!(res.body["body"], "Lorem ipsum");
    assert_eq!(res.body["createdBy"], "author");
    assert_eq!(res.body["updatedBy"], "editor");

    let res = app
        .put(
            &format!("/v1/posts/{}", post.id),
            Some(&moderator),
            json!({ "title": "Renamed", "body": "New body" }),
        )
        .await;
    assert_eq!(res.body["body"], "New body");
}

#[tokio::test]
async fn test_registered_user_cannot_delete_post() {
    let app = test_app();
    let (_, registered) = app.login_as("reader", Role::Registered).await;
    let post = app.create_post("Keep me", "moddy").await;

    let res = app
        .delete(&format!("/v1/posts/{}", post.id), Some(&registered))
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), "un/unauthorized");
    assert!(app.state.posts.read(post.id).await.is_ok());

    let missing = app.delete("/v1/posts/999", Some(&registered)).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.code(), "un/unauthorized");
}

#[tokio::test]
async fn test_admin_deletes_post() {
    let app = test_app();
    let (_, admin) = app.login_as("admin", Role::Admin).await;
    let post = app.create_post("Delete me", "moddy").await;

    let res = app
        .delete(&format!("/v1/posts/{}", post.id), Some(&admin))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["id"], post.id);

    let missing = app.delete("/v1/posts/999", Some(&admin)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.code(), "post/not-found");
}
