mod common;

use axum::http::{StatusCode, header};
use serde_json::json;

use common::test_app;
use quill::quill_auth::{Role, Status};

#[tokio::test]
async fn test_admin_creates_registered_user() {
    let app = test_app();
    let (_, admin) = app.login_as("admin", Role::Admin).await;

    let res = app
        .post(
            "/v1/users",
            Some(&admin),
            json!({ "username": "created", "email": "created@quill.dev", "password": "hunter22" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["username"], "created");
    assert_eq!(res.body["role"], "registered");
    assert_eq!(res.body["status"], "active");
    assert!(res.body.get("passwordHash").is_none());
    assert!(res.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_mod_cannot_create_users() {
    let app = test_app();
    let (_, moderator) = app.login_as("moddy", Role::Mod).await;

    let res = app
        .post(
            "/v1/users",
            Some(&moderator),
            json!({ "username": "created", "email": "created@quill.dev", "password": "hunter22" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), "un/unauthorized");
}

#[tokio::test]
async fn test_list_users_requires_mod() {
    let app = test_app();
    let (_, registered) = app.login_as("reader", Role::Registered).await;
    let (_, moderator) = app.login_as("moddy", Role::Mod).await;

    let denied = app.get("/v1/users", Some(&registered)).await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert_eq!(denied.code(), "un/unauthorized");

    let res = app
        .get("/v1/users?sort=username,asc", Some(&moderator))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let names: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["moddy", "reader"]);
    assert_eq!(res.header("x-total-count"), "2");
    assert_eq!(res.header("x-total-page"), "1");
    assert!(res.header(header::LINK.as_str()).contains("rel=\"first\""));
}

#[tokio::test]
async fn test_list_users_rejects_out_of_range_size() {
    let app = test_app();
    let (_, moderator) = app.login_as("moddy", Role::Mod).await;

    let res = app.get("/v1/users?size=101", Some(&moderator)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), "req/validation");
    assert_eq!(res.body["errors"][0]["field"], "size");
}

#[tokio::test]
async fn test_get_user_by_id() {
    let app = test_app();
    let (_, moderator) = app.login_as("moddy", Role::Mod).await;
    let target = app
        .create_user("target", Role::Registered, Status::Active)
        .await;

    let res = app
        .get(&format!("/v1/users/{}", target.id), Some(&moderator))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["id"], target.id);
    assert_eq!(res.body["email"], "target@quill.dev");

    let missing = app.get("/v1/users/999", Some(&moderator)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.code(), "user/user-not-found");

    let malformed = app.get("/v1/users/abc", Some(&moderator)).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.code(), "com/invalid-id");
}

#[tokio::test]
async fn test_user_may_rename_themselves() {
    let app = test_app();
    let (user, token) = app.login_as("oldname", Role::Registered).await;

    let res = app
        .put(
            &format!("/v1/users/{}", user.id),
            Some(&token),
            json!({ "username": "newname" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["username"], "newname");
}

#[tokio::test]
async fn test_user_may_not_rename_others() {
    let app = test_app();
    let (_, token) = app.login_as("mallory", Role::Mod).await;
    let victim = app
        .create_user("victim", Role::Registered, Status::Active)
        .await;

    let res = app
        .put(
            &format!("/v1/users/{}", victim.id),
            Some(&token),
            json!({ "username": "pwned" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), "un/unauthorized");
}

#[tokio::test]
async fn test_update_checks_authorization_before_existence() {
    let app = test_app();
    let (_, registered) = app.login_as("reader", Role::Registered).await;
    let (_, admin) = app.login_as("admin", Role::Admin).await;

    let res = app
        .put("/v1/users/999", Some(&registered), json!({ "username": "whoever" }))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = app
        .put("/v1/users/999", Some(&admin), json!({ "username": "whoever" }))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rename_to_taken_username() {
    let app = test_app();
    let (user, token) = app.login_as("alice", Role::Registered).await;
    app.create_user("bob", Role::Registered, Status::Active)
        .await;

    let res = app
        .put(
            &format!("/v1/users/{}", user.id),
            Some(&token),
            json!({ "username": "bob" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), "auth/username-taken");
}

#[tokio::test]
async fn test_admin_changes_role_and_old_token_stops_working() {
    let app = test_app();
    let (_, admin) = app.login_as("admin", Role::Admin).await;
    let (user, user_token) = app.login_as("promoted", Role::Registered).await;

    let res = app
        .patch(
            &format!("/v1/users/{}/role", user.id),
            Some(&admin),
            json!({ "role": "mod" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["role"], "mod");

    // The token still says "registered".
    let res = app
        .post(
            "/v1/comments",
            Some(&user_token),
            json!({ "text": "hello", "postId": 1 }),
        )
        .await;
    assert_eq!(res.code(), "un/invalid-request");
}

#[tokio::test]
async fn test_unknown_role_is_a_binding_error() {
    let app = test_app();
    let (_, admin) = app.login_as("admin", Role::Admin).await;
    let user = app
        .create_user("someone", Role::Registered, Status::Active)
        .await;

    let res = app
        .patch(
            &format!("/v1/users/{}/role", user.id),
            Some(&admin),
            json!({ "role": "superuser" }),
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), "req/binding");
}

#[tokio::test]
async fn test_admin_deactivates_user() {
    let app = test_app();
    let (_, admin) = app.login_as("admin", Role::Admin).await;
    let (user, token) = app.login_as("leaving", Role::Registered).await;

    let res = app
        .patch(
            &format!("/v1/users/{}/status", user.id),
            Some(&admin),
            json!({ "status": "passive" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "passive");

    let res = app
        .put(
            &format!("/v1/users/{}", user.id),
            Some(&token),
            json!({ "username": "stillhere" }),
        )
        .await;
    assert_eq!(res.code(), "un/invalid-request");
}

#[tokio::test]
async fn test_delete_user() {
    let app = test_app();
    let (_, admin) = app.login_as("admin", Role::Admin).await;
    let (_, moderator) = app.login_as("moddy", Role::Mod).await;
    let target = app
        .create_user("target", Role::Registered, Status::Active)
        .await;
    let uri = format!("/v1/users/{}", target.id);

    let denied = app.delete(&uri, Some(&moderator)).await;
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);

    let res = app.delete(&uri, Some(&admin)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["id"], target.id);

    let again = app.delete(&uri, Some(&admin)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.code(), "user/user-not-found");
}
