use sea_orm::EntityTrait;
use serde_json::json;

use marketplace::entity::user;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn new_profile_has_only_username() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let res = app.get_with_token(routes::PROFILE, &token).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["username"], "alice");
    assert!(res.body["email"].is_null());
    assert!(res.body["bio"].is_null());
    assert!(res.body["created_at"].is_string());
}

#[tokio::test]
async fn profile_requires_a_token() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::PROFILE).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}

#[tokio::test]
async fn update_sets_and_clears_fields() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let res = app
        .put_with_token(
            routes::PROFILE,
            &json!({"email": "alice@usf.edu", "full_name": "Alice W", "location": "Tampa"}),
            &token,
        )
        .await;
    assert_eq!(res.status, 200, "update failed: {}", res.text);
    assert_eq!(res.body["email"], "alice@usf.edu");
    assert_eq!(res.body["location"], "Tampa");

    let res = app
        .put_with_token(routes::PROFILE, &json!({"location": ""}), &token)
        .await;
    assert_eq!(res.status, 200);
    assert!(res.body["location"].is_null());
    assert_eq!(res.body["full_name"], "Alice W");

    let res = app.get_with_token(routes::PROFILE, &token).await;
    assert_eq!(res.body["email"], "alice@usf.edu");
    assert!(res.body["location"].is_null());
}

#[tokio::test]
async fn empty_update_changes_nothing() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let res = app.put_with_token(routes::PROFILE, &json!({}), &token).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["username"], "alice");
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let res = app
        .put_with_token(routes::PROFILE, &json!({"email": "not-an-email"}), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn username_change_to_a_taken_name_conflicts() {
    let app = TestApp::spawn().await;
    app.create_authenticated_user("bob", "securepass").await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let res = app
        .put_with_token(routes::PROFILE, &json!({"username": "bob"}), &token)
        .await;

    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "USERNAME_TAKEN");
}

#[tokio::test]
async fn username_change_allows_login_under_new_name() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let res = app
        .put_with_token(routes::PROFILE, &json!({"username": "alice_w"}), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["username"], "alice_w");

    let login = app
        .post_form(
            routes::LOGIN,
            &[("username", "alice_w"), ("password", "securepass")],
        )
        .await;
    assert_eq!(login.status, 200);
}

#[tokio::test]
async fn token_of_a_deleted_account_is_invalid() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let account = user::Entity::find()
        .one(&app.db)
        .await
        .unwrap()
        .expect("user should exist");
    user::Entity::delete_by_id(account.id)
        .exec(&app.db)
        .await
        .unwrap();

    let res = app.get_with_token(routes::PROFILE, &token).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn protected_rejects_token_of_a_deleted_account() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let account = user::Entity::find()
        .one(&app.db)
        .await
        .unwrap()
        .expect("user should exist");
    user::Entity::delete_by_id(account.id)
        .exec(&app.db)
        .await
        .unwrap();

    let res = app.get_with_token(routes::PROTECTED, &token).await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn protected_reports_current_username_after_rename() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let res = app
        .put_with_token(routes::PROFILE, &json!({"username": "alice_w"}), &token)
        .await;
    assert_eq!(res.status, 200);

    let res = app.get_with_token(routes::PROTECTED, &token).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["user"], "alice_w");
}
