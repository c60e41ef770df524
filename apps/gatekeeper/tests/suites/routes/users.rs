// User management handlers behind a privileged token.

use actix_web::test;
use gatekeeper::auth::password::verify_password;
use serde_json::{json, Value};

use crate::common::assert_problem;
use crate::support::keys::{bearer, mint_token, PRIVILEGED};
use crate::support::{build_test_state, create_test_app, seed_user};

fn admin() -> (&'static str, String) {
    bearer(&mint_token("admin@example.com", PRIVILEGED))
}

#[actix_web::test]
async fn create_user_stores_hash_and_name() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let users = state.users.clone();
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/user")
        .insert_header(admin())
        .set_json(json!({"email": "jane.doe@example.com", "pass": "pw", "role": "2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "jane.doe@example.com");

    let stored = users.find("jane.doe@example.com").await?.unwrap();
    assert_eq!(stored.name, "jane.doe");
    assert_eq!(stored.role, 2);
    assert_ne!(stored.password_hash, "pw");
    assert!(verify_password(&stored.password_hash, "pw").is_ok());
    Ok(())
}

#[actix_web::test]
async fn overwrite_keeps_created_timestamp() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    seed_user(&state, "a@example.com", "first", 1).await;
    let users = state.users.clone();
    let before = users.find("a@example.com").await?.unwrap();
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/user")
        .insert_header(admin())
        .set_json(json!({"email": "a@example.com", "password": "second", "role": 3}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    let after = users.find("a@example.com").await?.unwrap();
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
    assert_eq!(after.role, 3);
    assert!(verify_password(&after.password_hash, "second").is_ok());
    Ok(())
}

#[actix_web::test]
async fn create_user_validates_fields() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    for body in [
        json!({"email": "no-at-sign", "pass": "pw", "role": 1}),
        json!({"email": "a@example.com", "pass": "", "role": 1}),
        json!({"email": "a@example.com", "pass": "pw", "role": -1}),
    ] {
        let req = test::TestRequest::post()
            .uri("/user")
            .insert_header(admin())
            .set_json(body)
            .to_request();
        assert_problem(test::call_service(&app, req).await, 400, "VALIDATION_ERROR").await;
    }

    let req = test::TestRequest::post()
        .uri("/user")
        .insert_header(admin())
        .set_json(json!({"email": "a@example.com", "role": "admin"}))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 400, "BAD_REQUEST").await;
    Ok(())
}

#[actix_web::test]
async fn listing_is_newest_first_and_hash_free() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    for email in ["first@example.com", "second@example.com", "third@example.com"] {
        seed_user(&state, email, "pw", 1).await;
    }
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/users/0")
        .insert_header(admin())
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let emails: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(
        emails,
        ["third@example.com", "second@example.com", "first@example.com"]
    );

    let entry = &body[0];
    assert_eq!(entry["name"], "third");
    assert_eq!(entry["role"], "1");
    assert!(entry["date"].is_string());
    assert!(entry["update"].is_string());
    assert!(entry.get("password_hash").is_none());
    assert!(!body.to_string().contains("$2"));

    let req = test::TestRequest::get()
        .uri("/users/2")
        .insert_header(admin())
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["email"], "first@example.com");
    Ok(())
}

#[actix_web::test]
async fn non_numeric_offset_is_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    for uri in ["/users/abc", "/users/-1"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(admin())
            .to_request();
        assert_problem(test::call_service(&app, req).await, 400, "INVALID_PATH_PARAM").await;
    }
    Ok(())
}

#[actix_web::test]
async fn delete_removes_then_reports_missing() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    seed_user(&state, "gone@example.com", "pw", 1).await;
    let users = state.users.clone();
    let app = create_test_app(state).build().await;

    let delete = || {
        test::TestRequest::post()
            .uri("/user/delete")
            .insert_header(admin())
            .set_json(json!({"email": "gone@example.com"}))
            .to_request()
    };

    assert_eq!(test::call_service(&app, delete()).await.status().as_u16(), 200);
    assert!(users.find("gone@example.com").await?.is_none());

    assert_problem(test::call_service(&app, delete()).await, 404, "USER_NOT_FOUND").await;
    Ok(())
}

#[actix_web::test]
async fn repassword_checks_current_password() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    seed_user(&state, "user@example.com", "oldPw", 1).await;
    let users = state.users.clone();
    let app = create_test_app(state).build().await;
    let own = bearer(&mint_token("user@example.com", 1));

    let req = test::TestRequest::post()
        .uri("/user/repassword")
        .insert_header(own.clone())
        .set_json(json!({"email": "user@example.com", "pass": "wrongPw", "pass2": "newPw"}))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 401, "INVALID_CREDENTIALS").await;

    let req = test::TestRequest::post()
        .uri("/user/repassword")
        .insert_header(own)
        .set_json(json!({"email": "user@example.com", "pass": "oldPw", "pass2": "newPw"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    let stored = users.find("user@example.com").await?.unwrap();
    assert!(verify_password(&stored.password_hash, "newPw").is_ok());
    assert_eq!(stored.role, 1);
    Ok(())
}

#[actix_web::test]
async fn repassword_for_someone_else_needs_privilege() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    seed_user(&state, "victim@example.com", "pw", 1).await;
    let app = create_test_app(state).build().await;

    let body = json!({"email": "victim@example.com", "pass": "pw", "pass2": "owned"});

    let req = test::TestRequest::post()
        .uri("/user/repassword")
        .insert_header(bearer(&mint_token("mallory@example.com", 1)))
        .set_json(&body)
        .to_request();
    assert_problem(test::call_service(&app, req).await, 403, "FORBIDDEN").await;

    let req = test::TestRequest::post()
        .uri("/user/repassword")
        .insert_header(admin())
        .set_json(&body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);
    Ok(())
}
