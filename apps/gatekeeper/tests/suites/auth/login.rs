// POST /login: form credentials in, signed token out.

use std::time::Duration;

use actix_web::test;
use gatekeeper::auth::token::decode_token;
use gatekeeper::StateBuilder;

use crate::common::assert_problem;
use crate::support::keys::{fixture_key_source, fixture_root, test_security, BUCKET, PRIVILEGED};
use crate::support::{build_test_state, create_test_app, seed_user};

fn public_pem() -> Vec<u8> {
    std::fs::read(fixture_root().join(BUCKET).join("signature/id_rsa.pub.pkcs8")).unwrap()
}

fn login_request(email: &str, password: &str) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/login")
        .set_form(&[("email", email), ("password", password)])
        .to_request()
}

#[actix_web::test]
async fn login_returns_verifiable_token() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    seed_user(&state, "admin@example.com", "correctPw", PRIVILEGED).await;
    let app = create_test_app(state).build().await;

    let resp = test::call_service(&app, login_request("admin@example.com", "correctPw")).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "admin@example.com");
    assert_eq!(body["role"], "5");

    let token = body["token"].as_str().unwrap();
    let claims = decode_token(token, &public_pem())?;
    assert_eq!(claims.subject, "admin@example.com");
    assert_eq!(claims.role, PRIVILEGED);
    assert_eq!(claims.issuer, "gatekeeper-test");
    Ok(())
}

#[actix_web::test]
async fn wrong_password_and_unknown_user_look_the_same() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    seed_user(&state, "user@example.com", "correctPw", 1).await;
    let app = create_test_app(state).build().await;

    let wrong = test::call_service(&app, login_request("user@example.com", "wrongPw")).await;
    let wrong_body: serde_json::Value = test::read_body_json(wrong).await;

    let unknown = test::call_service(&app, login_request("ghost@example.com", "correctPw")).await;
    let unknown_body: serde_json::Value = test::read_body_json(unknown).await;

    assert_eq!(wrong_body["status"], 401);
    assert_eq!(wrong_body["code"], "INVALID_CREDENTIALS");
    assert_eq!(wrong_body["code"], unknown_body["code"]);
    assert_eq!(wrong_body["detail"], unknown_body["detail"]);
    Ok(())
}

#[actix_web::test]
async fn unknown_user_still_pays_for_bcrypt() -> Result<(), Box<dyn std::error::Error>> {
    // a verify at cost 12 cannot finish in 1ms, so only a skipped verify would return 401 here
    let security = test_security()
        .with_bcrypt_cost(12)
        .with_hash_timeout(Duration::from_millis(1));
    let state = StateBuilder::new(security)
        .with_database_url("sqlite::memory:")
        .with_key_source(fixture_key_source())
        .build()
        .await?;
    let app = create_test_app(state).build().await;

    let resp = test::call_service(&app, login_request("ghost@example.com", "whatever")).await;
    assert_problem(resp, 503, "CREDENTIAL_BACKEND").await;
    Ok(())
}

#[actix_web::test]
async fn failed_login_is_problem_details() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let resp = test::call_service(&app, login_request("ghost@example.com", "pw")).await;
    assert_problem(resp, 401, "INVALID_CREDENTIALS").await;
    Ok(())
}

#[actix_web::test]
async fn missing_form_field_is_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(&[("email", "a@x.com")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 400, "BAD_REQUEST").await;
    Ok(())
}

#[actix_web::test]
async fn empty_password_is_validation_error() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let resp = test::call_service(&app, login_request("a@x.com", "")).await;
    assert_problem(resp, 400, "VALIDATION_ERROR").await;
    Ok(())
}

#[actix_web::test]
async fn login_token_opens_protected_routes() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    seed_user(&state, "admin@example.com", "correctPw", PRIVILEGED).await;
    let app = create_test_app(state).build().await;

    let resp = test::call_service(&app, login_request("admin@example.com", "correctPw")).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri("/users/0")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    Ok(())
}
