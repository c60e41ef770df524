// Authorization gate ordering, observed through the HTTP surface.

use actix_web::test;

use crate::common::assert_off_limits;
use crate::support::keys::{bearer, mint_expired_token, mint_token, PRIVILEGED};
use crate::support::{build_test_state, create_test_app, seed_user};

#[actix_web::test]
async fn login_needs_no_token() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(&[("email", "a@x.com"), ("password", "pw")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    // reached the handler: unknown user, not the error page
    assert_eq!(resp.status().as_u16(), 401);
    Ok(())
}

#[actix_web::test]
async fn unprotected_paths_need_no_token() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);
    Ok(())
}

#[actix_web::test]
async fn missing_token_shows_error_page() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    for (method, uri) in [
        ("POST", "/user"),
        ("GET", "/users/0"),
        ("POST", "/user/delete"),
        ("POST", "/user/repassword"),
    ] {
        let req = match method {
            "GET" => test::TestRequest::get(),
            _ => test::TestRequest::post(),
        }
        .uri(uri)
        .to_request();
        assert_off_limits(test::call_service(&app, req).await).await;
    }
    Ok(())
}

#[actix_web::test]
async fn malformed_authorization_header_shows_error_page() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let token = mint_token("admin@example.com", PRIVILEGED);
    for value in [
        "Bearer".to_string(),
        format!("Basic {token}"),
        format!("Bearer {token} extra"),
    ] {
        let req = test::TestRequest::get()
            .uri("/users/0")
            .insert_header(("Authorization", value))
            .to_request();
        assert_off_limits(test::call_service(&app, req).await).await;
    }
    Ok(())
}

#[actix_web::test]
async fn invalid_or_expired_token_shows_error_page() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    for token in [
        "not-a-token".to_string(),
        mint_expired_token("admin@example.com", PRIVILEGED),
    ] {
        let req = test::TestRequest::get()
            .uri("/users/0")
            .insert_header(bearer(&token))
            .to_request();
        assert_off_limits(test::call_service(&app, req).await).await;
    }
    Ok(())
}

#[actix_web::test]
async fn privileged_token_reaches_user_management() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let req = test::TestRequest::post()
        .uri("/user")
        .insert_header(bearer(&mint_token("admin@example.com", PRIVILEGED)))
        .set_json(serde_json::json!({"email": "new@example.com", "pass": "pw", "role": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    Ok(())
}

#[actix_web::test]
async fn ordinary_token_is_denied_management() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let token = mint_token("user@example.com", 1);
    let req = test::TestRequest::post()
        .uri("/user")
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({"email": "new@example.com", "pass": "pw", "role": 5}))
        .to_request();
    assert_off_limits(test::call_service(&app, req).await).await;

    let req = test::TestRequest::get()
        .uri("/users/0")
        .insert_header(bearer(&token))
        .to_request();
    assert_off_limits(test::call_service(&app, req).await).await;
    Ok(())
}

#[actix_web::test]
async fn ordinary_token_reaches_self_service() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    seed_user(&state, "user@example.com", "oldPw", 1).await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/user/repassword")
        .insert_header(bearer(&mint_token("user@example.com", 1)))
        .set_json(serde_json::json!({
            "email": "user@example.com",
            "pass": "oldPw",
            "pass2": "newPw"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    Ok(())
}

#[actix_web::test]
async fn denied_responses_carry_trace_id() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/users/0").to_request()).await;
    assert!(resp.headers().contains_key("x-trace-id"));
    Ok(())
}

#[actix_web::test]
async fn percent_encoded_protected_paths_still_need_a_token() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state.clone()).build().await;

    let body = serde_json::json!({"email": "evil@example.com", "pass": "pw", "role": PRIVILEGED});
    for uri in ["/%75ser", "/u%73er", "/%75%73%65%72", "/%75ser/delete"] {
        let req = test::TestRequest::post().uri(uri).set_json(&body).to_request();
        assert_off_limits(test::call_service(&app, req).await).await;
    }
    for uri in ["/%75sers/0", "/user%73/0"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_off_limits(test::call_service(&app, req).await).await;
    }

    assert!(state.users.find("evil@example.com").await?.is_none());
    Ok(())
}

#[actix_web::test]
async fn percent_encoded_self_service_path_is_still_self_service() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    seed_user(&state, "user@example.com", "oldPw", 1).await;
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/user/r%65password")
        .insert_header(bearer(&mint_token("user@example.com", 1)))
        .set_json(serde_json::json!({
            "email": "user@example.com",
            "pass": "oldPw",
            "pass2": "newPw"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    Ok(())
}
