use actix_web::test;

use crate::common::assert_off_limits;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn error_page_is_forbidden_html() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/error").to_request()).await;
    assert_off_limits(resp).await;
    Ok(())
}

#[actix_web::test]
async fn deny_path_answers_any_method() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    for req in [
        test::TestRequest::get().uri("/").to_request(),
        test::TestRequest::post().uri("/").to_request(),
        test::TestRequest::post().uri("/error").to_request(),
    ] {
        assert_off_limits(test::call_service(&app, req).await).await;
    }
    Ok(())
}

#[actix_web::test]
async fn health_is_ok() -> Result<(), Box<dyn std::error::Error>> {
    let app = create_test_app(build_test_state().await?).build().await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(test::read_body(resp).await, "ok");
    Ok(())
}
