mod common;

use axum::{body::Body, http::Request};
use common::{app, garch_prices, StubProvider};
use tower::ServiceExt;

#[tokio::test]
async fn healthz_works() {
    let app = app(StubProvider::table(garch_prices(10, 1)));

    let response = app
        .oneshot(Request::builder().uri("/api/v1/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");
}
