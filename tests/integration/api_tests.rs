//! HTTP-level tests for the gateway router.

use std::sync::Arc;

use axum::http::{header, StatusCode};
use http_body_util::BodyExt;
use share_gateway::origin::AssetSize;
use share_gateway::server::{create_router, RouterConfig};

use super::test_utils::{
    body_bytes, body_string, get, test_router, FailingRenderer, MockOrigin, OriginCall, ALBUM,
    ALBUM_SHARE, INDIVIDUAL_SHARE,
};

fn content_type(response: &axum::http::Response<axum::body::Body>) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

// =============================================================================
// Gallery Route
// =============================================================================

#[tokio::test]
async fn test_individual_gallery_page() {
    let origin = Arc::new(MockOrigin::new().with_share("sk", INDIVIDUAL_SHARE));

    let response = get(test_router(&origin), "/share/sk").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/html"));

    let html = body_string(response).await;
    assert!(html.contains("<title>Immich Gallery</title>"));
    assert!(html.contains(r#"href="/asset/a1?key=sk""#));
    assert!(html.contains(r#"src="/asset/a1?key=sk&amp;thumbnail=true""#));
    assert!(!html.contains("/asset/a2"));
    assert!(!html.contains("album-description"));
}

#[tokio::test]
async fn test_album_gallery_page() {
    let origin = Arc::new(
        MockOrigin::new()
            .with_share("ak", ALBUM_SHARE)
            .with_album("alb-1", ALBUM),
    );

    let response = get(test_router(&origin), "/share/ak").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;

    assert!(html.contains("<title>Lisbon</title>"));
    assert!(html.contains("Trams &amp; tiles"));
    assert!(html.contains("3 items"));
    assert!(!html.contains("decoy"));

    let p1 = html.find(r#"href="/asset/p1?key=ak""#).unwrap();
    let p2 = html.find(r#"href="/asset/p2?key=ak""#).unwrap();
    assert!(p1 < p2);
    assert!(html.contains(r#"["/asset/p1?key=ak","/asset/p2?key=ak"]"#));

    assert_eq!(origin.album_fetches().await.len(), 1);
}

#[tokio::test]
async fn test_empty_gallery_still_renders() {
    let share = r#"{"type":"INDIVIDUAL","assets":[{"id":"v","type":"VIDEO"}]}"#;
    let origin = Arc::new(MockOrigin::new().with_share("sk", share));

    let response = get(test_router(&origin), "/share/sk").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(!html.contains("gallery-item"));
    assert!(html.contains(r#"data-count="0""#));
}

#[tokio::test]
async fn test_custom_default_title() {
    let origin = Arc::new(MockOrigin::new().with_share("sk", INDIVIDUAL_SHARE));
    let renderer = Arc::new(share_gateway::render::GalleryTemplate::builtin().unwrap());
    let router = create_router(
        Arc::clone(&origin),
        renderer,
        RouterConfig::default()
            .with_default_title("Family <Photos>")
            .with_tracing(false),
    );

    let html = body_string(get(router, "/share/sk").await).await;
    assert!(html.contains("<title>Family &lt;Photos&gt;</title>"));
}

#[tokio::test]
async fn test_rejected_key_is_404() {
    let origin = Arc::new(MockOrigin::new().with_share_status("expired", 401));

    let response = get(test_router(&origin), "/share/expired").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("not_found"));
    assert!(!body.contains("401"));
}

#[tokio::test]
async fn test_unreachable_origin_is_404() {
    let origin = Arc::new(MockOrigin::new().unreachable());

    let response = get(test_router(&origin), "/share/sk").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(!body.contains("connection refused"));
}

#[tokio::test]
async fn test_album_fetch_failure_is_404() {
    let origin = Arc::new(
        MockOrigin::new()
            .with_share("ak", ALBUM_SHARE)
            .with_album_status("alb-1", 500),
    );

    let response = get(test_router(&origin), "/share/ak").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_share_type_is_500() {
    let share = r#"{"type":"FOLDER","assets":[]}"#;
    let origin = Arc::new(MockOrigin::new().with_share("sk", share));

    let response = get(test_router(&origin), "/share/sk").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(body.contains("share_error"));
    assert!(!body.contains("FOLDER"));
}

#[tokio::test]
async fn test_album_share_without_album_is_500() {
    let share = r#"{"type":"ALBUM","assets":[]}"#;
    let origin = Arc::new(MockOrigin::new().with_share("ak", share));

    let response = get(test_router(&origin), "/share/ak").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_malformed_share_is_500() {
    let origin = Arc::new(MockOrigin::new().with_share("sk", r#"{"type": 7}"#));

    let response = get(test_router(&origin), "/share/sk").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_render_failure_is_500() {
    let origin = Arc::new(MockOrigin::new().with_share("sk", INDIVIDUAL_SHARE));
    let router = create_router(
        Arc::clone(&origin),
        Arc::new(FailingRenderer),
        RouterConfig::default().with_tracing(false),
    );

    let response = get(router, "/share/sk").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(body.contains("render_error"));
    assert!(!body.contains("exploded"));
}

// =============================================================================
// Asset Route
// =============================================================================

#[tokio::test]
async fn test_asset_preview_by_default() {
    let origin = Arc::new(MockOrigin::new().with_asset(
        "a1",
        Some("image/webp"),
        b"thumb-bytes",
        b"preview-bytes",
    ));

    let response = get(test_router(&origin), "/asset/a1?key=sk").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "image/webp");
    assert_eq!(
        response.headers().get(header::CONTENT_LENGTH).unwrap(),
        "13"
    );
    assert_eq!(&body_bytes(response).await[..], b"preview-bytes");

    assert_eq!(
        origin.calls().await,
        vec![OriginCall::Asset {
            asset_id: "a1".to_string(),
            key: "sk".to_string(),
            size: AssetSize::Preview,
        }]
    );
}

#[tokio::test]
async fn test_asset_thumbnail() {
    let origin = Arc::new(MockOrigin::new().with_asset(
        "a1",
        Some("image/webp"),
        b"thumb-bytes",
        b"preview-bytes",
    ));

    let response = get(test_router(&origin), "/asset/a1?key=sk&thumbnail=true").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&body_bytes(response).await[..], b"thumb-bytes");
    assert!(matches!(
        origin.calls().await.as_slice(),
        [OriginCall::Asset {
            size: AssetSize::Thumbnail,
            ..
        }]
    ));
}

#[tokio::test]
async fn test_asset_thumbnail_flag_must_be_exact() {
    let origin = Arc::new(MockOrigin::new().with_asset("a1", None, b"t", b"p"));

    let response = get(test_router(&origin), "/asset/a1?key=sk&thumbnail=yes").await;

    assert_eq!(&body_bytes(response).await[..], b"p");
}

#[tokio::test]
async fn test_asset_default_content_type() {
    let origin = Arc::new(MockOrigin::new().with_asset("a1", None, b"t", b"p"));

    let response = get(test_router(&origin), "/asset/a1?key=sk").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "image/jpeg");
}

#[tokio::test]
async fn test_asset_missing_key_forwards_empty_key() {
    let origin = Arc::new(MockOrigin::new().with_asset("a1", None, b"t", b"p"));

    let response = get(test_router(&origin), "/asset/a1").await;

    // The origin decides what an empty key grants; the mock grants everything
    assert_eq!(response.status(), StatusCode::OK);
    assert!(matches!(
        origin.calls().await.as_slice(),
        [OriginCall::Asset { key, .. }] if key.is_empty()
    ));
}

#[tokio::test]
async fn test_asset_key_is_decoded() {
    let origin = Arc::new(MockOrigin::new().with_asset("a1", None, b"t", b"p"));

    let _ = get(test_router(&origin), "/asset/a1?key=a%20b%26c").await;

    assert!(matches!(
        origin.calls().await.as_slice(),
        [OriginCall::Asset { key, .. }] if key == "a b&c"
    ));
}

#[tokio::test]
async fn test_unknown_asset_is_404() {
    let origin = Arc::new(MockOrigin::new());

    let response = get(test_router(&origin), "/asset/missing?key=sk").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(content_type(&response).starts_with("application/json"));
}

#[tokio::test]
async fn test_asset_unreachable_origin_is_404() {
    let origin = Arc::new(MockOrigin::new().with_asset("a1", None, b"t", b"p").unreachable());

    let response = get(test_router(&origin), "/asset/a1?key=sk").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_asset_stream_failure_after_headers() {
    let origin = Arc::new(MockOrigin::new().with_broken_asset("a1"));

    let response = get(test_router(&origin), "/asset/a1?key=sk").await;

    // Status is committed before the body fails
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.into_body().collect().await.is_err());
}

// =============================================================================
// Undecodable Paths
// =============================================================================

#[tokio::test]
async fn test_undecodable_share_key_is_404() {
    let origin = Arc::new(MockOrigin::new().with_share_status("ok", 401));

    let response = get(test_router(&origin), "/share/%FF").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("not_found"));
    assert!(origin.calls().await.is_empty());
}

#[tokio::test]
async fn test_undecodable_asset_id_is_404() {
    let origin = Arc::new(MockOrigin::new().with_asset("a1", None, b"t", b"p"));

    let response = get(test_router(&origin), "/asset/%FF?key=k").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(origin.calls().await.is_empty());
}

// =============================================================================
// Fallback
// =============================================================================

#[tokio::test]
async fn test_root_is_404() {
    let origin = Arc::new(MockOrigin::new());

    let response = get(test_router(&origin), "/").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(origin.calls().await.is_empty());
}

#[tokio::test]
async fn test_unknown_paths_are_404() {
    let origin = Arc::new(MockOrigin::new());

    for uri in ["/api/shared-links/me", "/share", "/share/a/b", "/assets/a1", "/health"] {
        let response = get(test_router(&origin), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri: {}", uri);
    }
    assert!(origin.calls().await.is_empty());
}
