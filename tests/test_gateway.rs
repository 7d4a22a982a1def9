//! Integration tests for the HTTP dispatcher.
//! Drives the router directly, with a recording launcher in place of the OS.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use openbrowser::audit::ActivityLog;
use openbrowser::gateway::protocol::DEFAULT_PREFIX;
use openbrowser::gateway::server::router;
use openbrowser::gateway::{GatewayState, Launcher, RecordingLauncher};
use openbrowser::policy::{ConfigStore, RateState, UrlValidator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tower::ServiceExt;

/// Helper: a router over the fixture settings, plus the launcher it uses.
fn setup(settings: &str) -> (Router, Arc<RecordingLauncher>, TempDir) {
    let launcher = Arc::new(RecordingLauncher::new());
    let (app, tmp) = setup_with_launcher(settings, launcher.clone());
    (app, launcher, tmp)
}

fn setup_with_launcher(settings: &str, launcher: Arc<dyn Launcher>) -> (Router, TempDir) {
    let tmp = TempDir::new().unwrap();
    let settings_path = tmp.path().join("setting.yaml");
    std::fs::write(&settings_path, settings).unwrap();

    let log = Arc::new(ActivityLog::with_path(tmp.path().join("openbrowser.log")).quiet());
    let validator = UrlValidator::new(
        ConfigStore::new(settings_path),
        Arc::new(RateState::starting_at(Instant::now() - Duration::from_secs(60))),
        log.clone(),
    );
    let state = GatewayState::new(validator, launcher, log, DEFAULT_PREFIX);

    (router(Arc::new(state)), tmp)
}

/// Launcher that panics on its first call and records nothing.
#[derive(Default)]
struct PanicOnceLauncher {
    panicked: AtomicBool,
}

impl Launcher for PanicOnceLauncher {
    fn launch(&self, _target: &str) -> anyhow::Result<()> {
        if !self.panicked.swap(true, Ordering::SeqCst) {
            panic!("launcher blew up");
        }
        Ok(())
    }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_allowed_url_is_launched() {
    let (app, launcher, _tmp) = setup(include_str!("fixtures/setting.yaml"));

    let (status, body) = get(
        &app,
        "/Temporary_Listen_Addresses/openURL/https://www.example.com/watch?v=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "> https://www.example.com/watch?v=1\nTrue");
    assert_eq!(launcher.launched(), vec!["https://www.example.com/watch?v=1"]);
}

#[tokio::test]
async fn test_rejected_url_is_still_200() {
    let (app, launcher, _tmp) = setup(include_str!("fixtures/setting.yaml"));

    let (status, body) = get(&app, "/Temporary_Listen_Addresses/openURL/https://evil.net/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "> https://evil.net/\nFalse");
    assert!(launcher.launched().is_empty());
}

#[tokio::test]
async fn test_marker_without_slash() {
    let (app, launcher, _tmp) = setup(include_str!("fixtures/setting.yaml"));

    let (status, body) = get(&app, "/Temporary_Listen_Addresses/openURLhttps://example.com/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "> https://example.com/\nTrue");
    assert_eq!(launcher.launched().len(), 1);
}

#[tokio::test]
async fn test_second_call_inside_cooldown_is_rejected() {
    let (app, launcher, _tmp) = setup(include_str!("fixtures/setting.yaml"));
    let uri = "/Temporary_Listen_Addresses/openURL/https://example.com/";

    let (_, first) = get(&app, uri).await;
    let (status, second) = get(&app, uri).await;

    assert!(first.ends_with("True"));
    assert_eq!(status, StatusCode::OK);
    assert!(second.ends_with("False"));
    assert_eq!(launcher.launched().len(), 1);
}

#[tokio::test]
async fn test_missing_marker_is_bad_request() {
    let (app, launcher, _tmp) = setup(include_str!("fixtures/setting.yaml"));

    let (status, body) = get(&app, "/Temporary_Listen_Addresses/open/https://example.com/").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("openURL"));
    assert!(launcher.launched().is_empty());
}

#[tokio::test]
async fn test_outside_prefix_is_not_found() {
    let (app, _launcher, _tmp) = setup(include_str!("fixtures/setting.yaml"));

    let (status, _) = get(&app, "/elsewhere/openURL/https://example.com/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_any_method_is_dispatched() {
    let (app, launcher, _tmp) = setup(include_str!("fixtures/setting.yaml"));

    let response = app
        .oneshot(
            Request::post("/Temporary_Listen_Addresses/openURL/vrchat://vrchat.com/launch")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(launcher.launched(), vec!["vrchat://vrchat.com/launch"]);
}

#[tokio::test]
async fn test_broken_settings_reject_without_failing() {
    let (app, launcher, _tmp) = setup("this is not a settings file");

    let (status, body) = get(&app, "/Temporary_Listen_Addresses/openURL/https://example.com/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "> https://example.com/\nFalse");
    assert!(launcher.launched().is_empty());
}

#[tokio::test]
async fn test_handler_panic_is_500_and_router_keeps_serving() {
    let settings = "CheckUpdate: false\nIdlePeriod: 1\nProtocol:\n - https\nDomain:\n - example.com\n";
    let (app, _tmp) = setup_with_launcher(settings, Arc::new(PanicOnceLauncher::default()));
    let uri = "/Temporary_Listen_Addresses/openURL/https://example.com/";

    let (status, body) = get(&app, uri).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Unexpected error, see the log");

    tokio::time::sleep(Duration::from_millis(20)).await;
    let (status, body) = get(&app, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "> https://example.com/\nTrue");
}
