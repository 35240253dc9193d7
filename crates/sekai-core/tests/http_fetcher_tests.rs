//! Integration tests for the HTTP fetch path.
//!
//! Each test serves repository documents from a local axum server bound to an
//! ephemeral port and loads them through the default reqwest-backed fetcher.

use axum::{body::Body, http::StatusCode, routing::get, Json, Router};
use futures::StreamExt;
use sekai_core::{
    reload_repositories, QueueNotifier, RepositoryDescriptor, RepositoryEntry, RepositoryManager,
    RepositorySettings,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Start a server for `app` and return its address.
async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Routes for a healthy repository mounted at `/{prefix}`.
fn repository_routes(
    router: Router,
    prefix: &str,
    name: &str,
    meta_hits: Arc<AtomicUsize>,
) -> Router {
    let name = name.to_string();
    router
        .route(
            &format!("/{}/meta.json", prefix),
            get(move || {
                meta_hits.fetch_add(1, Ordering::SeqCst);
                let name = name.clone();
                async move { Json(json!({ "name": name, "version": "1.0" })) }
            }),
        )
        .route(
            &format!("/{}/characters.json", prefix),
            get(|| async {
                Json(json!([
                    {
                        "id": "01",
                        "name": "Miku",
                        "character": "Miku Hatsune",
                        "img": "01.png",
                        "color": "#33ccaa",
                        "defaultText": { "text": "hello", "x": 10, "y": 20, "s": 30, "r": 0 }
                    },
                    {
                        "id": "02",
                        "name": "Rin",
                        "character": "Rin Kagamine",
                        "img": "stickers/rin/02.png",
                        "color": "#ffcc11"
                    }
                ]))
            }),
        )
}

fn manager() -> (RepositoryManager, Arc<QueueNotifier>) {
    manager_with_timeout(Duration::from_secs(5))
}

fn manager_with_timeout(timeout: Duration) -> (RepositoryManager, Arc<QueueNotifier>) {
    let notifications = Arc::new(QueueNotifier::new());
    let manager = RepositoryManager::builder()
        .request_timeout(timeout)
        .notifier(notifications.clone())
        .build()
        .unwrap();
    (manager, notifications)
}

#[tokio::test]
async fn test_load_over_http() {
    let hits = Arc::new(AtomicUsize::new(0));
    let addr = serve(repository_routes(Router::new(), "alpha", "Alpha", hits.clone())).await;
    let (manager, notifications) = manager();
    let base = format!("http://{}/alpha", addr);

    let data = manager
        .load_repository(&RepositoryDescriptor::new("Alpha", &base))
        .await
        .expect("load should succeed");

    assert_eq!(data.meta.name, "Alpha");
    assert_eq!(data.meta.version.as_deref(), Some("1.0"));
    assert_eq!(data.characters.len(), 2);

    let miku = manager.character_by_unique_id("Alpha:01").unwrap();
    assert_eq!(miku.character, "Miku Hatsune");
    // Unknown fields never reach the serialized form
    let json = serde_json::to_value(&miku).unwrap();
    assert!(json.get("defaultText").is_none());

    let rin = manager.sticker_draft("Alpha:02").unwrap();
    assert_eq!(rin.image_url, format!("{}/stickers/rin/02.png", base));

    assert!(notifications.is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_http_loads_fetch_once() {
    let hits = Arc::new(AtomicUsize::new(0));
    let addr = serve(repository_routes(Router::new(), "alpha", "Alpha", hits.clone())).await;
    let (manager, _) = manager();
    let descriptor = RepositoryDescriptor::new("Alpha", format!("http://{}/alpha", addr));

    let (a, b) = tokio::join!(
        manager.load_repository(&descriptor),
        manager.load_repository(&descriptor)
    );

    assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    manager.load_repository(&descriptor).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_partial_failure_over_http() {
    let first_hits = Arc::new(AtomicUsize::new(0));
    let third_hits = Arc::new(AtomicUsize::new(0));
    let router = repository_routes(Router::new(), "first", "First", first_hits);
    let router = repository_routes(router, "third", "Third", third_hits);
    // The second repository only has a character list; its meta.json is a 404
    let router = router.route(
        "/second/characters.json",
        get(|| async { Json(json!([])) }),
    );
    let addr = serve(router).await;
    let (manager, notifications) = manager();

    let settings = RepositorySettings::new(
        ["first", "second", "third"]
            .iter()
            .map(|prefix| {
                RepositoryEntry::new(format!("http://{}/{}/meta.json", addr, prefix), *prefix)
            })
            .collect(),
    );

    let report = reload_repositories(&manager, &settings).await;

    assert_eq!(report.loaded.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name(), "second");

    let mut names: Vec<_> = manager
        .all_repositories()
        .iter()
        .map(|d| d.meta.name.clone())
        .collect();
    names.sort();
    assert_eq!(names, vec!["First", "Third"]);

    let sent = notifications.drain();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("\"second\""));
    assert!(sent[0].body.contains("404"));
}

#[tokio::test]
async fn test_malformed_documents_over_http() {
    let router = Router::new()
        .route("/broken/meta.json", get(|| async { "this is not json" }))
        .route(
            "/shapeless/meta.json",
            get(|| async { Json(json!({ "name": "Shapeless" })) }),
        )
        .route(
            "/shapeless/characters.json",
            get(|| async { Json(json!([{ "id": "01", "name": "Missing fields" }])) }),
        )
        .route(
            "/erroring/meta.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    let addr = serve(router).await;
    let (manager, notifications) = manager();

    for prefix in ["broken", "shapeless", "erroring"] {
        let descriptor = RepositoryDescriptor::new(prefix, format!("http://{}/{}", addr, prefix));
        assert!(manager.load_repository(&descriptor).await.is_none());
        assert!(!manager.is_loading(descriptor.url()));
    }

    let sent = notifications.drain();
    assert_eq!(sent.len(), 3);
    assert!(sent[0].body.contains("JSON error"));
    assert!(sent[1].body.contains("JSON error"));
    assert!(sent[2].body.contains("500"));
    assert_eq!(manager.repository_count(), 0);
}

#[tokio::test]
async fn test_unreachable_host() {
    // Bind and drop a listener to get a port nothing is serving on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (manager, notifications) = manager();
    let descriptor = RepositoryDescriptor::new("Gone", format!("http://{}/gone", addr));

    assert!(manager.load_repository(&descriptor).await.is_none());
    let sent = notifications.drain();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("Network error"));
}

#[tokio::test]
async fn test_probe_over_http() {
    let hits = Arc::new(AtomicUsize::new(0));
    let addr = serve(repository_routes(Router::new(), "alpha", "Alpha", hits)).await;
    let (manager, _) = manager();

    let name = manager
        .probe_repository(&format!("http://{}/alpha/meta.json", addr))
        .await;
    assert_eq!(name.as_deref(), Some("Alpha"));

    let missing = manager
        .probe_repository(&format!("http://{}/nowhere/meta.json", addr))
        .await;
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_stalled_body_reports_configured_timeout() {
    // Headers and the first chunk go out at once; the rest never arrives
    let router = Router::new().route(
        "/slow/meta.json",
        get(|| async {
            let chunks = futures::stream::once(async { Ok::<_, std::io::Error>("{\"name\":") })
                .chain(futures::stream::once(async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok::<_, std::io::Error>("\"Slow\"}")
                }));
            Body::from_stream(chunks)
        }),
    );
    let addr = serve(router).await;
    let (manager, notifications) = manager_with_timeout(Duration::from_millis(500));

    let descriptor = RepositoryDescriptor::new("Slow", format!("http://{}/slow", addr));
    assert!(manager.load_repository(&descriptor).await.is_none());

    let sent = notifications.drain();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("Request timeout after 500ms"), "{}", sent[0].body);
}
