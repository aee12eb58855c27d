//! Classifier and worker pool behaviour against mock HTTP servers

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use url_sweep::batch::JobBatch;
use url_sweep::config::{ProbeConfig, UserAgentConfig};
use url_sweep::dispatch::{DispatchPlan, DispatchSettings, Dispatcher};
use url_sweep::probe::{
    build_classifier, build_http_client, Classification, Classifier, ExistenceProbe,
    MarkerInspector, ProbeMode, ResponsivenessProbe, MAX_INSPECTED_BYTES,
};
use url_sweep::report::aggregate;
use url_sweep::run::probe_batch;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A local URL that refuses connections
fn unreachable_url(suffix: &str) -> String {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
        listener.local_addr().expect("local addr").port()
    };
    format!("http://127.0.0.1:{}/{}", port, suffix)
}

async fn mount_page(server: &MockServer, page: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn existence_classifier() -> Arc<dyn Classifier> {
    build_classifier(&ProbeConfig::default(), &UserAgentConfig::default())
        .expect("Failed to build classifier")
}

fn responsiveness_classifier() -> Arc<dyn Classifier> {
    let client = reqwest::Client::new();
    let inspector = MarkerInspector::new("meta", "viewport").expect("valid selector");
    Arc::new(ResponsivenessProbe::new(client, inspector))
}

async fn sweep(classifier: Arc<dyn Classifier>, urls: Vec<String>) -> Vec<(String, String)> {
    let results = Dispatcher::new(classifier, DispatchSettings::new(650, 25).unwrap())
        .run(&JobBatch::new(urls))
        .await
        .expect("Dispatch failed");

    aggregate(results)
        .pairs()
        .map(|(url, token)| (url.to_string(), token.to_string()))
        .collect()
}

#[tokio::test]
async fn test_both_reachable_exist() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", 200, "<html></html>").await;
    mount_page(&server, "/b", 200, "<html></html>").await;

    let a = format!("{}/a", server.uri());
    let b = format!("{}/b", server.uri());

    let rows = sweep(existence_classifier(), vec![a.clone(), b.clone()]).await;

    assert_eq!(
        rows,
        vec![(a, "Exists".to_string()), (b, "Exists".to_string())]
    );
}

#[tokio::test]
async fn test_unreachable_url_does_not_exist_and_sorts() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", 200, "<html></html>").await;

    let reachable = format!("{}/a", server.uri());
    let dead = unreachable_url("z");

    let rows = sweep(existence_classifier(), vec![dead.clone(), reachable.clone()]).await;

    assert_eq!(rows.len(), 2);
    assert!(rows[0].0 <= rows[1].0, "rows not sorted: {:?}", rows);
    for (url, token) in &rows {
        if *url == dead {
            assert_eq!(token, "Don't Exist");
        } else {
            assert_eq!(*url, reachable);
            assert_eq!(token, "Exists");
        }
    }
}

#[tokio::test]
async fn test_empty_batch_yields_nothing() {
    let rows = sweep(existence_classifier(), Vec::new()).await;
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_error_status_still_exists_by_default() {
    let server = MockServer::start().await;
    mount_page(&server, "/gone", 404, "not found").await;
    mount_page(&server, "/broken", 500, "oops").await;

    let client = build_http_client(&UserAgentConfig::default(), &ProbeConfig::default()).unwrap();
    let lenient = ExistenceProbe::new(client.clone());
    let strict = ExistenceProbe::new(client).error_status_means_missing(true);

    for page in ["/gone", "/broken"] {
        let url = format!("{}{}", server.uri(), page);
        assert_eq!(lenient.classify(&url).await, Classification::Exists);
        assert_eq!(strict.classify(&url).await, Classification::DoesNotExist);
    }
}

#[tokio::test]
async fn test_responsiveness_outcomes() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/mobile",
        200,
        r#"<html><head><meta name="viewport" content="width=device-width"></head></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/desktop",
        200,
        r#"<html><head><meta charset="utf-8"></head><body>viewport</body></html>"#,
    )
    .await;

    let classifier = responsiveness_classifier();

    assert_eq!(
        classifier
            .classify(&format!("{}/mobile", server.uri()))
            .await,
        Classification::Responsive
    );
    assert_eq!(
        classifier
            .classify(&format!("{}/desktop", server.uri()))
            .await,
        Classification::NotResponsive
    );
    assert_eq!(
        classifier.classify(&unreachable_url("mobile")).await,
        Classification::DoesNotExist
    );
}

#[tokio::test]
async fn test_responsiveness_report_tokens() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/mobile",
        200,
        r#"<html><head><meta name="viewport" content="width=device-width"></head></html>"#,
    )
    .await;
    mount_page(&server, "/plain", 200, "<html><head></head></html>").await;

    let mobile = format!("{}/mobile", server.uri());
    let plain = format!("{}/plain", server.uri());

    let rows = sweep(responsiveness_classifier(), vec![plain.clone(), mobile.clone()]).await;

    assert_eq!(
        rows,
        vec![(mobile, "True".to_string()), (plain, "False".to_string())]
    );
}

#[tokio::test]
async fn test_request_timeout_maps_to_does_not_exist() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hang"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    mount_page(&server, "/quick", 200, "<html></html>").await;

    let mut probe = ProbeConfig::default();
    probe.mode = ProbeMode::Existence;
    probe.request_timeout_secs = 1;
    let classifier = build_classifier(&probe, &UserAgentConfig::default()).unwrap();

    let hang = format!("{}/hang", server.uri());
    let quick = format!("{}/quick", server.uri());
    let rows = sweep(classifier, vec![hang.clone(), quick.clone()]).await;

    assert_eq!(
        rows,
        vec![
            (hang, "Don't Exist".to_string()),
            (quick, "Exists".to_string())
        ]
    );
}

#[tokio::test]
async fn test_input_order_does_not_change_report() {
    let server = MockServer::start().await;
    for page in ["/1", "/2", "/3", "/4"] {
        mount_page(&server, page, 200, "<html></html>").await;
    }

    let mut urls: Vec<String> = ["/3", "/1", "/4", "/2", "/1"]
        .iter()
        .map(|p| format!("{}{}", server.uri(), p))
        .collect();
    urls.push(unreachable_url("dead"));

    let forward = sweep(existence_classifier(), urls.clone()).await;

    urls.reverse();
    let backward = sweep(existence_classifier(), urls).await;

    assert_eq!(forward.len(), 6);
    assert_eq!(forward, backward);
}

#[tokio::test]
async fn test_probe_batch_honours_preset_cancel() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", 200, "<html></html>").await;

    let (_tx, cancel) = watch::channel(true);
    let batch = JobBatch::new(vec![format!("{}/a", server.uri())]);

    let (rows, cancelled) = probe_batch(
        existence_classifier(),
        DispatchSettings::new(4, 1).unwrap(),
        &batch,
        cancel,
    )
    .await
    .unwrap();

    assert!(cancelled);
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_hanging_url_does_not_strand_its_chunk_mates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hang"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(60)))
        .mount(&server)
        .await;
    for page in ["/q1", "/q2", "/q3"] {
        mount_page(&server, page, 200, "<html></html>").await;
    }

    let mut config = ProbeConfig::default();
    config.request_timeout_secs = 1;
    let classifier = build_classifier(&config, &UserAgentConfig::default()).unwrap();

    let settings = DispatchSettings::new(2, 25).unwrap();
    assert_eq!(
        settings.plan(4),
        DispatchPlan {
            workers: 2,
            chunk_size: 2
        }
    );

    let urls: Vec<String> = ["/hang", "/q1", "/q2", "/q3"]
        .iter()
        .map(|p| format!("{}{}", server.uri(), p))
        .collect();
    let batch = JobBatch::new(urls);

    let results = tokio::time::timeout(
        Duration::from_secs(20),
        Dispatcher::new(classifier, settings).run(&batch),
    )
    .await
    .expect("batch did not finish")
    .expect("Dispatch failed");

    let rows: Vec<(String, String)> = aggregate(results)
        .pairs()
        .map(|(url, token)| (url.to_string(), token.to_string()))
        .collect();
    let base = server.uri();
    assert_eq!(
        rows,
        vec![
            (format!("{base}/hang"), "Don't Exist".to_string()),
            (format!("{base}/q1"), "Exists".to_string()),
            (format!("{base}/q2"), "Exists".to_string()),
            (format!("{base}/q3"), "Exists".to_string()),
        ]
    );
}

/// Raises the caller's cancel signal from inside the last classification
struct CancelWhileClassifying {
    cancel: watch::Sender<bool>,
}

#[async_trait]
impl Classifier for CancelWhileClassifying {
    async fn classify(&self, _url: &str) -> Classification {
        self.cancel.send_replace(true);
        Classification::Exists
    }
}

#[tokio::test]
async fn test_cancel_after_last_result_is_not_reported() {
    let (tx, cancel) = watch::channel(false);
    let classifier = Arc::new(CancelWhileClassifying { cancel: tx });
    let batch = JobBatch::new(vec!["http://only.test".to_string()]);

    let (rows, cancelled) = probe_batch(
        classifier,
        DispatchSettings::new(1, 1).unwrap(),
        &batch,
        cancel,
    )
    .await
    .unwrap();

    assert_eq!(rows.len(), 1);
    assert!(!cancelled);
}

#[tokio::test]
async fn test_marker_in_head_of_oversized_page() {
    let server = MockServer::start().await;
    let tail = "<p>filler</p>".repeat(MAX_INSPECTED_BYTES / 4);
    mount_page(
        &server,
        "/long-body",
        200,
        &format!(
            r#"<html><head><meta name="viewport" content="width=device-width"></head><body>{tail}</body></html>"#
        ),
    )
    .await;

    let classifier = responsiveness_classifier();
    assert_eq!(
        classifier
            .classify(&format!("{}/long-body", server.uri()))
            .await,
        Classification::Responsive
    );
}

#[tokio::test]
async fn test_marker_beyond_read_limit_is_not_seen() {
    let server = MockServer::start().await;
    let filler = "x".repeat(MAX_INSPECTED_BYTES + 1);
    mount_page(
        &server,
        "/buried",
        200,
        &format!(
            r#"<html><head><title>{filler}</title><meta name="viewport" content="width=device-width"></head></html>"#
        ),
    )
    .await;

    let classifier = responsiveness_classifier();
    assert_eq!(
        classifier.classify(&format!("{}/buried", server.uri())).await,
        Classification::NotResponsive
    );
}
