//! Integration tests for the crawler and archive pipeline
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end against temporary directories.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;
use wbdl::config::Config;
use wbdl::crawler::crawl;
use wbdl::output::{archive_website, Compressor, ZipCompressor};
use wbdl::url::CrawlTarget;
use wbdl::{ArchiveError, CrawlError, WbdlError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing runs under `output_dir`
fn create_test_config(output_dir: &Path, max_concurrent: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_concurrent_fetches = max_concurrent;
    config.crawler.request_timeout_secs = 5;
    config.crawler.connect_timeout_secs = 2;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.output_dir = output_dir.to_path_buf();
    config
}

/// Mounts an HTML page that must be requested exactly once
async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn html_with_links(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, anchors
    )
}

/// Lists every file under `root`, relative and `/`-separated, sorted
fn list_files(root: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, files: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).expect("Failed to read dir") {
            let entry_path = entry.expect("Failed to read entry").path();
            if entry_path.is_dir() {
                walk(root, &entry_path, files);
            } else {
                let relative = entry_path.strip_prefix(root).unwrap();
                let parts: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect();
                files.push(parts.join("/"));
            }
        }
    }

    let mut files = Vec::new();
    walk(root, root, &mut files);
    files.sort();
    files
}

fn seed_for(server: &MockServer) -> CrawlTarget {
    CrawlTarget::parse(&format!("{}/", server.uri())).expect("Failed to parse seed")
}

#[tokio::test]
async fn test_end_to_end_site_mirror() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;

    // A different origin that must never be contacted
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&other_server)
        .await;

    mount_page(
        &mock_server,
        "/",
        html_with_links("Home", &["/about.html", "/blog/"]),
    )
    .await;
    mount_page(&mock_server, "/about.html", html_with_links("About", &[])).await;
    let other_origin = format!("{}/", other_server.uri());
    mount_page(
        &mock_server,
        "/blog/",
        html_with_links("Blog", &["/about.html", other_origin.as_str()]),
    )
    .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let root = dir.path().join("site");
    let config = create_test_config(dir.path(), 4);

    let stats = crawl(&seed_for(&mock_server), &root, &config)
        .await
        .expect("Crawl failed");

    assert_eq!(
        list_files(&root),
        vec!["about.html", "blog/index.html", "index.html"]
    );
    assert_eq!(stats.pages_written, 3);
    assert_eq!(stats.links_rejected, 1);
    assert!(stats.finished_at.is_some());

    let about = std::fs::read_to_string(root.join("about.html")).unwrap();
    assert!(about.contains("<title>About</title>"));

    // Wiremock verifies the expect() counts when the servers drop
}

#[tokio::test]
async fn test_diamond_graph_fetches_shared_page_once() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_with_links("A", &["/b", "/c"])).await;
    mount_page(&mock_server, "/b", html_with_links("B", &["/d"])).await;
    // Variants of /d that map to the same archive path
    mount_page(
        &mock_server,
        "/c",
        html_with_links("C", &["/d", "/d/", "d?from=c", "/d#top"]),
    )
    .await;
    mount_page(&mock_server, "/d", html_with_links("D", &["/", "/b"])).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), 8);

    let stats = crawl(&seed_for(&mock_server), dir.path(), &config)
        .await
        .expect("Crawl failed");

    assert_eq!(stats.pages_written, 4);
    assert_eq!(
        list_files(dir.path()),
        vec!["b/index.html", "c/index.html", "d/index.html", "index.html"]
    );
}

#[tokio::test]
async fn test_cycle_terminates() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html_with_links("Root", &["/loop.html"])).await;
    mount_page(
        &mock_server,
        "/loop.html",
        html_with_links("Loop", &["/", "/loop.html", "./loop.html"]),
    )
    .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), 2);

    let stats = crawl(&seed_for(&mock_server), dir.path(), &config)
        .await
        .expect("Crawl failed");

    assert_eq!(stats.pages_written, 2);
    assert_eq!(stats.links_skipped, 3);
}

#[tokio::test]
async fn test_relative_links_resolve_from_site_root() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        html_with_links("Home", &["/dir/index.html"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/dir/index.html",
        html_with_links("Dir", &["page.html"]),
    )
    .await;
    mount_page(&mock_server, "/page.html", html_with_links("Page", &[])).await;
    Mock::given(method("GET"))
        .and(path("/dir/page.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), 2);

    let stats = crawl(&seed_for(&mock_server), dir.path(), &config)
        .await
        .expect("Crawl failed");

    assert_eq!(stats.pages_written, 3);
    assert_eq!(
        list_files(dir.path()),
        vec!["dir/index.html", "index.html", "page.html"]
    );
}

#[tokio::test]
async fn test_fetch_failure_fails_crawl_and_keeps_written_pages() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        html_with_links("Home", &["/ok.html", "/missing.html"]),
    )
    .await;
    mount_page(&mock_server, "/ok.html", html_with_links("Ok", &[])).await;
    // /missing.html is not mounted, so wiremock answers 404

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    // One worker keeps the fetch order deterministic
    let config = create_test_config(dir.path(), 1);

    let result = crawl(&seed_for(&mock_server), dir.path(), &config).await;

    match result {
        Err(CrawlError::Status { url, status }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/missing.html"));
        }
        other => panic!("Expected a 404 status error, got {:?}", other),
    }

    assert!(dir.path().join("index.html").is_file());
    assert!(dir.path().join("ok.html").is_file());
    assert!(!dir.path().join("missing.html").exists());
}

#[tokio::test]
async fn test_server_error_on_seed_fails_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), 4);

    let result = crawl(&seed_for(&mock_server), &dir.path().join("site"), &config).await;

    assert!(matches!(
        result,
        Err(CrawlError::Status { status: 500, .. })
    ));
    assert!(!dir.path().join("site").exists());
}

#[tokio::test]
async fn test_body_saved_verbatim() {
    let mock_server = MockServer::start().await;

    // Latin-1 bytes that are not valid UTF-8
    let body: Vec<u8> = b"<html><body>caf\xe9 <a href=\"/next.html\">next</a></body></html>".to_vec();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body.clone())
                .insert_header("content-type", "text/html; charset=iso-8859-1"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/next.html", html_with_links("Next", &[])).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), 4);

    crawl(&seed_for(&mock_server), dir.path(), &config)
        .await
        .expect("Crawl failed");

    let saved = std::fs::read(dir.path().join("index.html")).unwrap();
    assert_eq!(saved, body);
    assert!(dir.path().join("next.html").is_file());
}

#[tokio::test]
async fn test_archive_website_produces_zip() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        html_with_links("Home", &["/about.html", "/docs/intro"]),
    )
    .await;
    mount_page(&mock_server, "/about.html", html_with_links("About", &[])).await;
    mount_page(&mock_server, "/docs/intro", html_with_links("Intro", &[])).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), 4);
    let ids = || "run-1".to_string();

    let output = archive_website(
        &format!("{}/", mock_server.uri()),
        &config,
        &ids,
        Arc::new(ZipCompressor::default()),
    )
    .await
    .expect("Archive failed");

    assert_eq!(output.run_id, "run-1");
    assert_eq!(output.run_dir, dir.path().join("run-1"));
    assert_eq!(output.site_dir, dir.path().join("run-1").join("127.0.0.1"));
    assert_eq!(
        output.archive_path,
        dir.path().join("run-1").join("127.0.0.1.zip")
    );
    assert_eq!(output.stats.pages_written, 3);

    let mut archive =
        zip::ZipArchive::new(File::open(&output.archive_path).unwrap()).expect("Invalid zip");
    let mut names: Vec<_> = archive
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .map(str::to_string)
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["about.html", "docs/intro/index.html", "index.html"]
    );
    assert!(archive.by_name("about.html").is_ok());

    // keep-folder defaults to true
    assert!(output.site_dir.join("index.html").is_file());
}

#[tokio::test]
async fn test_archive_website_can_discard_folder() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", html_with_links("Home", &[])).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = create_test_config(dir.path(), 4);
    config.output.keep_folder = false;

    let output = archive_website(
        &mock_server.uri(),
        &config,
        &|| "run-2".to_string(),
        Arc::new(ZipCompressor::default()),
    )
    .await
    .expect("Archive failed");

    assert!(output.archive_path.is_file());
    assert!(!output.site_dir.exists());
}

/// Compressor that records calls and always fails
#[derive(Default)]
struct FailingCompressor {
    calls: AtomicUsize,
}

impl Compressor for FailingCompressor {
    fn compress(&self, source: &Path, _destination: &Path) -> Result<(), ArchiveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ArchiveError::Io {
            path: PathBuf::from(source),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        })
    }
}

#[tokio::test]
async fn test_archive_failure_is_distinct_from_crawl_failure() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", html_with_links("Home", &[])).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), 4);
    let compressor = Arc::new(FailingCompressor::default());

    let result = archive_website(
        &mock_server.uri(),
        &config,
        &|| "run-3".to_string(),
        compressor.clone(),
    )
    .await;

    assert!(matches!(result, Err(WbdlError::Archive(_))));
    assert_eq!(compressor.calls.load(Ordering::SeqCst), 1);

    // The crawl itself succeeded, so the pages are on disk
    assert!(dir
        .path()
        .join("run-3")
        .join("127.0.0.1")
        .join("index.html")
        .is_file());
}

#[tokio::test]
async fn test_crawl_failure_skips_compression() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), 4);
    let compressor = Arc::new(FailingCompressor::default());

    let result = archive_website(
        &mock_server.uri(),
        &config,
        &|| "run-4".to_string(),
        compressor.clone(),
    )
    .await;

    assert!(matches!(
        result,
        Err(WbdlError::Crawl(CrawlError::Status { status: 503, .. }))
    ));
    assert_eq!(compressor.calls.load(Ordering::SeqCst), 0);
    assert!(!dir.path().join("run-4").join("127.0.0.1.zip").exists());
}

/// Zip compressor that waits for the async side to release it
///
/// If compression ran on the runtime thread the releasing task could never
/// run and the wait would time out.
struct GatedCompressor {
    started: Mutex<Option<tokio::sync::oneshot::Sender<()>>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl Compressor for GatedCompressor {
    fn compress(&self, source: &Path, destination: &Path) -> Result<(), ArchiveError> {
        if let Some(started) = self.started.lock().unwrap().take() {
            let _ = started.send(());
        }

        self.release
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(5))
            .map_err(|e| ArchiveError::Io {
                path: PathBuf::from(source),
                source: std::io::Error::new(std::io::ErrorKind::TimedOut, e.to_string()),
            })?;

        ZipCompressor::default().compress(source, destination)
    }
}

#[tokio::test]
async fn test_compression_does_not_block_runtime() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", html_with_links("Home", &[])).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(dir.path(), 4);

    let (started_tx, started_rx) = tokio::sync::oneshot::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let compressor = Arc::new(GatedCompressor {
        started: Mutex::new(Some(started_tx)),
        release: Mutex::new(release_rx),
    });

    let releaser = tokio::spawn(async move {
        if started_rx.await.is_ok() {
            let _ = release_tx.send(());
        }
    });

    let output = archive_website(
        &mock_server.uri(),
        &config,
        &|| "run-5".to_string(),
        compressor,
    )
    .await
    .expect("Archive failed");

    releaser.await.unwrap();
    assert!(output.archive_path.is_file());
}
