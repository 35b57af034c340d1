//! Development server.
//!
//! Built on `tiny_http`:
//!
//! - Static file serving from the build output directory
//! - Automatic `index.html` resolution for directories
//! - `/episodes/?tag=..&q=..` rendered on the fly from the current dataset
//!   (`[serve] live_listing`)
//! - File watching and auto-rebuild (via `watch` module)
//! - Graceful shutdown on Ctrl+C
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Main Thread   │     │  Watcher Thread  │
//! │  (HTTP Server)  │     │  (File Monitor)  │
//! └────────┬────────┘     └────────┬─────────┘
//!          │ snapshot()            │ replace()
//!          ▼                       ▼
//!      ┌──────────────────────────────────┐
//!      │        DataStore (ArcSwap)       │
//!      └──────────────────────────────────┘
//! ```

use crate::{
    config::SiteConfig,
    data::{SiteData, store::DataStore},
    listing::{LISTING_PATH, ListingView},
    log,
    render::{Route, Site},
    watch::watch_for_changes_blocking,
};
use anyhow::{Context, Result, anyhow, bail};
use std::{
    fs,
    io::Cursor,
    net::SocketAddr,
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the development server with optional file watching.
///
/// `data` is the dataset of the build that just ran. The server blocks until
/// Ctrl+C is received.
pub fn serve_site(config: &'static SiteConfig, data: SiteData) -> Result<()> {
    let (server, addr) = try_bind_port(&config.serve.candidates()?)?;
    let server = Arc::new(server);
    let store = Arc::new(DataStore::new(data));

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    if config.serve.watch {
        let store = Arc::clone(&store);
        std::thread::spawn(move || {
            if let Err(err) = watch_for_changes_blocking(config, store) {
                log!("watch"; "{err:#}");
            }
        });
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config, &store) {
            log!("serve"; "request error: {e:#}");
        }
    }

    Ok(())
}

/// Bind the first free address of `candidates`.
fn try_bind_port(candidates: &[SocketAddr]) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for (attempt, &addr) in candidates.iter().enumerate() {
        match Server::http(addr) {
            Ok(server) => {
                if attempt > 0 {
                    let wanted = candidates[0].port();
                    log!("serve"; "port {} in use, using {} instead", wanted, addr.port());
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    let ports = match (candidates.first(), candidates.last()) {
        (Some(first), Some(last)) => format!("{}-{}", first.port(), last.port()),
        _ => "none".to_string(),
    };
    bail!(
        "Failed to bind after {} attempts (ports {}): {}",
        candidates.len(),
        ports,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )
}

// ============================================================================
// Request Handling
// ============================================================================

/// What a request resolves to.
#[derive(Debug, PartialEq, Eq)]
enum Reply {
    /// File under the output directory.
    File(PathBuf),
    /// Page rendered for this request.
    Html(String),
    /// 404, with the built 404 page when there is one.
    NotFound(Option<PathBuf>),
}

fn handle_request(request: Request, config: &SiteConfig, store: &DataStore) -> Result<()> {
    match resolve(request.url(), config, store) {
        Reply::File(path) => serve_file(request, &path, StatusCode(200)),
        Reply::Html(html) => serve_html(request, html),
        Reply::NotFound(Some(page)) => serve_file(request, &page, StatusCode(404)),
        Reply::NotFound(None) => serve_not_found(request),
    }
}

/// Request resolution order:
/// 1. `/episodes/` with a query string and `live_listing` on → rendered listing
/// 2. Exact file match → file
/// 3. Directory with index.html → index.html
/// 4. Nothing found → 404 page
fn resolve(url: &str, config: &SiteConfig, store: &DataStore) -> Reply {
    let serve_root = &config.build.output;
    let not_found = || {
        let page = Route::NotFound.output_path(serve_root);
        Reply::NotFound(page.is_file().then_some(page))
    };

    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let Ok(path) = urlencoding::decode(path) else {
        return not_found();
    };

    if config.serve.live_listing && !query.is_empty() && is_listing_path(&path) {
        let data = store.snapshot();
        let view = ListingView::from_query(&data, query);
        return Reply::Html(Site::new(config, &data).render_listing(&view));
    }

    let request_path = path.trim_matches('/');
    let relative = Path::new(request_path);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return not_found();
    }

    let local_path = serve_root.join(relative);
    if local_path.is_file() {
        return Reply::File(local_path);
    }
    let index_path = local_path.join("index.html");
    if local_path.is_dir() && index_path.is_file() {
        return Reply::File(index_path);
    }
    not_found()
}

/// `/episodes`, `/episodes/` and `/episodes/index.html`.
fn is_listing_path(path: &str) -> bool {
    let listing = LISTING_PATH.trim_end_matches('/');
    let path = path.strip_suffix("index.html").unwrap_or(path);
    path.trim_end_matches('/') == listing
}

// ============================================================================
// Response Helpers
// ============================================================================

fn content_type(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value).map_err(|()| anyhow!("invalid header: {value}"))
}

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path, status: StatusCode) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response = Response::from_data(content)
        .with_status_code(status)
        .with_header(content_type(guess_content_type(path))?);
    request.respond(response)?;
    Ok(())
}

/// Serve HTML content.
fn serve_html(request: Request, content: String) -> Result<()> {
    let response =
        Response::from_string(content).with_header(content_type("text/html; charset=utf-8")?);
    request.respond(response)?;
    Ok(())
}

/// Plain 404 when the site has no 404 page.
fn serve_not_found(request: Request) -> Result<()> {
    let body = "404 Not Found";
    let response = Response::new(
        StatusCode(404),
        vec![content_type("text/plain; charset=utf-8")?],
        Cursor::new(body),
        Some(body.len()),
        None,
    );
    request.respond(response)?;
    Ok(())
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("webmanifest") => "application/manifest+json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::{episode, shipped};
    use crate::render::tests::shipped_config;

    fn setup() -> (tempfile::TempDir, SiteConfig, DataStore) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = shipped_config();
        config.build.output = dir.path().to_path_buf();
        fs::create_dir_all(dir.path().join("episodes/3")).unwrap();
        fs::write(dir.path().join("episodes/3/index.html"), "<p>3</p>").unwrap();
        fs::write(dir.path().join("feed.xml"), "<rss/>").unwrap();
        (dir, config, DataStore::new(shipped()))
    }

    #[test]
    fn test_resolve_static_files() {
        let (dir, config, store) = setup();

        assert_eq!(
            resolve("/feed.xml", &config, &store),
            Reply::File(dir.path().join("feed.xml"))
        );
        assert_eq!(
            resolve("/episodes/3/", &config, &store),
            Reply::File(dir.path().join("episodes/3/index.html"))
        );
        // cache-busting query on a plain file
        assert_eq!(
            resolve("/feed.xml?t=1", &config, &store),
            Reply::File(dir.path().join("feed.xml"))
        );
    }

    #[test]
    fn test_resolve_not_found() {
        let (dir, config, store) = setup();
        assert_eq!(resolve("/missing/", &config, &store), Reply::NotFound(None));

        fs::write(dir.path().join("404.html"), "gone").unwrap();
        assert_eq!(
            resolve("/missing/", &config, &store),
            Reply::NotFound(Some(dir.path().join("404.html")))
        );
        assert_eq!(
            resolve("/../secret", &config, &store),
            Reply::NotFound(Some(dir.path().join("404.html")))
        );
    }

    #[test]
    fn test_resolve_filtered_listing() {
        let (_dir, config, store) = setup();
        let Reply::Html(html) = resolve("/episodes/?tag=AI+%26+Agents", &config, &store) else {
            panic!("expected rendered listing");
        };
        assert!(html.contains(r#"data-tag="AI &amp; Agents" aria-pressed="true""#));
        assert!(html.contains(r#"<meta name="robots" content="noindex">"#));
    }

    #[test]
    fn test_static_listing_when_live_off() {
        let (dir, mut config, store) = setup();
        fs::write(dir.path().join("episodes/index.html"), "static").unwrap();
        config.serve.live_listing = false;

        assert_eq!(
            resolve("/episodes/?tag=Open+Source", &config, &store),
            Reply::File(dir.path().join("episodes/index.html"))
        );
    }

    #[test]
    fn test_bind_moves_past_taken_port() {
        let taken = Server::http("127.0.0.1:0").unwrap();
        let port = taken.server_addr().to_ip().unwrap().port();
        let mut serve = crate::config::ServeConfig::default();
        serve.port = port;
        serve.port_retries = 20;

        let (_server, addr) = try_bind_port(&serve.candidates().unwrap()).unwrap();
        assert_ne!(addr.port(), port);
        assert!(addr.port() > port);

        serve.port_retries = 1;
        let err = try_bind_port(&serve.candidates().unwrap()).err().unwrap();
        assert!(err.to_string().contains("after 1 attempts"));
    }

    #[test]
    fn test_listing_follows_store() {
        let (_dir, config, store) = setup();
        store.replace(SiteData {
            episodes: vec![episode(1, "2025-01-01", &["Only"])],
            ..Default::default()
        });
        let Reply::Html(html) = resolve("/episodes?q=episode", &config, &store) else {
            panic!("expected rendered listing");
        };
        assert!(html.contains("Showing all 1 episodes"));
    }

    #[test]
    fn test_is_listing_path() {
        assert!(is_listing_path("/episodes/"));
        assert!(is_listing_path("/episodes"));
        assert!(is_listing_path("/episodes/index.html"));
        assert!(!is_listing_path("/episodes/3/"));
        assert!(!is_listing_path("/"));
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(
            guess_content_type(Path::new("manifest.webmanifest")),
            "application/manifest+json; charset=utf-8"
        );
        assert_eq!(guess_content_type(Path::new("blob")), "application/octet-stream");
    }
}
