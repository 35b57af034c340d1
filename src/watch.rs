//! File system watcher for live rebuilds.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Event Loop                              │
//! │                                                              │
//! │  ┌──────────┐    ┌──────────┐    ┌────────────────────────┐  │
//! │  │ notify   │───▶│ Debouncer│───▶│    handle_changes()    │  │
//! │  │ events   │    │ (300ms)  │    │                        │  │
//! │  └──────────┘    └──────────┘    │  content ─► rebuild +  │  │
//! │                                  │            swap store  │  │
//! │                                  │  assets  ─► copy files │  │
//! │                                  │  config  ─► warn       │  │
//! │                                  └────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::{
    build::{build_site, copy_assets},
    config::SiteConfig,
    data::store::DataStore,
    log,
    logger::WatchStatus,
};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        mpsc::{self, RecvTimeoutError},
    },
    time::{Duration, Instant},
};

// =============================================================================
// Constants
// =============================================================================

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

// =============================================================================
// Path Utilities
// =============================================================================

/// What a changed path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileCategory {
    Content,
    Asset,
    Config,
    Unknown,
}

fn categorize_path(path: &Path, config: &SiteConfig) -> FileCategory {
    if path == config.config_path {
        FileCategory::Config
    } else if path.starts_with(&config.build.content) {
        FileCategory::Content
    } else if path.starts_with(&config.build.assets) {
        FileCategory::Asset
    } else {
        FileCategory::Unknown
    }
}

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// `/site/content/episodes.toml` → `content/episodes.toml`
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        for path in paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        let mut paths: Vec<_> = self.pending.drain().collect();
        paths.sort();
        paths
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Event Handler
// =============================================================================

/// Rebuilt from scratch on a content change, assets copied on an asset change.
///
/// Returns true after a full rebuild (for cooldown tracking).
fn handle_changes(
    paths: &[PathBuf],
    config: &SiteConfig,
    store: &DataStore,
    status: &mut WatchStatus,
) -> bool {
    let root = config.get_root();
    let rel = |p: &PathBuf| rel_path(p, root);

    let mut content = Vec::new();
    let mut assets = Vec::new();
    for path in paths {
        match categorize_path(path, config) {
            FileCategory::Config => {
                log!("warn"; "{} changed, restart to apply", rel(path));
            }
            FileCategory::Content => content.push(path),
            FileCategory::Asset => assets.push(path.clone()),
            FileCategory::Unknown => {}
        }
    }

    if !content.is_empty() {
        let trigger = content.iter().map(|p| rel(p)).collect::<Vec<_>>().join(", ");
        return match build_site(config) {
            Ok(data) => {
                let episodes = data.episodes.len();
                store.replace(data);
                status.success(&format!("{trigger} changed, rebuilt ({episodes} episodes)"));
                true
            }
            Err(e) => {
                status.error(&format!("build failed ({trigger})"), &format!("{e:#}"));
                false
            }
        };
    }

    if !assets.is_empty() {
        // deleted files show up here too
        assets.retain(|p| p.is_file());
        match copy_assets(&assets, config) {
            Ok(0) => status.unchanged("assets unchanged"),
            Ok(count) => status.success(&format!("copied {count} assets")),
            Err(e) => status.error("asset copy failed", &format!("{e:#}")),
        }
    }

    false
}

// =============================================================================
// Watcher Setup
// =============================================================================

fn setup_watchers(watcher: &mut impl Watcher, config: &SiteConfig) -> Result<()> {
    let root = config.get_root();
    let targets = [
        (&config.build.content, RecursiveMode::Recursive),
        (&config.build.assets, RecursiveMode::Recursive),
        (&config.config_path, RecursiveMode::NonRecursive),
    ];

    let mut watched = Vec::new();
    for (path, mode) in targets {
        if path.exists() {
            watcher
                .watch(path, mode)
                .with_context(|| format!("Failed to watch {}", path.display()))?;
            watched.push(rel_path(path, root));
        }
    }

    log!("watch"; "{}", watched.join(", "));
    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

// =============================================================================
// Public API
// =============================================================================

/// Start blocking file watcher with debouncing and live rebuild.
///
/// Every successful rebuild publishes its dataset to `store`.
pub fn watch_for_changes_blocking(config: &SiteConfig, store: Arc<DataStore>) -> Result<()> {
    if !config.serve.watch {
        return Ok(());
    }

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    setup_watchers(&mut watcher, config)?;

    let mut debouncer = Debouncer::new();
    let mut status = WatchStatus::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) && !debouncer.in_cooldown() => {
                debouncer.add(event.paths);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(RecvTimeoutError::Timeout) if debouncer.ready() => {
                if handle_changes(&debouncer.take(), config, &store, &mut status) {
                    debouncer.mark_rebuild();
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_at(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.config_path = root.join("episodic.toml");
        config.build.content = root.join("content");
        config.build.assets = root.join("assets");
        config.build.output = root.join("public");
        config
    }

    #[test]
    fn test_is_temp_file() {
        assert!(is_temp_file(Path::new("content/episodes.toml~")));
        assert!(is_temp_file(Path::new("content/.episodes.toml.swp")));
        assert!(is_temp_file(Path::new("content/blog/post.md.bak")));
        assert!(!is_temp_file(Path::new("content/episodes.toml")));
    }

    #[test]
    fn test_categorize_path() {
        let root = Path::new("/site");
        let config = config_at(root);

        assert_eq!(
            categorize_path(&root.join("episodic.toml"), &config),
            FileCategory::Config
        );
        assert_eq!(
            categorize_path(&root.join("content/blog/a.md"), &config),
            FileCategory::Content
        );
        assert_eq!(
            categorize_path(&root.join("assets/logo.png"), &config),
            FileCategory::Asset
        );
        assert_eq!(
            categorize_path(&root.join("public/index.html"), &config),
            FileCategory::Unknown
        );
    }

    #[test]
    fn test_debouncer_batches_and_filters() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.ready());
        assert_eq!(debouncer.timeout(), Duration::from_secs(60));

        debouncer.add([
            PathBuf::from("/site/content/episodes.toml"),
            PathBuf::from("/site/content/episodes.toml"),
            PathBuf::from("/site/content/.episodes.toml.swp"),
        ]);
        assert_eq!(debouncer.timeout(), Duration::from_millis(DEBOUNCE_MS));
        // debounce window has not elapsed yet
        assert!(!debouncer.ready());

        assert_eq!(debouncer.take(), vec![PathBuf::from("/site/content/episodes.toml")]);
        assert!(!debouncer.ready());
    }

    #[test]
    fn test_debouncer_take_is_sorted() {
        let mut debouncer = Debouncer::new();
        let paths: Vec<PathBuf> = ["c.md", "a.md", "b.md", "a.md"]
            .iter()
            .map(|name| Path::new("/site/content/blog").join(name))
            .collect();
        debouncer.add(paths);

        let taken = debouncer.take();
        assert_eq!(taken.len(), 3);
        assert!(taken.windows(2).all(|w| w[0] < w[1]));
        assert!(debouncer.take().is_empty());
    }

    #[test]
    fn test_debouncer_cooldown() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.in_cooldown());
        debouncer.mark_rebuild();
        assert!(debouncer.in_cooldown());
    }

    #[test]
    fn test_rel_path() {
        assert_eq!(
            rel_path(Path::new("/site/content/episodes.toml"), Path::new("/site")),
            "content/episodes.toml"
        );
        assert_eq!(rel_path(Path::new("/other/x"), Path::new("/site")), "/other/x");
    }
}
