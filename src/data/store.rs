//! Shared dataset snapshot for the preview server.
//!
//! ```text
//!  request threads ──► snapshot()  (lock-free read)
//!  watcher thread  ──► replace()   (atomic swap after a rebuild)
//! ```
//!
//! A request that started before a swap keeps rendering from the `Arc` it
//! already holds.

use super::SiteData;
use arc_swap::ArcSwap;
use std::sync::Arc;

#[derive(Debug)]
pub struct DataStore {
    current: ArcSwap<SiteData>,
}

impl DataStore {
    pub fn new(data: SiteData) -> Self {
        Self {
            current: ArcSwap::from_pointee(data),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<SiteData> {
        self.current.load_full()
    }

    /// Publish a freshly loaded dataset.
    pub fn replace(&self, data: SiteData) {
        self.current.store(Arc::new(data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::episode;

    #[test]
    fn test_snapshot_survives_replace() {
        let store = DataStore::new(SiteData {
            episodes: vec![episode(1, "2025-01-01", &[])],
            ..Default::default()
        });

        let before = store.snapshot();
        store.replace(SiteData {
            episodes: vec![episode(1, "2025-01-01", &[]), episode(2, "2025-02-01", &[])],
            ..Default::default()
        });

        assert_eq!(before.episodes.len(), 1);
        assert_eq!(store.snapshot().episodes.len(), 2);
    }

    #[test]
    fn test_concurrent_readers() {
        let store = Arc::new(DataStore::new(SiteData::default()));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let _ = store.snapshot().episodes.len();
                    }
                })
            })
            .collect();

        for i in 0..10 {
            store.replace(SiteData {
                episodes: vec![episode(i, "2025-01-01", &[])],
                ..Default::default()
            });
        }
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.snapshot().episodes[0].id, 9);
    }
}
