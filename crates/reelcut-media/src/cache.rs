// crates/reelcut-media/src/cache.rs
//
// VAD result cache (§4.1 "Caching", §5 "Shared-resource policy"). Keyed by
// (absolute path, preset id); invalidated when the file's mtime changes.
// Readers never block writers — `parking_lot::RwLock` plus copy-on-insert
// of an immutable `Arc<VadResult>`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::RwLock;
use reelcut_core::model::VadResult;

#[derive(Clone)]
struct Entry {
    mtime: SystemTime,
    result: std::sync::Arc<VadResult>,
}

#[derive(Default)]
pub struct VadCache {
    entries: RwLock<HashMap<(PathBuf, String), Entry>>,
}

impl VadCache {
    pub fn new() -> Self {
        Self { entries: RwLock::new(HashMap::new()) }
    }

    /// Look up a cached result, validating it against the file's current
    /// mtime. Returns `None` on a miss or a stale entry.
    pub fn get(&self, path: &Path, preset_id: &str) -> Option<std::sync::Arc<VadResult>> {
        let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;
        let key = (path.to_path_buf(), preset_id.to_string());
        let entries = self.entries.read();
        let entry = entries.get(&key)?;
        if entry.mtime == mtime {
            Some(entry.result.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, path: &Path, preset_id: &str, result: std::sync::Arc<VadResult>) {
        let Ok(mtime) = std::fs::metadata(path).and_then(|m| m.modified()) else { return };
        let key = (path.to_path_buf(), preset_id.to_string());
        self.entries.write().insert(key, Entry { mtime, result });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_core::model::{SilenceSpan, SpeechSpan};
    use std::io::Write;

    fn result() -> std::sync::Arc<VadResult> {
        std::sync::Arc::new(VadResult {
            duration: 10.0,
            speech: vec![SpeechSpan { start: 0.0, end: 10.0 }],
            silence: vec![] as Vec<SilenceSpan>,
        })
    }

    #[test]
    fn hit_after_insert() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "x").unwrap();
        let cache = VadCache::new();
        cache.insert(f.path(), "tiktok", result());
        assert!(cache.get(f.path(), "tiktok").is_some());
    }

    #[test]
    fn miss_for_unknown_preset() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let cache = VadCache::new();
        cache.insert(f.path(), "tiktok", result());
        assert!(cache.get(f.path(), "podcast").is_none());
    }

    #[test]
    fn stale_after_mtime_change() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        let cache = VadCache::new();
        cache.insert(f.path(), "tiktok", result());
        // Touch the file so its mtime advances past the cached value.
        std::thread::sleep(std::time::Duration::from_millis(10));
        write!(f, "more").unwrap();
        f.flush().unwrap();
        assert!(cache.get(f.path(), "tiktok").is_none());
    }
}
