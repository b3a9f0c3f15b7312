//! アプリケーション（デスクトップエントリ）の索引と Source
//!
//! XDG データディレクトリの `applications/*.desktop` を読み、
//! ファイルの MIME タイプに対応するアプリケーションを解決する。

mod desktop_entry;
mod mime;
mod source;

pub use desktop_entry::DesktopEntry;
pub use mime::guess_mime_type;
pub use source::{AppLeaf, AppSource, Launch};

use crate::error::{QuarryError, Result};
use crate::fs::FileSystem;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

const DEFAULTS_GROUP: &str = "[Default Applications]";

/// アプリケーションの解決
pub trait ApplicationIndex: Send + Sync {
    /// 起動可能なアプリケーション一覧
    fn applications(&self) -> Vec<DesktopEntry>;

    /// `path` を開けるアプリケーション
    fn applications_for(&self, path: &Path) -> Vec<DesktopEntry>;

    /// `path` の既定アプリケーション
    ///
    /// 無ければ `QuarryError::NoApplication`。
    fn default_application(&self, path: &Path) -> Result<DesktopEntry>;

    fn has_default_application(&self, path: &Path) -> bool {
        self.default_application(path).is_ok()
    }
}

/// 読み込み済みの索引
#[derive(Default)]
struct Index {
    entries: Vec<DesktopEntry>,
    /// MIME タイプ → 既定アプリの id（優先度順）
    defaults: HashMap<String, Vec<String>>,
}

/// XDG データディレクトリを走査する索引
///
/// 初回の問い合わせで読み込み、`reload()` まで保持する。
pub struct XdgApplications {
    fs: Arc<dyn FileSystem>,
    data_dirs: Vec<PathBuf>,
    mimeapps: Vec<PathBuf>,
    index: RwLock<Option<Arc<Index>>>,
}

impl XdgApplications {
    /// `data_dirs` は優先度順
    pub fn new(fs: Arc<dyn FileSystem>, data_dirs: Vec<PathBuf>) -> Self {
        let mimeapps = data_dirs
            .iter()
            .map(|dir| dir.join("applications").join("mimeapps.list"))
            .collect();
        Self {
            fs,
            data_dirs,
            mimeapps,
            index: RwLock::new(None),
        }
    }

    /// `mimeapps.list` を追加で参照する（データディレクトリのものより優先）
    pub fn with_mimeapps(mut self, paths: Vec<PathBuf>) -> Self {
        self.mimeapps.splice(0..0, paths);
        self
    }

    /// 次の問い合わせで読み直す
    pub fn reload(&self) {
        *self.index.write() = None;
    }

    fn index(&self) -> Arc<Index> {
        if let Some(index) = self.index.read().as_ref() {
            return Arc::clone(index);
        }
        let index = Arc::new(Index {
            entries: self.scan(),
            defaults: self.read_defaults(),
        });
        debug!(count = index.entries.len(), "loaded desktop entries");
        *self.index.write() = Some(Arc::clone(&index));
        index
    }

    fn scan(&self) -> Vec<DesktopEntry> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for data_dir in &self.data_dirs {
            let dir = data_dir.join("applications");
            let mut files = match self.fs.read_dir(&dir) {
                Ok(files) => files,
                Err(_) => continue,
            };
            files.retain(|f| !f.is_dir() && f.file_name().ends_with(".desktop"));
            files.sort_by_key(|f| f.file_name());

            for file in files {
                let id = file.file_name();
                // 優先度の高いディレクトリのものが低いものを隠す
                if !seen.insert(id.clone()) {
                    continue;
                }
                let parsed = self
                    .fs
                    .read_to_string(&file.path)
                    .and_then(|content| DesktopEntry::parse(&id, &content));
                match parsed {
                    Ok(entry) if entry.is_launchable() => entries.push(entry),
                    Ok(_) => {}
                    Err(e) => warn!(path = %file.path.display(), "skipping desktop entry: {}", e),
                }
            }
        }
        entries
    }

    fn read_defaults(&self) -> HashMap<String, Vec<String>> {
        let mut defaults: HashMap<String, Vec<String>> = HashMap::new();
        for path in &self.mimeapps {
            let Ok(content) = self.fs.read_to_string(path) else {
                continue;
            };
            for (mime, ids) in parse_default_applications(&content) {
                defaults.entry(mime).or_default().extend(ids);
            }
        }
        defaults
    }
}

impl ApplicationIndex for XdgApplications {
    fn applications(&self) -> Vec<DesktopEntry> {
        self.index().entries.clone()
    }

    fn applications_for(&self, path: &Path) -> Vec<DesktopEntry> {
        let Some(mime) = guess_mime_type(path) else {
            return Vec::new();
        };
        self.index()
            .entries
            .iter()
            .filter(|entry| entry.supports(mime))
            .cloned()
            .collect()
    }

    fn default_application(&self, path: &Path) -> Result<DesktopEntry> {
        let not_found = || QuarryError::NoApplication(path.display().to_string());
        let mime = guess_mime_type(path).ok_or_else(not_found)?;
        let index = self.index();
        let found = index
            .defaults
            .get(mime)
            .into_iter()
            .flatten()
            .find_map(|id| index.entries.iter().find(|entry| &entry.id == id))
            .cloned();
        found.ok_or_else(not_found)
    }
}

/// `mimeapps.list` の `[Default Applications]` を読む
fn parse_default_applications(content: &str) -> Vec<(String, Vec<String>)> {
    let mut in_group = false;
    let mut result = Vec::new();
    for line in content.lines().map(str::trim) {
        if line.starts_with('[') {
            in_group = line == DEFAULTS_GROUP;
            continue;
        }
        if !in_group || line.starts_with('#') {
            continue;
        }
        if let Some((mime, ids)) = line.split_once('=') {
            let ids = ids
                .split(';')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect();
            result.push((mime.trim().to_string(), ids));
        }
    }
    result
}

#[cfg(test)]
#[path = "application_test.rs"]
mod tests;
