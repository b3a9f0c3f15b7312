//! ディレクトリを元にしたソース

use super::{Items, Source, SourceCache};
use crate::desktop::Desktop;
use crate::error::{QuarryError, Result};
use crate::file::FileLeaf;
use crate::leaf::Leaf;
use crate::object::CatalogObject;
use crate::path_ext::{is_hidden_name, PathExt};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// 1 つのディレクトリの直下を並べるソース
///
/// `show_hidden` は生成時に決まり、以後変わらない。
pub struct DirectorySource {
    directory: PathBuf,
    name: String,
    show_hidden: bool,
    desktop: Arc<Desktop>,
    cache: SourceCache,
}

impl DirectorySource {
    /// `directory` は絶対パスに正規化して保持する
    pub fn new(directory: impl AsRef<Path>, show_hidden: bool, desktop: Arc<Desktop>) -> Self {
        let directory = directory.as_ref().absolutized();
        let name = directory.display_name();
        Self {
            directory,
            name,
            show_hidden,
            desktop,
            cache: SourceCache::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// 隠しエントリも並べるか
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }
}

impl CatalogObject for DirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<String> {
        Some(self.directory.display().to_string())
    }

    fn icon_name(&self) -> &str {
        "folder"
    }
}

impl Source for DirectorySource {
    fn items(&self) -> Items<'_> {
        let mut entries = match self.desktop.fs.read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(directory = %self.directory.display(), "failed to list directory: {}", e);
                return Box::new(std::iter::empty());
            }
        };

        if !self.show_hidden {
            entries.retain(|entry| !is_hidden_name(&entry.file_name()));
        }
        entries.sort_by_key(|entry| entry.file_name());

        Box::new(entries.into_iter().map(move |entry| {
            let mut name = entry.file_name();
            if self.desktop.fs.is_dir(&entry.path) {
                name.push('/');
            }
            Arc::new(FileLeaf::with_name(entry.path, name, Arc::clone(&self.desktop)))
                as Arc<dyn Leaf>
        }))
    }

    fn cache(&self) -> &SourceCache {
        &self.cache
    }

    fn has_parent(&self) -> bool {
        self.directory.parent_dir() != self.directory
    }

    fn parent(&self) -> Result<Arc<dyn Source>> {
        if !self.has_parent() {
            return Err(QuarryError::NoParent(self.name.clone()));
        }
        Ok(Arc::new(DirectorySource::new(
            self.directory.parent_dir(),
            false,
            Arc::clone(&self.desktop),
        )))
    }
}

/// `FileSource` の走査オプション
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileSourceOptions {
    /// 再帰する階層数（0 なら直下のみ）
    pub depth: usize,
    pub show_hidden: bool,
}

/// 複数のディレクトリを再帰的に走査して平坦に並べるソース
///
/// オプションは実行中に差し替えられる（プラグイン設定の変更を反映する）。
pub struct FileSource {
    name: String,
    dirs: Vec<PathBuf>,
    options: RwLock<FileSourceOptions>,
    desktop: Arc<Desktop>,
    cache: SourceCache,
}

impl FileSource {
    pub fn new(
        name: impl Into<String>,
        dirs: Vec<PathBuf>,
        options: FileSourceOptions,
        desktop: Arc<Desktop>,
    ) -> Self {
        Self {
            name: name.into(),
            dirs,
            options: RwLock::new(options),
            desktop,
            cache: SourceCache::new(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn options(&self) -> FileSourceOptions {
        *self.options.read()
    }

    /// オプションを差し替え、変わっていれば再表示を要求する
    pub fn set_options(&self, options: FileSourceOptions) {
        {
            let mut current = self.options.write();
            if *current == options {
                return;
            }
            *current = options;
        }
        debug!(source = %self.name, ?options, "file source options changed");
        self.request_refresh();
    }

    fn walk(&self, dir: &Path, options: FileSourceOptions) -> Vec<Arc<dyn Leaf>> {
        let exclude = |name: &str| !options.show_hidden && is_hidden_name(name);
        match self.desktop.fs.walk(dir, options.depth, &exclude) {
            Ok(entries) => entries
                .into_iter()
                .map(|entry| {
                    Arc::new(FileLeaf::new(entry.path, Arc::clone(&self.desktop))) as Arc<dyn Leaf>
                })
                .collect(),
            Err(e) => {
                warn!(directory = %dir.display(), "failed to walk directory: {}", e);
                Vec::new()
            }
        }
    }
}

impl CatalogObject for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<String> {
        let dirs: Vec<String> = self.dirs.iter().map(|d| d.display().to_string()).collect();
        Some(dirs.join(", "))
    }

    fn icon_name(&self) -> &str {
        "folder"
    }
}

impl Source for FileSource {
    fn items(&self) -> Items<'_> {
        let options = self.options();
        Box::new(
            self.dirs
                .iter()
                .flat_map(move |dir| self.walk(dir, options)),
        )
    }

    fn cache(&self) -> &SourceCache {
        &self.cache
    }
}

#[cfg(test)]
#[path = "directory_test.rs"]
mod tests;
