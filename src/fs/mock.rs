//! テスト用モックファイルシステム

use super::*;
use crate::error::QuarryError;
use std::collections::BTreeMap;
use parking_lot::RwLock;

/// テスト用モックファイルシステム
///
/// パス文字列をキーにした BTreeMap なので列挙順は辞書順になる。
pub struct MockFs {
    files: RwLock<BTreeMap<String, MockFile>>,
}

struct MockFile {
    content: Vec<u8>,
    file_type: FsFileType,
}

impl MockFs {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
        }
    }

    /// ファイルを追加
    pub fn add_file(&self, path: &str, content: &str) {
        self.insert(path, content.as_bytes().to_vec(), FsFileType::File);
    }

    /// ディレクトリを追加
    pub fn add_dir(&self, path: &str) {
        self.insert(path, Vec::new(), FsFileType::Dir);
    }

    /// シンボリックリンクを追加
    pub fn add_symlink(&self, path: &str) {
        self.insert(path, Vec::new(), FsFileType::Symlink);
    }

    /// パスとその配下をすべて削除
    pub fn remove(&self, path: &str) {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        self.files
            .write()
            .retain(|k, _| k != path && !k.starts_with(&prefix));
    }

    fn insert(&self, path: &str, content: Vec<u8>, file_type: FsFileType) {
        self.files
            .write()
            .insert(path.to_string(), MockFile { content, file_type });
    }

    fn children(&self, path: &Path) -> Result<Vec<FsDirEntry>> {
        let path_str = path.to_string_lossy().to_string();
        let files = self.files.read();

        // パスがディレクトリとして存在するかチェック
        if let Some(file) = files.get(&path_str) {
            if file.file_type != FsFileType::Dir {
                return Err(QuarryError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    "Not a directory",
                )));
            }
        }

        let prefix = if path_str.ends_with('/') {
            path_str.clone()
        } else {
            format!("{}/", path_str)
        };

        let entries = files
            .iter()
            .filter(|(k, _)| {
                if !k.starts_with(&prefix) {
                    return false;
                }
                // 直接の子のみ（サブディレクトリの中身は除外）
                let remainder = &k[prefix.len()..];
                !remainder.is_empty() && !remainder.contains('/')
            })
            .map(|(k, v)| FsDirEntry {
                path: PathBuf::from(k),
                file_type: v.file_type,
            })
            .collect();

        Ok(entries)
    }

    fn walk_into(
        &self,
        dir: &Path,
        depth: usize,
        max_depth: usize,
        exclude: ExcludeFn<'_>,
        out: &mut Vec<FsDirEntry>,
    ) -> Result<()> {
        for entry in self.children(dir)? {
            if exclude(&entry.file_name()) {
                continue;
            }
            let descend = entry.is_dir() && depth < max_depth;
            let path = entry.path.clone();
            out.push(entry);
            if descend {
                self.walk_into(&path, depth + 1, max_depth, exclude, out)?;
            }
        }
        Ok(())
    }
}

impl Default for MockFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFs {
    fn exists(&self, path: &Path) -> bool {
        self.files
            .read()
            .contains_key(path.to_string_lossy().as_ref())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .read()
            .get(path.to_string_lossy().as_ref())
            .map(|f| f.file_type == FsFileType::Dir)
            .unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .read()
            .get(path.to_string_lossy().as_ref())
            .map(|f| String::from_utf8_lossy(&f.content).to_string())
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "not found").into())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<FsDirEntry>> {
        self.children(path)
    }

    fn walk(
        &self,
        root: &Path,
        max_depth: usize,
        exclude: ExcludeFn<'_>,
    ) -> Result<Vec<FsDirEntry>> {
        let mut out = Vec::new();
        self.walk_into(root, 0, max_depth, exclude, &mut out)?;
        Ok(out)
    }
}
