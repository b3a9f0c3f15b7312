//! ファイルシステム抽象化
//!
//! ディレクトリ系ソースやアプリケーション索引が使うファイルシステム操作の抽象化レイヤー。
//! テスト時に MockFs を注入してファイル操作をモック化できる。

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// ファイル種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsFileType {
    File,
    Dir,
    Symlink,
}

/// ファイルシステム抽象化のための独自 DirEntry
#[derive(Debug, Clone)]
pub struct FsDirEntry {
    pub path: PathBuf,
    pub file_type: FsFileType,
}

impl FsDirEntry {
    /// ディレクトリかどうか
    pub fn is_dir(&self) -> bool {
        self.file_type == FsFileType::Dir
    }

    /// ファイル名（UTF-8 でない部分は置換）
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// 除外判定（ファイル名を受け取り、除外するなら true）
pub type ExcludeFn<'a> = &'a dyn Fn(&str) -> bool;

/// ファイルシステム操作を抽象化するトレイト
///
/// 本番コードでは RealFs を使用する。
pub trait FileSystem: Send + Sync {
    /// パスが存在するか（シンボリックリンク追従）
    fn exists(&self, path: &Path) -> bool;

    /// ディレクトリかどうか（シンボリックリンク追従）
    fn is_dir(&self, path: &Path) -> bool;

    /// ファイル内容を読み込み
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// ディレクトリ内のエントリを取得
    ///
    /// - 順序は未定義
    /// - symlink_metadata を使用（シンボリックリンク非追従）
    /// - 引数がディレクトリでない場合は Err
    fn read_dir(&self, path: &Path) -> Result<Vec<FsDirEntry>>;

    /// `root` 配下を `max_depth` 階層まで再帰的に列挙
    ///
    /// - `max_depth == 0` なら直下のエントリのみ
    /// - `exclude` に一致したディレクトリの中身は辿らない
    /// - `root` 自身は結果に含めない
    /// - 順序はファイル名順（ディレクトリごと）
    fn walk(&self, root: &Path, max_depth: usize, exclude: ExcludeFn<'_>)
        -> Result<Vec<FsDirEntry>>;
}

/// 本番用ファイルシステム実装
pub struct RealFs;

impl FileSystem for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<FsDirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let metadata = entry.path().symlink_metadata()?;
            let file_type = if metadata.is_symlink() {
                FsFileType::Symlink
            } else if metadata.is_dir() {
                FsFileType::Dir
            } else {
                FsFileType::File
            };
            entries.push(FsDirEntry {
                path: entry.path(),
                file_type,
            });
        }
        Ok(entries)
    }

    fn walk(
        &self,
        root: &Path,
        max_depth: usize,
        exclude: ExcludeFn<'_>,
    ) -> Result<Vec<FsDirEntry>> {
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth + 1)
            .sort_by_file_name()
            .into_iter()
            // root 自身が隠しディレクトリでも中身は列挙する
            .filter_entry(|e| e.depth() == 0 || !exclude(&e.file_name().to_string_lossy()));

        let mut entries = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %root.display(), "skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let file_type = if entry.path_is_symlink() {
                FsFileType::Symlink
            } else if entry.file_type().is_dir() {
                FsFileType::Dir
            } else {
                FsFileType::File
            };
            entries.push(FsDirEntry {
                path: entry.into_path(),
                file_type,
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
pub mod mock;

#[cfg(test)]
#[path = "fs_test.rs"]
mod tests;
