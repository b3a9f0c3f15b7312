//! Path 拡張トレイト
//!
//! 標準ライブラリの `Path` に便利メソッドを追加する。

use std::path::{Component, Path, PathBuf};

/// Path の拡張トレイト
pub trait PathExt {
    /// `.` と `..` を字句的に解決したパスを返す
    ///
    /// ファイルシステムには問い合わせない（シンボリックリンクは解決しない）。
    /// ルートより上への `..` はルートに吸収される。空になった相対パスは `.`。
    fn normalized(&self) -> PathBuf;

    /// `self/..` を正規化したパス
    ///
    /// ファイルシステムのルートでは自分自身と等しくなる。
    fn parent_dir(&self) -> PathBuf;

    /// カレントディレクトリ基準の絶対パスにして正規化する
    fn absolutized(&self) -> PathBuf;

    /// 表示用のファイル名（ルートではパス全体）
    fn display_name(&self) -> String;
}

impl PathExt for Path {
    fn normalized(&self) -> PathBuf {
        let mut parts: Vec<Component<'_>> = Vec::new();
        for component in self.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => match parts.last() {
                    Some(Component::Normal(_)) => {
                        parts.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => parts.push(component),
                },
                other => parts.push(other),
            }
        }

        if parts.is_empty() {
            return PathBuf::from(".");
        }
        parts.iter().collect()
    }

    fn parent_dir(&self) -> PathBuf {
        self.join(Component::ParentDir.as_os_str()).normalized()
    }

    fn absolutized(&self) -> PathBuf {
        std::path::absolute(self)
            .unwrap_or_else(|_| self.to_path_buf())
            .normalized()
    }

    fn display_name(&self) -> String {
        self.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display().to_string())
    }
}

/// 隠しエントリ（ドットで始まる名前）かどうか
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
#[path = "path_ext_test.rs"]
mod tests;
