//! 環境変数と実行環境の能力チェック

use crate::error::{QuarryError, Result};
use std::path::PathBuf;

/// 環境変数ユーティリティ
pub struct EnvVar;

impl EnvVar {
    /// 環境変数を取得（空文字列はNoneとして扱う）
    pub fn get(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.is_empty())
    }
}

/// ホームディレクトリ
pub fn home_dir() -> Result<PathBuf> {
    EnvVar::get("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| QuarryError::Config("HOME environment variable not set".to_string()))
}

/// 設定ディレクトリを解決する
///
/// 優先順位: `QUARRY_CONFIG_DIR` > `$XDG_CONFIG_HOME/quarry` > `$HOME/.config/quarry`
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = EnvVar::get("QUARRY_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    Ok(xdg_config_home()?.join("quarry"))
}

/// `$XDG_CONFIG_HOME`（未設定なら `$HOME/.config`）
pub fn xdg_config_home() -> Result<PathBuf> {
    match EnvVar::get("XDG_CONFIG_HOME") {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(home_dir()?.join(".config")),
    }
}

/// XDG データディレクトリ（優先度順）
pub fn data_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    match EnvVar::get("XDG_DATA_HOME") {
        Some(dir) => dirs.push(PathBuf::from(dir)),
        None => {
            if let Ok(home) = home_dir() {
                dirs.push(home.join(".local").join("share"));
            }
        }
    }
    let system = EnvVar::get("XDG_DATA_DIRS").unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    dirs.extend(
        system
            .split(':')
            .filter(|s| !s.is_empty())
            .map(PathBuf::from),
    );
    dirs
}

/// デスクトップセッションのメッセージバスに接続できるか確認する
///
/// バスを必要とするプラグインはロード時にこれを呼び、失敗したら無効化される。
pub fn check_session_bus() -> Result<()> {
    match EnvVar::get("DBUS_SESSION_BUS_ADDRESS") {
        Some(_) => Ok(()),
        None => Err(QuarryError::Unavailable(
            "D-Bus connection to desktop session".to_string(),
        )),
    }
}
