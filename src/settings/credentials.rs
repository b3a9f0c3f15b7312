//! 拡張設定（資格情報）と秘密情報ストア
//!
//! ユーザー名は通常の設定ファイルに、パスワードは `SecretBackend` に保存する。
//! バックエンドは `QUARRY_KEYRING` で選ぶ:
//!
//! | 値 | バックエンド |
//! |---|---|
//! | `file`（既定） | 設定ディレクトリの `keyring.toml`（権限 0600） |
//! | `memory` | プロセス内のみ |
//! | `none` | 利用不可（資格情報を要するプラグインは無効化される） |

use super::write_atomic;
use crate::env::{self, EnvVar};
use crate::error::{QuarryError, Result};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const KEYRING_FILE: &str = "keyring.toml";

/// 通常の設定ファイル以外にも値を持つ設定
pub trait ExtendedSetting {
    /// 設定ファイルに保存されていた `username` から値を復元する
    fn load(
        &mut self,
        secrets: &SecretBackend,
        plugin_id: &str,
        key: &str,
        username: &str,
    ) -> Result<()>;

    /// 秘密情報を保存し、設定ファイルに書く文字列を返す
    fn save(&self, secrets: &SecretBackend, plugin_id: &str, key: &str) -> Result<String>;
}

/// ユーザー名とパスワード
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserNamePassword {
    pub username: String,
    pub password: Option<String>,
}

impl UserNamePassword {
    pub fn new(username: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// パスワードは表示しない
impl fmt::Debug for UserNamePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<UserNamePassword {:?}, {}>",
            self.username,
            self.password.is_some()
        )
    }
}

impl ExtendedSetting for UserNamePassword {
    fn load(
        &mut self,
        secrets: &SecretBackend,
        plugin_id: &str,
        _key: &str,
        username: &str,
    ) -> Result<()> {
        self.password = secrets.get_password(plugin_id, username)?;
        self.username = username.to_string();
        Ok(())
    }

    fn save(&self, secrets: &SecretBackend, plugin_id: &str, _key: &str) -> Result<String> {
        match &self.password {
            Some(password) => secrets.set_password(plugin_id, &self.username, password)?,
            None => secrets.check_available()?,
        }
        Ok(self.username.clone())
    }
}

/// 秘密情報ストアの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyringKind {
    PlainFile,
    Memory,
    None,
}

impl KeyringKind {
    /// `QUARRY_KEYRING` から選ぶ（未設定・不明な値は `PlainFile`）
    pub fn from_env() -> Self {
        match EnvVar::get("QUARRY_KEYRING").as_deref() {
            Some("memory") => KeyringKind::Memory,
            Some("none") => KeyringKind::None,
            _ => KeyringKind::PlainFile,
        }
    }
}

/// プロセス内の秘密情報ストア
#[derive(Default)]
pub struct MemoryKeyring {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MemoryKeyring {
    fn get(&self, service: &str, username: &str) -> Option<String> {
        self.entries
            .lock()
            .get(&(service.to_string(), username.to_string()))
            .cloned()
    }

    fn set(&self, service: &str, username: &str, password: &str) {
        self.entries.lock().insert(
            (service.to_string(), username.to_string()),
            password.to_string(),
        );
    }
}

/// 平文の TOML ファイルによる秘密情報ストア
///
/// `[<service>]` テーブルにユーザー名 → パスワードを持つ。
pub struct FileKeyring {
    path: PathBuf,
    lock: Mutex<()>,
}

type KeyringTable = BTreeMap<String, BTreeMap<String, String>>;

impl FileKeyring {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<KeyringTable> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(KeyringTable::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, service: &str, username: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self
            .read()?
            .get(service)
            .and_then(|users| users.get(username))
            .cloned())
    }

    fn set(&self, service: &str, username: &str, password: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut table = self.read()?;
        table
            .entry(service.to_string())
            .or_default()
            .insert(username.to_string(), password.to_string());
        write_atomic(&self.path, &toml::to_string(&table)?, Some(0o600))?;
        debug!(path = %self.path.display(), service, "stored secret");
        Ok(())
    }
}

/// 秘密情報ストア
#[derive(Clone)]
pub enum SecretBackend {
    Memory(Arc<MemoryKeyring>),
    PlainFile(Arc<FileKeyring>),
    Unavailable,
}

impl SecretBackend {
    pub fn memory() -> Self {
        SecretBackend::Memory(Arc::default())
    }

    pub fn plain_file(path: impl Into<PathBuf>) -> Self {
        SecretBackend::PlainFile(Arc::new(FileKeyring::new(path)))
    }

    /// 種類と設定ディレクトリから構築
    pub fn from_kind(kind: KeyringKind, config_dir: &Path) -> Self {
        match kind {
            KeyringKind::PlainFile => Self::plain_file(config_dir.join(KEYRING_FILE)),
            KeyringKind::Memory => Self::memory(),
            KeyringKind::None => SecretBackend::Unavailable,
        }
    }

    /// 環境変数に従って構築
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_kind(KeyringKind::from_env(), &env::config_dir()?))
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, SecretBackend::Unavailable)
    }

    /// 利用できなければ `QuarryError::Unavailable`
    pub fn check_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(QuarryError::Unavailable("Keyring".to_string()))
        }
    }

    pub fn get_password(&self, service: &str, username: &str) -> Result<Option<String>> {
        match self {
            SecretBackend::Memory(keyring) => Ok(keyring.get(service, username)),
            SecretBackend::PlainFile(keyring) => keyring.get(service, username),
            SecretBackend::Unavailable => self.check_available().map(|_| None),
        }
    }

    pub fn set_password(&self, service: &str, username: &str, password: &str) -> Result<()> {
        match self {
            SecretBackend::Memory(keyring) => {
                keyring.set(service, username, password);
                Ok(())
            }
            SecretBackend::PlainFile(keyring) => keyring.set(service, username, password),
            SecretBackend::Unavailable => self.check_available(),
        }
    }
}

impl fmt::Debug for SecretBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretBackend::Memory(_) => f.write_str("SecretBackend::Memory"),
            SecretBackend::PlainFile(keyring) => {
                write!(f, "SecretBackend::PlainFile({})", keyring.path.display())
            }
            SecretBackend::Unavailable => f.write_str("SecretBackend::Unavailable"),
        }
    }
}

/// 資格情報の保存先が使えるか確認する
///
/// 資格情報を要するプラグインはロード時にこれを呼び、失敗したら無効化される。
pub fn check_keyring_support() -> Result<()> {
    match KeyringKind::from_env() {
        KeyringKind::None => Err(QuarryError::Unavailable("Keyring".to_string())),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;
