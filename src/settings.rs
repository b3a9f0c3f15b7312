//! プラグイン設定
//!
//! - `PluginSettings`: プラグインごとの観測可能な設定コレクション
//! - `SettingsController`: 永続化された全プラグインの設定（プロセスに 1 つ）
//! - `credentials`: パスワードなど設定ファイルに書かない値
//!
//! ## 変更の伝播
//!
//! ```text
//! SettingsController::set_plugin_config / reload
//!         │ ConfigChanged { plugin, key, value }
//!         ▼
//! PluginSettings::set（型変換）
//!         │ SettingChanged { key, value }   ※ quarry_ で始まるキーは通知しない
//!         ▼
//! プラグインの購読者 → Source の再構成 → request_refresh()
//! ```

pub mod controller;
pub mod credentials;
mod descriptor;
mod plugin_settings;
mod value;

pub use controller::{ConfigChanged, SettingsController};
pub use credentials::{ExtendedSetting, SecretBackend, UserNamePassword};
pub use descriptor::{RawSetting, SettingDescriptor};
pub use plugin_settings::{PluginSettings, SettingChanged};
pub use value::{SettingType, SettingValue};

use crate::error::{QuarryError, Result};
use parking_lot::Mutex;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// ホストが予約している設定キーの接頭辞
pub const CORE_PREFIX: &str = "quarry_";

/// ホスト予約のキーかどうか
pub fn is_core_setting(key: &str) -> bool {
    key.starts_with(CORE_PREFIX)
}

/// 購読の識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// 購読者の登録簿
///
/// 通知時は一覧を複製してからロックを外して呼ぶので、
/// コールバックの中から購読・解除・読み出しをしてよい。
pub struct Subscribers<E> {
    next_id: AtomicU64,
    callbacks: Mutex<Vec<(SubscriptionId, Callback<E>)>>,
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            callbacks: Mutex::new(Vec::new()),
        }
    }
}

impl<E> Subscribers<E> {
    pub fn subscribe(&self, callback: impl Fn(&E) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.callbacks.lock().push((id, Arc::new(callback)));
        id
    }

    /// 解除（登録されていなければ false）
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.callbacks.lock();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .callbacks
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 一時ファイル経由でアトミックに書き込む
///
/// `mode` を指定すると置換前に権限を設定する（Unix のみ）。
pub(crate) fn write_atomic(path: &Path, content: &str, mode: Option<u32>) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent)
        .map_err(|e| QuarryError::Config(format!("Failed to create temp file: {}", e)))?;
    temp_file.write_all(content.as_bytes())?;

    if let Some(mode) = mode {
        set_mode(temp_file.as_file(), mode)?;
    }

    temp_file
        .persist(path)
        .map_err(|e| QuarryError::Config(format!("Failed to persist {}: {}", path.display(), e)))?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(file: &std::fs::File, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_file: &std::fs::File, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_core_prefix() {
        assert!(is_core_setting("quarry_show_in_catalog"));
        assert!(!is_core_setting("show_hidden"));
    }

    #[test]
    fn test_subscribers_emit_and_unsubscribe() {
        let subscribers: Subscribers<u32> = Subscribers::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = subscribers.subscribe(move |v: &u32| sink.lock().push(*v));

        subscribers.emit(&1);
        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id));
        subscribers.emit(&2);

        assert_eq!(*seen.lock(), vec![1]);
        assert!(subscribers.is_empty());
    }

    #[test]
    fn test_callback_may_unsubscribe_itself() {
        let subscribers: Arc<Subscribers<()>> = Arc::default();
        let id_slot = Arc::new(Mutex::new(None));
        let (registry, slot) = (Arc::clone(&subscribers), Arc::clone(&id_slot));
        let id = subscribers.subscribe(move |_| {
            if let Some(id) = *slot.lock() {
                registry.unsubscribe(id);
            }
        });
        *id_slot.lock() = Some(id);

        subscribers.emit(&());

        assert_eq!(subscribers.len(), 0);
    }

    #[test]
    fn test_write_atomic_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        write_atomic(&path, "a = 1\n", None).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a = 1\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_sets_mode() {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keyring.toml");

        write_atomic(&path, "", Some(0o600)).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
