//! 設定コントローラ
//!
//! 全プラグインの設定値を 1 つの TOML ファイルに保存する。
//! プラグインごとに `[plugin_<id>]` テーブルを持つ。
//!
//! ```toml
//! [plugin_files]
//! show_hidden = true
//! depth = 1
//! quarry_show_in_catalog = true
//! ```

use super::credentials::{ExtendedSetting, SecretBackend, UserNamePassword};
use super::{write_atomic, SettingType, SettingValue, SubscriptionId, Subscribers};
use crate::error::{QuarryError, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 設定ファイル名
pub const CONFIG_FILE: &str = "config.toml";

const SECTION_PREFIX: &str = "plugin_";

type Sections = BTreeMap<String, toml::Table>;

/// 保存値の変更通知
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigChanged {
    pub plugin: String,
    pub key: String,
    pub value: SettingValue,
}

/// 永続化された設定の管理
///
/// プロセスに 1 つ作り、`Arc` で必要な箇所へ渡す。
pub struct SettingsController {
    path: Option<PathBuf>,
    sections: RwLock<Sections>,
    secrets: SecretBackend,
    subscribers: Subscribers<ConfigChanged>,
}

impl SettingsController {
    /// ファイルに保存しないコントローラ
    pub fn in_memory() -> Self {
        Self::with_sections(None, Sections::new(), SecretBackend::memory())
    }

    /// `path` から読み込む（ファイルが無ければ空）
    pub fn load(path: impl Into<PathBuf>, secrets: SecretBackend) -> Result<Self> {
        let path = path.into();
        let sections = read_sections(&path)?;
        debug!(path = %path.display(), sections = sections.len(), "loaded settings");
        Ok(Self::with_sections(Some(path), sections, secrets))
    }

    fn with_sections(path: Option<PathBuf>, sections: Sections, secrets: SecretBackend) -> Self {
        Self {
            path,
            sections: RwLock::new(sections),
            secrets,
            subscribers: Subscribers::default(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn secrets(&self) -> &SecretBackend {
        &self.secrets
    }

    /// 設定を持つプラグインの ID
    pub fn plugins(&self) -> Vec<String> {
        self.sections
            .read()
            .keys()
            .filter_map(|name| name.strip_prefix(SECTION_PREFIX))
            .map(String::from)
            .collect()
    }

    /// 保存値を型に従って読む（無ければ None）
    pub fn plugin_config(
        &self,
        plugin: &str,
        key: &str,
        value_type: SettingType,
    ) -> Result<Option<SettingValue>> {
        let raw = self
            .sections
            .read()
            .get(&section_name(plugin))
            .and_then(|table| table.get(key))
            .cloned();
        let Some(raw) = raw else {
            return Ok(None);
        };

        if value_type == SettingType::Credentials {
            let username = raw.as_str().ok_or_else(|| QuarryError::InvalidValue {
                key: key.to_string(),
                message: "credentials must be stored as a user name".to_string(),
            })?;
            let mut credentials = UserNamePassword::default();
            credentials.load(&self.secrets, plugin, key, username)?;
            return Ok(Some(SettingValue::Credentials(credentials)));
        }

        let value = SettingValue::from_toml(&raw).ok_or_else(|| QuarryError::InvalidValue {
            key: key.to_string(),
            message: format!("unsupported value {}", raw),
        })?;
        value_type.coerce(key, value).map(Some)
    }

    /// 値を変換して保存し、購読者へ通知する
    ///
    /// 資格情報はパスワードを秘密情報ストアへ、ユーザー名だけを設定ファイルへ書く。
    pub fn set_plugin_config(
        &self,
        plugin: &str,
        key: &str,
        value: SettingValue,
        value_type: SettingType,
    ) -> Result<()> {
        let value = value_type.coerce(key, value)?;
        let stored = match &value {
            SettingValue::Credentials(credentials) => {
                toml::Value::String(credentials.save(&self.secrets, plugin, key)?)
            }
            other => other.to_toml(),
        };

        self.sections
            .write()
            .entry(section_name(plugin))
            .or_default()
            .insert(key.to_string(), stored);
        debug!(plugin, key, "plugin config changed");

        self.subscribers.emit(&ConfigChanged {
            plugin: plugin.to_string(),
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    /// ファイルへ書き出す（メモリ上のみのコントローラでは何もしない）
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = toml::to_string(&*self.sections.read())?;
        write_atomic(path, &content, None)?;
        debug!(path = %path.display(), "saved settings");
        Ok(())
    }

    /// ファイルを読み直し、値が変わったものを通知する
    ///
    /// 他のプロセスが書いた変更を取り込むのに使う。通知した件数を返す。
    pub fn reload(&self) -> Result<usize> {
        let Some(path) = &self.path else {
            return Ok(0);
        };
        let fresh = read_sections(path)?;

        let changes: Vec<ConfigChanged> = {
            let mut sections = self.sections.write();
            let changes = diff_sections(&sections, &fresh);
            *sections = fresh;
            changes
        };

        for change in &changes {
            self.subscribers.emit(change);
        }
        Ok(changes.len())
    }

    /// 保存値の変更を購読する
    pub fn subscribe(
        &self,
        callback: impl Fn(&ConfigChanged) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// 購読者の数
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

fn section_name(plugin: &str) -> String {
    format!("{}{}", SECTION_PREFIX, plugin)
}

fn read_sections(path: &Path) -> Result<Sections> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Sections::new()),
        Err(e) => Err(e.into()),
    }
}

/// 新しく現れた値・変わった値（削除されたキーは対象外）
fn diff_sections(old: &Sections, new: &Sections) -> Vec<ConfigChanged> {
    let mut changes = Vec::new();
    for (section, table) in new {
        let Some(plugin) = section.strip_prefix(SECTION_PREFIX) else {
            continue;
        };
        let previous = old.get(section);
        for (key, raw) in table {
            if previous.and_then(|t| t.get(key)) == Some(raw) {
                continue;
            }
            if let Some(value) = SettingValue::from_toml(raw) {
                changes.push(ConfigChanged {
                    plugin: plugin.to_string(),
                    key: key.clone(),
                    value,
                });
            }
        }
    }
    changes
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
