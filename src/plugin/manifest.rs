use crate::env;
use crate::error::{QuarryError, Result};
use crate::settings::credentials::check_keyring_support;
use crate::settings::{is_core_setting, RawSetting, SettingDescriptor};
use serde::Deserialize;

/// プラグインがロード時に必要とする環境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// デスクトップセッションのメッセージバス
    SessionBus,
    /// 資格情報を保存できる秘密情報ストア
    Keyring,
}

impl Requirement {
    /// 満たされていなければ `QuarryError::Unavailable`
    pub fn check(self) -> Result<()> {
        match self {
            Requirement::SessionBus => env::check_session_bus(),
            Requirement::Keyring => check_keyring_support(),
        }
    }
}

/// プラグインマニフェスト（TOML）
///
/// ```toml
/// id = "files"
/// name = "Files"
/// version = "1.0"
/// sources = ["FileSource"]
/// requires = ["keyring"]
///
/// [[settings]]
/// key = "show_hidden"
/// type = "bool"
/// value = false
/// label = "Show hidden files"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PluginManifest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// ソースファクトリ名
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub requires: Vec<Requirement>,
    #[serde(default)]
    pub settings: Vec<RawSetting>,
}

impl PluginManifest {
    /// TOML からパース
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)
            .map_err(|e| QuarryError::InvalidManifest(format!("Failed to parse manifest: {}", e)))?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(QuarryError::InvalidManifest("plugin id is empty".to_string()));
        }
        if let Some(key) = self
            .settings
            .iter()
            .filter_map(|raw| raw.key.as_deref())
            .find(|key| is_core_setting(key))
        {
            return Err(QuarryError::ReservedSettingKey(key.to_string()));
        }
        Ok(())
    }

    /// 宣言された設定の記述子（必須項目の欠落はここで検出する）
    pub fn setting_descriptors(&self) -> Result<Vec<SettingDescriptor>> {
        self.settings
            .iter()
            .cloned()
            .map(SettingDescriptor::try_from)
            .collect()
    }

    /// 満たされていない最初の要件
    pub fn check_requirements(&self) -> Result<()> {
        self.requires.iter().try_for_each(|req| req.check())
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
