//! プラグインごとの設定コレクション

use super::controller::{ConfigChanged, SettingsController};
use super::{
    is_core_setting, RawSetting, SettingDescriptor, SettingType, SettingValue, SubscriptionId,
    Subscribers,
};
use crate::error::{QuarryError, Result};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// 設定値の変更通知
#[derive(Debug, Clone, PartialEq)]
pub struct SettingChanged {
    pub key: String,
    pub value: SettingValue,
}

/// 観測可能な設定コレクション
///
/// キーは最初に追加された順を保つ。値の変更は購読者へ `SettingChanged` として届く
/// （`quarry_` で始まるキーを除く）。
pub struct PluginSettings {
    descriptors: RwLock<IndexMap<String, SettingDescriptor>>,
    subscribers: Subscribers<SettingChanged>,
    binding: Mutex<Option<(Weak<SettingsController>, SubscriptionId)>>,
}

impl PluginSettings {
    /// 記述子から構築する
    ///
    /// 既定値は型に従って変換する。変換できなければ設定エラー。
    /// 同じキーが複数あれば後のものが勝つが、位置は最初のものを保つ。
    pub fn new(descriptors: Vec<SettingDescriptor>) -> Result<Self> {
        let mut map = IndexMap::new();
        for mut desc in descriptors {
            desc.value = desc.value_type.coerce(&desc.key, desc.value)?;
            if let Some(alternatives) = desc.alternatives.take() {
                let coerced = alternatives
                    .into_iter()
                    .map(|alt| desc.value_type.coerce(&desc.key, alt))
                    .collect::<Result<Vec<_>>>()?;
                desc.alternatives = Some(coerced);
            }
            map.insert(desc.key.clone(), desc);
        }
        Ok(Self {
            descriptors: RwLock::new(map),
            subscribers: Subscribers::default(),
            binding: Mutex::new(None),
        })
    }

    /// マニフェストの記述から構築する
    pub fn from_raw(raw: Vec<RawSetting>) -> Result<Self> {
        let descriptors = raw
            .into_iter()
            .map(SettingDescriptor::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(descriptors)
    }

    /// キー（追加順）
    pub fn keys(&self) -> Vec<String> {
        self.descriptors.read().keys().cloned().collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.descriptors.read().contains_key(key)
    }

    /// 現在の記述子（追加順）
    pub fn descriptors(&self) -> Vec<SettingDescriptor> {
        self.descriptors.read().values().cloned().collect()
    }

    fn with_descriptor<T>(&self, key: &str, f: impl FnOnce(&SettingDescriptor) -> T) -> Result<T> {
        self.descriptors
            .read()
            .get(key)
            .map(f)
            .ok_or_else(|| QuarryError::UnknownSetting(key.to_string()))
    }

    pub fn get(&self, key: &str) -> Result<SettingValue> {
        self.with_descriptor(key, |d| d.value.clone())
    }

    /// 型に従って変換して保存し、購読者へ通知する
    pub fn set(&self, key: &str, value: impl Into<SettingValue>) -> Result<()> {
        let value = {
            let mut descriptors = self.descriptors.write();
            let desc = descriptors
                .get_mut(key)
                .ok_or_else(|| QuarryError::UnknownSetting(key.to_string()))?;
            desc.value = desc.value_type.coerce(key, value.into())?;
            desc.value.clone()
        };

        if !is_core_setting(key) {
            self.subscribers.emit(&SettingChanged {
                key: key.to_string(),
                value,
            });
        }
        Ok(())
    }

    pub fn value_type(&self, key: &str) -> Result<SettingType> {
        self.with_descriptor(key, |d| d.value_type)
    }

    pub fn label(&self, key: &str) -> Result<String> {
        self.with_descriptor(key, |d| d.label.clone())
    }

    pub fn alternatives(&self, key: &str) -> Result<Option<Vec<SettingValue>>> {
        self.with_descriptor(key, |d| d.alternatives.clone())
    }

    pub fn tooltip(&self, key: &str) -> Result<Option<String>> {
        self.with_descriptor(key, |d| d.tooltip.clone())
    }

    /// 値の変更を購読する
    pub fn subscribe(
        &self,
        callback: impl Fn(&SettingChanged) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// 永続化された値を読み込み、以後の変更を受け取るようにする
    ///
    /// `load_persisted` のあとに `attach` を呼ぶのと同じ。
    pub fn initialize(
        self: &Arc<Self>,
        plugin_id: &str,
        controller: &Arc<SettingsController>,
    ) -> Result<()> {
        self.load_persisted(plugin_id, controller)?;
        self.attach(plugin_id, controller)
    }

    /// 保存された値で既定値を上書きする
    ///
    /// コントローラには書き込まない。型に合わない値は警告して既定値のままにする。
    pub fn load_persisted(&self, plugin_id: &str, controller: &SettingsController) -> Result<()> {
        for key in self.keys() {
            let value_type = self.value_type(&key)?;
            match controller.plugin_config(plugin_id, &key, value_type) {
                Ok(Some(value)) => self.set(&key, value)?,
                Ok(None) => {}
                Err(e @ QuarryError::InvalidValue { .. }) => {
                    warn!(plugin = plugin_id, key = %key, "ignored stored setting: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// コントローラに結び付ける
    ///
    /// - 保存されていないホスト予約のキーは既定値をコントローラへ書き込む
    /// - コントローラの変更通知を購読する（このコレクションは弱参照で持つ）
    pub fn attach(
        self: &Arc<Self>,
        plugin_id: &str,
        controller: &Arc<SettingsController>,
    ) -> Result<()> {
        self.detach();

        for key in self.keys().into_iter().filter(|key| is_core_setting(key)) {
            let value_type = self.value_type(&key)?;
            if matches!(controller.plugin_config(plugin_id, &key, value_type), Ok(None)) {
                controller.set_plugin_config(plugin_id, &key, self.get(&key)?, value_type)?;
            }
        }

        let settings = Arc::downgrade(self);
        let weak_controller = Arc::downgrade(controller);
        let plugin = plugin_id.to_string();
        let id = controller.subscribe(move |change: &ConfigChanged| {
            if change.plugin != plugin {
                return;
            }
            let Some(settings) = settings.upgrade() else {
                return;
            };
            if let Err(e) = settings.apply_config(&plugin, change, &weak_controller) {
                warn!(plugin = %plugin, key = %change.key, "ignored setting change: {}", e);
            }
        });

        *self.binding.lock() = Some((Arc::downgrade(controller), id));
        debug!(plugin = plugin_id, "plugin settings attached");
        Ok(())
    }

    fn apply_config(
        &self,
        plugin: &str,
        change: &ConfigChanged,
        controller: &Weak<SettingsController>,
    ) -> Result<()> {
        if !self.contains(&change.key) {
            return Ok(());
        }
        // 資格情報のパスワードは設定ファイルに無いので保存先から読み直す
        if self.value_type(&change.key)? == SettingType::Credentials {
            if let Some(controller) = controller.upgrade() {
                if let Some(value) =
                    controller.plugin_config(plugin, &change.key, SettingType::Credentials)?
                {
                    return self.set(&change.key, value);
                }
            }
        }
        self.set(&change.key, change.value.clone())
    }

    /// コントローラの購読を解除する
    pub fn detach(&self) {
        if let Some((controller, id)) = self.binding.lock().take() {
            if let Some(controller) = controller.upgrade() {
                controller.unsubscribe(id);
            }
        }
    }
}

impl Drop for PluginSettings {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
#[path = "plugin_settings_test.rs"]
mod tests;
