//! プラグインの契約と組み込みプラグイン
//!
//! プラグインは宣言的なマニフェストと、ソースを生成するファクトリから成る。
//! ホストはロード時に要件を確認し、設定を初期化してからソースを作らせる。

pub mod applications;
pub mod files;
mod manifest;
pub mod volumes;

pub use manifest::{PluginManifest, Requirement};

use crate::desktop::Desktop;
use crate::error::Result;
use crate::settings::{PluginSettings, SettingDescriptor, SettingType, SettingValue};
use crate::source::Source;
use std::sync::Arc;

/// プラグインのソースをカタログのルートに含めるか
pub const SHOW_IN_CATALOG: &str = "quarry_show_in_catalog";

/// ソース生成時に渡す環境
pub struct PluginContext {
    pub desktop: Arc<Desktop>,
    /// 初期化済みのプラグイン設定
    pub settings: Arc<PluginSettings>,
}

/// プラグイン
pub trait Plugin: Send + Sync {
    fn manifest(&self) -> &PluginManifest;

    /// マニフェストの `sources` に挙げたファクトリからソースを作る
    ///
    /// 知らないファクトリ名には `QuarryError::UnknownSource` を返す。
    fn create_source(&self, factory: &str, ctx: &PluginContext) -> Result<Arc<dyn Source>>;

    fn id(&self) -> &str {
        &self.manifest().id
    }
}

/// ホストがすべてのプラグインに付与する設定
pub fn core_settings() -> Vec<SettingDescriptor> {
    vec![SettingDescriptor::new(
        SHOW_IN_CATALOG,
        SettingType::Bool,
        SettingValue::Bool(true),
        "Include in top level",
    )
    .with_tooltip("Show the plugin's sources in the catalog root")]
}

/// マニフェストの設定とホストの設定からコレクションを作る
pub fn build_settings(manifest: &PluginManifest) -> Result<Arc<PluginSettings>> {
    let mut descriptors = manifest.setting_descriptors()?;
    descriptors.extend(core_settings());
    Ok(Arc::new(PluginSettings::new(descriptors)?))
}

/// 組み込みプラグイン（ロード順）
pub fn builtin_plugins() -> Result<Vec<Arc<dyn Plugin>>> {
    let plugins: Vec<Arc<dyn Plugin>> = vec![
        Arc::new(applications::ApplicationsPlugin::new()?),
        Arc::new(files::FilesPlugin::new()?),
        Arc::new(volumes::VolumesPlugin::new()?),
    ];
    Ok(plugins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_manifests_parse() {
        let plugins = builtin_plugins().unwrap();
        let ids: Vec<&str> = plugins.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["applications", "files", "volumes"]);
    }

    #[test]
    fn test_build_settings_appends_core_keys() {
        let plugin = files::FilesPlugin::new().unwrap();
        let settings = build_settings(plugin.manifest()).unwrap();

        assert_eq!(
            settings.keys(),
            vec!["show_hidden", "depth", SHOW_IN_CATALOG]
        );
        assert_eq!(settings.get(SHOW_IN_CATALOG).unwrap(), SettingValue::Bool(true));
    }
}
