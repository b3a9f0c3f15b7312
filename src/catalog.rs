//! カタログ: プラグインをロードし、ソースを束ねる
//!
//! ## ロード手順（プラグインごと）
//!
//! 1. マニフェストの要件を確認する（満たさなければ無効化）
//! 2. 設定コレクションを作り、コントローラから保存値を読み込む
//! 3. 各ファクトリからソースを作り、再表示要求の送り先を登録する
//!
//! どの段階で失敗してもそのプラグインは無効化され、理由が記録される。
//! 途中まで読み込まれたプラグインは残らない。

use crate::desktop::Desktop;
use crate::error::{QuarryError, Result};
use crate::object::CatalogObject;
use crate::plugin::{build_settings, Plugin, PluginContext, PluginManifest, SHOW_IN_CATALOG};
use crate::settings::{PluginSettings, SettingsController};
use crate::source::{MultiSource, RefreshListener, Source, SourcesSource};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};

/// ロード済みのプラグイン
pub struct LoadedPlugin {
    plugin: Arc<dyn Plugin>,
    settings: Arc<PluginSettings>,
    sources: Vec<Arc<dyn Source>>,
}

impl LoadedPlugin {
    pub fn id(&self) -> &str {
        self.plugin.id()
    }

    pub fn manifest(&self) -> &PluginManifest {
        self.plugin.manifest()
    }

    pub fn settings(&self) -> &Arc<PluginSettings> {
        &self.settings
    }

    pub fn sources(&self) -> &[Arc<dyn Source>] {
        &self.sources
    }

    /// ソースをカタログのルートに含めるか（設定を毎回読む）
    pub fn show_in_catalog(&self) -> bool {
        self.settings
            .get(SHOW_IN_CATALOG)
            .ok()
            .and_then(|value| value.as_bool())
            .unwrap_or(true)
    }
}

/// ロードできなかったプラグイン
#[derive(Debug, Clone, PartialEq)]
pub struct DisabledPlugin {
    pub id: String,
    pub name: String,
    pub reason: String,
}

/// ソースからの再表示要求を溜めておく
///
/// ホストのループが `take` で取り出す。同じソースの要求は 1 つにまとめる。
#[derive(Default)]
pub struct RefreshQueue {
    pending: Mutex<Vec<String>>,
}

impl RefreshQueue {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock())
    }
}

impl RefreshListener for RefreshQueue {
    fn source_changed(&self, source: &str) {
        let mut pending = self.pending.lock();
        if !pending.iter().any(|name| name == source) {
            pending.push(source.to_string());
        }
        debug!(source, "refresh requested");
    }
}

/// プラグインとそのソースの集合
pub struct Catalog {
    controller: Arc<SettingsController>,
    plugins: Vec<LoadedPlugin>,
    disabled: Vec<DisabledPlugin>,
    refresh: Arc<RefreshQueue>,
}

impl Catalog {
    /// プラグインを順にロードする
    pub fn load(
        desktop: Arc<Desktop>,
        controller: Arc<SettingsController>,
        plugins: Vec<Arc<dyn Plugin>>,
    ) -> Self {
        let mut catalog = Self {
            controller,
            plugins: Vec::new(),
            disabled: Vec::new(),
            refresh: Arc::new(RefreshQueue::default()),
        };

        for plugin in plugins {
            let manifest = plugin.manifest();
            let (id, name) = (manifest.id.clone(), manifest.name.clone());

            let result = if catalog.plugins.iter().any(|p| p.id() == id) {
                Err(QuarryError::InvalidManifest(format!(
                    "duplicate plugin id '{}'",
                    id
                )))
            } else {
                catalog.load_plugin(&plugin, &desktop)
            };

            match result {
                Ok(loaded) => {
                    info!(plugin = %id, sources = loaded.sources.len(), "loaded plugin");
                    catalog.plugins.push(loaded);
                }
                Err(e) => {
                    // 設定エラーはプラグイン側の不具合、それ以外は環境の問題
                    if e.is_configuration() {
                        error!(plugin = %id, "plugin disabled: {}", e);
                    } else {
                        warn!(plugin = %id, "plugin disabled: {}", e);
                    }
                    catalog.disabled.push(DisabledPlugin {
                        id,
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }
        catalog
    }

    fn load_plugin(&self, plugin: &Arc<dyn Plugin>, desktop: &Arc<Desktop>) -> Result<LoadedPlugin> {
        let manifest = plugin.manifest();
        manifest.check_requirements()?;

        // コントローラへの書き込みはソースがすべて作れてから
        let settings = build_settings(manifest)?;
        settings.load_persisted(&manifest.id, &self.controller)?;

        let ctx = PluginContext {
            desktop: Arc::clone(desktop),
            settings: Arc::clone(&settings),
        };
        let listener: Weak<dyn RefreshListener> = Arc::downgrade(&self.refresh) as Weak<dyn RefreshListener>;
        let sources = manifest
            .sources
            .iter()
            .map(|factory| {
                let source = plugin.create_source(factory, &ctx)?;
                source.set_refresh_callback(Weak::clone(&listener));
                Ok(source)
            })
            .collect::<Result<Vec<_>>>()?;
        settings.attach(&manifest.id, &self.controller)?;

        Ok(LoadedPlugin {
            plugin: Arc::clone(plugin),
            settings,
            sources,
        })
    }

    pub fn controller(&self) -> &Arc<SettingsController> {
        &self.controller
    }

    /// ロード済みのプラグイン（ロード順）
    pub fn plugins(&self) -> &[LoadedPlugin] {
        &self.plugins
    }

    pub fn plugin(&self, id: &str) -> Result<&LoadedPlugin> {
        self.plugins
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| QuarryError::PluginNotFound(id.to_string()))
    }

    /// 無効化されたプラグインと理由
    pub fn disabled(&self) -> &[DisabledPlugin] {
        &self.disabled
    }

    /// すべてのソース（ロード順）
    pub fn sources(&self) -> Vec<Arc<dyn Source>> {
        self.plugins
            .iter()
            .flat_map(|p| p.sources.iter().cloned())
            .collect()
    }

    /// 名前でソースを探す
    pub fn find_source(&self, name: &str) -> Option<Arc<dyn Source>> {
        self.plugins
            .iter()
            .flat_map(|p| p.sources.iter())
            .find(|source| source.name() == name)
            .cloned()
    }

    /// カタログのルート（ルートに含める設定のプラグインのソースを連結）
    pub fn root(&self) -> MultiSource {
        let sources = self
            .plugins
            .iter()
            .filter(|p| p.show_in_catalog())
            .flat_map(|p| p.sources.iter().cloned())
            .collect();
        MultiSource::new("Catalog", sources)
    }

    /// すべてのソースを Leaf として並べるソース
    pub fn sources_source(&self) -> SourcesSource {
        SourcesSource::new("Catalog Index", self.sources())
    }

    /// 前回の呼び出し以降に再表示を要求したソース名
    pub fn take_refresh_requests(&self) -> Vec<String> {
        self.refresh.take()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
