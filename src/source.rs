//! Source: Leaf の供給元とそのキャッシュ
//!
//! ## キャッシュ規約
//!
//! - 非動的ソース: 最初の `leaves()` で `items()` を一度だけ評価し、
//!   `invalidate()` されるまで同じ列を返し続ける（下位データが変わっても再計算しない）
//! - 動的ソース: `leaves()` のたびにキャッシュを捨てて `items()` を評価し直す
//!
//! ## 使い方
//!
//! ```ignore
//! let source: Arc<dyn Source> = Arc::new(DirectorySource::new(home, false, desktop));
//! for leaf in source.leaves().iter() {
//!     println!("{}", leaf);
//! }
//! if source.has_parent() {
//!     let parent = source.parent()?;
//! }
//! ```

mod composite;
mod directory;

pub use composite::{MultiSource, SourceLeaf, SourcesSource};
pub use directory::{DirectorySource, FileSource, FileSourceOptions};

use crate::error::{QuarryError, Result};
use crate::leaf::Leaf;
use crate::object::{impl_catalog_display, CatalogObject};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::debug;

/// キャッシュされた Leaf 列
pub type Leaves = Arc<[Arc<dyn Leaf>]>;

/// `items()` が返す遅延列
pub type Items<'a> = Box<dyn Iterator<Item = Arc<dyn Leaf>> + 'a>;

/// ソースの所有者（再表示を要求される側）
///
/// ソースは所有者を `Weak` でしか参照しない。
pub trait RefreshListener: Send + Sync {
    /// `source` の内容が変わった可能性がある
    fn source_changed(&self, source: &str);
}

/// ソースごとのキャッシュと再表示コールバック
#[derive(Default)]
pub struct SourceCache {
    items: Mutex<Option<Leaves>>,
    listener: Mutex<Option<Weak<dyn RefreshListener>>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// キャッシュ済みの列
    pub fn get(&self) -> Option<Leaves> {
        self.items.lock().clone()
    }

    /// 列を保存
    pub fn store(&self, leaves: Leaves) {
        *self.items.lock() = Some(leaves);
    }

    /// キャッシュを破棄（破棄したものがあれば true）
    pub fn clear(&self) -> bool {
        self.items.lock().take().is_some()
    }

    /// キャッシュ済みかどうか
    pub fn is_filled(&self) -> bool {
        self.items.lock().is_some()
    }

    /// 再表示コールバックの登録先を設定
    pub fn set_listener(&self, listener: Weak<dyn RefreshListener>) {
        *self.listener.lock() = Some(listener);
    }

    /// 所有者がまだ生きていれば返す
    pub fn listener(&self) -> Option<Arc<dyn RefreshListener>> {
        self.listener.lock().as_ref().and_then(Weak::upgrade)
    }
}

/// Leaf の供給元
pub trait Source: CatalogObject + Send + Sync {
    /// Leaf を生成する（キャッシュを介さない）
    fn items(&self) -> Items<'_>;

    /// このソースが所有するキャッシュ
    fn cache(&self) -> &SourceCache;

    /// アクセスのたびに再計算するか（型ごとに固定）
    fn is_dynamic(&self) -> bool {
        false
    }

    /// 親ソースを持つか
    fn has_parent(&self) -> bool {
        false
    }

    /// 親ソース
    ///
    /// 親を持たない場合は `QuarryError::NoParent`。カタログのルート判定には
    /// 先に `has_parent()` を使うこと。
    fn parent(&self) -> Result<Arc<dyn Source>> {
        Err(QuarryError::NoParent(self.name().to_string()))
    }

    /// キャッシュを考慮した Leaf 列
    fn leaves(&self) -> Leaves {
        if self.is_dynamic() {
            self.cache().clear();
            return self.items().collect();
        }

        if let Some(cached) = self.cache().get() {
            return cached;
        }

        // items() の評価中はロックを持たない
        let leaves: Leaves = self.items().collect();
        debug!(source = self.name(), count = leaves.len(), "cached source items");
        self.cache().store(Arc::clone(&leaves));
        leaves
    }

    /// キャッシュを無効化し、次の `leaves()` で再計算させる
    fn invalidate(&self) {
        if self.cache().clear() {
            debug!(source = self.name(), "invalidated source cache");
        }
    }

    /// 所有者への再表示コールバックを登録
    fn set_refresh_callback(&self, listener: Weak<dyn RefreshListener>) {
        self.cache().set_listener(listener);
    }

    /// 内容が変わったことを通知する（キャッシュも無効化する）
    fn request_refresh(&self) {
        self.invalidate();
        if let Some(listener) = self.cache().listener() {
            listener.source_changed(self.name());
        }
    }
}

impl_catalog_display!("Source", dyn Source);

/// キャッシュ済みの列を所有する遅延列に変換する
pub fn into_items<'a>(leaves: Leaves) -> Items<'a> {
    Box::new((0..leaves.len()).map(move |i| Arc::clone(&leaves[i])))
}

#[cfg(test)]
pub mod mock;

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
