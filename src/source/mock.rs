//! テスト用モックソース

use super::*;
use crate::leaf::TextLeaf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 下位データを外から差し替えられるソース
///
/// `items()` が呼ばれた回数を数える。
pub struct MockSource {
    name: String,
    dynamic: bool,
    data: Mutex<Vec<String>>,
    produced: AtomicUsize,
    cache: SourceCache,
}

impl MockSource {
    pub fn new(name: &str, data: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            dynamic: false,
            data: Mutex::new(data.iter().map(|s| s.to_string()).collect()),
            produced: AtomicUsize::new(0),
            cache: SourceCache::new(),
        }
    }

    pub fn dynamic(name: &str, data: &[&str]) -> Self {
        Self {
            dynamic: true,
            ..Self::new(name, data)
        }
    }

    /// 下位データを差し替え
    pub fn set_data(&self, data: &[&str]) {
        *self.data.lock() = data.iter().map(|s| s.to_string()).collect();
    }

    /// `items()` が呼ばれた回数
    pub fn produced(&self) -> usize {
        self.produced.load(Ordering::SeqCst)
    }
}

impl CatalogObject for MockSource {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Source for MockSource {
    fn items(&self) -> Items<'_> {
        self.produced.fetch_add(1, Ordering::SeqCst);
        let data = self.data.lock().clone();
        Box::new(
            data.into_iter()
                .map(|s| Arc::new(TextLeaf::new(s.clone(), s)) as Arc<dyn Leaf>),
        )
    }

    fn cache(&self) -> &SourceCache {
        &self.cache
    }

    fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

/// Leaf 列の表示名
pub fn leaf_names(leaves: &[Arc<dyn Leaf>]) -> Vec<String> {
    leaves.iter().map(|l| l.name().to_string()).collect()
}

/// 再表示要求を記録するリスナー
#[derive(Default)]
pub struct RecordingListener {
    pub changed: Mutex<Vec<String>>,
}

impl RefreshListener for RecordingListener {
    fn source_changed(&self, source: &str) {
        self.changed.lock().push(source.to_string());
    }
}
