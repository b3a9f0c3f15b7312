//! 他のソースから組み立てるソース
//!
//! - `MultiSource`: 子ソースの Leaf を順に連結する
//! - `SourcesSource`: 子ソース 1 つにつき 1 つの `SourceLeaf` を返す（入れ子カタログ）

use super::{into_items, Items, Source, SourceCache};
use crate::error::Result;
use crate::leaf::{Leaf, LeafObject};
use crate::object::CatalogObject;
use std::any::Any;
use std::sync::Arc;

/// 子ソースを連結するソース
///
/// 子の列は結合列がそこに到達した時点で初めて取得する。
/// 自身は連結するだけなので動的扱いとし、鮮度は各子ソースのキャッシュに任せる。
pub struct MultiSource {
    name: String,
    sources: Vec<Arc<dyn Source>>,
    cache: SourceCache,
}

impl MultiSource {
    pub fn new(name: impl Into<String>, sources: Vec<Arc<dyn Source>>) -> Self {
        Self {
            name: name.into(),
            sources,
            cache: SourceCache::new(),
        }
    }

    /// 子ソース
    pub fn sources(&self) -> &[Arc<dyn Source>] {
        &self.sources
    }
}

impl CatalogObject for MultiSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<String> {
        Some(format!("{} sources", self.sources.len()))
    }

    fn icon_name(&self) -> &str {
        "folder-saved-search"
    }
}

impl Source for MultiSource {
    fn items(&self) -> Items<'_> {
        Box::new(
            self.sources
                .iter()
                .flat_map(|source| into_items(source.leaves())),
        )
    }

    fn cache(&self) -> &SourceCache {
        &self.cache
    }

    fn is_dynamic(&self) -> bool {
        true
    }

    fn invalidate(&self) {
        self.cache.clear();
        for source in &self.sources {
            source.invalidate();
        }
    }
}

/// ソースを Leaf として並べるソース
pub struct SourcesSource {
    name: String,
    sources: Vec<Arc<dyn Source>>,
    cache: SourceCache,
}

impl SourcesSource {
    pub fn new(name: impl Into<String>, sources: Vec<Arc<dyn Source>>) -> Self {
        Self {
            name: name.into(),
            sources,
            cache: SourceCache::new(),
        }
    }
}

impl CatalogObject for SourcesSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn icon_name(&self) -> &str {
        "folder-saved-search"
    }
}

impl Source for SourcesSource {
    fn items(&self) -> Items<'_> {
        Box::new(
            self.sources
                .iter()
                .map(|source| Arc::new(SourceLeaf::new(Arc::clone(source))) as Arc<dyn Leaf>),
        )
    }

    fn cache(&self) -> &SourceCache {
        &self.cache
    }
}

/// ソースを包む Leaf
///
/// 掘り下げると包んでいるソースそのものが返る。
pub struct SourceLeaf {
    source: Arc<dyn Source>,
    name: String,
}

impl SourceLeaf {
    pub fn new(source: Arc<dyn Source>) -> Self {
        let name = source.name().to_string();
        Self { source, name }
    }
}

impl CatalogObject for SourceLeaf {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<String> {
        self.source.description()
    }

    fn icon_name(&self) -> &str {
        "folder"
    }
}

impl Leaf for SourceLeaf {
    fn object(&self) -> LeafObject<'_> {
        LeafObject::Source(&self.source)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn has_content(&self) -> bool {
        true
    }

    fn content_source(&self, _alternate: bool) -> Result<Arc<dyn Source>> {
        Ok(Arc::clone(&self.source))
    }
}

#[cfg(test)]
#[path = "composite_test.rs"]
mod tests;

#[cfg(test)]
#[path = "composite_proptests.rs"]
mod proptests;
