//! Leaf: カタログ上で選択可能な項目
//!
//! Leaf は実体（パス、デスクトップエントリ、ソースなど）を型付きのまま持ち、
//! `object()` でその借用ビューを返す。適用可能な Action の一覧も返す。入れ子のコンテンツを持つ Leaf は
//! `content_source()` で掘り下げ先の Source を返す。

use crate::action::Action;
use crate::application::DesktopEntry;
use crate::error::{QuarryError, Result};
use crate::object::{impl_catalog_display, CatalogObject};
use crate::source::Source;
use std::any::Any;
use std::path::Path;
use std::sync::Arc;

/// Leaf が保持する実体（借用ビュー）
#[derive(Debug, Clone, Copy)]
pub enum LeafObject<'a> {
    /// ファイルやディレクトリ、マウントポイント
    Path(&'a Path),
    /// アプリケーションのデスクトップエントリ
    Application(&'a DesktopEntry),
    /// 入れ子のカタログ
    Source(&'a Arc<dyn Source>),
    /// 任意のテキスト
    Text(&'a str),
}

impl<'a> LeafObject<'a> {
    /// パスとして取得
    pub fn as_path(&self) -> Option<&'a Path> {
        match *self {
            LeafObject::Path(path) => Some(path),
            _ => None,
        }
    }

    /// アプリケーションとして取得
    pub fn as_application(&self) -> Option<&'a DesktopEntry> {
        match *self {
            LeafObject::Application(entry) => Some(entry),
            _ => None,
        }
    }
}

impl PartialEq for LeafObject<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LeafObject::Path(a), LeafObject::Path(b)) => a == b,
            (LeafObject::Application(a), LeafObject::Application(b)) => a.id == b.id,
            (LeafObject::Source(a), LeafObject::Source(b)) => {
                Arc::as_ptr(*a) as *const () == Arc::as_ptr(*b) as *const ()
            }
            (LeafObject::Text(a), LeafObject::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for LeafObject<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeafObject::Path(path) => write!(f, "{}", path.display()),
            LeafObject::Application(entry) => write!(f, "{}", entry.id),
            LeafObject::Source(source) => write!(f, "{}", source),
            LeafObject::Text(text) => f.write_str(text),
        }
    }
}

/// カタログ項目
///
/// `actions()` の先頭がデフォルトアクション（Enter 相当）。
/// 外部リソースに結び付いた Leaf は `is_valid()` をオーバーライドし、
/// 呼ばれるたびにプロバイダへ問い合わせる。
pub trait Leaf: CatalogObject + Send + Sync {
    /// ペイロード
    fn object(&self) -> LeafObject<'_>;

    /// 具象型へのダウンキャスト用
    fn as_any(&self) -> &dyn Any;

    /// 適用可能なアクション（先頭がデフォルト）
    fn actions(&self) -> Vec<Arc<dyn Action>> {
        Vec::new()
    }

    /// デフォルトアクション
    fn default_action(&self) -> Option<Arc<dyn Action>> {
        self.actions().into_iter().next()
    }

    /// 入れ子のコンテンツを持つか
    fn has_content(&self) -> bool {
        false
    }

    /// 掘り下げ先の Source
    ///
    /// `alternate` は代替モード（隠しファイルの表示など）。
    /// コンテンツを持たない場合は `QuarryError::NoContent`。
    fn content_source(&self, _alternate: bool) -> Result<Arc<dyn Source>> {
        Err(QuarryError::NoContent(self.name().to_string()))
    }

    /// 実体がまだ有効か
    fn is_valid(&self) -> bool {
        true
    }
}

impl_catalog_display!("Leaf", dyn Leaf);

/// 同じ実体を指しているか
pub fn same_object(a: &dyn Leaf, b: &dyn Leaf) -> bool {
    a.object() == b.object()
}

/// テキストだけを持つ汎用 Leaf
#[derive(Debug, Clone)]
pub struct TextLeaf {
    text: String,
    name: String,
}

impl TextLeaf {
    pub fn new(text: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            name: name.into(),
        }
    }
}

impl CatalogObject for TextLeaf {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Leaf for TextLeaf {
    fn object(&self) -> LeafObject<'_> {
        LeafObject::Text(&self.text)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
