//! カタログオブジェクトの共通契約
//!
//! Source / Leaf / Action はすべて名前を持ち、文字列表現はその名前になる。

/// カタログに現れるすべてのオブジェクトの基底トレイト
pub trait CatalogObject {
    /// 表示名
    fn name(&self) -> &str;

    /// 補足説明
    fn description(&self) -> Option<String> {
        None
    }

    /// アイコンテーマ上のアイコン名
    fn icon_name(&self) -> &str {
        "text-x-generic"
    }
}

/// トレイトオブジェクトに Display / Debug を実装する
///
/// Display は名前そのもの、Debug は `<型 名前>` 形式。
macro_rules! impl_catalog_display {
    ($kind:literal, $t:ty) => {
        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::object::CatalogObject::name(self))
            }
        }

        impl std::fmt::Debug for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "<{} {}>", $kind, $crate::object::CatalogObject::name(self))
            }
        }
    };
}

pub(crate) use impl_catalog_display;
