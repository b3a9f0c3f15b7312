//! Action: Leaf に適用する操作
//!
//! Action は不変の値オブジェクトで、呼び出し間で共有してよい。
//! 結果は返さない。失敗はログに残し、外部リソースの状態変化で観測する。

use crate::leaf::Leaf;
use crate::object::{impl_catalog_display, CatalogObject};
use std::sync::Arc;

/// Leaf に対する操作
pub trait Action: CatalogObject + Send + Sync {
    /// 単一の Leaf に対して実行
    fn activate(&self, leaf: &dyn Leaf);

    /// 複数の Leaf に対して実行
    ///
    /// 単発実行の繰り返しと等価である必要はない（まとめて起動するなど）。
    fn activate_many(&self, leaves: &[Arc<dyn Leaf>]) {
        for leaf in leaves {
            self.activate(leaf.as_ref());
        }
    }
}

impl_catalog_display!("Action", dyn Action);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::TextLeaf;
    use parking_lot::Mutex;

    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl CatalogObject for Recorder {
        fn name(&self) -> &str {
            "Record"
        }
    }

    impl Action for Recorder {
        fn activate(&self, leaf: &dyn Leaf) {
            self.seen.lock().push(leaf.name().to_string());
        }
    }

    #[test]
    fn test_activate_many_defaults_to_each_leaf() {
        let action = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        let leaves: Vec<Arc<dyn Leaf>> = vec![
            Arc::new(TextLeaf::new("a", "A")),
            Arc::new(TextLeaf::new("b", "B")),
        ];

        action.activate_many(&leaves);

        assert_eq!(*action.seen.lock(), vec!["A", "B"]);
    }

    #[test]
    fn test_action_display() {
        let action: Arc<dyn Action> = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        assert_eq!(action.to_string(), "Record");
    }
}
