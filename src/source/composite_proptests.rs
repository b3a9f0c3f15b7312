use super::*;
use crate::source::mock::{leaf_names, MockSource};
use proptest::prelude::*;

proptest! {
    /// 連結結果は子の列を順に並べたものと一致する
    #[test]
    fn prop_multi_source_is_concatenation(
        children in prop::collection::vec(prop::collection::vec("[a-z]{1,6}", 0..5), 0..6)
    ) {
        let sources: Vec<Arc<dyn Source>> = children
            .iter()
            .enumerate()
            .map(|(i, names)| {
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                Arc::new(MockSource::new(&format!("s{}", i), &refs)) as Arc<dyn Source>
            })
            .collect();
        let multi = MultiSource::new("all", sources);

        let expected: Vec<String> = children.into_iter().flatten().collect();
        prop_assert_eq!(leaf_names(&multi.leaves()), expected);
    }

    /// 子の数だけ SourceLeaf が並ぶ
    #[test]
    fn prop_sources_source_len(count in 0usize..8) {
        let sources: Vec<Arc<dyn Source>> = (0..count)
            .map(|i| Arc::new(MockSource::new(&format!("s{}", i), &[])) as Arc<dyn Source>)
            .collect();
        let source = SourcesSource::new("catalog", sources);
        prop_assert_eq!(source.leaves().len(), count);
    }
}
