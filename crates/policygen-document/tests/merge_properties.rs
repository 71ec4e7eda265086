use policygen_document::{is_unfilled, merge_overlay, Document, Mapping};
use proptest::prelude::*;

fn document_strategy() -> impl Strategy<Value = Document> {
    let leaf = prop_oneof![
        Just(Document::Null),
        any::<bool>().prop_map(Document::from),
        any::<i64>().prop_map(Document::from),
        "[a-z]{0,6}".prop_map(Document::from),
        "\\$[a-z]{1,6}".prop_map(Document::from),
    ];

    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Document::Array),
            proptest::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Document::Object(m.into_iter().collect())),
        ]
    })
}

fn mapping_strategy() -> impl Strategy<Value = Mapping> {
    proptest::collection::btree_map("[a-z]{1,4}", document_strategy(), 0..6)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn empty_overlay_cleanup_is_idempotent(base in mapping_strategy()) {
        let once = merge_overlay(base, None).unwrap();
        let twice = merge_overlay(once.clone(), None).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn empty_overlay_leaves_no_top_level_placeholders(base in mapping_strategy()) {
        let merged = merge_overlay(base, None).unwrap();
        prop_assert!(merged.values().all(|v| !is_unfilled(v)));
    }

    #[test]
    fn overlay_never_adds_keys(base in mapping_strategy(), overlay in mapping_strategy()) {
        let base_keys: Vec<String> = base.keys().cloned().collect();
        if let Ok(merged) = merge_overlay(base, Some(&overlay)) {
            prop_assert!(merged.keys().all(|k| base_keys.contains(k)));
        }
    }
}
