//! Property tests for breadcrumb persistence.

use proptest::prelude::*;
use specsync_artifact::{Breadcrumb, Crumb, NodeKind};

fn crumb() -> impl Strategy<Value = Crumb> {
    (
        prop::sample::select(vec![NodeKind::ItemGroup, NodeKind::Item, NodeKind::Response]),
        prop::option::of("[a-z0-9]{1,6}"),
        0usize..50,
    )
        .prop_map(|(kind, id, index)| Crumb::new(kind, id, index))
}

proptest! {
    /// Tenet: extending a breadcrumb never changes the parent it came from.
    #[test]
    fn prop_child_leaves_parent_untouched(
        prefix in prop::collection::vec(crumb(), 0..6),
        extra in crumb(),
    ) {
        let parent: Breadcrumb = std::iter::once(Crumb::new(NodeKind::Collection, Some("1-root".into()), 0))
            .chain(prefix)
            .collect();
        let before: Vec<Crumb> = parent.iter().cloned().collect();

        let child = parent.child(extra.clone());
        let retyped = child.with_last_kind(NodeKind::Item);

        prop_assert_eq!(parent.iter().cloned().collect::<Vec<_>>(), before);
        prop_assert_eq!(child.len(), parent.len() + 1);
        prop_assert_eq!(child.last(), Some(&extra));
        prop_assert_eq!(retyped.last().map(|c| c.kind), Some(NodeKind::Item));
        prop_assert_eq!(retyped.get(parent.len() - 1), parent.last());
    }
}
