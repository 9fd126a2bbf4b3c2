//! Property tests for request fingerprints.

use proptest::prelude::*;
use specsync_collection::{raw_has_path, RequestMeta};

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9{}:_-]{1,8}"
}

proptest! {
    /// Tenet: query strings and fragments never change a fingerprint.
    #[test]
    fn prop_query_does_not_matter(
        host in "[a-z]{1,8}(\\.[a-z]{2,3})?",
        path in prop::collection::vec(segment(), 1..5),
        query in "[a-z=&/]{0,12}",
    ) {
        let raw = format!("https://{host}/{}", path.join("/"));
        let with_query = format!("{raw}?{query}#frag");

        prop_assert!(raw_has_path(&raw));
        prop_assert!(raw_has_path(&with_query));
        prop_assert_eq!(
            RequestMeta::from_raw("GET", &raw).fingerprint(),
            RequestMeta::from_raw("get", &with_query).fingerprint()
        );
    }

    /// Tenet: distinct canonical forms give distinct fingerprints.
    #[test]
    fn prop_distinct_paths_are_distinct(a in segment(), b in segment()) {
        prop_assume!(a != b);
        let first = RequestMeta::from_raw("GET", &format!("{{{{baseUrl}}}}/{a}"));
        let second = RequestMeta::from_raw("GET", &format!("{{{{baseUrl}}}}/{b}"));
        prop_assert_ne!(first.fingerprint(), second.fingerprint());
    }
}
