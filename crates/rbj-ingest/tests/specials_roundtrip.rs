use std::collections::BTreeMap;

use proptest::prelude::*;
use rbj_ingest::parse_specials;
use rbj_model::Specials;

fn specials_entries() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-zA-Z][a-zA-Z0-9_]{0,8}", "[a-zA-Z0-9._-]{1,10}", 0..6).prop_map(
        |entries| {
            let mut seen: Vec<String> = Vec::new();
            entries
                .into_iter()
                .filter(|(key, _)| {
                    let lower = key.to_ascii_lowercase();
                    if seen.contains(&lower) {
                        false
                    } else {
                        seen.push(lower);
                        true
                    }
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn formatted_specials_parse_back_to_same_map(entries in specials_entries()) {
        let mut specials = Specials::new();
        for (key, value) in &entries {
            specials.insert(key.clone(), value.clone()).expect("distinct keys");
        }

        let text = specials.to_string();
        let parsed = parse_specials(&text).expect("formatted specials parse");
        prop_assert_eq!(parsed, specials);
    }
}
