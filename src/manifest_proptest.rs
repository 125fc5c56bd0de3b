//! Property-based tests for manifest parsing.
//!
//! These tests generate manifest documents from random entries and check that
//! parsing gives back exactly those entries, in the same order.

#[cfg(test)]
mod proptest_tests {
    use crate::manifest::{Manifest, ManifestEntry};
    use proptest::prelude::*;

    fn render(entries: &[(String, String)]) -> String {
        let mut xml = String::from("<addons-presets>\n");
        for (name, link) in entries {
            xml.push_str(&format!(
                "  <mod>\n    <modname>{}</modname>\n    <link>{}</link>\n  </mod>\n",
                name, link
            ));
        }
        xml.push_str("</addons-presets>\n");
        xml
    }

    fn entry_strategy() -> impl Strategy<Value = (String, String)> {
        (
            "[A-Za-z0-9_]([A-Za-z0-9_ ]{0,18}[A-Za-z0-9_])?",
            "[0-9]{1,12}".prop_map(|id| format!("https://steamcommunity.com/sharedfiles/filedetails/?id={}", id)),
        )
    }

    proptest! {
        /// Property: N records parse into N entries in document order
        #[test]
        fn parse_preserves_count_and_order(entries in prop::collection::vec(entry_strategy(), 0..40)) {
            let manifest = Manifest::parse(&render(&entries)).unwrap();

            prop_assert_eq!(manifest.len(), entries.len());
            for (parsed, (name, link)) in manifest.iter().zip(&entries) {
                prop_assert_eq!(parsed, &ManifestEntry::new(name.clone(), link.clone()));
            }
        }

        /// Property: parsing is deterministic
        #[test]
        fn parse_is_deterministic(entries in prop::collection::vec(entry_strategy(), 0..10)) {
            let xml = render(&entries);
            prop_assert_eq!(Manifest::parse(&xml).unwrap(), Manifest::parse(&xml).unwrap());
        }

        /// Property: every generated workshop link yields its numeric item id
        #[test]
        fn item_id_is_the_trailing_number(id in "[0-9]{1,12}") {
            let entry = ManifestEntry::new(
                "Mod",
                format!("https://steamcommunity.com/sharedfiles/filedetails/?id={}", id),
            );
            prop_assert_eq!(entry.item_id().unwrap(), id.as_str());
        }

        /// Property: a record without a link never produces a manifest
        #[test]
        fn missing_link_always_fails(
            entries in prop::collection::vec(entry_strategy(), 0..10),
            name in "[A-Za-z]{1,10}",
        ) {
            let mut xml = render(&entries);
            let bad = format!("  <mod><modname>{}</modname></mod>\n</addons-presets>", name);
            xml = xml.replacen("</addons-presets>", &bad, 1);

            prop_assert!(Manifest::parse(&xml).is_err());
        }
    }
}
