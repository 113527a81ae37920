//! Property tests for asset kind identifiers.

use proptest::prelude::*;

use assetforge::AssetKind;

proptest! {
    /// PROPERTY: any accepted kind is usable as a single file name.
    #[test]
    fn property_accepted_kinds_are_plain_file_names(raw in "\\PC{0,40}") {
        if let Ok(kind) = AssetKind::new(raw.clone()) {
            let path = std::path::Path::new(kind.as_str());
            prop_assert_eq!(path.components().count(), 1);
            prop_assert!(!kind.as_str().starts_with('.'));
            prop_assert_eq!(kind.as_str(), raw.as_str());
        }
    }

    /// PROPERTY: the documented alphabet is always accepted.
    #[test]
    fn property_valid_alphabet_is_accepted(raw in "[a-z0-9][a-z0-9._-]{0,30}") {
        prop_assert!(AssetKind::new(raw).is_ok());
    }
}
