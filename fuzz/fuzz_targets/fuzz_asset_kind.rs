#![no_main]

use assetforge::AssetKind;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        if let Ok(kind) = AssetKind::new(raw) {
            assert_eq!(kind.as_str(), raw);
            assert!(!kind.as_str().contains('/'));
        }
    }
});
