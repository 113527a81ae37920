#![no_main]

use assetforge::domain::entities::StateRecord;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes on disk must decode to an error, never a panic
    if let Ok(record) = serde_json::from_slice::<StateRecord>(data) {
        let _ = record.verify();
        let _ = record.content().files().len();
    }
});
