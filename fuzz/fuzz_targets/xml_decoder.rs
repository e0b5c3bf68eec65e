#![no_main]

use jsonxml::xml::is_valid_name;
use jsonxml::{DecodeConfig, Value};
use libfuzzer_sys::fuzz_target;

/// Prefix flattening can leave a local name such as `1b`, which can't be
/// written back as a tag
fn keys_are_names(value: &Value) -> bool {
    match value {
        Value::Object(obj) => obj.iter().all(|(k, v)| is_valid_name(k) && keys_are_names(v)),
        Value::Array(arr) => arr.iter().all(keys_are_names),
        _ => true,
    }
}

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = jsonxml::from_xml_bytes(data) {
        let xml = jsonxml::to_xml_pretty(&value);
        // nested arrays gain a wrapper level on the way out
        let again = jsonxml::from_xml_with_config(&xml, DecodeConfig::unlimited());
        if keys_are_names(&value) {
            assert!(again.is_ok(), "re-decoding {xml:?} failed: {again:?}");
        }
    }
});
