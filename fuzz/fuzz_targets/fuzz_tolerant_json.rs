#![no_main]
use libfuzzer_sys::fuzz_target;

// The tolerant accessor must never panic, whatever framing the server
// invents: blank, bare object, array-wrapped, or garbage.
fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = qgate_core::json::parse_object(text);
        let _ = qgate_core::json::parse_array(text);
        let _ = qgate_core::json::field_at(text, "id");
        let _ = qgate_core::json::id_field(text);
    }
});
