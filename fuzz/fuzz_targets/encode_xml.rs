#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Beliebiger Text darf Fehler liefern, aber nie paniken.
    if let Ok(xml) = std::str::from_utf8(data) {
        let opts = erfi::SerializerOptions::default();
        let _ = erfi::encode_xml_str(xml, &opts);
        let _ = erfi::encode_xml_str(xml, &opts.with_ignore_whitespace_text());
    }
});
