#![no_main]
use libfuzzer_sys::fuzz_target;

const NAMES: [&str; 4] = ["a", "b", "ns", "x"];
const URIS: [&str; 3] = ["", "urn:p", "urn:q"];

fuzz_target!(|data: &[u8]| {
    // Jedes Octet-Paar waehlt eine Writer-Operation; Usage-Fehler sind erlaubt.
    let mut w = erfi::StreamWriter::new(Vec::new());
    let _ = w.write_start_document();
    for op in data.chunks(2) {
        let arg = op.get(1).copied().unwrap_or(0) as usize;
        let name = NAMES[arg % NAMES.len()];
        let uri = URIS[arg % URIS.len()];
        let _ = match op[0] % 10 {
            0 => w.write_start_element(name),
            1 => w.write_start_element_ns(uri, name),
            2 => w.write_empty_element(name),
            3 => w.write_end_element(),
            4 => w.write_attribute(name, uri),
            5 => w.write_namespace(name, uri),
            6 => w.write_characters(&name.repeat(arg % 40)),
            7 => w.write_comment(name),
            8 => w.write_octets(&op[..]),
            _ => w.write_attribute_ns(uri, name, "v"),
        };
    }
    let _ = w.write_end_document();
});
