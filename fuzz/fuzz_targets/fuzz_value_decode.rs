#![no_main]

use bacstack_core::encoding::reader::Reader;
use bacstack_core::value::Value;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = Reader::new(data);
    while !r.is_empty() {
        if Value::decode(&mut r).is_err() {
            break;
        }
    }
});
