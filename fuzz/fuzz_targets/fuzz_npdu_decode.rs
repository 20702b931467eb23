#![no_main]

use bacstack_core::npdu::NpduMessage;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = NpduMessage::decode(data);
});
