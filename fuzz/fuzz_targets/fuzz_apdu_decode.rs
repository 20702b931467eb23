#![no_main]

use bacstack_core::apdu::Apdu;
use bacstack_core::encoding::writer::encode_to_vec;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must encode again.
    if let Ok(apdu) = Apdu::decode(data) {
        encode_to_vec::<65536>(|w| apdu.encode(w)).expect("decoded apdu re-encodes");
    }
});
