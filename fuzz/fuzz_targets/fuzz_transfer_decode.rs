#![no_main]

use libfuzzer_sys::fuzz_target;
use xbridge_codec::WireCodec;

// Decoding arbitrary bytes never panics, and whatever decodes re-encodes to
// exactly the bytes it consumed.
fuzz_target!(|data: &[u8]| {
    let Some((&count, rest)) = data.split_first() else {
        return;
    };
    let codec = WireCodec::new(2);
    if let Ok((transfers, consumed)) = codec.decode(rest, usize::from(count % 8)) {
        let encoded = codec.encode_all(&transfers).expect("decoded transfers are valid");
        assert_eq!(encoded.as_slice(), &rest[..consumed]);
        for t in &transfers {
            let _ = t.launch_token(2);
        }
    }
});
