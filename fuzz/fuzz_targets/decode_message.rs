#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = wire::Limits::for_testing();
    let _ = wire::decode_with_limits(data, &limits);

    // Anything that decodes must re-encode into a decodable message.
    if let Ok(mut msg) = wire::decode(data) {
        let bytes = wire::encode(&mut msg).expect("decoded message must encode");
        assert_eq!(bytes.len(), msg.encoded_len());
        let again = wire::decode(&bytes).expect("encoded message must decode");
        assert_eq!(again.token, msg.token);
        assert_eq!(again.payload, msg.payload);
    }
});
