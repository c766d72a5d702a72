use proptest::prelude::*;
use wire::{decode, encode, Code, MediaType, Message, MessageType, OptionId, OptionValue};

fn option_strategy() -> impl Strategy<Value = (OptionId, OptionValue)> {
    prop_oneof![request_option_strategy(), response_option_strategy()]
}

fn request_option_strategy() -> impl Strategy<Value = (OptionId, OptionValue)> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..=8)
            .prop_map(|v| (OptionId::IF_MATCH, OptionValue::Opaque(v))),
        "[a-z.]{1,32}".prop_map(|s| (OptionId::URI_HOST, OptionValue::Text(s))),
        prop::collection::vec(any::<u8>(), 1..=8)
            .prop_map(|v| (OptionId::ETAG, OptionValue::Opaque(v))),
        Just((OptionId::IF_NONE_MATCH, OptionValue::Empty)),
        (0u32..(1 << 24)).prop_map(|v| (OptionId::OBSERVE, OptionValue::UInt(v))),
        any::<u16>().prop_map(|v| (OptionId::URI_PORT, OptionValue::from(v))),
        "[a-z0-9]{0,24}".prop_map(|s| (OptionId::URI_PATH, OptionValue::Text(s))),
        "[a-z=&]{0,24}".prop_map(|s| (OptionId::URI_QUERY, OptionValue::Text(s))),
        any::<u16>().prop_map(|v| (OptionId::ACCEPT, OptionValue::Media(MediaType(v)))),
        "[a-z:/]{1,400}".prop_map(|s| (OptionId::PROXY_URI, OptionValue::Text(s))),
        "[a-z]{1,8}".prop_map(|s| (OptionId::PROXY_SCHEME, OptionValue::Text(s))),
    ]
}

fn response_option_strategy() -> impl Strategy<Value = (OptionId, OptionValue)> {
    prop_oneof![
        "[a-z]{0,16}".prop_map(|s| (OptionId::LOCATION_PATH, OptionValue::Text(s))),
        any::<u16>().prop_map(|v| (OptionId::CONTENT_FORMAT, OptionValue::Media(MediaType(v)))),
        any::<u32>().prop_map(|v| (OptionId::MAX_AGE, OptionValue::UInt(v))),
        "[a-z]{0,16}".prop_map(|s| (OptionId::LOCATION_QUERY, OptionValue::Text(s))),
        (0u32..(1 << 24)).prop_map(|v| (OptionId::BLOCK2, OptionValue::UInt(v))),
        (0u32..(1 << 24)).prop_map(|v| (OptionId::BLOCK1, OptionValue::UInt(v))),
        any::<u32>().prop_map(|v| (OptionId::SIZE2, OptionValue::UInt(v))),
        any::<u32>().prop_map(|v| (OptionId::SIZE1, OptionValue::UInt(v))),
    ]
}

fn message_strategy() -> impl Strategy<Value = Message> {
    (
        0u8..4,
        any::<u8>(),
        any::<u16>(),
        prop::collection::vec(any::<u8>(), 0..=8),
        prop::collection::vec(any::<u8>(), 0..64),
        prop::collection::vec(option_strategy(), 0..12),
    )
        .prop_map(|(ty, code, id, token, payload, mut options)| {
            options.sort_by_key(|(id, _)| *id);
            let mut msg = Message::new(MessageType::from_bits(ty), Code(code), id)
                .with_token(token)
                .with_payload(payload);
            for (id, value) in options {
                msg.add_option(id, value);
            }
            msg
        })
}

proptest! {
    #[test]
    fn prop_roundtrip_sorted_messages(msg in message_strategy()) {
        let mut encoded_from = msg.clone();
        let bytes = encode(&mut encoded_from).unwrap();
        prop_assert_eq!(&encoded_from, &msg);
        prop_assert_eq!(bytes.len(), msg.encoded_len());

        let decoded = decode(&bytes).unwrap();
        prop_assert_eq!(decoded, msg);
    }

    #[test]
    fn prop_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&bytes);
    }

    #[test]
    fn prop_path_string_idempotent(segments in prop::collection::vec("[a-z0-9]{1,8}", 0..6)) {
        let mut msg = Message::default();
        msg.set_path(segments.clone());
        let path = msg.path_string();
        msg.set_path_string(&path);
        prop_assert_eq!(msg.path(), segments);
    }
}
