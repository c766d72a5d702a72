//! In-memory message model and option accessors.

use crate::header::{Code, MessageType};
use crate::option::{OptionId, OptionValue};

/// A single option entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageOption {
    pub id: OptionId,
    pub value: OptionValue,
}

impl MessageOption {
    /// Creates an entry, converting `value` with [`OptionValue::for_option`].
    #[must_use]
    pub fn new(id: OptionId, value: impl Into<OptionValue>) -> Self {
        Self {
            id,
            value: value.into().for_option(id),
        }
    }
}

/// A protocol message.
///
/// Options are kept in insertion order until the message is encoded, which
/// stably sorts them by ID in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub message_type: MessageType,
    pub code: Code,
    pub message_id: u16,
    /// Up to 8 bytes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub token: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub payload: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    options: Vec<MessageOption>,
}

impl Message {
    /// Creates a message with no token, options or payload.
    #[must_use]
    pub const fn new(message_type: MessageType, code: Code, message_id: u16) -> Self {
        Self {
            message_type,
            code,
            message_id,
            token: Vec::new(),
            payload: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Sets the token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<Vec<u8>>) -> Self {
        self.token = token.into();
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Adds an option (builder form of [`Message::add_option`]).
    #[must_use]
    pub fn with_option(mut self, id: OptionId, value: impl Into<OptionValue>) -> Self {
        self.add_option(id, value);
        self
    }

    #[must_use]
    pub fn is_confirmable(&self) -> bool {
        self.message_type == MessageType::Confirmable
    }

    /// Returns every option in its current order.
    #[must_use]
    pub fn options(&self) -> &[MessageOption] {
        &self.options
    }

    /// Returns the first value for `id`.
    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&OptionValue> {
        self.options
            .iter()
            .find(|opt| opt.id == id)
            .map(|opt| &opt.value)
    }

    /// Returns every value for `id` in encounter order.
    #[must_use]
    pub fn options_for(&self, id: OptionId) -> Vec<&OptionValue> {
        self.options
            .iter()
            .filter(|opt| opt.id == id)
            .map(|opt| &opt.value)
            .collect()
    }

    /// Returns the text values for `id` in encounter order.
    ///
    /// Entries for `id` that do not hold text are skipped.
    #[must_use]
    pub fn option_strings(&self, id: OptionId) -> Vec<&str> {
        self.options
            .iter()
            .filter(|opt| opt.id == id)
            .filter_map(|opt| opt.value.as_text())
            .collect()
    }

    /// Returns the Uri-Path segments.
    #[must_use]
    pub fn path(&self) -> Vec<&str> {
        self.option_strings(OptionId::URI_PATH)
    }

    /// Returns the Uri-Path segments joined with `/`.
    #[must_use]
    pub fn path_string(&self) -> String {
        self.path().join("/")
    }

    /// Replaces the Uri-Path from a `/` separated string.
    ///
    /// Leading slashes are ignored. A string that is empty after removing
    /// them clears the path.
    pub fn set_path_string(&mut self, path: &str) {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.remove_option(OptionId::URI_PATH);
            return;
        }
        self.set_path(path.split('/'));
    }

    /// Replaces the Uri-Path with the given segments.
    pub fn set_path<I, S>(&mut self, segments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_options(
            OptionId::URI_PATH,
            segments
                .into_iter()
                .map(|segment| OptionValue::Text(segment.into())),
        );
    }

    /// Appends one option entry.
    pub fn add_option(&mut self, id: OptionId, value: impl Into<OptionValue>) {
        self.options.push(MessageOption::new(id, value));
    }

    /// Appends one entry per value, in order, all sharing `id`.
    pub fn add_options<I, V>(&mut self, id: OptionId, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<OptionValue>,
    {
        self.options
            .extend(values.into_iter().map(|value| MessageOption::new(id, value)));
    }

    /// Replaces every entry for `id` with a single value.
    pub fn set_option(&mut self, id: OptionId, value: impl Into<OptionValue>) {
        self.remove_option(id);
        self.add_option(id, value);
    }

    /// Replaces every entry for `id` with the given values.
    pub fn set_options<I, V>(&mut self, id: OptionId, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<OptionValue>,
    {
        self.remove_option(id);
        self.add_options(id, values);
    }

    /// Removes every entry for `id`.
    pub fn remove_option(&mut self, id: OptionId) {
        self.options.retain(|opt| opt.id != id);
    }

    /// Stably sorts the options by ID.
    pub fn sort_options(&mut self) {
        // `sort_by_key` is stable: equal IDs keep insertion order.
        self.options.sort_by_key(|opt| opt.id);
    }

    /// Decoded options are appended without any reordering.
    pub(crate) fn push_decoded(&mut self, option: MessageOption) {
        self.options.push(option);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::MediaType;

    #[test]
    fn first_and_all_matches() {
        let mut msg = Message::new(MessageType::Confirmable, Code::GET, 1);
        msg.add_option(OptionId::ETAG, vec![1u8]);
        msg.add_option(OptionId::MAX_AGE, 60u32);
        msg.add_option(OptionId::ETAG, vec![2u8]);

        assert_eq!(
            msg.option(OptionId::ETAG),
            Some(&OptionValue::Opaque(vec![1]))
        );
        assert_eq!(
            msg.options_for(OptionId::ETAG),
            vec![&OptionValue::Opaque(vec![1]), &OptionValue::Opaque(vec![2])]
        );
        assert!(msg.option(OptionId::URI_HOST).is_none());
        assert!(msg.options_for(OptionId::URI_HOST).is_empty());
    }

    #[test]
    fn set_option_is_not_additive() {
        let mut msg = Message::default();
        msg.add_option(OptionId::CONTENT_FORMAT, MediaType::APP_XML);
        msg.add_option(OptionId::CONTENT_FORMAT, MediaType::APP_EXI);
        msg.set_option(OptionId::CONTENT_FORMAT, MediaType::APP_JSON);

        assert_eq!(
            msg.options_for(OptionId::CONTENT_FORMAT),
            vec![&OptionValue::Media(MediaType::APP_JSON)]
        );
    }

    #[test]
    fn add_options_adds_one_entry_per_element() {
        let mut msg = Message::default();
        msg.add_options(OptionId::URI_QUERY, ["a=1", "b=2", "c=3"]);
        assert_eq!(msg.options().len(), 3);
        assert_eq!(msg.option_strings(OptionId::URI_QUERY), ["a=1", "b=2", "c=3"]);
    }

    #[test]
    fn set_path_string_strips_leading_slashes() {
        let mut msg = Message::default();
        msg.set_path_string("///sensors/temp/1");
        assert_eq!(msg.path(), ["sensors", "temp", "1"]);
        assert_eq!(msg.path_string(), "sensors/temp/1");
    }

    #[test]
    fn set_path_replaces_existing_segments() {
        let mut msg = Message::default();
        msg.add_option(OptionId::URI_HOST, "example.org");
        msg.set_path_string("/a/b");
        msg.set_path_string("c");
        assert_eq!(msg.path(), ["c"]);
        assert_eq!(msg.option_strings(OptionId::URI_HOST), ["example.org"]);
    }

    #[test]
    fn set_path_string_empty_clears_path() {
        let mut msg = Message::default();
        msg.set_path_string("a/b");
        msg.set_path_string("/");
        assert!(msg.path().is_empty());
        assert_eq!(msg.path_string(), "");
    }

    #[test]
    fn path_roundtrip_is_idempotent() {
        let mut msg = Message::default();
        msg.set_path(["x", "y", "z"]);
        let before: Vec<String> = msg.path().iter().map(ToString::to_string).collect();
        let path = msg.path_string();
        msg.set_path_string(&path);
        assert_eq!(msg.path(), before);
    }

    #[test]
    fn sort_options_is_stable() {
        let mut msg = Message::default();
        msg.add_option(OptionId::URI_PATH, "b");
        msg.add_option(OptionId::URI_HOST, "h");
        msg.add_option(OptionId::URI_PATH, "a");
        msg.add_option(OptionId::IF_MATCH, Vec::<u8>::new());
        msg.sort_options();

        let ids: Vec<u8> = msg.options().iter().map(|opt| opt.id.0).collect();
        assert_eq!(ids, [1, 3, 11, 11]);
        assert_eq!(msg.path(), ["b", "a"]);
    }

    #[test]
    fn remove_option_removes_all_entries() {
        let mut msg = Message::default();
        msg.add_options(OptionId::LOCATION_PATH, ["x", "y"]);
        msg.add_option(OptionId::MAX_AGE, 5u8);
        msg.remove_option(OptionId::LOCATION_PATH);
        assert_eq!(msg.options().len(), 1);
    }

    #[test]
    fn builder_helpers() {
        let msg = Message::new(MessageType::NonConfirmable, Code::POST, 7)
            .with_token(vec![0xAA, 0xBB])
            .with_payload(b"hi".to_vec())
            .with_option(OptionId::URI_PATH, "x");
        assert!(!msg.is_confirmable());
        assert_eq!(msg.token, [0xAA, 0xBB]);
        assert_eq!(msg.payload, b"hi");
        assert_eq!(msg.path_string(), "x");
    }
}
