//! Message protocol between the companion and the watch
//!
//! The companion streams data to the watch as a sequence of small
//! dictionaries. One logical update (a run list, or the metrics of one run)
//! is spread over several messages; completion is inferred from counts sent
//! up front, never flagged explicitly.
//!
//! # Main Types
//!
//! - [`MessageKey`] - Numbered dictionary keys shared by both ends
//! - [`Value`] - Tuple payload: small unsigned int, C string or raw bytes
//! - [`Message`] - One dictionary, in tuple insertion order
//! - [`DataStore`] - Watch-side inbox that applies messages to the run list
//!
//! History samples travel as a packed array of little-endian `i64`s, see
//! [`pack_history`] and [`unpack_history`].

pub mod dict;
pub mod inbox;

pub use dict::{decode, encode, ProtocolError};
pub use inbox::{DataStore, InboxEvent};

use crate::history::{HistoryBuffer, MAX_HISTORY_POINTS};

/// Byte width of one packed history sample
pub const HISTORY_SAMPLE_BYTES: usize = 8;

/// Dictionary keys, numbered as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageKey {
    RunsCount = 0,
    RunName = 1,
    RunOwner = 2,
    RunState = 3,
    MetricsCount = 4,
    MetricName = 5,
    MetricValue = 6,
    MetricHistory = 7,
    FetchRunIndex = 8,
}

impl MessageKey {
    const ALL: [MessageKey; 9] = [
        MessageKey::RunsCount,
        MessageKey::RunName,
        MessageKey::RunOwner,
        MessageKey::RunState,
        MessageKey::MetricsCount,
        MessageKey::MetricName,
        MessageKey::MetricValue,
        MessageKey::MetricHistory,
        MessageKey::FetchRunIndex,
    ];

    /// Wire number of this key
    pub fn raw(self) -> u32 {
        self as u32
    }

    /// Key for a wire number, `None` for keys this build does not know
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.raw() == raw)
    }
}

/// A tuple payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    U8(u8),
    CString(String),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Value::U8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::CString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

/// One dictionary message.
///
/// Tuples keep their raw key so that keys unknown to this build survive a
/// decode/encode pass unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    tuples: Vec<(u32, Value)>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: MessageKey, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, replacing an earlier value for the same key
    pub fn insert(&mut self, key: MessageKey, value: Value) {
        self.insert_raw(key.raw(), value);
    }

    pub(crate) fn insert_raw(&mut self, key: u32, value: Value) {
        match self.tuples.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.tuples.push((key, value)),
        }
    }

    pub fn get(&self, key: MessageKey) -> Option<&Value> {
        self.tuples
            .iter()
            .find(|(k, _)| *k == key.raw())
            .map(|(_, v)| v)
    }

    pub fn u8(&self, key: MessageKey) -> Option<u8> {
        self.get(key).and_then(Value::as_u8)
    }

    pub fn str(&self, key: MessageKey) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn bytes(&self, key: MessageKey) -> Option<&[u8]> {
        self.get(key).and_then(Value::as_bytes)
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Tuples in insertion order, by raw key
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Value)> {
        self.tuples.iter().map(|(k, v)| (*k, v))
    }

    /// The watch's only outbound request: metrics of run `index`
    pub fn fetch_run(index: u8) -> Self {
        Self::new().with(MessageKey::FetchRunIndex, Value::U8(index))
    }
}

/// Pack fixed-point samples as consecutive little-endian `i64`s.
pub fn pack_history(samples: &[i64]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Unpack a history blob.
///
/// A trailing partial sample is ignored, and samples past
/// [`MAX_HISTORY_POINTS`] are dropped.
pub fn unpack_history(bytes: &[u8]) -> HistoryBuffer {
    bytes
        .chunks_exact(HISTORY_SAMPLE_BYTES)
        .take(MAX_HISTORY_POINTS)
        .map(|chunk| {
            let mut raw = [0u8; HISTORY_SAMPLE_BYTES];
            raw.copy_from_slice(chunk);
            i64::from_le_bytes(raw)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_key_numbering() {
        assert_eq!(MessageKey::RunsCount.raw(), 0);
        assert_eq!(MessageKey::MetricHistory.raw(), 7);
        assert_eq!(MessageKey::from_raw(8), Some(MessageKey::FetchRunIndex));
        assert_eq!(MessageKey::from_raw(42), None);
    }

    #[test]
    fn test_message_accessors() {
        let msg = Message::new()
            .with(MessageKey::MetricName, Value::CString("loss".into()))
            .with(MessageKey::MetricsCount, Value::U8(3));
        assert_eq!(msg.str(MessageKey::MetricName), Some("loss"));
        assert_eq!(msg.u8(MessageKey::MetricsCount), Some(3));
        // Wrong type reads as absent
        assert_eq!(msg.u8(MessageKey::MetricName), None);
        assert_eq!(msg.bytes(MessageKey::MetricHistory), None);
    }

    #[test]
    fn test_insert_replaces() {
        let mut msg = Message::fetch_run(1);
        msg.insert(MessageKey::FetchRunIndex, Value::U8(4));
        assert_eq!(msg.len(), 1);
        assert_eq!(msg.u8(MessageKey::FetchRunIndex), Some(4));
    }

    #[test]
    fn test_pack_negative_values() {
        let bytes = pack_history(&[-50_000, 20_000, 487_200]);
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[..8], &(-50_000i64).to_le_bytes());
        assert_eq!(unpack_history(&bytes).as_slice(), &[-50_000, 20_000, 487_200]);
    }

    #[test]
    fn test_unpack_ignores_partial_and_excess() {
        let mut bytes = pack_history(&[1, 2]);
        bytes.extend_from_slice(&[0xff; 5]);
        assert_eq!(unpack_history(&bytes).as_slice(), &[1, 2]);

        let many: Vec<i64> = (0..30).collect();
        let history = unpack_history(&pack_history(&many));
        assert_eq!(history.len(), MAX_HISTORY_POINTS);
        assert_eq!(history.last(), Some(&19));
    }

    proptest! {
        #[test]
        fn test_history_packing_round_trip(samples in prop::collection::vec(any::<i64>(), 0..=20)) {
            let unpacked = unpack_history(&pack_history(&samples));
            prop_assert_eq!(unpacked.as_slice(), samples.as_slice());
        }
    }
}
