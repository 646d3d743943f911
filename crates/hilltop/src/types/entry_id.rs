use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const SEQUENCE_BITS: u32 = 12;
const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;

/// Opaque identifier for a leaderboard entry.
/// Layout: 52-bit timestamp (ms since Unix epoch), 12-bit sequence.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lock-free entry ID generator.
///
/// A single `AtomicI64` holds both the timestamp and the sequence so a
/// concurrent reader can never observe a stale sequence for a fresh
/// timestamp. When the sequence overflows within one millisecond the
/// timestamp is bumped instead; entry IDs only need to be unique and
/// roughly time-ordered, not wall-clock exact.
pub struct EntryIdGenerator {
    /// Combined timestamp (upper 52 bits) and sequence (lower 12 bits).
    ts_seq: AtomicI64,
}

fn pack_ts_seq(timestamp: i64, sequence: i64) -> i64 {
    (timestamp << SEQUENCE_BITS) | sequence
}

fn unpack_timestamp(ts_seq: i64) -> i64 {
    ts_seq >> SEQUENCE_BITS
}

fn unpack_sequence(ts_seq: i64) -> i64 {
    ts_seq & SEQUENCE_MASK
}

impl EntryIdGenerator {
    pub fn new() -> Self {
        Self {
            // timestamp=-1 so the first CAS always takes the fresh-timestamp path
            ts_seq: AtomicI64::new(pack_ts_seq(-1, 0)),
        }
    }

    fn current_timestamp() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_millis() as i64
    }

    /// Generate the next unique entry ID. Lock-free; never blocks.
    ///
    /// A backward clock jump is absorbed by continuing from the last
    /// observed timestamp rather than waiting for the clock to catch up.
    pub fn next(&self) -> EntryId {
        loop {
            let now = Self::current_timestamp();
            let current = self.ts_seq.load(Ordering::Acquire);
            let last_ts = unpack_timestamp(current);
            let timestamp = now.max(last_ts);

            let new_val = if timestamp == last_ts {
                let seq = unpack_sequence(current) + 1;
                if seq > SEQUENCE_MASK {
                    pack_ts_seq(timestamp + 1, 0)
                } else {
                    pack_ts_seq(timestamp, seq)
                }
            } else {
                pack_ts_seq(timestamp, 0)
            };

            if self
                .ts_seq
                .compare_exchange(current, new_val, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return EntryId(new_val);
            }
        }
    }
}

impl Default for EntryIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
