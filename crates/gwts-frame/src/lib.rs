//! Codec, validation and deduplication for GwtS infrared command frames.
//!
//! Two sibling protocols share the air:
//! - `9X` frames: a length code (`143 + payload length`), the payload, and a
//!   CRC-8 (polynomial 0x8C, LSB-first) over length code and payload
//! - `55` frames: `55 AA` sync bytes, the payload, and an additive checksum
//!
//! Recordings are text logs, one frame per line behind an opaque timestamp.
//! [`Filter`] validates every line, partitions the valid frames by family,
//! keeps the rejects for diagnostics, and folds 9X frames that differ only by
//! their inter-command delay marker.

pub mod codec;
pub mod config;
pub mod dedup;
pub mod error;
pub mod family;
pub mod filter;
pub mod hex;
pub mod marker;
pub mod pulse;
pub mod reader;
pub mod show;
pub mod tokenizer;
pub mod writer;

pub use codec::{
    decode_tokens, encode_55, encode_9x, frame_55, frame_9x, validate, verify_55, verify_9x,
    CheckedFrame, Frame, MIN_FRAME_LEN,
};
pub use config::{FilterConfig, DEFAULT_TIMESTAMP_TOKENS};
pub use dedup::{dedup_55, CanonicalCommand, Deduplicator};
pub use error::{FrameError, Result};
pub use family::ProtocolFamily;
pub use filter::{ErrorFrequency, Filter, FilterCounts, FilterOutput, Record, RecordingError};
pub use marker::{DelayMarker, MarkerTable};
pub use pulse::{encode_pulses, format_pulses, DEFAULT_PULSE_WIDTH};
pub use reader::{LogLine, LogReader};
pub use show::{schedule_delays, ScheduledFrame, DEFAULT_STEP};
pub use tokenizer::{split_line, TokenizedLine};
pub use writer::{write_sorted, Category, LogWriter, WrittenFile};
