//! Rsh/Rsb file format structures
//!
//! File structure:
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Text header (5120 bytes)               │
//! │  - windows-1251, NUL padded             │
//! ├─────────────────────────────────────────┤
//! │  Binary header (2048 bytes)             │
//! │  - acquisition parameters               │
//! │  - per-channel records (56 bytes each)  │
//! ├─────────────────────────────────────────┤
//! │  Event 0                                │
//! │  - 96-byte event header                 │
//! │  - channel_number * b_size i16 samples  │
//! ├─────────────────────────────────────────┤
//! │  ...                                    │
//! ├─────────────────────────────────────────┤
//! │  Event events_num - 1                   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian.

pub mod bitmask;
pub mod flags;
pub mod header;
pub mod text;

pub use bitmask::{decode_flags, encode_flags, FlagSet, DEFAULT_FLAG};
pub use flags::{
    FlagTable, CHANNEL_CONTROL, SYNCHRO_CHANNEL_CONTROL, SYNCHRO_CHANNEL_TYPES, SYNCHRO_CONTROL,
};
pub use header::{ChannelParams, HeaderParams, SynchroChannelParams, UnixTime};
pub use text::{render_text_header, render_text_header_at, Codepage};

/// Size of the leading text header
pub const TEXT_HEADER_SIZE: usize = 5120;

/// Size of the binary header following the text header
pub const BINARY_HEADER_SIZE: usize = 2048;

/// Offset of the first event record
pub const DATA_OFFSET: u64 = (TEXT_HEADER_SIZE + BINARY_HEADER_SIZE) as u64;

/// Offset of the per-channel record array inside the binary header
pub const CHANNEL_TABLE_OFFSET: usize = 372;

/// Size of one per-channel record
pub const CHANNEL_RECORD_SIZE: usize = 56;

/// Raw control-code slots per channel and in the synchro channel
pub const CHANNEL_FLAG_SLOTS: usize = 8;

/// Raw control-code slots for synchro (trigger) control
pub const SYNCHRO_FLAG_SLOTS: usize = 4;

/// Length of the fixed string fields (file path, board name)
pub const FIXED_STRING_LEN: usize = 255;

/// Fixed part of an event record preceding the samples
pub const EVENT_HEADER_SIZE: u64 = 96;

/// Length of the opaque text tag at the start of an event record
pub const EVENT_TAG_SIZE: usize = 64;
