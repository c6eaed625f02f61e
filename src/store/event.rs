//! Event record types

use serde::Serialize;

use crate::format::{UnixTime, EVENT_TAG_SIZE};

/// One event record read from an Rsb file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Opaque tag bytes at the start of the record (64 bytes)
    pub tag: Vec<u8>,
    /// Event sequence number written by the board
    pub sequence: u32,
    /// Event start time
    pub start_time: UnixTime,
    /// Nanoseconds since epoch, present only when the board wrote one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ns_since_epoch: Option<u64>,
    /// Raw ADC samples (`channel_number * b_size` values)
    pub data: Vec<i16>,
}

impl EventRecord {
    /// Tag bytes up to the first NUL, as lossy ASCII/UTF-8
    pub fn tag_lossy(&self) -> String {
        let end = self
            .tag
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.tag.len().min(EVENT_TAG_SIZE));
        String::from_utf8_lossy(&self.tag[..end]).into_owned()
    }
}

/// Element type of a raw sample buffer handed over by an external tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl SampleType {
    /// Element width in bytes
    pub fn width(&self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    /// Type name as spelled by numpy
    pub fn name(&self) -> &'static str {
        match self {
            Self::I8 => "int8",
            Self::U8 => "uint8",
            Self::I16 => "int16",
            Self::U16 => "uint16",
            Self::I32 => "int32",
            Self::U32 => "uint32",
            Self::I64 => "int64",
            Self::U64 => "uint64",
            Self::F32 => "float32",
            Self::F64 => "float64",
        }
    }
}

impl std::fmt::Display for SampleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
