//! Binary header codec
//!
//! Layout of the 2048-byte binary header (offsets in bytes):
//! ```text
//!   0  u32      text_header_size       312  f64      threshold
//!   8  i32      events_num             320  4 x u32  synchro_control codes
//!  16  u64      start_time (unix s)    336  u32      synchro_control count
//!  24  u64      end_time (unix s)      344  f64      sample_freq
//!  32  [u8;255] filepath               352  u32      pre_history
//! 288  i32      num_blocks             356  i32      packet_number
//! 292  i32      acquisition_time       360  u32      b_size
//! 296  i32      blocks_in_file         364  u32      hysteresis
//! 300  i32      wait_time              368  u32      channel_number
//! 304  u32      synchro channel type   372  56 x N   channel records
//! 600  8 x u32  synchro channel codes  640  u32      err_lang
//! 632  u32      synchro channel count  644  [u8;255] board_name
//! 636  u32      synchro channel gain   900  u32      board_id
//! ```
//!
//! Channel record (relative to `372 + 56 * i`):
//! ```text
//!   4  8 x u32  control codes
//!  36  u32      control code count
//!  44  f64      adjustment
//!  52  u32      gain
//! ```

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use super::bitmask::{decode_flags, encode_flags, FlagSet};
use super::flags::{
    CHANNEL_CONTROL, SYNCHRO_CHANNEL_CONTROL, SYNCHRO_CHANNEL_TYPES, SYNCHRO_CONTROL,
};
use super::text::{render_text_header, Codepage};
use super::{
    BINARY_HEADER_SIZE, CHANNEL_FLAG_SLOTS, CHANNEL_RECORD_SIZE, CHANNEL_TABLE_OFFSET,
    FIXED_STRING_LEN, SYNCHRO_FLAG_SLOTS,
};
use crate::common::error::{RshError, RshResult};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Start of the synchro channel block, overlapped by channel records 4 and up
const SYNCHRO_CHANNEL_OFFSET: usize = 600;

/// Unix timestamp in whole seconds, as stored on disk
///
/// Renders as `YYYY-MM-DDTHH:MM:SS` (UTC) when representable, otherwise as
/// the raw integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnixTime(pub u64);

impl UnixTime {
    /// Raw seconds since the epoch
    pub fn seconds(&self) -> u64 {
        self.0
    }

    /// Calendar time in UTC, if within chrono's range
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        let secs = i64::try_from(self.0).ok()?;
        DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
    }

    /// Parse an ISO timestamp as produced by `Display`
    pub fn parse(s: &str) -> Option<Self> {
        let dt = NaiveDateTime::parse_from_str(s, ISO_FORMAT).ok()?;
        u64::try_from(dt.and_utc().timestamp()).ok().map(UnixTime)
    }
}

impl std::fmt::Display for UnixTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format(ISO_FORMAT)),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for UnixTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_datetime() {
            Some(_) => serializer.collect_str(self),
            None => serializer.serialize_u64(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for UnixTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Seconds(u64),
            Iso(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Seconds(secs) => Ok(UnixTime(secs)),
            Repr::Iso(s) => UnixTime::parse(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{s}'"))),
        }
    }
}

/// Floats that survive JSON when not finite
///
/// NaN and the infinities are written as the strings `nan`, `inf` and
/// `-inf`, which is also how the text header prints them.
mod raw_float {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("nan")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(s) => match s.as_str() {
                "nan" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                _ => Err(serde::de::Error::custom(format!("invalid float '{s}'"))),
            },
        }
    }
}

/// Settings of one acquisition channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelParams {
    /// Channel control flags
    pub params: FlagSet,
    #[serde(with = "raw_float")]
    pub adjustment: f64,
    pub gain: u32,
}

/// Settings of the synchro (trigger) input channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynchroChannelParams {
    /// Synchro-channel control flags
    pub params: FlagSet,
    /// Synchro-channel type name
    #[serde(rename = "type")]
    pub channel_type: String,
    pub gain: u32,
}

impl Default for SynchroChannelParams {
    fn default() -> Self {
        Self {
            params: FlagSet::default(),
            channel_type: "Program".to_string(),
            gain: 0,
        }
    }
}

/// Decoded binary header
///
/// Serde names follow the keys used by the acquisition software's JSON
/// configuration, so the text header rendered from this struct is readable
/// by it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderParams {
    pub text_header_size: u32,
    pub events_num: i32,
    pub start_time: UnixTime,
    pub end_time: UnixTime,
    pub filepath: String,
    pub num_blocks: i32,
    /// Acquisition duration
    #[serde(rename = "aquisition_time")]
    pub acquisition_time: i32,
    pub blocks_in_file: i32,
    #[serde(rename = "waitTime")]
    pub wait_time: i32,
    #[serde(with = "raw_float")]
    pub threshold: f64,
    pub synchro_control: FlagSet,
    /// Sample frequency in Hz
    #[serde(with = "raw_float")]
    pub sample_freq: f64,
    /// Samples recorded before the trigger
    pub pre_history: u32,
    pub packet_number: i32,
    /// Samples per channel per event
    pub b_size: u32,
    pub hysteresis: u32,
    pub channel_number: u32,
    pub channel: Vec<ChannelParams>,
    pub synchro_channel: SynchroChannelParams,
    pub err_lang: u32,
    pub board_name: String,
    pub board_id: u32,
}

impl HeaderParams {
    /// Decode a binary header, reading strings as windows-1251
    pub fn decode(header: &[u8]) -> RshResult<Self> {
        Self::decode_with(header, Codepage::default())
    }

    /// Decode a binary header using the given codepage for strings
    ///
    /// Only the first 2048 bytes are read. No cross-field validation is
    /// performed.
    pub fn decode_with(header: &[u8], codepage: Codepage) -> RshResult<Self> {
        if header.len() < BINARY_HEADER_SIZE {
            return Err(RshError::TruncatedHeader {
                needed: BINARY_HEADER_SIZE,
                available: header.len(),
            });
        }
        let h = &header[..BINARY_HEADER_SIZE];

        let channel_number = le_u32(h, 368);
        let channels_end = channel_table_end(channel_number as usize);
        if channels_end > BINARY_HEADER_SIZE {
            return Err(RshError::TruncatedHeader {
                needed: channels_end,
                available: BINARY_HEADER_SIZE,
            });
        }

        let synchro_control = decode_flags(
            &le_words(h, 320, SYNCHRO_FLAG_SLOTS),
            le_u32(h, 336),
            &SYNCHRO_CONTROL,
        )?;

        let mut channel = Vec::with_capacity(channel_number as usize);
        for i in 0..channel_number as usize {
            let base = CHANNEL_TABLE_OFFSET + CHANNEL_RECORD_SIZE * i;
            let record = &h[base..base + CHANNEL_RECORD_SIZE];
            channel.push(ChannelParams {
                params: decode_flags(
                    &le_words(record, 4, CHANNEL_FLAG_SLOTS),
                    le_u32(record, 36),
                    &CHANNEL_CONTROL,
                )?,
                adjustment: le_f64(record, 44),
                gain: le_u32(record, 52),
            });
        }

        let synchro_channel = SynchroChannelParams {
            params: decode_flags(
                &le_words(h, SYNCHRO_CHANNEL_OFFSET, CHANNEL_FLAG_SLOTS),
                le_u32(h, 632),
                &SYNCHRO_CHANNEL_CONTROL,
            )?,
            channel_type: SYNCHRO_CHANNEL_TYPES.resolve(le_u32(h, 304))?.to_string(),
            gain: le_u32(h, 636),
        };

        let params = Self {
            text_header_size: le_u32(h, 0),
            events_num: le_i32(h, 8),
            start_time: UnixTime(le_u64(h, 16)),
            end_time: UnixTime(le_u64(h, 24)),
            filepath: codepage.decode_fixed(&h[32..32 + FIXED_STRING_LEN]),
            num_blocks: le_i32(h, 288),
            acquisition_time: le_i32(h, 292),
            blocks_in_file: le_i32(h, 296),
            wait_time: le_i32(h, 300),
            threshold: le_f64(h, 312),
            synchro_control,
            sample_freq: le_f64(h, 344),
            pre_history: le_u32(h, 352),
            packet_number: le_i32(h, 356),
            b_size: le_u32(h, 360),
            hysteresis: le_u32(h, 364),
            channel_number,
            channel,
            synchro_channel,
            err_lang: le_u32(h, 640),
            board_name: codepage.decode_fixed(&h[644..644 + FIXED_STRING_LEN]),
            board_id: le_u32(h, 900),
        };

        debug!(
            events_num = params.events_num,
            channel_number = params.channel_number,
            b_size = params.b_size,
            board = %params.board_name,
            "Decoded binary header"
        );

        Ok(params)
    }

    /// Serialize to a 2048-byte binary header, writing strings as windows-1251
    pub fn to_bytes(&self) -> RshResult<[u8; BINARY_HEADER_SIZE]> {
        self.to_bytes_with(Codepage::default())
    }

    /// Serialize to a 2048-byte binary header
    ///
    /// Flag names are translated back to codes through the vocabularies.
    /// Strings longer than 255 bytes are truncated.
    ///
    /// From the fifth channel on, channel records share bytes with the
    /// synchro channel, `err_lang` and `board_name`. Such headers encode
    /// only when the shared bytes agree, so the result always decodes back
    /// to `self`; otherwise this fails with `InvalidParams`.
    pub fn to_bytes_with(&self, codepage: Codepage) -> RshResult<[u8; BINARY_HEADER_SIZE]> {
        if self.channel.len() != self.channel_number as usize {
            return Err(RshError::invalid_params(format!(
                "channel_number is {} but {} channel records given",
                self.channel_number,
                self.channel.len()
            )));
        }
        let channels_end = channel_table_end(self.channel.len());
        if channels_end > BINARY_HEADER_SIZE {
            return Err(RshError::TruncatedHeader {
                needed: channels_end,
                available: BINARY_HEADER_SIZE,
            });
        }

        let mut buf = [0u8; BINARY_HEADER_SIZE];

        buf[0..4].copy_from_slice(&self.text_header_size.to_le_bytes());
        buf[8..12].copy_from_slice(&self.events_num.to_le_bytes());
        buf[16..24].copy_from_slice(&self.start_time.0.to_le_bytes());
        buf[24..32].copy_from_slice(&self.end_time.0.to_le_bytes());
        buf[32..32 + FIXED_STRING_LEN]
            .copy_from_slice(&codepage.encode_fixed(&self.filepath, FIXED_STRING_LEN));
        buf[288..292].copy_from_slice(&self.num_blocks.to_le_bytes());
        buf[292..296].copy_from_slice(&self.acquisition_time.to_le_bytes());
        buf[296..300].copy_from_slice(&self.blocks_in_file.to_le_bytes());
        buf[300..304].copy_from_slice(&self.wait_time.to_le_bytes());

        let sync_type = SYNCHRO_CHANNEL_TYPES.resolve_name(&self.synchro_channel.channel_type)?;
        buf[304..308].copy_from_slice(&sync_type.to_le_bytes());

        buf[312..320].copy_from_slice(&self.threshold.to_le_bytes());

        let (codes, count) =
            encode_flags(&self.synchro_control, &SYNCHRO_CONTROL, SYNCHRO_FLAG_SLOTS)?;
        put_words(&mut buf, 320, &codes);
        buf[336..340].copy_from_slice(&count.to_le_bytes());

        buf[344..352].copy_from_slice(&self.sample_freq.to_le_bytes());
        buf[352..356].copy_from_slice(&self.pre_history.to_le_bytes());
        buf[356..360].copy_from_slice(&self.packet_number.to_le_bytes());
        buf[360..364].copy_from_slice(&self.b_size.to_le_bytes());
        buf[364..368].copy_from_slice(&self.hysteresis.to_le_bytes());
        buf[368..372].copy_from_slice(&self.channel_number.to_le_bytes());

        let (codes, count) = encode_flags(
            &self.synchro_channel.params,
            &SYNCHRO_CHANNEL_CONTROL,
            CHANNEL_FLAG_SLOTS,
        )?;
        put_words(&mut buf, SYNCHRO_CHANNEL_OFFSET, &codes);
        buf[632..636].copy_from_slice(&count.to_le_bytes());
        buf[636..640].copy_from_slice(&self.synchro_channel.gain.to_le_bytes());
        buf[640..644].copy_from_slice(&self.err_lang.to_le_bytes());
        buf[644..644 + FIXED_STRING_LEN]
            .copy_from_slice(&codepage.encode_fixed(&self.board_name, FIXED_STRING_LEN));
        buf[900..904].copy_from_slice(&self.board_id.to_le_bytes());

        let shared = SYNCHRO_CHANNEL_OFFSET.min(channels_end)..channels_end;
        let before = buf[shared.clone()].to_vec();

        for (i, ch) in self.channel.iter().enumerate() {
            let base = CHANNEL_TABLE_OFFSET + CHANNEL_RECORD_SIZE * i;
            let (codes, count) = encode_flags(&ch.params, &CHANNEL_CONTROL, CHANNEL_FLAG_SLOTS)?;
            put_words(&mut buf, base + 4, &codes);
            buf[base + 36..base + 40].copy_from_slice(&count.to_le_bytes());
            buf[base + 44..base + 52].copy_from_slice(&ch.adjustment.to_le_bytes());
            buf[base + 52..base + 56].copy_from_slice(&ch.gain.to_le_bytes());
        }

        if buf[shared.clone()] != before[..] {
            return Err(RshError::invalid_params(format!(
                "{} channel records overlap bytes {}..{} with conflicting values",
                self.channel.len(),
                shared.start,
                shared.end
            )));
        }

        Ok(buf)
    }

    /// Number of i16 samples in each event record
    pub fn samples_per_event(&self) -> u64 {
        u64::from(self.channel_number) * u64::from(self.b_size)
    }

    /// Convert to a JSON object with the acquisition software's key names
    pub fn to_json(&self) -> RshResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Render as a text header (see [`render_text_header`])
    pub fn to_text_header(&self) -> RshResult<String> {
        render_text_header(&self.to_json()?)
    }
}

fn channel_table_end(channels: usize) -> usize {
    channels
        .checked_mul(CHANNEL_RECORD_SIZE)
        .and_then(|n| n.checked_add(CHANNEL_TABLE_OFFSET))
        .unwrap_or(usize::MAX)
}

fn le_u32(buf: &[u8], off: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[off..off + 4]);
    u32::from_le_bytes(b)
}

fn le_i32(buf: &[u8], off: usize) -> i32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[off..off + 4]);
    i32::from_le_bytes(b)
}

fn le_u64(buf: &[u8], off: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[off..off + 8]);
    u64::from_le_bytes(b)
}

fn le_f64(buf: &[u8], off: usize) -> f64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[off..off + 8]);
    f64::from_le_bytes(b)
}

fn le_words(buf: &[u8], off: usize, count: usize) -> Vec<u32> {
    (0..count).map(|i| le_u32(buf, off + 4 * i)).collect()
}

fn put_words(buf: &mut [u8], off: usize, words: &[u32]) {
    for (i, w) in words.iter().enumerate() {
        buf[off + 4 * i..off + 4 * i + 4].copy_from_slice(&w.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> HeaderParams {
        HeaderParams {
            text_header_size: 5120,
            events_num: 3,
            start_time: UnixTime(1_484_575_611),
            end_time: UnixTime(1_484_575_671),
            filepath: "D:/data/set_1/p0(30s)(HV1=16000).rsb".to_string(),
            num_blocks: 3,
            acquisition_time: 30,
            blocks_in_file: 1000,
            wait_time: 5,
            threshold: 0.25,
            synchro_control: FlagSet::new(["Default", "SlopeDecline"]),
            sample_freq: 3_125_000.0,
            pre_history: 16,
            packet_number: 1,
            b_size: 100,
            hysteresis: 2,
            channel_number: 2,
            channel: vec![
                ChannelParams {
                    params: FlagSet::new(["Used", "AC", "FirstChannel"]),
                    adjustment: 0.5,
                    gain: 10,
                },
                ChannelParams {
                    params: FlagSet::new(["Default"]),
                    adjustment: -1.25,
                    gain: 1,
                },
            ],
            synchro_channel: SynchroChannelParams {
                params: FlagSet::new(["FilterLow", "Resist50Ohm"]),
                channel_type: "External".to_string(),
                gain: 4,
            },
            err_lang: 1,
            board_name: "LAN10-12PCI".to_string(),
            board_id: 7,
        }
    }

    #[test]
    fn test_header_roundtrip() {
        let params = sample_params();
        let bytes = params.to_bytes().unwrap();
        let restored = HeaderParams::decode(&bytes).unwrap();
        assert_eq!(restored, params);
    }

    #[test]
    fn test_decode_fixed_offsets() {
        let bytes = sample_params().to_bytes().unwrap();

        assert_eq!(&bytes[8..12], &3i32.to_le_bytes());
        assert_eq!(&bytes[360..364], &100u32.to_le_bytes());
        assert_eq!(&bytes[368..372], &2u32.to_le_bytes());
        assert_eq!(&bytes[304..308], &2u32.to_le_bytes()); // External
        assert_eq!(&bytes[644..655], b"LAN10-12PCI");
        // second channel gain at 372 + 56 + 52
        assert_eq!(&bytes[480..484], &1u32.to_le_bytes());
    }

    #[test]
    fn test_decode_is_deterministic() {
        let bytes = sample_params().to_bytes().unwrap();
        let a = HeaderParams::decode(&bytes).unwrap();
        let b = HeaderParams::decode(&bytes).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_channel_count() {
        let params = HeaderParams::decode(&sample_params().to_bytes().unwrap()).unwrap();
        assert_eq!(params.channel.len(), 2);
        assert_eq!(params.channel.len(), params.channel_number as usize);
        assert_eq!(params.samples_per_event(), 200);
    }

    #[test]
    fn test_decode_truncated_header() {
        let result = HeaderParams::decode(&[0u8; 2047]);
        assert!(matches!(
            result,
            Err(RshError::TruncatedHeader {
                needed: 2048,
                available: 2047
            })
        ));
    }

    #[test]
    fn test_decode_zeroed_header() {
        let params = HeaderParams::decode(&[0u8; BINARY_HEADER_SIZE]).unwrap();
        assert_eq!(params.channel_number, 0);
        assert!(params.channel.is_empty());
        assert!(params.synchro_control.is_empty());
        assert_eq!(params.synchro_channel.channel_type, "Program");
        assert_eq!(params.start_time, UnixTime(0));
        assert_eq!(params.filepath, "");
    }

    #[test]
    fn test_decode_channel_table_past_end() {
        let mut bytes = [0u8; BINARY_HEADER_SIZE];
        bytes[368..372].copy_from_slice(&30u32.to_le_bytes());
        let result = HeaderParams::decode(&bytes);
        assert!(matches!(
            result,
            Err(RshError::TruncatedHeader {
                needed: 2052,
                available: 2048
            })
        ));
    }

    #[test]
    fn test_decode_unknown_channel_flag() {
        let mut bytes = sample_params().to_bytes().unwrap();
        // first control code of channel 0
        bytes[376..380].copy_from_slice(&0x40u32.to_le_bytes());
        let result = HeaderParams::decode(&bytes);
        assert!(matches!(
            result,
            Err(RshError::UnknownFlagCode {
                table: "channel_control",
                code: 0x40
            })
        ));
    }

    #[test]
    fn test_decode_unknown_synchro_channel_type() {
        let mut bytes = sample_params().to_bytes().unwrap();
        bytes[304..308].copy_from_slice(&0x99u32.to_le_bytes());
        let result = HeaderParams::decode(&bytes);
        assert!(matches!(result, Err(RshError::UnknownFlagCode { code: 0x99, .. })));
    }

    #[test]
    fn test_to_bytes_channel_count_mismatch() {
        let mut params = sample_params();
        params.channel_number = 3;
        assert!(matches!(params.to_bytes(), Err(RshError::InvalidParams(_))));
    }

    #[test]
    fn test_to_bytes_unknown_flag_name() {
        let mut params = sample_params();
        params.synchro_control = FlagSet::new(["Sideways"]);
        assert!(matches!(
            params.to_bytes(),
            Err(RshError::UnknownFlagName { .. })
        ));
    }

    #[test]
    fn test_to_bytes_rejects_conflicting_channel_overlap() {
        let mut params = sample_params();
        params.channel_number = 5;
        params.channel = (0..5)
            .map(|_| ChannelParams {
                params: FlagSet::new(["Used", "FirstChannel"]),
                adjustment: 0.0,
                gain: 1,
            })
            .collect();
        assert!(matches!(params.to_bytes(), Err(RshError::InvalidParams(_))));
    }

    #[test]
    fn test_five_channel_roundtrip_when_overlap_agrees() {
        let mut params = sample_params();
        params.channel_number = 5;
        params.channel = (0..5)
            .map(|i| ChannelParams {
                params: if i < 4 {
                    FlagSet::new(["Used"])
                } else {
                    FlagSet::default()
                },
                adjustment: 0.0,
                gain: if i < 4 { 3 } else { 0 },
            })
            .collect();
        params.synchro_channel.params = FlagSet::default();
        params.err_lang = 0;
        params.board_name = String::new();

        let restored = HeaderParams::decode(&params.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, params);
        assert_eq!(restored.synchro_channel.gain, 4);
    }

    #[test]
    fn test_four_channels_do_not_overlap() {
        let mut params = sample_params();
        params.channel_number = 4;
        params.channel = (0..4)
            .map(|_| ChannelParams {
                params: FlagSet::new(["Used", "AC", "FirstChannel"]),
                adjustment: 12.5,
                gain: 100,
            })
            .collect();
        let restored = HeaderParams::decode(&params.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, params);
    }

    #[test]
    fn test_non_finite_floats_survive_json() {
        let mut bytes = sample_params().to_bytes().unwrap();
        bytes[312..320].copy_from_slice(&f64::NAN.to_le_bytes());
        bytes[344..352].copy_from_slice(&f64::INFINITY.to_le_bytes());
        // adjustment of channel 1
        bytes[472..480].copy_from_slice(&f64::NEG_INFINITY.to_le_bytes());
        let params = HeaderParams::decode(&bytes).unwrap();
        assert!(params.threshold.is_nan());

        let json = params.to_json().unwrap();
        assert_eq!(json["threshold"], "nan");
        assert_eq!(json["sample_freq"], "inf");
        assert_eq!(json["channel"][1]["adjustment"], "-inf");

        let back: HeaderParams = serde_json::from_value(json).unwrap();
        assert!(back.threshold.is_nan());
        assert_eq!(back.sample_freq, f64::INFINITY);
        assert_eq!(back.channel[1].adjustment, f64::NEG_INFINITY);
        assert_eq!(back.channel[0], params.channel[0]);

        let text = params.to_text_header().unwrap();
        assert!(text.contains("\nnan -- threshold\n"));
        assert!(text.contains("\ninf -- sample_freq\n"));
        assert!(text.contains("\n-inf -- channel_adjustment[1]\n"));
    }

    #[test]
    fn test_float_json_rejects_unknown_text() {
        let mut json = sample_params().to_json().unwrap();
        json["threshold"] = serde_json::json!("lots");
        assert!(serde_json::from_value::<HeaderParams>(json).is_err());
    }

    #[test]
    fn test_unix_time_display() {
        assert_eq!(UnixTime(0).to_string(), "1970-01-01T00:00:00");
        assert_eq!(UnixTime(1_484_575_611).to_string(), "2017-01-16T14:06:51");
        assert_eq!(UnixTime(u64::MAX).to_string(), u64::MAX.to_string());
    }

    #[test]
    fn test_unix_time_serde() {
        let json = serde_json::to_string(&UnixTime(1_484_575_611)).unwrap();
        assert_eq!(json, "\"2017-01-16T14:06:51\"");
        let back: UnixTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UnixTime(1_484_575_611));

        let raw: UnixTime = serde_json::from_str("42").unwrap();
        assert_eq!(raw, UnixTime(42));
    }

    #[test]
    fn test_json_keys_follow_acquisition_software() {
        let json = sample_params().to_json().unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("aquisition_time"));
        assert!(obj.contains_key("waitTime"));
        assert_eq!(obj["synchro_channel"]["type"], "External");
        assert_eq!(obj["channel"][0]["params"][1], "AC");
    }

    #[test]
    fn test_json_roundtrip() {
        let params = sample_params();
        let json = params.to_json().unwrap();
        let back: HeaderParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }
}
