//! Whole-file Rsb writer
//!
//! Produces the same layout [`EventStore`](super::EventStore) reads: text
//! header, binary header, then `events_num` fixed-size event records.

use std::io::Write;

use tracing::debug;

use super::event::EventRecord;
use crate::common::error::{RshError, RshResult};
use crate::format::{Codepage, HeaderParams, EVENT_HEADER_SIZE, EVENT_TAG_SIZE, TEXT_HEADER_SIZE};

/// Write a complete Rsb file, encoding text as windows-1251
pub fn write_rsb<W: Write>(
    writer: &mut W,
    text_header: &str,
    params: &HeaderParams,
    events: &[EventRecord],
) -> RshResult<()> {
    write_rsb_with(writer, text_header, params, events, Codepage::default())
}

/// Write a complete Rsb file
///
/// `events` must hold exactly `events_num` records, each with
/// `channel_number * b_size` samples and a tag of at most 64 bytes. Every
/// check runs before the first byte is written. The text header is
/// NUL-padded, or truncated, to 5120 bytes.
pub fn write_rsb_with<W: Write>(
    writer: &mut W,
    text_header: &str,
    params: &HeaderParams,
    events: &[EventRecord],
    codepage: Codepage,
) -> RshResult<()> {
    let expected_events = params.events_num.max(0) as usize;
    if events.len() != expected_events {
        return Err(RshError::invalid_params(format!(
            "events_num is {} but {} events given",
            params.events_num,
            events.len()
        )));
    }

    let samples = params.samples_per_event() as usize;
    for (i, ev) in events.iter().enumerate() {
        if ev.data.len() != samples {
            return Err(RshError::ShapeMismatch {
                expected: samples,
                actual: ev.data.len(),
            });
        }
        if ev.tag.len() > EVENT_TAG_SIZE {
            return Err(RshError::invalid_params(format!(
                "tag of event {i} is {} bytes, at most {EVENT_TAG_SIZE} fit",
                ev.tag.len()
            )));
        }
    }

    let header = params.to_bytes_with(codepage)?;

    writer.write_all(&codepage.encode_fixed(text_header, TEXT_HEADER_SIZE))?;
    writer.write_all(&header)?;
    for ev in events {
        writer.write_all(&encode_record(ev))?;
    }
    writer.flush()?;

    debug!(
        events = events.len(),
        samples_per_event = samples,
        "Rsb file written"
    );
    Ok(())
}

fn encode_record(ev: &EventRecord) -> Vec<u8> {
    let mut rec = vec![0u8; EVENT_HEADER_SIZE as usize + 2 * ev.data.len()];
    rec[..ev.tag.len()].copy_from_slice(&ev.tag);
    rec[64..68].copy_from_slice(&ev.sequence.to_le_bytes());
    rec[72..80].copy_from_slice(&ev.start_time.seconds().to_le_bytes());
    rec[80..88].copy_from_slice(&ev.ns_since_epoch.unwrap_or(0).to_le_bytes());

    let payload = &mut rec[EVENT_HEADER_SIZE as usize..];
    for (dst, sample) in payload.chunks_exact_mut(2).zip(&ev.data) {
        dst.copy_from_slice(&sample.to_le_bytes());
    }
    rec
}
