//! Random-access event store for Rsb files
//!
//! Event records have a fixed size derived from the binary header, so event
//! `i` lives at
//!
//! ```text
//! 7168 + i * (96 + 2 * channel_number * b_size)
//! ```
//!
//! Record layout:
//! ```text
//!  0..64   tag (opaque)
//! 64..68   sequence number (u32)
//! 68..72   padding
//! 72..80   start time, unix seconds (u64)
//! 80..88   nanoseconds since epoch (u64, 0 = absent)
//! 88..96   padding
//! 96..     samples (i16 x channel_number * b_size)
//! ```
//!
//! Every call seeks and reads the stream again; nothing is cached. Sample
//! updates overwrite the payload of an existing record in place and never
//! change the file length. New files are produced as a whole by
//! [`write_rsb`].

pub mod event;
pub mod writer;

pub use event::{EventRecord, SampleType};
pub use writer::{write_rsb, write_rsb_with};

use std::fs::{File, OpenOptions};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::common::error::{RshError, RshResult};
use crate::format::{
    Codepage, HeaderParams, UnixTime, BINARY_HEADER_SIZE, DATA_OFFSET, EVENT_HEADER_SIZE,
    EVENT_TAG_SIZE, TEXT_HEADER_SIZE,
};

/// Stream that can push written bytes to durable storage
pub trait SyncStream: Read + Write + Seek {
    /// Flush buffers and wait until written data is durable
    fn sync(&mut self) -> io::Result<()>;
}

impl SyncStream for File {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_data()
    }
}

impl SyncStream for Cursor<Vec<u8>> {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl SyncStream for Cursor<&mut Vec<u8>> {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl SyncStream for Cursor<&mut [u8]> {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<S: SyncStream + ?Sized> SyncStream for &mut S {
    fn sync(&mut self) -> io::Result<()> {
        (**self).sync()
    }
}

/// Options for opening an Rsb file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Codepage of the text header and string fields
    pub codepage: Codepage,
    /// Open for writing (required by `update_event_data`)
    pub writable: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            codepage: Codepage::default(),
            writable: true,
        }
    }
}

/// Random-access reader/writer for event records
pub struct EventStore<S> {
    stream: S,
    text_header: String,
    params: HeaderParams,
}

impl EventStore<File> {
    /// Open an Rsb file for reading and writing
    pub fn open<P: AsRef<Path>>(path: P) -> RshResult<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Open an Rsb file with explicit options
    pub fn open_with<P: AsRef<Path>>(path: P, options: StoreOptions) -> RshResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(options.writable)
            .open(path)?;
        info!(path = %path.display(), writable = options.writable, "Opening Rsb file");
        Self::from_stream_with(file, options.codepage)
    }
}

impl<S: Read + Seek> EventStore<S> {
    /// Wrap an open stream, decoding strings as windows-1251
    pub fn from_stream(stream: S) -> RshResult<Self> {
        Self::from_stream_with(stream, Codepage::default())
    }

    /// Wrap an open stream and read both headers
    pub fn from_stream_with(mut stream: S, codepage: Codepage) -> RshResult<Self> {
        let available = stream.seek(SeekFrom::End(0))?;
        if available < DATA_OFFSET {
            return Err(RshError::TruncatedFile {
                needed: DATA_OFFSET,
                available,
            });
        }
        stream.seek(SeekFrom::Start(0))?;

        let mut text = vec![0u8; TEXT_HEADER_SIZE];
        stream.read_exact(&mut text)?;
        let text_header = codepage.decode_fixed(&text);

        let mut binary = vec![0u8; BINARY_HEADER_SIZE];
        stream.read_exact(&mut binary)?;
        let params = HeaderParams::decode_with(&binary, codepage)?;

        info!(
            events_num = params.events_num,
            channel_number = params.channel_number,
            b_size = params.b_size,
            file_size = available,
            "Rsb headers loaded"
        );

        Ok(Self {
            stream,
            text_header,
            params,
        })
    }

    /// Decoded binary header
    pub fn params(&self) -> &HeaderParams {
        &self.params
    }

    /// Text header with trailing NULs removed
    pub fn text_header(&self) -> &str {
        &self.text_header
    }

    /// Number of event records (`events_num`, negative counts as zero)
    pub fn len(&self) -> usize {
        self.params.events_num.max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of i16 samples per event
    pub fn samples_per_event(&self) -> u64 {
        self.params.samples_per_event()
    }

    /// Size in bytes of one event record
    pub fn event_stride(&self) -> u64 {
        self.samples_per_event()
            .saturating_mul(2)
            .saturating_add(EVENT_HEADER_SIZE)
    }

    /// Byte offset of event `index`
    pub fn event_offset(&self, index: i64) -> RshResult<u64> {
        if index < 0 || index >= i64::from(self.params.events_num) {
            return Err(RshError::IndexOutOfRange {
                index,
                events_num: self.params.events_num,
            });
        }
        Ok((index as u64)
            .saturating_mul(self.event_stride())
            .saturating_add(DATA_OFFSET))
    }

    /// Read event `index`
    pub fn event(&mut self, index: i64) -> RshResult<EventRecord> {
        let offset = self.record_offset(index)?;
        self.stream.seek(SeekFrom::Start(offset))?;

        let mut head = [0u8; EVENT_HEADER_SIZE as usize];
        self.stream.read_exact(&mut head)?;

        let tag = head[..EVENT_TAG_SIZE].to_vec();
        let sequence = u32::from_le_bytes([head[64], head[65], head[66], head[67]]);
        let start_time = u64::from_le_bytes([
            head[72], head[73], head[74], head[75], head[76], head[77], head[78], head[79],
        ]);
        let ns_since_epoch = u64::from_le_bytes([
            head[80], head[81], head[82], head[83], head[84], head[85], head[86], head[87],
        ]);

        let mut raw = vec![0u8; self.samples_per_event() as usize * 2];
        self.stream.read_exact(&mut raw)?;
        let data = raw
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect();

        Ok(EventRecord {
            tag,
            sequence,
            start_time: UnixTime(start_time),
            ns_since_epoch: (ns_since_epoch != 0).then_some(ns_since_epoch),
            data,
        })
    }

    /// Iterate over all events in order
    pub fn events(&mut self) -> EventIterator<'_, S> {
        let end = self.params.events_num.max(0) as i64;
        EventIterator {
            store: self,
            next: 0,
            end,
        }
    }

    /// Release the underlying stream
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Checked offset of a record that lies entirely inside the stream
    fn record_offset(&mut self, index: i64) -> RshResult<u64> {
        let offset = self.event_offset(index)?;
        let end = offset.saturating_add(self.event_stride());
        let available = self.stream.seek(SeekFrom::End(0))?;
        if end > available {
            return Err(RshError::TruncatedFile {
                needed: end,
                available,
            });
        }
        Ok(offset)
    }
}

impl<S: SyncStream> EventStore<S> {
    /// Overwrite the samples of event `index`
    ///
    /// Tag, sequence number and timestamps are left untouched. The write is
    /// synced to storage before returning.
    pub fn update_event_data(&mut self, index: i64, data: &[i16]) -> RshResult<()> {
        let offset = self.record_offset(index)?;
        self.check_shape(data.len())?;

        let mut bytes = Vec::with_capacity(data.len() * 2);
        for sample in data {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        self.write_payload(index, offset, &bytes)
    }

    /// Overwrite the samples of event `index` from a typed raw buffer
    ///
    /// `bytes` holds little-endian elements of `sample_type`, which must be
    /// [`SampleType::I16`]. A buffer with a trailing partial element fails
    /// with `InvalidParams`; otherwise the element count is checked like
    /// [`update_event_data`](Self::update_event_data).
    pub fn update_event_raw(
        &mut self,
        index: i64,
        sample_type: SampleType,
        bytes: &[u8],
    ) -> RshResult<()> {
        let offset = self.record_offset(index)?;
        if sample_type != SampleType::I16 {
            return Err(RshError::TypeMismatch {
                expected: SampleType::I16.name(),
                actual: sample_type.name(),
            });
        }
        if bytes.len() % SampleType::I16.width() != 0 {
            return Err(RshError::invalid_params(format!(
                "raw buffer of {} bytes is not a whole number of int16 samples",
                bytes.len()
            )));
        }
        self.check_shape(bytes.len() / 2)?;
        self.write_payload(index, offset, bytes)
    }

    fn check_shape(&self, len: usize) -> RshResult<()> {
        let expected = self.samples_per_event() as usize;
        if len != expected {
            return Err(RshError::ShapeMismatch {
                expected,
                actual: len,
            });
        }
        Ok(())
    }

    fn write_payload(&mut self, index: i64, offset: u64, bytes: &[u8]) -> RshResult<()> {
        let data_offset = offset + EVENT_HEADER_SIZE;
        self.stream.seek(SeekFrom::Start(data_offset))?;
        self.stream.write_all(bytes)?;
        self.stream.sync()?;
        debug!(index, offset = data_offset, bytes = bytes.len(), "Event data updated");
        Ok(())
    }
}

/// Iterator over the events of a store
pub struct EventIterator<'a, S> {
    store: &'a mut EventStore<S>,
    next: i64,
    end: i64,
}

impl<'a, S: Read + Seek> Iterator for EventIterator<'a, S> {
    type Item = RshResult<EventRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let result = self.store.event(self.next);
        self.next = if result.is_ok() { self.next + 1 } else { self.end };
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (0, Some(remaining))
    }
}
