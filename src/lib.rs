//! rsh-rs: reader and writer for Rsh/Rsb data-acquisition files
//!
//! This crate decodes the binary header of Rudshel LAN10-12 acquisition
//! files, renders parameters as a text configuration header, and gives
//! random access to the fixed-size event records that follow.
//!
//! ```no_run
//! use rsh_rs::store::EventStore;
//!
//! let mut store = EventStore::open("p0(30s)(HV1=16000).rsb")?;
//! println!("{} events", store.len());
//! let mut ev = store.event(0)?;
//! ev.data.iter_mut().for_each(|s| *s = s.saturating_sub(100));
//! store.update_event_data(0, &ev.data)?;
//! # Ok::<(), rsh_rs::common::RshError>(())
//! ```

pub mod common;
pub mod config;
pub mod format;
pub mod store;

pub use common::{RshError, RshResult};
pub use format::{HeaderParams, render_text_header};
pub use store::{EventRecord, EventStore};
