//! Flag vocabularies for Rsh/Rsb binary headers
//!
//! Each table maps symbolic names used by the acquisition board SDK to the
//! 32-bit codes stored in the header. Several names may share one code
//! (typically `0x0`, the "off" state of every switch); reverse lookup
//! returns the first declared name for a code.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::common::error::{RshError, RshResult};

/// Bidirectional name <-> code vocabulary
#[derive(Debug)]
pub struct FlagTable {
    name: &'static str,
    entries: &'static [(&'static str, u32)],
    by_code: HashMap<u32, &'static str>,
    by_name: HashMap<&'static str, u32>,
}

impl FlagTable {
    /// Build a table, keeping the first name declared for each code
    pub fn new(name: &'static str, entries: &'static [(&'static str, u32)]) -> Self {
        let mut by_code = HashMap::with_capacity(entries.len());
        let mut by_name = HashMap::with_capacity(entries.len());
        for &(flag, code) in entries {
            by_code.entry(code).or_insert(flag);
            by_name.entry(flag).or_insert(code);
        }
        Self {
            name,
            entries,
            by_code,
            by_name,
        }
    }

    /// Table name used in error messages
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Code for a symbolic name
    pub fn code(&self, flag: &str) -> Option<u32> {
        self.by_name.get(flag).copied()
    }

    /// First symbolic name declared for a code
    pub fn lookup(&self, code: u32) -> Option<&'static str> {
        self.by_code.get(&code).copied()
    }

    /// Like [`lookup`](Self::lookup), failing with `UnknownFlagCode`
    pub fn resolve(&self, code: u32) -> RshResult<&'static str> {
        self.lookup(code).ok_or(RshError::UnknownFlagCode {
            table: self.name,
            code,
        })
    }

    /// Like [`code`](Self::code), failing with `UnknownFlagName`
    pub fn resolve_name(&self, flag: &str) -> RshResult<u32> {
        self.code(flag).ok_or_else(|| RshError::UnknownFlagName {
            table: self.name,
            name: flag.to_string(),
        })
    }

    /// All entries in declaration order
    pub fn entries(&self) -> &'static [(&'static str, u32)] {
        self.entries
    }
}

// RshChannel::control
const CHANNEL_CONTROL_ENTRIES: &[(&str, u32)] = &[
    ("NotUsed", 0x0),
    ("NoSynchro", 0x0),
    ("Resist1MOhm", 0x0),
    ("DC", 0x0),
    ("ICPPowerOff", 0x0),
    ("Used", 0x1),
    ("Synchro", 0x2),
    ("AC", 0x4),
    ("Resist50Ohm", 0x8),
    ("ICPPowerOn", 0x10),
    ("FirstChannel", 0x10000),
];

// RshSynchroChannel::control
const SYNCHRO_CHANNEL_CONTROL_ENTRIES: &[(&str, u32)] = &[
    ("FilterOff", 0x0),
    ("Resist1MOhm", 0x0),
    ("DC", 0x0),
    ("FilterLow", 0x1),
    ("FilterHigh", 0x2),
    ("AC", 0x4),
    ("Resist50Ohm", 0x8),
];

// RshInitADC::control
const SYNCHRO_CONTROL_ENTRIES: &[(&str, u32)] = &[
    ("FrequencySwitchOff", 0x0),
    ("SlopeFront", 0x0),
    ("SlopeDecline", 0x2),
    ("FrequencySwitchToMinimum", 0x4),
    ("FrequencySwitchToMaximum", 0x8),
];

// RshInitADC::startType
const SYNCHRO_CHANNEL_TYPE_ENTRIES: &[(&str, u32)] = &[
    ("Program", 0x0),
    ("Timer", 0x1),
    ("External", 0x2),
    ("Internal", 0x4),
];

/// Per-channel control flags
pub static CHANNEL_CONTROL: LazyLock<FlagTable> =
    LazyLock::new(|| FlagTable::new("channel_control", CHANNEL_CONTROL_ENTRIES));

/// Synchro-channel control flags
pub static SYNCHRO_CHANNEL_CONTROL: LazyLock<FlagTable> = LazyLock::new(|| {
    FlagTable::new("synchro_channel_control", SYNCHRO_CHANNEL_CONTROL_ENTRIES)
});

/// Synchro (trigger) control flags
pub static SYNCHRO_CONTROL: LazyLock<FlagTable> =
    LazyLock::new(|| FlagTable::new("synchro_control", SYNCHRO_CONTROL_ENTRIES));

/// Synchro-channel type codes (scalar, not a mask)
pub static SYNCHRO_CHANNEL_TYPES: LazyLock<FlagTable> =
    LazyLock::new(|| FlagTable::new("synchro_channel_types", SYNCHRO_CHANNEL_TYPE_ENTRIES));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_both_directions() {
        assert_eq!(CHANNEL_CONTROL.code("AC"), Some(0x4));
        assert_eq!(CHANNEL_CONTROL.lookup(0x4), Some("AC"));
        assert_eq!(SYNCHRO_CONTROL.lookup(0x8), Some("FrequencySwitchToMaximum"));
        assert_eq!(SYNCHRO_CHANNEL_CONTROL.code("FilterHigh"), Some(0x2));
    }

    #[test]
    fn test_shared_code_resolves_to_first_name() {
        assert_eq!(CHANNEL_CONTROL.lookup(0x0), Some("NotUsed"));
        assert_eq!(SYNCHRO_CHANNEL_CONTROL.lookup(0x0), Some("FilterOff"));
        assert_eq!(SYNCHRO_CONTROL.lookup(0x0), Some("FrequencySwitchOff"));
    }

    #[test]
    fn test_every_nonzero_code_is_invertible() {
        for table in [
            &*CHANNEL_CONTROL,
            &*SYNCHRO_CHANNEL_CONTROL,
            &*SYNCHRO_CONTROL,
            &*SYNCHRO_CHANNEL_TYPES,
        ] {
            for &(name, code) in table.entries() {
                let first = table.lookup(code).unwrap();
                assert_eq!(table.code(first), Some(code), "{}: {}", table.name(), name);
            }
        }
    }

    #[test]
    fn test_every_name_maps_to_its_code() {
        for table in [
            &*CHANNEL_CONTROL,
            &*SYNCHRO_CHANNEL_CONTROL,
            &*SYNCHRO_CONTROL,
            &*SYNCHRO_CHANNEL_TYPES,
        ] {
            for &(name, code) in table.entries() {
                assert_eq!(table.resolve_name(name).unwrap(), code, "{}", table.name());
            }
        }
        assert_eq!(CHANNEL_CONTROL.code("ICPPowerOff"), Some(0x0));
        assert_eq!(CHANNEL_CONTROL.code("used"), None);
    }

    #[test]
    fn test_resolve_unknown_code() {
        let err = CHANNEL_CONTROL.resolve(0x20).unwrap_err();
        assert!(matches!(
            err,
            RshError::UnknownFlagCode {
                table: "channel_control",
                code: 0x20
            }
        ));
    }

    #[test]
    fn test_resolve_unknown_name() {
        let err = SYNCHRO_CONTROL.resolve_name("Bogus").unwrap_err();
        assert!(matches!(err, RshError::UnknownFlagName { .. }));
    }
}
