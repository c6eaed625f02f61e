//! Bitmask decoding against a flag vocabulary
//!
//! Header flag words are stored as a fixed array of `u32` slots plus a count
//! of valid slots. Decoding keeps the valid prefix, collapses duplicates and
//! resolves each code to its symbolic name. Names come out in ascending code
//! order, so `"Default"` (code 0) is always first when present.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::flags::FlagTable;
use crate::common::error::{RshError, RshResult};

/// Name emitted for a zero code instead of a vocabulary lookup
pub const DEFAULT_FLAG: &str = "Default";

/// Ordered set of symbolic flag names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(Vec<String>);

impl FlagSet {
    /// Create from names, keeping their order
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl std::fmt::Display for FlagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// Decode the first `valid_count` words of `raw` into a [`FlagSet`]
///
/// A count larger than `raw` is clamped to its length.
pub fn decode_flags(raw: &[u32], valid_count: u32, table: &FlagTable) -> RshResult<FlagSet> {
    let valid = (valid_count as usize).min(raw.len());
    let unique: BTreeSet<u32> = raw[..valid].iter().copied().collect();

    let names = unique
        .into_iter()
        .map(|code| {
            if code == 0 {
                Ok(DEFAULT_FLAG.to_string())
            } else {
                table.resolve(code).map(str::to_string)
            }
        })
        .collect::<RshResult<Vec<_>>>()?;

    Ok(FlagSet(names))
}

/// Translate a [`FlagSet`] back into `slots` raw words and a valid count
///
/// `"Default"` encodes as 0. Unused slots are zero.
pub fn encode_flags(
    flags: &FlagSet,
    table: &FlagTable,
    slots: usize,
) -> RshResult<(Vec<u32>, u32)> {
    if flags.len() > slots {
        return Err(RshError::TooManyFlags {
            table: table.name(),
            count: flags.len(),
            slots,
        });
    }

    let mut raw = vec![0u32; slots];
    for (slot, name) in raw.iter_mut().zip(flags.iter()) {
        *slot = if name == DEFAULT_FLAG {
            0
        } else {
            table.resolve_name(name)?
        };
    }

    Ok((raw, flags.len() as u32))
}
