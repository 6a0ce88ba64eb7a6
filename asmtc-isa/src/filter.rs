//! Opcode filter: mnemonics that must not be generated for a 64-bit Intel
//! target.

use std::fmt;

use crate::tables::{NON_64BIT_DENYLIST, NON_INTEL_DENYLIST};

/// Why a mnemonic was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterReason {
    /// Invalid or meaningless in 64-bit mode.
    Non64Bit,
    /// Only implemented by a non-Intel vendor.
    NonIntel,
}

impl FilterReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            FilterReason::Non64Bit => "non-64bit",
            FilterReason::NonIntel => "non-Intel",
        }
    }
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The denylist `mnemonic` appears in, if any. Exact match only; the 64-bit
/// list is consulted first.
pub fn reason(mnemonic: &str) -> Option<FilterReason> {
    if contains(NON_64BIT_DENYLIST, mnemonic) {
        Some(FilterReason::Non64Bit)
    } else if contains(NON_INTEL_DENYLIST, mnemonic) {
        Some(FilterReason::NonIntel)
    } else {
        None
    }
}

/// `true` unless `mnemonic` is on either denylist.
#[inline]
pub fn is_eligible(mnemonic: &str) -> bool {
    reason(mnemonic).is_none()
}

/// Entries of one denylist, sorted.
pub fn denylist(reason: FilterReason) -> &'static [&'static str] {
    match reason {
        FilterReason::Non64Bit => NON_64BIT_DENYLIST,
        FilterReason::NonIntel => NON_INTEL_DENYLIST,
    }
}

fn contains<'a>(list: &[&'a str], mnemonic: &'a str) -> bool {
    list.binary_search(&mnemonic).is_ok()
}
