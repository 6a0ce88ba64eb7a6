//! x86 instruction tables for assembler test generation, compiled from
//! `tables/x86.yaml`.
//!
//! This crate provides the operand catalog (abstract operand token to
//! concrete NASM/GAS text), the opcode denylists, the conditional mnemonic
//! families and the per-dialect conventions used when writing test sources.

// The bitflags crate is used by `DialectSet`
pub use bitflags;

pub mod dialect;
pub mod filter;
pub mod mnemonic;
pub mod operand;

pub use dialect::{Dialect, DialectSet, Direction, ParseDialectError, SuffixPosition};
pub use filter::{FilterReason, is_eligible};
pub use mnemonic::{EncodingHint, Expansion};

/// Marker that identifies a flag-state annotation (`{dfv=...}`) inside a
/// rendered operand.
pub const FLAG_STATE_MARKER: &str = "{dfv=";

mod tables {
    use crate::operand::OperandEntry;

    include!(concat!(env!("OUT_DIR"), "/generated.rs"));
}

/// Binary search a sorted `(key, value)` table.
fn lookup_sorted<V: Copy>(table: &[(&'static str, V)], key: &str) -> Option<V> {
    table
        .binary_search_by(|(k, _)| (*k).cmp(key))
        .ok()
        .map(|i| table[i].1)
}
