//! Mnemonic expansion: condition-code families and instruction prefixes.
//!
//! The database lists conditional instructions once under a template name
//! (`CMOVcc`, `Jcc`, `SETccZU`, ...). Expansion turns the template into every
//! concrete condition-code mnemonic and works out the prefix tokens that go
//! in front of it.

use std::fmt;

use crate::lookup_sorted;
use crate::tables::{FAMILY_TABLE, PREFIX_TABLE};

/// Encoding pseudo-prefix requested by the database line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingHint {
    Vex,
    Evex,
}

impl EncodingHint {
    pub const fn prefix(self) -> &'static str {
        match self {
            EncodingHint::Vex => "{vex}",
            EncodingHint::Evex => "{evex}",
        }
    }
}

impl fmt::Display for EncodingHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Marker rules, most specific first. The first marker found in the line
/// decides the hint. `evex.scc` lines carry no hint even though they contain
/// `evex.`, and `evex.` must be tested before `vex.`.
const ENCODING_RULES: &[(&str, Option<EncodingHint>)] = &[
    ("evex.scc", None),
    ("evex.", Some(EncodingHint::Evex)),
    ("vex.", Some(EncodingHint::Vex)),
    ("vex+.", Some(EncodingHint::Vex)),
];

/// Scan a database line for an encoding marker.
///
/// ```
/// use asmtc_isa::{EncodingHint, mnemonic::encoding_hint};
///
/// assert_eq!(encoding_hint("VADDPS xmmreg,xmmreg*,xmmrm128 [rvm:vex.nds.128.0f]"), Some(EncodingHint::Vex));
/// assert_eq!(encoding_hint("CCMPscc rm8,reg8 [mr:evex.scc.nd0.nf0]"), None);
/// ```
pub fn encoding_hint(line: &str) -> Option<EncodingHint> {
    ENCODING_RULES
        .iter()
        .find(|(marker, _)| line.contains(marker))
        .and_then(|(_, hint)| *hint)
}

/// Concrete members of a template mnemonic, or `None` if `mnemonic` is not a
/// template.
pub fn family(mnemonic: &str) -> Option<&'static [&'static str]> {
    lookup_sorted(FAMILY_TABLE, mnemonic)
}

/// All template mnemonics, sorted.
pub fn templates() -> impl Iterator<Item = &'static str> {
    FAMILY_TABLE.iter().map(|(t, _)| *t)
}

/// Extra literal prefix tied to a specific mnemonic (e.g. `{zu}`).
pub fn extra_prefix(mnemonic: &str) -> Option<&'static str> {
    lookup_sorted(PREFIX_TABLE, mnemonic)
}

/// Result of [`expand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion<'a> {
    /// Concrete mnemonics, in table order. A non-template mnemonic expands to
    /// itself.
    pub mnemonics: Vec<&'a str>,
    /// Prefix tokens: encoding hint first, then the mnemonic's extra prefix.
    pub prefix: Vec<&'static str>,
}

impl Expansion<'_> {
    /// Prefix tokens joined with single spaces; empty if there are none.
    pub fn prefix_text(&self) -> String {
        self.prefix.join(" ")
    }
}

/// Expand `mnemonic` as found on database line `line`.
pub fn expand<'a>(mnemonic: &'a str, line: &str) -> Expansion<'a> {
    let mnemonics = match family(mnemonic) {
        Some(members) => members.to_vec(),
        None => vec![mnemonic],
    };

    let mut prefix = Vec::with_capacity(2);
    if let Some(hint) = encoding_hint(line) {
        prefix.push(hint.prefix());
    }
    if let Some(extra) = extra_prefix(mnemonic) {
        prefix.push(extra);
    }

    Expansion { mnemonics, prefix }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scc_marker_suppresses_evex_hint() {
        assert_eq!(encoding_hint("CTESTscc rm32,imm32 [mi: evex.scc.ndx.w0]"), None);
        assert_eq!(
            encoding_hint("VPADDD zmmreg,zmmreg*,zmmrm512 [rvm:fv: evex.nds.512.66.0f.w0]"),
            Some(EncodingHint::Evex)
        );
    }

    #[test]
    fn vex_markers() {
        assert_eq!(encoding_hint("ANDN reg32,reg32,rm32 [rvm: vex.nds.lz.0f38.w0]"), Some(EncodingHint::Vex));
        assert_eq!(encoding_hint("X reg32 [vex+.w0]"), Some(EncodingHint::Vex));
        assert_eq!(encoding_hint("ADD rm32,reg32 [mr: o32 01 /r]"), None);
    }

    #[test]
    fn scc_wins_regardless_of_position() {
        // Rules are tried in order against the whole line, not by position.
        assert_eq!(encoding_hint("X evex.w0 evex.scc"), None);
    }

    #[test]
    fn plain_mnemonic_expands_to_itself() {
        let e = expand("ADD", "ADD rm32,reg32 [mr: o32 01 /r]");
        assert_eq!(e.mnemonics, vec!["ADD"]);
        assert!(e.prefix.is_empty());
        assert_eq!(e.prefix_text(), "");
    }

    #[test]
    fn template_expands_to_family() {
        let e = expand("CMOVcc", "CMOVcc reg32,rm32 [rm: o32 0f 40+c /r]");
        assert_eq!(e.mnemonics.len(), 30);
        assert_eq!(e.mnemonics[0], "CMOVA");
        assert_eq!(e.mnemonics[29], "CMOVZ");
    }

    #[test]
    fn families_are_ordered_sets() {
        for template in templates() {
            let members = family(template).unwrap();
            for (i, m) in members.iter().enumerate() {
                assert!(!members[..i].contains(m), "{template} repeats {m}");
            }
        }
    }

    #[test]
    fn hint_precedes_extra_prefix() {
        let e = expand("SETccZU", "SETccZU rm8 [m: evex.nf0.nd0.w0 0f 40+c /0]");
        assert_eq!(e.prefix, vec!["{evex}", "{zu}"]);
        assert_eq!(e.prefix_text(), "{evex} {zu}");
        assert_eq!(e.mnemonics.len(), 16);
    }

    #[test]
    fn extra_prefix_without_hint() {
        let e = expand("SETccZU", "SETccZU rm8");
        assert_eq!(e.prefix, vec!["{zu}"]);
        assert_eq!(extra_prefix("SETcc"), None);
    }
}
