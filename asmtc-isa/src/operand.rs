//! Operand catalog: abstract operand-type tokens to concrete operand text.
//!
//! Tokens are the operand-type names used in the instruction database
//! (`reg32`, `xmmrm128|b32`, `kreg16*`, ...). Each token maps, per dialect,
//! either to nothing (the token cannot be written in that dialect) or to an
//! ordered, non-empty list of alternatives. An empty alternative means the
//! operand is omitted.

use crate::Dialect;
use crate::tables::OPERAND_TABLE;

/// One row of the generated catalog.
#[derive(Debug, Clone, Copy)]
pub struct OperandEntry {
    pub token: &'static str,
    pub nasm: Option<&'static [&'static str]>,
    pub gas: Option<&'static [&'static str]>,
}

impl OperandEntry {
    /// Renderings for `dialect`, if the token has any.
    #[inline]
    pub fn renderings(&self, dialect: Dialect) -> Option<&'static [&'static str]> {
        match dialect {
            Dialect::Nasm => self.nasm,
            Dialect::Gas => self.gas,
        }
    }
}

/// Look up the catalog row for `token` (exact match).
pub fn lookup(token: &str) -> Option<&'static OperandEntry> {
    OPERAND_TABLE
        .binary_search_by(|e| e.token.cmp(token))
        .ok()
        .map(|i| &OPERAND_TABLE[i])
}

/// Concrete renderings of `token` in `dialect`.
///
/// `None` means the token has no textual form there; callers skip the whole
/// instruction line.
///
/// ```
/// use asmtc_isa::{Dialect, operand};
///
/// assert_eq!(operand::render("reg32", Dialect::Nasm), Some(&["eax"][..]));
/// assert_eq!(operand::render("reg32", Dialect::Gas), Some(&["%eax"][..]));
/// assert_eq!(operand::render("ignore", Dialect::Nasm), None);
/// ```
pub fn render(token: &str, dialect: Dialect) -> Option<&'static [&'static str]> {
    lookup(token)?.renderings(dialect)
}

/// All catalog entries, sorted by token.
pub fn entries() -> &'static [OperandEntry] {
    OPERAND_TABLE
}

/// All known tokens, sorted.
pub fn tokens() -> impl Iterator<Item = &'static str> {
    OPERAND_TABLE.iter().map(|e| e.token)
}
