use asmtc_isa::{Dialect, filter, mnemonic};

use crate::combination::{self, Combination};
use crate::error::Result;

/// Assemble one instruction line: prefix tokens, mnemonic, flag-state
/// suffix and operands, separated by single spaces.
pub fn format_instruction(prefix: &str, mnemonic: &str, combination: &Combination) -> String {
    let operands = combination.operand_text();
    [
        prefix,
        mnemonic,
        combination.suffix.as_deref().unwrap_or(""),
        operands.as_str(),
    ]
    .iter()
    .filter(|part| !part.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" ")
}

/// Every instruction line a database line produces in `dialect`.
///
/// Each concrete mnemonic of the family gets the full set of operand
/// combinations, mnemonic-major. Family members on a denylist are left out.
/// Fails with [`GenError::UnresolvableOperand`](crate::GenError) when a token
/// cannot be rendered; the caller skips the line.
pub fn materialize(
    mnemonic: &str,
    signature: &str,
    line: &str,
    dialect: Dialect,
) -> Result<Vec<String>> {
    let expansion = mnemonic::expand(mnemonic, line);
    let combinations = combination::expand(signature, dialect)?;
    let prefix = expansion.prefix_text();

    let mut out = Vec::with_capacity(expansion.mnemonics.len() * combinations.len());
    for concrete in expansion.mnemonics {
        if concrete != mnemonic && !filter::is_eligible(concrete) {
            log::debug!("{mnemonic}: leaving out denied family member {concrete}");
            continue;
        }
        for combination in &combinations {
            out.push(format_instruction(&prefix, concrete, combination));
        }
    }
    Ok(out)
}
