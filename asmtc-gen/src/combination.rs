//! Operand combinations: the Cartesian product of every operand token's
//! concrete renderings.

use asmtc_isa::{Dialect, Direction, FLAG_STATE_MARKER, SuffixPosition, operand};

use crate::error::{GenError, Result};

/// One concrete operand list for an instruction line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    /// Flag-state annotation (`{dfv=...}`) lifted out of the operand list.
    /// It is written right after the mnemonic.
    pub suffix: Option<String>,
    /// Operands in the dialect's textual order, omitted operands removed.
    pub operands: Vec<String>,
}

impl Combination {
    /// Build a combination from one product row.
    ///
    /// Empty alternatives are dropped first. Then, if the operand at the
    /// dialect's suffix position carries the flag-state marker, it becomes
    /// the suffix.
    pub fn from_row(row: &[&str], position: SuffixPosition) -> Self {
        let mut operands: Vec<String> = row
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        let boundary = match position {
            SuffixPosition::First => 0,
            SuffixPosition::Last => operands.len().saturating_sub(1),
        };
        let suffix = match operands.get(boundary) {
            Some(op) if op.contains(FLAG_STATE_MARKER) => Some(operands.remove(boundary)),
            _ => None,
        };

        Self { suffix, operands }
    }

    /// Operands joined the way both dialects separate them.
    pub fn operand_text(&self) -> String {
        self.operands.join(", ")
    }
}

/// Cartesian product of `lists`, visiting positions in `direction`.
///
/// Rows keep the storage order of `lists`. The first visited position is the
/// outermost loop: with [`Direction::Forward`] position 0 varies slowest,
/// with [`Direction::Reverse`] the last position does. No row is ever
/// deduplicated. An empty `lists` yields one empty row; an empty inner list
/// yields nothing.
pub fn expand_alternatives<T: Clone>(lists: &[&[T]], direction: Direction) -> Vec<Vec<T>> {
    let order: Vec<usize> = match direction {
        Direction::Forward => (0..lists.len()).collect(),
        Direction::Reverse => (0..lists.len()).rev().collect(),
    };

    let mut rows = Vec::with_capacity(lists.iter().map(|l| l.len()).product());
    let mut slots: Vec<Option<T>> = vec![None; lists.len()];
    populate(lists, &order, 0, &mut slots, &mut rows);
    rows
}

fn populate<T: Clone>(
    lists: &[&[T]],
    order: &[usize],
    step: usize,
    slots: &mut [Option<T>],
    rows: &mut Vec<Vec<T>>,
) {
    let Some(&pos) = order.get(step) else {
        rows.push(slots.iter().flatten().cloned().collect());
        return;
    };
    for alt in lists[pos] {
        slots[pos] = Some(alt.clone());
        populate(lists, order, step + 1, slots, rows);
    }
}

/// Split an operand signature on commas, trimming each token.
pub fn split_signature(signature: &str) -> Vec<&str> {
    signature.split(',').map(str::trim).collect()
}

/// Renderings for every token of `signature`, in declaration order.
///
/// Fails on the first token without a rendering in `dialect`.
pub fn resolve(signature: &str, dialect: Dialect) -> Result<Vec<&'static [&'static str]>> {
    split_signature(signature)
        .into_iter()
        .map(|token| {
            operand::render(token, dialect).ok_or_else(|| GenError::UnresolvableOperand {
                token: token.to_string(),
                dialect,
            })
        })
        .collect()
}

/// Every concrete operand combination of `signature` in `dialect`.
///
/// Tokens are enumerated in declaration order in both dialects (the first
/// token varies slowest); GAS stores each row reversed so its operands come
/// out in AT&T order.
///
/// ```
/// use asmtc_gen::combination::expand;
/// use asmtc_isa::Dialect;
///
/// let nasm = expand("reg16?,imm", Dialect::Nasm).unwrap();
/// let text: Vec<_> = nasm.iter().map(|c| c.operand_text()).collect();
/// assert_eq!(text, ["ax, 0x10", "0x10"]);
///
/// let gas = expand("reg32,imm8", Dialect::Gas).unwrap();
/// assert_eq!(gas[0].operand_text(), "$0x55, %eax");
/// ```
pub fn expand(signature: &str, dialect: Dialect) -> Result<Vec<Combination>> {
    let mut lists = resolve(signature, dialect)?;
    let direction = dialect.direction();
    if direction == Direction::Reverse {
        lists.reverse();
    }

    let rows = expand_alternatives(&lists, direction);
    log::debug!(
        "{dialect}: {signature} -> {} combination(s)",
        rows.len()
    );
    Ok(rows
        .iter()
        .map(|row| Combination::from_row(row, dialect.suffix_position()))
        .collect())
}
