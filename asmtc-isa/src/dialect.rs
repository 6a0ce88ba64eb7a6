use std::fmt;
use std::str::FromStr;

/// Assembler dialect a test source is written for.
///
/// The two dialects list operands in opposite orders: NASM writes the
/// destination first, GAS (AT&T syntax) writes it last.
///
/// ```
/// use asmtc_isa::Dialect;
///
/// let d: Dialect = "gas".parse().unwrap();
/// assert_eq!(d, Dialect::Gas);
/// assert_eq!(d.extension(), "s");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dialect {
    Nasm,
    Gas,
}

/// Order in which operand positions are visited while building combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// First position outermost, positions stored in declaration order.
    Forward,
    /// Last position outermost, positions stored in reverse declaration order.
    Reverse,
}

/// Which end of an operand list may carry the flag-state annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixPosition {
    First,
    Last,
}

const NASM_PROLOGUE: &str = "
        bits 64
        section .text
        global test_{name}

test_{name}:
        push rbp
        mov rbp,rsp
";

const NASM_EPILOGUE: &str = "
near1:
        nop
        pop rbp
        ret
";

const GAS_PROLOGUE: &str = "
        .text
        .globl  test_{name}

test_{name}:
        pushq   %rbp
        movq    %rsp, %rbp
";

const GAS_EPILOGUE: &str = "
near1:
        nop
        popq    %rbp
        ret
";

impl Dialect {
    /// Both dialects, in generation order.
    pub const ALL: [Dialect; 2] = [Dialect::Nasm, Dialect::Gas];

    /// Lowercase name, also used as the output directory and file tag.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Dialect::Nasm => "nasm",
            Dialect::Gas => "gas",
        }
    }

    /// Source file extension.
    #[inline]
    pub const fn extension(self) -> &'static str {
        match self {
            Dialect::Nasm => "asm",
            Dialect::Gas => "s",
        }
    }

    #[inline]
    pub const fn direction(self) -> Direction {
        match self {
            Dialect::Nasm => Direction::Forward,
            Dialect::Gas => Direction::Reverse,
        }
    }

    /// The flag-state annotation belongs to the first declared operand, which
    /// GAS prints last.
    #[inline]
    pub const fn suffix_position(self) -> SuffixPosition {
        match self {
            Dialect::Nasm => SuffixPosition::First,
            Dialect::Gas => SuffixPosition::Last,
        }
    }

    /// Function prologue declaring `test_<name>`.
    pub fn prologue(self, name: &str) -> String {
        let template = match self {
            Dialect::Nasm => NASM_PROLOGUE,
            Dialect::Gas => GAS_PROLOGUE,
        };
        template.replace("{name}", name)
    }

    /// Function epilogue. Defines the `near1` label that near/short branch
    /// operands refer to.
    pub const fn epilogue(self) -> &'static str {
        match self {
            Dialect::Nasm => NASM_EPILOGUE,
            Dialect::Gas => GAS_EPILOGUE,
        }
    }

    pub const fn as_set(self) -> DialectSet {
        match self {
            Dialect::Nasm => DialectSet::NASM,
            Dialect::Gas => DialectSet::GAS,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error from parsing a [`Dialect`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect {0:?} (expected \"nasm\" or \"gas\")")]
pub struct ParseDialectError(pub String);

impl FromStr for Dialect {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nasm" | "intel" => Ok(Dialect::Nasm),
            "gas" | "att" => Ok(Dialect::Gas),
            _ => Err(ParseDialectError(s.to_string())),
        }
    }
}

bitflags::bitflags! {
    /// A selection of dialects to generate.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DialectSet: u8 {
        const NASM = 1 << 0;
        const GAS = 1 << 1;
    }
}

impl DialectSet {
    /// Selected dialects in generation order.
    pub fn dialects(self) -> impl Iterator<Item = Dialect> {
        Dialect::ALL
            .into_iter()
            .filter(move |d| self.contains(d.as_set()))
    }
}

impl FromIterator<Dialect> for DialectSet {
    fn from_iter<I: IntoIterator<Item = Dialect>>(iter: I) -> Self {
        iter.into_iter()
            .fold(DialectSet::empty(), |set, d| set | d.as_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names_and_aliases() {
        assert_eq!("nasm".parse::<Dialect>().unwrap(), Dialect::Nasm);
        assert_eq!("GAS".parse::<Dialect>().unwrap(), Dialect::Gas);
        assert_eq!("att".parse::<Dialect>().unwrap(), Dialect::Gas);
        assert!("masm".parse::<Dialect>().is_err());
    }

    #[test]
    fn display_matches_name() {
        for d in Dialect::ALL {
            assert_eq!(d.to_string(), d.name());
        }
    }

    #[test]
    fn dialects_are_mirrored() {
        assert_eq!(Dialect::Nasm.direction(), Direction::Forward);
        assert_eq!(Dialect::Gas.direction(), Direction::Reverse);
        assert_eq!(Dialect::Nasm.suffix_position(), SuffixPosition::First);
        assert_eq!(Dialect::Gas.suffix_position(), SuffixPosition::Last);
    }

    #[test]
    fn prologue_names_function() {
        let nasm = Dialect::Nasm.prologue("ADD");
        assert!(nasm.contains("global test_ADD\n"));
        assert!(nasm.contains("\ntest_ADD:\n"));
        let gas = Dialect::Gas.prologue("ADD");
        assert!(gas.contains(".globl  test_ADD\n"));
        assert!(gas.contains("movq    %rsp, %rbp"));
    }

    #[test]
    fn epilogue_defines_branch_label() {
        for d in Dialect::ALL {
            assert!(d.epilogue().contains("\nnear1:\n"));
            assert!(d.epilogue().ends_with("ret\n"));
        }
    }

    #[test]
    fn dialect_set_iterates_in_order() {
        let all: Vec<_> = DialectSet::all().dialects().collect();
        assert_eq!(all, vec![Dialect::Nasm, Dialect::Gas]);
        let gas: DialectSet = [Dialect::Gas].into_iter().collect();
        assert_eq!(gas.dialects().collect::<Vec<_>>(), vec![Dialect::Gas]);
        assert_eq!(DialectSet::empty().dialects().count(), 0);
    }
}
