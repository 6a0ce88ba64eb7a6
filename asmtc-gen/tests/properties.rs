//! Properties of the combination generator and materialiser, checked
//! against the compiled operand catalog.

use asmtc_gen::combination::{self, split_signature};
use asmtc_gen::{GenError, materialize};
use asmtc_isa::{Dialect, FLAG_STATE_MARKER, filter, mnemonic, operand};

/// Signatures covering registers, memory, optional, masked and flag-state
/// tokens.
const SIGNATURES: &[&str] = &[
    "reg32,imm8",
    "rm32,reg32",
    "reg16?,imm",
    "xmmreg|mask|z,xmmreg*,xmmrm128|b32",
    "zmmreg|mask|z,zmmreg*,zmmrm512|b64*",
    "spec4,rm64,imm8",
    "kreg16*,krm16",
    "reg_sreg,rm16",
    "void",
    "mem,reg64",
];

fn product(signature: &str, dialect: Dialect) -> usize {
    split_signature(signature)
        .iter()
        .map(|t| operand::render(t, dialect).unwrap().len())
        .product()
}

#[test]
fn combination_count_is_product_of_alternatives() {
    for sig in SIGNATURES {
        for d in Dialect::ALL {
            let combos = combination::expand(sig, d).unwrap();
            assert_eq!(combos.len(), product(sig, d), "{d}: {sig}");
        }
    }
}

#[test]
fn dialects_produce_the_same_number_of_combinations() {
    for sig in SIGNATURES {
        let nasm = combination::expand(sig, Dialect::Nasm).unwrap();
        let gas = combination::expand(sig, Dialect::Gas).unwrap();
        assert_eq!(nasm.len(), gas.len(), "{sig}");
    }
}

#[test]
fn gas_rows_mirror_nasm_rows() {
    // Both dialects enumerate in the same order: row i picks the same
    // alternative index for every token, and GAS writes the tokens reversed.
    for sig in ["xmmreg|mask|z,xmmreg,xmmrm128|b32", "reg_sreg,rm16", "mem32,reg32,rm32"] {
        let tokens = split_signature(sig);
        let nasm = combination::expand(sig, Dialect::Nasm).unwrap();
        let gas = combination::expand(sig, Dialect::Gas).unwrap();
        assert_eq!(nasm.len(), gas.len(), "{sig}");

        for (n, g) in nasm.iter().zip(&gas) {
            let expected: Vec<&str> = tokens
                .iter()
                .zip(&n.operands)
                .map(|(token, text)| {
                    let alts = operand::render(token, Dialect::Nasm).unwrap();
                    let index = alts.iter().position(|a| a == text).unwrap();
                    operand::render(token, Dialect::Gas).unwrap()[index]
                })
                .rev()
                .collect();
            assert_eq!(g.operands, expected, "{sig}: {n:?}");
        }
    }
}

#[test]
fn generation_is_deterministic() {
    for sig in SIGNATURES {
        for d in Dialect::ALL {
            assert_eq!(
                combination::expand(sig, d).unwrap(),
                combination::expand(sig, d).unwrap()
            );
        }
    }
}

#[test]
fn omitted_operands_never_reach_the_text() {
    for sig in SIGNATURES {
        for d in Dialect::ALL {
            for c in combination::expand(sig, d).unwrap() {
                assert!(c.operands.iter().all(|o| !o.is_empty()), "{d}: {sig}: {c:?}");
                assert!(!c.operand_text().contains(", ,"));
            }
        }
    }
}

#[test]
fn optional_register_example() {
    let combos = combination::expand("reg16?,imm", Dialect::Nasm).unwrap();
    let text: Vec<_> = combos.iter().map(|c| c.operand_text()).collect();
    assert_eq!(text, vec!["ax, 0x10", "0x10"]);
}

#[test]
fn flag_state_is_lifted_exactly_once() {
    for d in Dialect::ALL {
        let before = product("spec4,rm64,imm8", d);
        let lines = materialize("CCMPscc", "spec4,rm64,imm8", "CCMPscc spec4,rm64,imm8 [evex.scc]", d)
            .unwrap();
        let members = mnemonic::family("CCMPscc").unwrap().len();
        assert_eq!(lines.len(), members * before);
        for line in &lines {
            assert_eq!(line.matches(FLAG_STATE_MARKER).count(), 1, "{line}");
            let mut words = line.split_whitespace();
            let _mnemonic = words.next().unwrap();
            assert!(words.next().unwrap().starts_with(FLAG_STATE_MARKER), "{line}");
        }
        for c in combination::expand("spec4,rm64,imm8", d).unwrap() {
            assert!(c.suffix.is_some());
            assert_eq!(c.operands.len(), 2);
        }
    }
}

#[test]
fn family_fan_out_is_members_times_combinations() {
    for d in Dialect::ALL {
        for (template, sig) in [("CMOVcc", "reg64,rm64"), ("SETcc", "rm8"), ("CMPccXADD", "mem32,reg32,reg32")] {
            let members = mnemonic::family(template).unwrap().len();
            let combos = combination::expand(sig, d).unwrap().len();
            let lines = materialize(template, sig, template, d).unwrap();
            assert_eq!(lines.len(), members * combos, "{d}: {template} {sig}");
        }
    }
}

#[test]
fn denied_mnemonics_never_appear_in_instructions() {
    for template in mnemonic::templates() {
        for d in Dialect::ALL {
            let lines = materialize(template, "imm8|short", template, d).unwrap();
            for line in lines {
                let name = line.split_whitespace().find(|w| !w.starts_with('{')).unwrap();
                assert!(filter::is_eligible(name), "{template} produced {line}");
            }
        }
    }
}

#[test]
fn unresolvable_operand_is_reported_per_dialect() {
    let err = combination::expand("reg32,ignore,imm8", Dialect::Gas).unwrap_err();
    assert!(
        matches!(&err, GenError::UnresolvableOperand { token, dialect: Dialect::Gas } if token == "ignore"),
        "{err}"
    );
}

#[test]
fn whitespace_around_tokens_is_ignored() {
    let spaced = combination::expand("reg32 , imm8", Dialect::Nasm).unwrap();
    let tight = combination::expand("reg32,imm8", Dialect::Nasm).unwrap();
    assert_eq!(spaced, tight);
}
