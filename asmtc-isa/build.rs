use std::collections::BTreeSet;
use std::env;
use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Deserialize)]
struct Tables {
    operands: Vec<OperandRow>,
    denylist: Denylist,
    families: Vec<FamilyRow>,
    prefixes: Vec<PrefixRow>,
}

#[derive(Deserialize)]
struct OperandRow {
    token: String,
    nasm: Option<Vec<String>>,
    gas: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct Denylist {
    non_64bit: Vec<String>,
    non_intel: Vec<String>,
}

#[derive(Deserialize)]
struct FamilyRow {
    template: String,
    members: Vec<String>,
}

#[derive(Deserialize)]
struct PrefixRow {
    mnemonic: String,
    prefix: String,
}

fn main() {
    let manifest = env::var("CARGO_MANIFEST_DIR").unwrap();
    let out_dir = env::var("OUT_DIR").unwrap();

    let tables_path = format!("{manifest}/tables/x86.yaml");
    println!("cargo:rerun-if-changed={tables_path}");

    let text = std::fs::read_to_string(&tables_path)
        .unwrap_or_else(|e| panic!("failed to read {tables_path}: {e}"));
    let mut tables: Tables = serde_yaml::from_str(&text)
        .unwrap_or_else(|e| panic!("failed to parse {tables_path}: {e}"));

    // Lookups binary-search these slices, so everything is emitted sorted.
    tables.operands.sort_by(|a, b| a.token.cmp(&b.token));
    tables.families.sort_by(|a, b| a.template.cmp(&b.template));
    tables.prefixes.sort_by(|a, b| a.mnemonic.cmp(&b.mnemonic));

    check_unique("operand token", tables.operands.iter().map(|o| &o.token));
    check_unique("family template", tables.families.iter().map(|f| &f.template));
    check_unique("prefix mnemonic", tables.prefixes.iter().map(|p| &p.mnemonic));
    check_unique("non_64bit entry", tables.denylist.non_64bit.iter());
    check_unique("non_intel entry", tables.denylist.non_intel.iter());
    for family in &tables.families {
        check_unique(&format!("{} member", family.template), family.members.iter());
        assert!(
            !family.members.is_empty(),
            "family {} has no members",
            family.template
        );
    }

    let mut out = String::new();
    out.push_str("// @generated by build.rs from tables/x86.yaml. Do not edit.\n\n");

    out.push_str("pub(crate) static OPERAND_TABLE: &[OperandEntry] = &[\n");
    for row in &tables.operands {
        writeln!(
            out,
            "    OperandEntry {{ token: {:?}, nasm: {}, gas: {} }},",
            row.token,
            renderings(&row.token, "nasm", row.nasm.as_deref()),
            renderings(&row.token, "gas", row.gas.as_deref()),
        )
        .unwrap();
    }
    out.push_str("];\n\n");

    emit_str_list(&mut out, "NON_64BIT_DENYLIST", &tables.denylist.non_64bit);
    emit_str_list(&mut out, "NON_INTEL_DENYLIST", &tables.denylist.non_intel);

    out.push_str("pub(crate) static FAMILY_TABLE: &[(&str, &[&str])] = &[\n");
    for family in &tables.families {
        writeln!(
            out,
            "    ({:?}, &{:?} as &[&str]),",
            family.template, family.members
        )
        .unwrap();
    }
    out.push_str("];\n\n");

    out.push_str("pub(crate) static PREFIX_TABLE: &[(&str, &str)] = &[\n");
    for rule in &tables.prefixes {
        assert!(
            !rule.prefix.trim().is_empty(),
            "empty prefix for {}",
            rule.mnemonic
        );
        writeln!(out, "    ({:?}, {:?}),", rule.mnemonic, rule.prefix.trim()).unwrap();
    }
    out.push_str("];\n");

    let out_path = PathBuf::from(&out_dir).join("generated.rs");
    std::fs::write(&out_path, out).expect("failed to write generated tables");
}

fn renderings(token: &str, dialect: &str, list: Option<&[String]>) -> String {
    match list {
        None => "None".to_string(),
        Some(list) => {
            assert!(
                !list.is_empty(),
                "operand {token:?} has an empty {dialect} list; use null for no rendering"
            );
            format!("Some(&{list:?} as &[&str])")
        }
    }
}

fn emit_str_list(out: &mut String, name: &str, entries: &[String]) {
    let mut sorted = entries.to_vec();
    sorted.sort();
    writeln!(out, "pub(crate) static {name}: &[&str] = &[").unwrap();
    for entry in &sorted {
        writeln!(out, "    {entry:?},").unwrap();
    }
    out.push_str("];\n\n");
}

fn check_unique<'a>(what: &str, items: impl Iterator<Item = &'a String>) {
    let mut seen = BTreeSet::new();
    for item in items {
        assert!(seen.insert(item), "duplicate {what}: {item:?}");
    }
}
