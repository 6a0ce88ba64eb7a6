//! Exhaustive assembler test-case generation.
//!
//! For every eligible mnemonic of an instruction database, each operand
//! signature is expanded into all concrete operand combinations, condition
//! code templates are expanded into their families, and every resulting
//! instruction is written as a standalone NASM or GAS source file.

pub mod combination;
pub mod emitter;
pub mod error;
pub mod materialize;
pub mod report;

pub use combination::{Combination, expand_alternatives};
pub use error::{GenError, Result};
pub use materialize::materialize;
pub use report::{DialectReport, GenerationReport};

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use asmtc_db::Database;
use asmtc_isa::{Dialect, DialectSet, filter, mnemonic};

/// Default output root, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "target_src";

/// What to generate and where.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub output_dir: PathBuf,
    pub dialects: DialectSet,
    /// Restrict generation to these database mnemonics.
    pub only: Option<BTreeSet<String>>,
    /// Materialise everything but write no files.
    pub dry_run: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            dialects: DialectSet::all(),
            only: None,
            dry_run: false,
        }
    }
}

/// Drives database → filter → materialiser → emitter.
pub struct Generator<'a> {
    db: &'a Database,
    options: GeneratorOptions,
}

impl<'a> Generator<'a> {
    pub fn new(db: &'a Database, options: GeneratorOptions) -> Self {
        Self { db, options }
    }

    /// Mnemonics to generate, sorted. Denied mnemonics and denied family
    /// members are recorded in `report`.
    pub fn select_mnemonics(&self, report: &mut GenerationReport) -> Vec<&'a str> {
        let all = self.db.mnemonics();
        report.mnemonics = all.len();

        if let Some(only) = &self.options.only {
            report.unknown_selection = only
                .iter()
                .filter(|m| !all.contains(m.as_str()))
                .cloned()
                .collect();
        }

        let mut selected = Vec::new();
        for m in all {
            if let Some(only) = &self.options.only {
                if !only.contains(m) {
                    continue;
                }
            }
            if let Some(reason) = filter::reason(m) {
                log::info!("Skipping {reason} opcode '{m}'");
                report.record_filtered(m, reason);
                continue;
            }
            if let Some(members) = mnemonic::family(m) {
                let denied: Vec<String> = members
                    .iter()
                    .filter(|member| !filter::is_eligible(member))
                    .map(|member| member.to_string())
                    .collect();
                if !denied.is_empty() {
                    log::info!("Leaving out {} from '{m}'", denied.join(", "));
                    report.filtered_members.insert(m.to_string(), denied);
                }
            }
            selected.push(m);
        }
        report.eligible = selected.len();
        selected
    }

    /// All instruction lines for `mnemonic` in `dialect`, in database order.
    ///
    /// Lines with an unrenderable operand are skipped and counted in `stats`.
    pub fn instructions(
        &self,
        mnemonic: &str,
        dialect: Dialect,
        stats: &mut DialectReport,
    ) -> Result<Vec<String>> {
        let mut out = Vec::new();
        for rec in self.db.records_for(mnemonic) {
            stats.lines += 1;
            match materialize(&rec.mnemonic, &rec.operands, &rec.line, dialect) {
                Ok(lines) => {
                    log::debug!(
                        "{dialect}: line {}: {} {} -> {} instruction(s)",
                        rec.line_no,
                        rec.mnemonic,
                        rec.operands,
                        lines.len()
                    );
                    out.extend(lines);
                }
                Err(GenError::UnresolvableOperand { token, .. }) => {
                    log::warn!(
                        "No {dialect} mapping for operand '{token}' in opcode '{mnemonic}'; skipping line {}",
                        rec.line_no
                    );
                    stats.record_unresolved(&token);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    /// Generate every selected dialect. Stops at the first I/O failure.
    ///
    /// Fails before writing anything if two selected mnemonics share a file
    /// stem.
    pub fn run(&self) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();
        let mnemonics = self.select_mnemonics(&mut report);
        check_file_stems(&mnemonics)?;
        log::info!(
            "Found {} opcodes ({} eligible) and {} operand signatures",
            report.mnemonics,
            report.eligible,
            self.db.operand_signatures().len()
        );

        let root = &self.options.output_dir;
        for dialect in self.options.dialects.dialects() {
            if !self.options.dry_run {
                emitter::prepare_dialect_dir(root, dialect)?;
            }

            let mut stats = DialectReport::default();
            for m in &mnemonics {
                let insns = self.instructions(m, dialect, &mut stats)?;
                log::info!("Generating {dialect} tests for '{m}': {} instruction(s)", insns.len());
                stats.instructions += insns.len();
                if self.options.dry_run {
                    continue;
                }
                for (index, insn) in insns.iter().enumerate() {
                    emitter::write_test_file(root, m, index, insn, dialect)?;
                    stats.files += 1;
                }
            }
            *report.dialect_mut(dialect) = stats;
        }
        Ok(report)
    }
}

/// Every mnemonic must own its file names.
fn check_file_stems(mnemonics: &[&str]) -> Result<()> {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    for &m in mnemonics {
        let stem = emitter::file_stem(m);
        if let Some(first) = seen.insert(stem.clone(), m) {
            return Err(GenError::FileNameClash {
                stem,
                first: first.to_string(),
                second: m.to_string(),
            });
        }
    }
    Ok(())
}
