use std::collections::BTreeMap;
use std::fmt;

use asmtc_isa::{Dialect, FilterReason};
use serde::Serialize;

use crate::error::{GenError, Result};

/// Per-dialect counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DialectReport {
    /// Database lines considered.
    pub lines: usize,
    /// Lines dropped because an operand token has no rendering.
    pub skipped_lines: usize,
    /// Unrenderable token -> number of lines it caused to be skipped.
    pub unresolved_tokens: BTreeMap<String, usize>,
    /// Instruction lines materialised.
    pub instructions: usize,
    /// Files written (zero in a dry run).
    pub files: usize,
}

/// Audit trail of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Distinct mnemonics in the database.
    pub mnemonics: usize,
    /// Mnemonics that passed the opcode filter and the selection.
    pub eligible: usize,
    /// Mnemonic -> denylist that excluded it.
    pub filtered: BTreeMap<String, String>,
    /// Template -> family members left out by the denylists.
    pub filtered_members: BTreeMap<String, Vec<String>>,
    /// Mnemonics given on the command line that are not in the database.
    pub unknown_selection: Vec<String>,
    pub dialects: BTreeMap<String, DialectReport>,
}

impl GenerationReport {
    pub(crate) fn record_filtered(&mut self, mnemonic: &str, reason: FilterReason) {
        self.filtered.insert(mnemonic.to_string(), reason.to_string());
    }

    /// Counters for `dialect`, created on first use.
    pub fn dialect_mut(&mut self, dialect: Dialect) -> &mut DialectReport {
        self.dialects.entry(dialect.name().to_string()).or_default()
    }

    pub fn dialect(&self, dialect: Dialect) -> Option<&DialectReport> {
        self.dialects.get(dialect.name())
    }

    /// YAML rendering of the report.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| GenError::Report(e.to_string()))
    }
}

impl DialectReport {
    pub(crate) fn record_unresolved(&mut self, token: &str) {
        self.skipped_lines += 1;
        *self.unresolved_tokens.entry(token.to_string()).or_default() += 1;
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mnemonics:        {}", self.mnemonics)?;
        writeln!(f, "Eligible:         {}", self.eligible)?;
        writeln!(f, "Filtered:         {}", self.filtered.len())?;
        for (template, members) in &self.filtered_members {
            writeln!(f, "  {template}: left out {}", members.join(", "))?;
        }
        for name in &self.unknown_selection {
            writeln!(f, "Not in database:  {name}")?;
        }
        for (dialect, r) in &self.dialects {
            writeln!(f, "[{dialect}]")?;
            writeln!(f, "  Lines:          {}", r.lines)?;
            writeln!(f, "  Skipped lines:  {}", r.skipped_lines)?;
            writeln!(f, "  Instructions:   {}", r.instructions)?;
            writeln!(f, "  Files:          {}", r.files)?;
            if !r.unresolved_tokens.is_empty() {
                let tokens: Vec<_> = r.unresolved_tokens.keys().map(String::as_str).collect();
                writeln!(f, "  Unresolved:     {}", tokens.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_tokens_are_counted_per_line() {
        let mut report = GenerationReport::default();
        let nasm = report.dialect_mut(Dialect::Nasm);
        nasm.record_unresolved("ignore");
        nasm.record_unresolved("ignore");
        nasm.record_unresolved("reg128");
        let nasm = report.dialect(Dialect::Nasm).unwrap();
        assert_eq!(nasm.skipped_lines, 3);
        assert_eq!(nasm.unresolved_tokens["ignore"], 2);
        assert!(report.dialect(Dialect::Gas).is_none());
    }

    #[test]
    fn yaml_lists_filtered_reason() {
        let mut report = GenerationReport::default();
        report.record_filtered("AAA", FilterReason::Non64Bit);
        report.dialect_mut(Dialect::Gas).files = 2;
        let yaml = report.to_yaml().unwrap();
        assert!(yaml.contains("AAA:"), "{yaml}");
        assert!(yaml.contains("non-64bit"), "{yaml}");
        assert!(yaml.contains("files: 2"), "{yaml}");
    }

    #[test]
    fn summary_mentions_each_dialect() {
        let mut report = GenerationReport::default();
        report.dialect_mut(Dialect::Nasm).instructions = 5;
        report.dialect_mut(Dialect::Gas).instructions = 5;
        let text = report.to_string();
        assert!(text.contains("[nasm]"));
        assert!(text.contains("[gas]"));
        assert!(text.contains("Instructions:   5"));
    }
}
