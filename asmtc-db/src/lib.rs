//! Reader for line-oriented instruction pattern databases such as NASM's
//! `insns.xda`.
//!
//! Each non-blank line holds a mnemonic, a comma-separated operand
//! signature and optional trailing fields. `;` starts a comment.

pub mod error;
pub mod record;

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub use error::{DbError, Result};
pub use record::{InstructionRecord, MNEMONIC_COLUMN, OPERANDS_COLUMN};

/// A parsed instruction database. Records keep database order.
#[derive(Debug, Clone, Default)]
pub struct Database {
    records: Vec<InstructionRecord>,
}

impl Database {
    /// Parse database text.
    ///
    /// A non-blank line without an operand field is rejected with
    /// [`DbError::MalformedLine`]; nothing is returned for a database that
    /// contains one.
    pub fn parse(text: &str) -> Result<Self> {
        let mut records = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            if let Some(rec) = InstructionRecord::parse(i + 1, raw)? {
                records.push(rec);
            }
        }
        log::debug!("parsed {} instruction records", records.len());
        Ok(Self { records })
    }

    /// Open and parse a database file.
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|e| DbError::Io(format!("{}: {e}", path.display())))?;
        let text =
            String::from_utf8(data).map_err(|e| DbError::NotUtf8(e.utf8_error().valid_up_to()))?;
        Self::parse(&text)
    }

    /// All records in database order.
    pub fn records(&self) -> &[InstructionRecord] {
        &self.records
    }

    /// Records whose mnemonic is exactly `mnemonic`, in database order.
    pub fn records_for<'a>(
        &'a self,
        mnemonic: &'a str,
    ) -> impl Iterator<Item = &'a InstructionRecord> + 'a {
        self.records.iter().filter(move |r| r.mnemonic == mnemonic)
    }

    /// Distinct values of whitespace-separated field `column`
    /// (0 = mnemonic, 1 = operand signature).
    ///
    /// Fails with [`DbError::MalformedLine`] if some record has fewer than
    /// `column + 1` fields.
    pub fn distinct_values(&self, column: usize) -> Result<BTreeSet<String>> {
        let mut values = BTreeSet::new();
        for rec in &self.records {
            let value = match column {
                MNEMONIC_COLUMN => Some(rec.mnemonic.as_str()),
                OPERANDS_COLUMN => Some(rec.operands.as_str()),
                _ => rec.field(column),
            };
            let Some(value) = value else {
                return Err(DbError::MalformedLine {
                    line_no: rec.line_no,
                    expected: column + 1,
                    line: rec.line.trim().to_string(),
                });
            };
            values.insert(value.to_string());
        }
        Ok(values)
    }

    /// Distinct mnemonics, sorted.
    pub fn mnemonics(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.mnemonic.as_str()).collect()
    }

    /// Distinct operand signatures, sorted.
    pub fn operand_signatures(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.operands.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
