use crate::error::{DbError, Result};

/// Start of a comment; everything from here to the end of the line is dropped.
pub const COMMENT: char = ';';

/// Column holding the mnemonic.
pub const MNEMONIC_COLUMN: usize = 0;
/// Column holding the comma-separated operand signature.
pub const OPERANDS_COLUMN: usize = 1;

/// One instruction pattern from the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionRecord {
    /// 1-based line number in the database.
    pub line_no: usize,
    pub mnemonic: String,
    /// Operand signature, e.g. `reg32,rm32`.
    pub operands: String,
    /// The line with its comment removed. Trailing fields carry encoding
    /// markers such as `vex.` or `evex.`.
    pub line: String,
}

impl InstructionRecord {
    /// Parse one raw database line.
    ///
    /// Returns `Ok(None)` for blank and comment-only lines.
    pub fn parse(line_no: usize, raw: &str) -> Result<Option<Self>> {
        let line = strip_comment(raw);
        let mut fields = line.split_whitespace();

        let Some(mnemonic) = fields.next() else {
            return Ok(None);
        };
        let Some(operands) = fields.next() else {
            return Err(DbError::MalformedLine {
                line_no,
                expected: OPERANDS_COLUMN + 1,
                line: line.trim().to_string(),
            });
        };

        Ok(Some(Self {
            line_no,
            mnemonic: mnemonic.to_string(),
            operands: operands.to_string(),
            line: line.trim_end().to_string(),
        }))
    }

    /// Whitespace-separated field `column` of the line.
    pub fn field(&self, column: usize) -> Option<&str> {
        self.line.split_whitespace().nth(column)
    }
}

/// Drop everything from the first `;` onwards.
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT) {
        Some(pos) => &line[..pos],
        None => line,
    }
}
