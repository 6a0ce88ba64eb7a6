use std::path::PathBuf;

use asmtc_db::DbError;
use asmtc_isa::Dialect;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    /// An operand token has no rendering in `dialect`. The containing
    /// database line is skipped for that dialect.
    #[error("no {dialect} rendering for operand {token:?}")]
    UnresolvableOperand { token: String, dialect: Dialect },

    /// Two mnemonics map to the same test file names.
    #[error("mnemonics {first:?} and {second:?} would both be written as test_{stem}_*")]
    FileNameClash {
        stem: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Report(String),
}

pub type Result<T> = std::result::Result<T, GenError>;
