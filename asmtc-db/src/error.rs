use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Database is not valid UTF-8 (at byte {0:#x})")]
    NotUtf8(usize),

    #[error("Line {line_no}: expected at least {expected} fields in {line:?}")]
    MalformedLine {
        line_no: usize,
        expected: usize,
        line: String,
    },
}

pub type Result<T> = std::result::Result<T, DbError>;
