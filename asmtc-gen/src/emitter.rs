use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use asmtc_isa::Dialect;

use crate::error::{GenError, Result};

/// Indentation of instructions inside the generated function.
const INDENT: &str = "        ";

/// Complete source text of one test: prologue, the instruction, epilogue.
pub fn render_test_file(mnemonic: &str, instruction: &str, dialect: Dialect) -> String {
    let mut out = dialect.prologue(mnemonic);
    let _ = writeln!(out, "{INDENT}{instruction}");
    out.push_str(dialect.epilogue());
    out
}

/// Directory holding all tests for `dialect` under `root`.
pub fn dialect_dir(root: &Path, dialect: Dialect) -> PathBuf {
    root.join(dialect.name())
}

/// `<root>/<dialect>/test_<mnemonic>_<index>_<dialect>.<ext>`
pub fn test_file_path(root: &Path, mnemonic: &str, index: usize, dialect: Dialect) -> PathBuf {
    dialect_dir(root, dialect).join(format!(
        "test_{}_{index}_{}.{}",
        file_stem(mnemonic),
        dialect.name(),
        dialect.extension()
    ))
}

/// Create the output directory for `dialect`.
pub fn prepare_dialect_dir(root: &Path, dialect: Dialect) -> Result<PathBuf> {
    let dir = dialect_dir(root, dialect);
    fs::create_dir_all(&dir).map_err(|source| GenError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Write one test file and return its path. The dialect directory must exist.
pub fn write_test_file(
    root: &Path,
    mnemonic: &str,
    index: usize,
    instruction: &str,
    dialect: Dialect,
) -> Result<PathBuf> {
    let path = test_file_path(root, mnemonic, index, dialect);
    fs::write(&path, render_test_file(mnemonic, instruction, dialect)).map_err(|source| {
        GenError::Io {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}

/// The part of a test file name derived from `mnemonic`. Characters that
/// could escape the output directory are replaced, so distinct mnemonics may
/// share a stem.
pub fn file_stem(name: &str) -> String {
    name.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_")
        .replace("..", "_")
}
