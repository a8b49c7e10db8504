//! Reading and writing newline-delimited fiscal code lists.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::hashing;

/// Read a fiscal code list, one code per line, into a normalized set.
///
/// Lines are trimmed and uppercased; blank lines and duplicates disappear,
/// so the returned set holds only canonical, unique, non-empty codes.
pub fn read_fiscal_codes(path: &Path) -> Result<BTreeSet<String>> {
    let raw = fs::read_to_string(path)?;
    let codes: BTreeSet<String> = raw
        .lines()
        .map(hashing::canonicalize)
        .filter(|code| !code.is_empty())
        .collect();

    debug!(path = %path.display(), codes = codes.len(), "read fiscal code list");
    Ok(codes)
}

/// Write a fiscal code set, one code per line.
pub fn write_fiscal_codes(path: &Path, codes: &BTreeSet<String>) -> Result<()> {
    let mut file = fs::File::create(path)?;
    for code in codes {
        writeln!(file, "{code}")?;
    }

    debug!(path = %path.display(), codes = codes.len(), "wrote fiscal code list");
    Ok(())
}
