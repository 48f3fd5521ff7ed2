//! Reading and overwriting the file being polished.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Read the whole target file as UTF-8.
pub fn read_source(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "read target file");
    Ok(text)
}

/// Overwrite the target file with `code`.
///
/// No backup is kept; the previous contents are lost.
pub fn write_source(path: &Path, code: &str) -> Result<()> {
    fs::write(path, code).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), bytes = code.len(), "wrote target file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_code_reads_back_byte_for_byte() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("main.js");
        fs::write(&path, "var a = 1;\n").expect("seed");

        let code = "const a = 1;\r\nconsole.log(a);\n\u{1F600}";
        write_source(&path, code).expect("write");
        assert_eq!(read_source(&path).expect("read"), code);
    }

    #[test]
    fn missing_file_error_names_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("missing.py");
        let err = read_source(&path).expect_err("missing");
        assert!(format!("{err:#}").contains("missing.py"));
    }

    #[test]
    fn non_utf8_file_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("blob.bin");
        fs::write(&path, [0xff, 0xfe, 0x00]).expect("seed");
        assert!(read_source(&path).is_err());
    }
}
