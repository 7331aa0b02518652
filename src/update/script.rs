use regex::{NoExpand, Regex};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::UpdateError;

/// Any `paper-*.jar` reference counts, regardless of version line: the tool
/// assumes one start script per server directory, referencing one jar family.
fn jar_reference() -> Regex {
    Regex::new(r"paper-(.+)\.jar").unwrap()
}

/// Point the start script at `jar_name`.
///
/// Reads the script, replaces every jar reference, and writes the result back
/// through a sibling temp file, so an interrupted write never leaves a
/// half-written script. The script's permissions (notably the exec bit) are
/// carried over.
///
/// # Errors
/// - [`UpdateError::ScriptNotFound`] if the script does not exist; the caller
///   decides whether that is fatal.
/// - [`UpdateError::Filesystem`] on read/write/rename failure.
pub fn repoint_script(path: &Path, jar_name: &str) -> Result<(), UpdateError> {
    if !path.is_file() {
        return Err(UpdateError::ScriptNotFound { path: path.to_path_buf() });
    }
    let text = fs::read_to_string(path).map_err(|e| UpdateError::fs(path, e))?;
    let updated = jar_reference().replace_all(&text, NoExpand(jar_name));
    write_atomic(path, updated.as_bytes())
}

/// Write `bytes` to `path` via temp-file-and-rename in the same directory.
/// When `path` already exists its permissions are preserved.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), UpdateError> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".paperup-")
        .tempfile_in(dir)
        .map_err(|e| UpdateError::fs(dir, e))?;
    tmp.write_all(bytes).map_err(|e| UpdateError::fs(path, e))?;
    if let Ok(meta) = fs::metadata(path) {
        let _ = fs::set_permissions(tmp.path(), meta.permissions());
    }
    tmp.persist(path).map_err(|e| UpdateError::fs(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn repoints_every_jar_reference() {
        let td = tempdir().unwrap();
        let script = td.path().join("start.sh");
        fs::write(
            &script,
            "#!/bin/sh\njava -Xmx4G -jar paper-1.19.4-7.jar nogui\necho paper-1.20.4-10.jar\n",
        )
        .unwrap();

        repoint_script(&script, "paper-1.20.4-50.jar").unwrap();

        let got = fs::read_to_string(&script).unwrap();
        assert_eq!(
            got,
            "#!/bin/sh\njava -Xmx4G -jar paper-1.20.4-50.jar nogui\necho paper-1.20.4-50.jar\n"
        );
    }

    #[test]
    fn missing_script_reports_script_not_found() {
        let td = tempdir().unwrap();
        let script = td.path().join("start.sh");

        let err = repoint_script(&script, "paper-1.20.4-50.jar").unwrap_err();
        assert!(matches!(err, UpdateError::ScriptNotFound { .. }));
        assert!(!script.exists());
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_keeps_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let td = tempdir().unwrap();
        let script = td.path().join("start.sh");
        fs::write(&script, "java -jar paper-1.20.4-10.jar nogui\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        repoint_script(&script, "paper-1.20.4-50.jar").unwrap();

        let mode = fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
