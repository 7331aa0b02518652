use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::error::UpdateError;
use crate::scan::jar_pattern;

/// Delete jars of `version` that `keep` supersedes.
///
/// Only filenames matching the installed-jar pattern for this version line
/// are considered; jars of other version lines and everything else in the
/// directory are never touched.
///
/// A per-file removal failure is reported and skipped — a half-pruned
/// directory is still a correct install. Returns the number of jars removed.
pub fn prune_old_jars(dir: &Path, version: &str, keep: u32) -> Result<usize, UpdateError> {
    let re = jar_pattern(version);

    let rd = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(UpdateError::fs(dir, e)),
    };

    let mut removed = 0;
    for ent in rd.flatten() {
        let fname = ent.file_name();
        let Some(name) = fname.to_str() else { continue };
        let Some(caps) = re.captures(name) else { continue };
        let Ok(build) = caps[1].parse::<u32>() else { continue };
        if build >= keep {
            continue;
        }
        match fs::remove_file(ent.path()) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!("{} could not remove {}: {}", "!".yellow(), name, e),
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn removes_only_superseded_jars_of_the_version_line() {
        let td = tempdir().unwrap();
        touch(td.path(), "paper-1.20.4-8.jar");
        touch(td.path(), "paper-1.20.4-9.jar");
        touch(td.path(), "paper-1.20.4-10.jar");
        touch(td.path(), "paper-1.19.4-99.jar");
        touch(td.path(), "server.properties");

        let removed = prune_old_jars(td.path(), "1.20.4", 10).unwrap();

        assert_eq!(removed, 2);
        assert!(!td.path().join("paper-1.20.4-8.jar").exists());
        assert!(!td.path().join("paper-1.20.4-9.jar").exists());
        assert!(td.path().join("paper-1.20.4-10.jar").exists());
        assert!(td.path().join("paper-1.19.4-99.jar").exists());
        assert!(td.path().join("server.properties").exists());
    }

    #[test]
    fn missing_directory_prunes_nothing() {
        let td = tempdir().unwrap();
        let missing = td.path().join("no_such_dir");
        assert_eq!(prune_old_jars(&missing, "1.20.4", 10).unwrap(), 0);
    }
}
