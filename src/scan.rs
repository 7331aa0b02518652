use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::UpdateError;

/// Compile the installed-jar filename pattern for a version line.
///
/// The version line is matched literally (it may contain dots), and the build
/// suffix must be all digits, so `paper-1.20-backup.jar` or a hand-renamed
/// copy never counts as an install.
pub(crate) fn jar_pattern(version: &str) -> Regex {
    Regex::new(&format!(r"^paper-{}-(\d+)\.jar$", regex::escape(version))).unwrap()
}

/// Find the newest installed build for `version` in `dir`.
///
/// Scans the directory (non-recursive) for filenames matching
/// `paper-{version}-{build}.jar` and returns the highest build number, or
/// `None` when nothing matched. The filesystem is the store of truth; nothing
/// is cached between runs.
///
/// # Errors
/// A missing directory counts as "nothing installed". Any other listing
/// failure is returned as [`UpdateError::Filesystem`].
pub fn latest_installed(dir: &Path, version: &str) -> Result<Option<u32>, UpdateError> {
    let re = jar_pattern(version);

    let rd = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(UpdateError::fs(dir, e)),
    };

    let mut newest: Option<u32> = None;
    for ent in rd.flatten() {
        let fname = ent.file_name();
        let Some(name) = fname.to_str() else { continue };
        if let Some(caps) = re.captures(name)
            && let Ok(build) = caps[1].parse::<u32>()
        {
            newest = Some(newest.map_or(build, |b| b.max(build)));
        }
    }
    Ok(newest)
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
    fn picks_max_build_and_ignores_noise() {
        let td = tempdir().unwrap();
        touch(td.path(), "paper-1.20-12.jar");
        touch(td.path(), "paper-1.20-abc.jar");
        touch(td.path(), "random.txt");
        touch(td.path(), "paper-1.19-99.jar");

        assert_eq!(latest_installed(td.path(), "1.20").unwrap(), Some(12));
    }

    #[test]
    fn max_is_taken_not_last() {
        let td = tempdir().unwrap();
        touch(td.path(), "paper-1.20.4-3.jar");
        touch(td.path(), "paper-1.20.4-12.jar");
        touch(td.path(), "paper-1.20.4-7.jar");

        assert_eq!(latest_installed(td.path(), "1.20.4").unwrap(), Some(12));
    }

    #[test]
    fn empty_directory_has_no_install() {
        let td = tempdir().unwrap();
        assert_eq!(latest_installed(td.path(), "1.20").unwrap(), None);
    }

    #[test]
    fn missing_directory_has_no_install() {
        let td = tempdir().unwrap();
        let missing = td.path().join("no_such_dir");
        assert_eq!(latest_installed(&missing, "1.20").unwrap(), None);
    }

    #[test]
    fn version_line_is_matched_literally() {
        let td = tempdir().unwrap();
        touch(td.path(), "paper-1x20-5.jar");

        assert_eq!(latest_installed(td.path(), "1.20").unwrap(), None);
    }
}
