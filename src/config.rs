use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Name of the optional per-server configuration file.
pub const CONFIG_NAME: &str = "paperup.toml";

/// Per-server configuration loaded from `paperup.toml` inside the server
/// directory.
///
/// Both keys are optional; command-line flags always win over the file.
///
/// Example TOML:
/// ```toml
/// minecraft-version = "1.20.4"
/// start-script-name = "start.sh"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub minecraft_version: Option<String>,
    #[serde(default)]
    pub start_script_name: Option<String>,
}

/// Load `paperup.toml` from the server directory, if present.
///
/// # Errors
/// - Returns an error if the file exists but cannot be read.
/// - Returns an error if parsing the TOML fails.
///
/// # Notes
/// - A missing file is not an error; the tool runs on flags alone.
pub fn load_config(server_dir: &Path) -> Result<Option<Config>> {
    let path = server_dir.join(CONFIG_NAME);
    let txt = match fs::read_to_string(&path) {
        Ok(txt) => txt,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).context(format!("failed to read {}", path.display())),
    };
    let cfg: Config =
        toml::from_str(&txt).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_config_is_not_an_error() {
        let td = tempdir().unwrap();
        assert!(load_config(td.path()).unwrap().is_none());
    }

    #[test]
    fn loads_pinned_values() {
        let td = tempdir().unwrap();
        fs::write(
            td.path().join(CONFIG_NAME),
            "minecraft-version = \"1.20.4\"\nstart-script-name = \"start.sh\"\n",
        )
        .unwrap();

        let cfg = load_config(td.path()).unwrap().unwrap();
        assert_eq!(cfg.minecraft_version.as_deref(), Some("1.20.4"));
        assert_eq!(cfg.start_script_name.as_deref(), Some("start.sh"));
    }

    #[test]
    fn rejects_malformed_config() {
        let td = tempdir().unwrap();
        fs::write(td.path().join(CONFIG_NAME), "minecraft-version = [1").unwrap();

        assert!(load_config(td.path()).is_err());
    }
}
