use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base claritygen config directory (universal ~/.config/claritygen/ on all platforms)
pub fn claritygen() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("claritygen"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("claritygen"))
    }
}

/// User settings file that overrides the embedded defaults
pub fn appsettings_json() -> Result<PathBuf> {
    Ok(claritygen()?.join("appsettings.json"))
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::full(raw).map(|s| s.into_owned()).unwrap_or_else(|_| raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appsettings_lives_under_config_dir() {
        let base = claritygen().unwrap();
        assert_eq!(appsettings_json().unwrap(), base.join("appsettings.json"));
    }

    #[test]
    fn expand_leaves_plain_paths_alone() {
        assert_eq!(expand("/tmp/out"), PathBuf::from("/tmp/out"));
    }
}
