//! Settings-file discovery and the station name → URL mapping.
//!
//! Settings live in `radiorec/config.toml` under the platform config
//! directory, overridable with `--config`:
//!
//! ```toml
//! target_dir = "$HOME/recordings"
//!
//! [stations]
//! dlf = "http://st01.dlf.de/dlf/01/128/mp3/stream.mp3"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;

const APP_DIR: &str = "radiorec";
const SETTINGS_FILE: &str = "config.toml";

#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Directory recordings are written into; may contain environment
    /// variable references.
    pub target_dir: String,

    /// Station name → stream (or playlist) URL.
    #[serde(default)]
    pub stations: BTreeMap<String, String>,
}

impl Settings {
    /// Load settings from `path`, or from the default location under the
    /// platform config directory.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_path()?,
        };
        let raw = std::fs::read_to_string(&path).map_err(|e| AppError::Settings {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| AppError::Settings {
            path,
            reason: e.to_string(),
        })
    }

    pub fn station_url(&self, station: &str) -> Result<&str, AppError> {
        self.stations
            .get(station)
            .map(String::as_str)
            .ok_or_else(|| AppError::UnknownStation {
                station: station.to_owned(),
            })
    }

    /// Station names in stable sorted order.
    pub fn station_names(&self) -> impl Iterator<Item = &str> {
        self.stations.keys().map(String::as_str)
    }

    /// Target directory with environment variables expanded.
    pub fn target_dir(&self) -> PathBuf {
        PathBuf::from(expand_env_vars(&self.target_dir))
    }
}

fn default_path() -> Result<PathBuf, AppError> {
    let base = dirs::config_dir().ok_or_else(|| AppError::Settings {
        path: PathBuf::from(SETTINGS_FILE),
        reason: "no config directory on this platform".to_owned(),
    })?;
    Ok(base.join(APP_DIR).join(SETTINGS_FILE))
}

/// Expand `$VAR` and `${VAR}` references from the process environment.
/// Unset variables are left untouched.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut name = String::new();
        while let Some(&next) = chars.peek() {
            if next.is_ascii_alphanumeric() || next == '_' {
                name.push(next);
                chars.next();
            } else {
                break;
            }
        }
        if braced && chars.peek() == Some(&'}') {
            chars.next();
        }

        if name.is_empty() {
            result.push('$');
            continue;
        }
        match std::env::var(&name) {
            Ok(value) => result.push_str(&value),
            Err(_) => {
                result.push('$');
                if braced {
                    result.push('{');
                }
                result.push_str(&name);
                if braced {
                    result.push('}');
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(raw: &str) -> Settings {
        toml::from_str(raw).unwrap()
    }

    #[test]
    fn stations_are_listed_sorted() {
        let settings = parsed(
            "target_dir = \"/tmp\"\n[stations]\nzebra = \"http://z\"\nalpha = \"http://a\"\nmid = \"http://m\"\n",
        );
        let names: Vec<_> = settings.station_names().collect();
        assert_eq!(names, vec!["alpha", "mid", "zebra"]);
    }

    #[test]
    fn unknown_station_is_an_error() {
        let settings = parsed("target_dir = \"/tmp\"\n[stations]\ndlf = \"http://d\"\n");
        assert_eq!(settings.station_url("dlf").unwrap(), "http://d");
        assert!(matches!(
            settings.station_url("nope"),
            Err(AppError::UnknownStation { .. })
        ));
    }

    #[test]
    fn missing_stations_table_is_empty() {
        let settings = parsed("target_dir = \"/tmp\"\n");
        assert_eq!(settings.station_names().count(), 0);
    }

    #[test]
    fn env_vars_are_expanded_in_target_dir() {
        // Safety: test-local variable name, no concurrent reader cares.
        unsafe { std::env::set_var("RADIOREC_TEST_DIR", "/var/rec") };
        assert_eq!(expand_env_vars("$RADIOREC_TEST_DIR/out"), "/var/rec/out");
        assert_eq!(expand_env_vars("${RADIOREC_TEST_DIR}/out"), "/var/rec/out");
    }

    #[test]
    fn unset_env_vars_are_left_untouched() {
        assert_eq!(
            expand_env_vars("$RADIOREC_UNSET_VAR/out"),
            "$RADIOREC_UNSET_VAR/out"
        );
        assert_eq!(expand_env_vars("plain/path"), "plain/path");
        assert_eq!(expand_env_vars("100$"), "100$");
    }

    #[test]
    fn settings_file_is_loaded_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "target_dir = \"/tmp/rec\"\n[stations]\ndlf = \"http://d\"\n")
            .unwrap();
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.target_dir(), PathBuf::from("/tmp/rec"));
        assert_eq!(settings.station_url("dlf").unwrap(), "http://d");
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        let result = Settings::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(AppError::Settings { .. })));
    }
}
