//! Optional settings file.
//!
//! `.relcheck.yml` in the working directory can pin the interpreter and
//! preset the optional steps. A missing file means defaults; a present but
//! unreadable or invalid file is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name looked up in the working directory.
pub const SETTINGS_FILE: &str = ".relcheck.yml";

/// Persistent configuration for the task sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Explicit interpreter path; takes precedence over env resolution.
    pub python: Option<PathBuf>,
    /// Run the test suite step.
    pub tests: bool,
    /// Run the lint step (still gated on `COVERAGE=true`).
    pub lint: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            python: None,
            tests: true,
            lint: true,
        }
    }
}

/// Parse settings from YAML text.
pub fn parse(content: &str) -> Result<Settings, String> {
    serde_yaml::from_str(content).map_err(|e| format!("invalid settings: {}", e))
}

/// Load settings from `path`, falling back to defaults when the file does
/// not exist.
pub fn load(path: &Path) -> Result<Settings, String> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    parse(&content).map_err(|e| format!("{}: {}", path.display(), e))
}
