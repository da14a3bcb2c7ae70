use std::fs;
use std::path::{Path, PathBuf};

use globset::Glob;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::history::DEFAULT_HISTORY_CAPACITY;
use crate::core::session::SessionOptions;
use crate::error::{QuickFindError, Result};

pub const CONFIG_FILE_NAME: &str = ".quickfind.yaml";
pub const DEFAULT_STATE_FILE: &str = ".quickfind/session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory whose files become candidates.
    pub root: PathBuf,
    /// When non-empty, only paths matching one of these globs are kept.
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub hide_hidden: bool,
    pub follow_links: bool,
    pub history_capacity: usize,
    pub max_results: Option<usize>,
    pub max_visible: usize,
    pub workers: usize,
    /// Relative paths resolve against `root`.
    pub state_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            include: Vec::new(),
            exclude: vec![
                "**/.git/**".to_string(),
                "**/target/**".to_string(),
                "**/.quickfind/**".to_string(),
                format!("**/{CONFIG_FILE_NAME}"),
            ],
            hide_hidden: true,
            follow_links: false,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_results: Some(500),
            max_visible: 12,
            workers: 1,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

impl Config {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&raw)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Loads `path` when given, else `<root>/.quickfind.yaml` when present,
    /// else the defaults.
    pub fn discover(path: Option<&Path>, root: &Path) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            let mut config = Self::load(&candidate)?;
            if config.root.is_relative() {
                config.root = root.join(&config.root);
            }
            return Ok(config);
        }
        Ok(Self {
            root: root.to_path_buf(),
            ..Self::default()
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(QuickFindError::InvalidConfig(
                "history_capacity must be > 0".to_string(),
            ));
        }
        if self.max_visible == 0 {
            return Err(QuickFindError::InvalidConfig(
                "max_visible must be > 0".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(QuickFindError::InvalidConfig(
                "workers must be > 0".to_string(),
            ));
        }
        for pattern in self.include.iter().chain(self.exclude.iter()) {
            Glob::new(pattern)?;
        }
        Ok(())
    }

    pub fn state_path(&self) -> PathBuf {
        if self.state_file.is_absolute() {
            self.state_file.clone()
        } else {
            self.root.join(&self.state_file)
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            history_capacity: self.history_capacity,
            max_results: self.max_results,
            workers: self.workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{CONFIG_FILE_NAME, Config};

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config = Config::from_yaml_str("history_capacity: 10\nhide_hidden: false\n")
            .expect("config should parse");
        assert_eq!(config.history_capacity, 10);
        assert!(!config.hide_hidden);
        assert_eq!(config.max_visible, Config::default().max_visible);
    }

    #[test]
    fn default_excludes_cover_own_files() {
        let config = Config::default();
        assert!(config.exclude.iter().any(|glob| glob == "**/.quickfind/**"));
        assert!(config.exclude.iter().any(|glob| glob == "**/.quickfind.yaml"));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = Config::from_yaml_str("history_capacity: 0").expect_err("invalid");
        assert_eq!(err.code(), "INVALID_CONFIG");
    }

    #[test]
    fn bad_glob_is_rejected() {
        let err = Config::from_yaml_str("exclude: ['a[']").expect_err("invalid");
        assert_eq!(err.code(), "GLOB_ERROR");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_yaml_str("histroy_capacity: 3").expect_err("typo");
        assert_eq!(err.code(), "YAML_ERROR");
    }

    #[test]
    fn relative_state_file_resolves_under_root() {
        let config = Config {
            root: PathBuf::from("/work/project"),
            ..Config::default()
        };
        assert_eq!(
            config.state_path(),
            Path::new("/work/project/.quickfind/session.json")
        );
    }

    #[test]
    fn discover_reads_config_in_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "max_visible: 4\n").expect("write");
        let config = Config::discover(None, dir.path()).expect("discover");
        assert_eq!(config.max_visible, 4);
        assert_eq!(config.root, dir.path().join("."));
    }

    #[test]
    fn discover_without_file_uses_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::discover(None, dir.path()).expect("discover");
        assert_eq!(config.root, dir.path());
    }
}
