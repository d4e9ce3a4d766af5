//! Location of the WinDSP configuration document
//!
//! The document path is resolved once: the first successful `resolve()`
//! validates that the file exists and caches the absolute path for the rest
//! of the process. Failed attempts are not cached, so every call keeps
//! failing the same way until the process is restarted with a valid path.

use crate::error::{ConfigError, ConfigResult};
use log::info;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

/// File served when no override is given, relative to the working directory
pub const DEFAULT_FILE_NAME: &str = "WinDSP.json";

/// Startup parameter that overrides the document path
pub const OVERRIDE_PARAMETER: &str = "--conf";

/// Absolute path of the configuration document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    path: PathBuf,
}

impl ConfigLocation {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display(&self) -> std::path::Display<'_> {
        self.path.display()
    }
}

impl AsRef<Path> for ConfigLocation {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Resolves and caches the configuration document path
#[derive(Debug, Default)]
pub struct ConfigLocator {
    override_path: Option<PathBuf>,
    base_dir: Option<PathBuf>,
    resolved: OnceCell<ConfigLocation>,
}

impl ConfigLocator {
    /// Create a locator using `override_path` when given, `WinDSP.json` otherwise
    pub fn new(override_path: Option<PathBuf>) -> Self {
        Self {
            override_path,
            base_dir: None,
            resolved: OnceCell::new(),
        }
    }

    /// Resolve relative paths against `base_dir` instead of the working directory
    pub fn relative_to(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Return the document location, validating it on the first successful call.
    ///
    /// Concurrent first calls run the existence check exactly once and all
    /// observe the same cached value.
    pub fn resolve(&self) -> ConfigResult<&ConfigLocation> {
        self.resolved.get_or_try_init(|| self.locate())
    }

    /// Whether a location has been cached
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    fn candidate(&self) -> ConfigResult<PathBuf> {
        let raw = self
            .override_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
        if raw.is_absolute() {
            return Ok(raw);
        }

        let base = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|source| ConfigError::Io {
                path: raw.display().to_string(),
                source,
            })?,
        };
        Ok(base.join(raw))
    }

    fn locate(&self) -> ConfigResult<ConfigLocation> {
        let path = self.candidate()?;
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
                parameter: OVERRIDE_PARAMETER.to_string(),
            });
        }

        info!("Using config file: {}", path.display());
        Ok(ConfigLocation { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_resolve_default_file_in_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let expected = write_file(dir.path(), DEFAULT_FILE_NAME, "{}");

        let locator = ConfigLocator::new(None).relative_to(dir.path());
        let location = locator.resolve().unwrap();

        assert_eq!(location.path(), expected.as_path());
        assert!(location.path().is_absolute());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), DEFAULT_FILE_NAME, "{}");
        let locator = ConfigLocator::new(None).relative_to(dir.path());

        let first = locator.resolve().unwrap().clone();
        for _ in 0..5 {
            assert_eq!(locator.resolve().unwrap(), &first);
        }
    }

    #[test]
    fn test_resolve_does_not_recheck_after_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), DEFAULT_FILE_NAME, "{}");
        let locator = ConfigLocator::new(None).relative_to(dir.path());

        let first = locator.resolve().unwrap().clone();
        std::fs::remove_file(&path).unwrap();

        let second = locator.resolve().unwrap();
        assert_eq!(second, &first);
        assert!(!second.path().exists());
    }

    #[test]
    fn test_override_takes_precedence_over_default() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), DEFAULT_FILE_NAME, "{}");
        let custom = write_file(dir.path(), "living-room.json", "{}");

        let locator = ConfigLocator::new(Some(PathBuf::from("living-room.json")))
            .relative_to(dir.path());

        assert_eq!(locator.resolve().unwrap().path(), custom.as_path());
    }

    #[test]
    fn test_absolute_override_ignores_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let custom = write_file(other.path(), "dsp.json", "{}");

        let locator = ConfigLocator::new(Some(custom.clone())).relative_to(dir.path());

        assert_eq!(locator.resolve().unwrap().path(), custom.as_path());
    }

    #[test]
    fn test_missing_default_fails_with_path_and_parameter() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ConfigLocator::new(None).relative_to(dir.path());

        let err = locator.resolve().unwrap_err();
        match &err {
            ConfigError::FileNotFound { path, parameter } => {
                assert!(path.ends_with(DEFAULT_FILE_NAME));
                assert!(Path::new(path).is_absolute());
                assert_eq!(parameter, OVERRIDE_PARAMETER);
            }
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
        assert!(err.to_string().contains("--conf"));
        assert!(!locator.is_resolved());
    }

    #[test]
    fn test_failure_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let locator = ConfigLocator::new(None).relative_to(dir.path());

        assert!(locator.resolve().is_err());
        assert!(locator.resolve().is_err());

        write_file(dir.path(), DEFAULT_FILE_NAME, "{}");
        assert!(locator.resolve().is_ok());
        assert!(locator.is_resolved());
    }

    #[test]
    fn test_concurrent_first_resolve_yields_one_location() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), DEFAULT_FILE_NAME, "{}");
        let locator = Arc::new(ConfigLocator::new(None).relative_to(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locator = Arc::clone(&locator);
                std::thread::spawn(move || {
                    locator.resolve().unwrap() as *const ConfigLocation as usize
                })
            })
            .collect();

        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }
}
