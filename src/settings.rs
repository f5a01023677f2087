//! Tool settings shared by the `class2config` and `config2class` binaries.
//!
//! Settings are read from a TOML file (an explicit `--config FILE`, or
//! `class2config.toml` in the working directory when present):
//!
//! ```toml
//! search_paths = ["src", "plugins"]
//! default_module = "warp"
//! template = "defaults.ini"
//! ```
//!
//! Entries of `PYTHONPATH` are appended to the search paths after loading.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the working directory when no config is given
pub const DEFAULT_SETTINGS_FILE: &str = "class2config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Roots searched for Python modules, in order
    pub search_paths: Vec<PathBuf>,
    /// Module used for tokens that only name a class
    pub default_module: Option<String>,
    /// INI file whose sections seed every export
    pub template: Option<PathBuf>,
}

impl Settings {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Settings {
            message: format!("{}: {}", origin.display(), e),
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut settings = Self::from_toml_str(&text, path)?;

        // Relative paths in the file are relative to the file
        if let Some(base) = path.parent() {
            settings.search_paths = settings
                .search_paths
                .into_iter()
                .map(|p| if p.is_relative() { base.join(p) } else { p })
                .collect();
            settings.template = settings
                .template
                .map(|p| if p.is_relative() { base.join(p) } else { p });
        }

        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings from `explicit`, else from the default file if present, else defaults
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let mut settings = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_SETTINGS_FILE);
                if default.is_file() {
                    Self::load_from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        settings.extend_from_pythonpath(env::var_os("PYTHONPATH"));
        Ok(settings)
    }

    /// Append the entries of a `PYTHONPATH`-style value
    pub fn extend_from_pythonpath(&mut self, value: Option<std::ffi::OsString>) {
        let Some(value) = value else {
            return;
        };
        for path in env::split_paths(&value) {
            if path.as_os_str().is_empty() || self.search_paths.contains(&path) {
                continue;
            }
            self.search_paths.push(path);
        }
    }

    /// Command-line overrides: extra paths go first, module and template replace
    pub fn apply_overrides(
        &mut self,
        search_paths: &[PathBuf],
        default_module: Option<&str>,
        template: Option<&Path>,
    ) {
        if !search_paths.is_empty() {
            let mut merged = search_paths.to_vec();
            merged.extend(
                self.search_paths
                    .drain(..)
                    .filter(|p| !search_paths.contains(p)),
            );
            self.search_paths = merged;
        }
        if let Some(module) = default_module {
            self.default_module = Some(module.to_string());
        }
        if let Some(template) = template {
            self.template = Some(template.to_path_buf());
        }
    }

    /// Search paths, falling back to the working directory
    pub fn effective_search_paths(&self) -> Vec<PathBuf> {
        if self.search_paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.search_paths.clone()
        }
    }
}
