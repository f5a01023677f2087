//! Command-line token parsing shared by the binaries

use crate::error::{Error, Result};
use std::fmt;

/// One class to export, as named on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSpec {
    pub module_name: String,
    pub class_name: String,
    pub instance_name: Option<String>,
}

impl ClassSpec {
    /// Parse a `[module:]class[:instance]` token
    ///
    /// - `module:class:instance`
    /// - `class:instance` when a default module is configured, `module:class` otherwise
    /// - `class`, which needs a default module
    pub fn parse(token: &str, default_module: Option<&str>) -> Result<Self> {
        let pieces: Vec<&str> = token.split(':').map(str::trim).collect();
        if pieces.iter().any(|p| p.is_empty()) {
            return Err(invalid(token, "empty name"));
        }

        let (module_name, class_name, instance_name) = match (pieces.as_slice(), default_module) {
            ([module, class, instance], _) => (*module, *class, Some(*instance)),
            ([class, instance], Some(module)) => (module, *class, Some(*instance)),
            ([module, class], None) => (*module, *class, None),
            ([class], Some(module)) => (module, *class, None),
            ([_], None) => {
                return Err(invalid(token, "no module given and no default module configured"))
            }
            _ => return Err(invalid(token, "too many ':' separated parts")),
        };

        Ok(Self {
            module_name: module_name.to_string(),
            class_name: class_name.to_string(),
            instance_name: instance_name.map(str::to_string),
        })
    }

    /// Name of the section this class is exported into
    pub fn section_name(&self) -> &str {
        self.instance_name.as_deref().unwrap_or(&self.class_name)
    }
}

impl fmt::Display for ClassSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module_name, self.class_name)?;
        if let Some(instance) = &self.instance_name {
            write!(f, ":{}", instance)?;
        }
        Ok(())
    }
}

fn invalid(token: &str, reason: &str) -> Error {
    Error::Settings {
        message: format!("invalid class token '{}': {}", token, reason),
    }
}
