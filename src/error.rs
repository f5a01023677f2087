//! Error types for class2config.
//!
//! Every fatal condition of the export and import paths is a variant here so
//! callers can match on what went wrong instead of parsing messages.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for class2config operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for class2config operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No module with this name exists on the search path.
    #[error("No module {module} found in the search path")]
    ModuleNotFound { module: String },

    /// The module exists but does not define or import the class.
    #[error("No class {class} found in {module}")]
    ClassNotFound { module: String, class: String },

    /// The method resolution order of a class cannot be linearised.
    #[error("Cannot create a consistent method resolution order for {class}")]
    InconsistentHierarchy { class: String },

    /// Export target section is already present in the container.
    #[error("Section {section} already exists")]
    SectionAlreadyExists { section: String },

    /// Import found a section without the two config2class bookkeeping options.
    #[error(
        "Section {section} does not have the required config2class options \
         (config2class_import_module_name, config2class_import_class_name)"
    )]
    MissingBookkeepingOptions { section: String },

    /// A required constructor argument has no option in its section.
    #[error("Section {section} is missing the required option {option}")]
    MissingOption { section: String, option: String },

    /// `apply_section` in safe mode was pointed at an absent section.
    #[error("Section named {section} is not present in the config")]
    MissingSection { section: String },

    /// The instantiator refused the constructor call for a section.
    #[error("Failed to instantiate section {section}: {message}")]
    Instantiation { section: String, message: String },

    /// Malformed configuration or source text.
    #[error("Parse error in {path}:{line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    /// Invalid tool settings.
    #[error("Invalid settings: {message}")]
    Settings { message: String },

    /// File system failure with the path that caused it.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Parse error at a 1-based line of `path`.
    pub fn parse(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_bookkeeping_names_section() {
        let err = Error::MissingBookkeepingOptions {
            section: "Cylinder".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Cylinder"));
        assert!(message.contains("config2class_import_class_name"));
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = Error::io(
            "/tmp/missing.ini",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/missing.ini"));
    }
}
