// class2config - constructor signatures of Python classes as INI config sections
//
// Python sources are parsed with tree-sitter, constructor signatures are
// resolved across pass-through calls to ancestor constructors, and the result
// is written to (and read back from) INI files.

pub mod cli;
pub mod config;
pub mod error;
pub mod extractors;
pub mod language;
pub mod registry;
pub mod settings;
pub mod signature;

// PyO3 bindings layer
#[cfg(feature = "python")]
pub mod bindings;

pub use error::{Error, Result};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// class2config Python module
///
/// Provides signature resolution and config export for Python classes.
#[cfg(feature = "python")]
#[pymodule]
fn class2config_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    m.add_function(wrap_pyfunction!(bindings::export_class_as_config, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::parse_arg_string, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::resolve_signature, m)?)?;

    Ok(())
}
