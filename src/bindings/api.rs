// API Functions - PyO3-exposed functions for Python

use crate::config::{self, ConfigContainer};
use crate::error::Error;
use crate::registry::{ClassRegistry, SourceRegistry};
use crate::settings::Settings;
use crate::signature;
use pyo3::exceptions::{PyAttributeError, PyIOError, PyModuleNotFoundError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::PathBuf;

fn to_py_err(error: Error) -> PyErr {
    let message = error.to_string();
    match error {
        Error::ModuleNotFound { .. } => PyModuleNotFoundError::new_err(message),
        Error::ClassNotFound { .. } => PyAttributeError::new_err(message),
        Error::Io { .. } => PyIOError::new_err(message),
        _ => PyValueError::new_err(message),
    }
}

/// Registry over the given paths, or the discovered settings when none are given
fn registry_for(search_paths: Option<Vec<PathBuf>>) -> PyResult<SourceRegistry> {
    let mut settings = Settings::discover(None).map_err(to_py_err)?;
    if let Some(paths) = search_paths {
        settings.apply_overrides(&paths, None, None);
    }
    Ok(SourceRegistry::new(settings.effective_search_paths()))
}

/// Export a class as an INI config section
///
/// Args:
///     module_name (str): Dotted module name, e.g. "warp.shapes"
///     class_name (str): Class to export
///     instance_name (str | None): Section name; defaults to class_name
///     search_paths (list[str] | None): Module roots; defaults to class2config.toml and PYTHONPATH
///
/// Returns:
///     str: The rendered INI text
///
/// Raises:
///     ModuleNotFoundError: If the module is not on the search path
///     AttributeError: If the module has no such class
#[pyfunction]
#[pyo3(signature = (module_name, class_name, instance_name=None, search_paths=None))]
pub fn export_class_as_config(
    module_name: &str,
    class_name: &str,
    instance_name: Option<&str>,
    search_paths: Option<Vec<PathBuf>>,
) -> PyResult<String> {
    let registry = registry_for(search_paths)?;
    let container = config::export_class_as_config(
        &registry,
        module_name,
        class_name,
        instance_name,
        Some(ConfigContainer::new()),
    )
    .map_err(to_py_err)?;
    Ok(container.to_ini_string())
}

/// Split literal argument text into positional, default and forwarded entries
///
/// Returns:
///     dict: keys "args", "default_args", "default_values", "star_args", "star_kwargs"
#[pyfunction]
#[pyo3(signature = (text, ignore_first=false))]
pub fn parse_arg_string<'py>(
    py: Python<'py>,
    text: &str,
    ignore_first: bool,
) -> PyResult<Bound<'py, PyDict>> {
    let parsed = signature::parse_arg_string(text, ignore_first);
    let dict = PyDict::new(py);
    dict.set_item("args", parsed.positional_args)?;
    dict.set_item("default_args", parsed.default_args)?;
    dict.set_item("default_values", parsed.default_values)?;
    dict.set_item("star_args", parsed.forwarded_sequences)?;
    dict.set_item("star_kwargs", parsed.forwarded_mappings)?;
    Ok(dict)
}

/// Effective constructor signature of a class, forwarded ancestor defaults included
///
/// Returns:
///     dict: keys "args", "default_args", "default_values"
#[pyfunction]
#[pyo3(signature = (module_name, class_name, search_paths=None))]
pub fn resolve_signature<'py>(
    py: Python<'py>,
    module_name: &str,
    class_name: &str,
    search_paths: Option<Vec<PathBuf>>,
) -> PyResult<Bound<'py, PyDict>> {
    let registry = registry_for(search_paths)?;
    let class = registry
        .get_class(module_name, class_name)
        .map_err(to_py_err)?;
    let resolved = signature::resolve(&class);

    let dict = PyDict::new(py);
    dict.set_item("args", resolved.positional_args)?;
    dict.set_item("default_args", resolved.default_args)?;
    dict.set_item("default_values", resolved.default_values)?;
    Ok(dict)
}
