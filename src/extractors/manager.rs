//! ExtractorManager - Public API for module extraction
//!
//! Handles file parsing and delegates to the Python extractor. The class
//! registry goes through here for every module it loads.

use crate::extractors::base::ModuleDefinition;
use crate::extractors::python::PythonExtractor;
use anyhow::{anyhow, Result};
use std::path::Path;

/// Manager for the module extractors
pub struct ExtractorManager {
    // No state needed - parsers are created per call
}

impl Default for ExtractorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorManager {
    pub fn new() -> Self {
        Self {}
    }

    /// Parse one Python module and extract its classes and imports
    ///
    /// `module_name` is the dotted name the module is imported under;
    /// `is_package` marks a package `__init__.py`, which changes how relative
    /// imports resolve.
    pub fn extract_module(
        &self,
        module_name: &str,
        file_path: &str,
        content: &str,
        is_package: bool,
    ) -> Result<ModuleDefinition> {
        if !crate::language::is_python_source(Path::new(file_path)) {
            return Err(anyhow!("Not a Python source file: {}", file_path));
        }

        // Parse the file
        let tree = crate::language::parse_python(content)?;

        let extractor = PythonExtractor::new(
            module_name.to_string(),
            file_path.to_string(),
            content.to_string(),
            is_package,
        );
        let module = extractor.extract_module(&tree);

        tracing::debug!(
            "Extracted {} classes and {} imports from module {} ({})",
            module.classes.len(),
            module.imports.len(),
            module_name,
            file_path
        );
        Ok(module)
    }
}
