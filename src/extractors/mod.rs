//! class2config's Language Extractors Module
//!
//! tree-sitter based extraction of the static module model that the class
//! registry is built on.
//!
//! # Architecture
//!
//! - `base` - Module model types and the shared BaseExtractor
//! - `manager` - ExtractorManager public API (parse + extract one module)
//! - `python` - The Python extractor

pub mod base;
pub mod manager;
pub mod python;

// Re-export the public API
pub use base::{
    ClassDefinition, ImportBinding, InitDefinition, ModuleDefinition, Parameter, ParameterKind,
};
pub use manager::ExtractorManager;
