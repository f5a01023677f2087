// Base Extractor Types and Traits for class2config
//
// Language-agnostic pieces shared by the Python extractor:
// - types.rs: the static module model (classes, constructors, parameters, imports)
// - extractor.rs: BaseExtractor implementation (node text and source line slicing)

pub mod extractor;
pub mod types;

// Re-export key types for external use
pub use extractor::BaseExtractor;
pub use types::{
    ClassDefinition, ImportBinding, InitDefinition, ModuleDefinition, Parameter, ParameterKind,
};
