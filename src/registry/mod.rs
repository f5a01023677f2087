//! Class Registry - given a module name and a class name, hand back the class
//!
//! A `ClassObject` is everything the signature engine may ask about a class:
//! its constructor (parameters plus either source lines or a declared
//! forwarding table), its method resolution order, and its docstring.
//!
//! Two registries are provided:
//! - `SourceRegistry` loads Python modules from search paths and parses them
//! - `ManifestRegistry` serves classes described by declared manifests

pub mod manifest;
pub mod mro;
pub mod source;

pub use manifest::{ClassManifest, ManifestRegistry};
pub use source::SourceRegistry;

use crate::error::Result;
use crate::extractors::base::Parameter;
use crate::signature::SuperCallRecord;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves (module, class) pairs to class objects
pub trait ClassRegistry {
    /// Fails with `ModuleNotFound` or `ClassNotFound` naming what is missing
    fn get_class(&self, module_name: &str, class_name: &str) -> Result<Arc<ClassObject>>;
}

impl<R: ClassRegistry + ?Sized> ClassRegistry for &R {
    fn get_class(&self, module_name: &str, class_name: &str) -> Result<Arc<ClassObject>> {
        (**self).get_class(module_name, class_name)
    }
}

/// Where the forwarding calls of a constructor come from
#[derive(Debug, Clone, PartialEq)]
pub enum InitBody {
    /// Source lines of the method, the declaration line first
    Source(Vec<String>),
    /// Forwarding table declared by the class author, keyed by ancestor name
    Declared(HashMap<String, SuperCallRecord>),
}

/// A constructor as declared on one class
#[derive(Debug, Clone, PartialEq)]
pub struct InitMethod {
    /// Qualified name of the class that declares this constructor
    pub owner: String,
    /// Parameters in declaration order, the implicit self first
    pub parameters: Vec<Parameter>,
    pub body: InitBody,
}

/// A resolved class with its full ancestry
#[derive(Debug, Clone)]
pub struct ClassObject {
    pub module: String,
    pub name: String,
    /// Ancestors in method resolution order, most derived first, self excluded
    pub mro: Vec<Arc<ClassObject>>,
    /// The constructor declared on this class itself
    pub init: Option<InitMethod>,
    /// Raw documentation lines following the class declaration
    pub documentation: Vec<String>,
}

impl ClassObject {
    /// Build a class from its direct bases, computing the C3 linearisation
    pub fn new(
        module: impl Into<String>,
        name: impl Into<String>,
        bases: &[Arc<ClassObject>],
        init: Option<InitMethod>,
        documentation: Vec<String>,
    ) -> Result<Self> {
        let module = module.into();
        let name = name.into();
        let mro = mro::linearize(&format!("{}.{}", module, name), bases)?;
        Ok(Self {
            module,
            name,
            mro,
            init,
            documentation,
        })
    }

    /// A class we know only by name (builtins, modules outside the search path)
    pub fn opaque(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            mro: Vec::new(),
            init: None,
            documentation: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> String {
        if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.module, self.name)
        }
    }

    /// Ancestors in method resolution order, self excluded
    pub fn ancestors(&self) -> &[Arc<ClassObject>] {
        &self.mro
    }

    /// The constructor `Class.__init__` refers to
    ///
    /// Attribute lookup walks the MRO, so a class without its own `__init__`
    /// is constructed through the nearest ancestor that has one. `None` means
    /// nothing in the chain has an introspectable constructor.
    pub fn constructor(&self) -> Option<&InitMethod> {
        self.init
            .as_ref()
            .or_else(|| self.mro.iter().find_map(|ancestor| ancestor.init.as_ref()))
    }

    /// Documentation lines as a one-shot sequence
    pub fn documentation_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.documentation.iter().cloned()
    }
}
