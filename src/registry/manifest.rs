//! ManifestRegistry - classes described by declared manifests
//!
//! For classes whose source cannot (or should not) be scanned, the author
//! states the constructor parameters and the ancestor constructors it forwards
//! to. The signature resolver treats a declared forwarding table exactly like
//! one recovered from source.

use super::{ClassObject, ClassRegistry, InitBody, InitMethod};
use crate::error::{Error, Result};
use crate::extractors::base::{Parameter, ParameterKind};
use crate::signature::{parse_arg_string, SuperCallRecord};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Declared description of one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassManifest {
    pub module: String,
    pub name: String,
    /// Base names: `Name` for a class in the same module, `module.Name` otherwise
    pub bases: Vec<String>,
    /// Constructor parameters after self; `None` when the class declares no constructor
    pub parameters: Option<Vec<Parameter>>,
    pub forwards: HashMap<String, SuperCallRecord>,
    pub documentation: Vec<String>,
}

impl ClassManifest {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            bases: Vec::new(),
            parameters: None,
            forwards: HashMap::new(),
            documentation: Vec::new(),
        }
    }

    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Declare a required constructor parameter
    pub fn param(self, name: impl Into<String>) -> Self {
        self.push_parameter(Parameter::required(name))
    }

    /// Declare a constructor parameter with a default value
    pub fn default_param(self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.push_parameter(Parameter::with_default(name, default))
    }

    /// Declare a required parameter that follows a bare `*`
    pub fn keyword_only(self, name: impl Into<String>) -> Self {
        self.push_parameter(Parameter {
            kind: ParameterKind::KeywordOnly,
            ..Parameter::required(name)
        })
    }

    pub fn keyword_only_default(self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.push_parameter(Parameter {
            kind: ParameterKind::KeywordOnly,
            ..Parameter::with_default(name, default)
        })
    }

    /// Declare `**name`, the usual way a constructor accepts ancestor options
    pub fn var_keyword(self, name: impl Into<String>) -> Self {
        self.push_parameter(Parameter {
            name: name.into(),
            default: None,
            kind: ParameterKind::VarKeyword,
        })
    }

    /// Declare an empty constructor (only self)
    pub fn constructor(mut self) -> Self {
        self.parameters.get_or_insert_with(Vec::new);
        self
    }

    /// Declare a forwarding call by its literal argument text, self included
    ///
    /// `forwards_to("Base", "self, size, color='red', **kwargs")`
    pub fn forwards_to(mut self, ancestor: impl Into<String>, argument_text: &str) -> Self {
        let ancestor = ancestor.into();
        let arguments = parse_arg_string(argument_text, true);
        self.parameters.get_or_insert_with(Vec::new);
        self.forwards
            .insert(ancestor.clone(), SuperCallRecord::new(ancestor, arguments));
        self
    }

    pub fn doc_line(mut self, line: impl Into<String>) -> Self {
        self.documentation.push(line.into());
        self
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }

    fn push_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.get_or_insert_with(Vec::new).push(parameter);
        self
    }
}

/// Class registry over declared manifests
#[derive(Default)]
pub struct ManifestRegistry {
    manifests: HashMap<String, ClassManifest>,
    classes: RefCell<HashMap<String, Arc<ClassObject>>>,
}

impl ManifestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a manifest, replacing any earlier one for the same class
    pub fn register(&mut self, manifest: ClassManifest) -> &mut Self {
        self.classes.borrow_mut().clear();
        self.manifests.insert(manifest.qualified_name(), manifest);
        self
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    fn build(&self, key: &str, in_progress: &mut Vec<String>) -> Result<Arc<ClassObject>> {
        if let Some(class) = self.classes.borrow().get(key) {
            return Ok(Arc::clone(class));
        }
        if in_progress.iter().any(|k| k == key) {
            return Err(Error::InconsistentHierarchy {
                class: key.to_string(),
            });
        }
        let Some(manifest) = self.manifests.get(key) else {
            let (module, name) = key.rsplit_once('.').unwrap_or(("", key));
            return Ok(Arc::new(ClassObject::opaque(module, name)));
        };

        in_progress.push(key.to_string());
        let bases = manifest
            .bases
            .iter()
            .map(|base| {
                let base_key = if base.contains('.') {
                    base.clone()
                } else {
                    format!("{}.{}", manifest.module, base)
                };
                self.build(&base_key, in_progress)
            })
            .collect::<Result<Vec<_>>>();
        in_progress.pop();
        let bases = bases?;

        let init = manifest.parameters.as_ref().map(|parameters| {
            let mut all = Vec::with_capacity(parameters.len() + 1);
            all.push(Parameter::required("self"));
            all.extend(parameters.iter().cloned());
            InitMethod {
                owner: key.to_string(),
                parameters: all,
                body: InitBody::Declared(manifest.forwards.clone()),
            }
        });
        let class = Arc::new(ClassObject::new(
            manifest.module.clone(),
            manifest.name.clone(),
            &bases,
            init,
            manifest.documentation.clone(),
        )?);

        self.classes
            .borrow_mut()
            .insert(key.to_string(), Arc::clone(&class));
        Ok(class)
    }
}

impl ClassRegistry for ManifestRegistry {
    fn get_class(&self, module_name: &str, class_name: &str) -> Result<Arc<ClassObject>> {
        if !self.manifests.values().any(|m| m.module == module_name) {
            return Err(Error::ModuleNotFound {
                module: module_name.to_string(),
            });
        }
        let key = format!("{}.{}", module_name, class_name);
        if !self.manifests.contains_key(&key) {
            return Err(Error::ClassNotFound {
                module: module_name.to_string(),
                class: class_name.to_string(),
            });
        }
        self.build(&key, &mut Vec::new())
    }
}
