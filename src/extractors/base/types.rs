// Base Extractor Types for class2config
//
// The static model of a Python module: what a class declares, what its
// constructor looks like, and which names the module imports.

use serde::{Deserialize, Serialize};

/// How a constructor parameter receives its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Plain parameter, possibly with a default
    Regular,
    /// Parameter after a bare `*` or `*args`
    KeywordOnly,
    /// `*args`
    VarPositional,
    /// `**kwargs`
    VarKeyword,
}

/// A single parameter of a function definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Default value as it is rendered into a config file
    pub default: Option<String>,
    pub kind: ParameterKind,
}

impl Parameter {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            kind: ParameterKind::Regular,
        }
    }

    pub fn with_default(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
            kind: ParameterKind::Regular,
        }
    }

    /// `*args` / `**kwargs` collect whatever is left and have no config key
    pub fn is_variadic(&self) -> bool {
        matches!(
            self.kind,
            ParameterKind::VarPositional | ParameterKind::VarKeyword
        )
    }
}

/// An `__init__` method as found in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitDefinition {
    /// Parameters in declaration order, `self` included
    pub parameters: Vec<Parameter>,
    /// Full source lines of the method, the `def` line first
    pub source_lines: Vec<String>,
}

/// A class definition as found in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    /// Base class expressions as written (`Base`, `pkg.Base`)
    pub bases: Vec<String>,
    pub init: Option<InitDefinition>,
    /// Raw docstring lines, delimiters included, each line trimmed
    pub documentation: Vec<String>,
    /// 1-based line of the `class` keyword
    pub line: usize,
}

/// A name bound by an import statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportBinding {
    /// `import a.b` binds `a`; `import a.b as c` binds `c` to `a.b`
    Module { module: String },
    /// `from a.b import X [as Y]` binds `Y` (or `X`) to `a.b.X`
    Member { module: String, name: String },
}

/// Everything class2config needs from one Python module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    /// Dotted module name (`pkg.shapes`)
    pub name: String,
    pub file_path: String,
    /// Whether the module is a package `__init__.py`
    pub is_package: bool,
    /// Top-level classes in source order
    pub classes: Vec<ClassDefinition>,
    /// (bound name, binding) pairs in source order
    pub imports: Vec<(String, ImportBinding)>,
}

impl ModuleDefinition {
    /// Find a top-level class by name; later definitions shadow earlier ones
    pub fn class(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.iter().rev().find(|class| class.name == name)
    }

    /// Find what an imported name is bound to; later imports shadow earlier ones
    pub fn import(&self, bound_name: &str) -> Option<&ImportBinding> {
        self.imports
            .iter()
            .rev()
            .find(|(name, _)| name == bound_name)
            .map(|(_, binding)| binding)
    }

    /// The package relative imports are resolved against
    pub fn package(&self) -> &str {
        if self.is_package {
            &self.name
        } else {
            self.name.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
        }
    }
}
