/// Python extractor for building the static module model from Python source code
///
/// This module is organized into focused sub-modules:
/// - helpers: Shared utility functions (base lists, string literals, relative imports)
/// - types: Class extraction and docstrings
/// - signatures: `__init__` parameter extraction
/// - imports: Import statement handling
pub(crate) mod helpers;
pub(crate) mod imports;
pub(crate) mod signatures;
pub(crate) mod types;

use crate::extractors::base::{BaseExtractor, ModuleDefinition};
use tree_sitter::{Node, Tree};

/// Python extractor for one module
pub struct PythonExtractor {
    base: BaseExtractor,
    module_name: String,
    is_package: bool,
}

impl PythonExtractor {
    pub fn new(module_name: String, file_path: String, content: String, is_package: bool) -> Self {
        Self {
            base: BaseExtractor::new("python".to_string(), file_path, content),
            module_name,
            is_package,
        }
    }

    /// Extract the classes and imports of the module
    pub fn extract_module(&self, tree: &Tree) -> ModuleDefinition {
        let mut module = ModuleDefinition {
            name: self.module_name.clone(),
            file_path: self.base.file_path.clone(),
            is_package: self.is_package,
            classes: Vec::new(),
            imports: Vec::new(),
        };
        self.traverse_module_level(tree.root_node(), &mut module);
        module
    }

    /// Visit statements executed at import time
    ///
    /// Classes and imports nested in `if`/`try` blocks at module level still
    /// bind module attributes, so those blocks are descended into. Function
    /// bodies and class bodies are not.
    fn traverse_module_level(&self, node: Node, module: &mut ModuleDefinition) {
        match node.kind() {
            "class_definition" => {
                module.classes.push(types::extract_class(self, node));
                return;
            }
            "decorated_definition" => {
                if let Some(definition) = node.child_by_field_name("definition") {
                    if definition.kind() == "class_definition" {
                        module.classes.push(types::extract_class(self, definition));
                    }
                }
                return;
            }
            "function_definition" => return,
            "import_statement" | "import_from_statement" => {
                module.imports.extend(imports::extract_imports(self, node));
                return;
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.traverse_module_level(child, module);
        }
    }

    // ========================================================================
    // Accessors for sub-modules
    // ========================================================================

    pub(crate) fn base(&self) -> &BaseExtractor {
        &self.base
    }

    pub(crate) fn module_name(&self) -> &str {
        &self.module_name
    }

    pub(crate) fn is_package(&self) -> bool {
        self.is_package
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{ImportBinding, ParameterKind};
    use crate::language::parse_python;

    fn extract(code: &str) -> ModuleDefinition {
        let tree = parse_python(code).unwrap();
        let extractor = PythonExtractor::new(
            "sim.optics".to_string(),
            "sim/optics.py".to_string(),
            code.to_string(),
            false,
        );
        extractor.extract_module(&tree)
    }

    #[test]
    fn test_extracts_classes_and_init() {
        let code = r#"
import numpy as np
from .base import Component

class Lens(Component):
    """
    A thin lens.
    """
    def __init__(self, focal_length, aperture=0.5, name="lens", *args, **kwargs):
        Component.__init__(self, **kwargs)
        self.focal_length = focal_length
"#;
        let module = extract(code);

        assert_eq!(module.classes.len(), 1);
        let lens = module.class("Lens").unwrap();
        assert_eq!(lens.bases, vec!["Component"]);
        assert_eq!(lens.documentation, vec!["\"\"\"", "A thin lens.", "\"\"\""]);

        let init = lens.init.as_ref().unwrap();
        let names: Vec<_> = init.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["self", "focal_length", "aperture", "name", "args", "kwargs"]
        );
        assert_eq!(init.parameters[2].default.as_deref(), Some("0.5"));
        assert_eq!(init.parameters[3].default.as_deref(), Some("lens"));
        assert_eq!(init.parameters[4].kind, ParameterKind::VarPositional);
        assert_eq!(init.parameters[5].kind, ParameterKind::VarKeyword);
        assert!(init.source_lines[0].trim_start().starts_with("def __init__"));
        assert_eq!(init.source_lines.len(), 3);

        assert_eq!(
            module.import("np"),
            Some(&ImportBinding::Module {
                module: "numpy".to_string()
            })
        );
        assert_eq!(
            module.import("Component"),
            Some(&ImportBinding::Member {
                module: "sim.base".to_string(),
                name: "Component".to_string()
            })
        );
    }

    #[test]
    fn test_skips_function_bodies_but_visits_conditional_blocks() {
        let code = r#"
def factory():
    class Hidden:
        pass
    return Hidden

try:
    from fast import Engine
except ImportError:
    class Engine:
        pass

@register
class Decorated:
    pass
"#;
        let module = extract(code);
        let names: Vec<_> = module.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Engine", "Decorated"]);
        assert!(module.import("Engine").is_some());
        assert!(module.class("Hidden").is_none());
    }
}
