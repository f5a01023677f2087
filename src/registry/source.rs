//! SourceRegistry - classes loaded from Python source files on a search path
//!
//! Mirrors what an import would do without running anything: locate the
//! module file, parse it with tree-sitter, and follow base classes through
//! the module's own namespace (local classes and imports).

use super::{ClassObject, ClassRegistry, InitBody, InitMethod};
use crate::error::{Error, Result};
use crate::extractors::base::{ClassDefinition, ImportBinding, ModuleDefinition};
use crate::extractors::ExtractorManager;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Module name used for classes that are not defined in any loadable module
pub const BUILTINS_MODULE: &str = "builtins";

/// Class registry backed by Python sources
pub struct SourceRegistry {
    search_paths: Vec<PathBuf>,
    manager: ExtractorManager,
    modules: RefCell<HashMap<String, Arc<ModuleDefinition>>>,
    classes: RefCell<HashMap<String, Arc<ClassObject>>>,
}

impl SourceRegistry {
    /// Search paths are tried in order, like `sys.path`
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths,
            manager: ExtractorManager::new(),
            modules: RefCell::new(HashMap::new()),
            classes: RefCell::new(HashMap::new()),
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find the file for a dotted module name
    ///
    /// Returns the path and whether it is a package `__init__.py`.
    pub fn locate_module(&self, module_name: &str) -> Option<(PathBuf, bool)> {
        if module_name.is_empty() || module_name.split('.').any(str::is_empty) {
            return None;
        }
        let relative: PathBuf = module_name.split('.').collect();

        self.search_paths.iter().find_map(|root| {
            let module_file = root.join(&relative).with_extension("py");
            if module_file.is_file() {
                return Some((module_file, false));
            }
            let package_init = root.join(&relative).join("__init__.py");
            if package_init.is_file() {
                return Some((package_init, true));
            }
            None
        })
    }

    /// Load and parse a module, cached for the lifetime of the registry
    pub fn load_module(&self, module_name: &str) -> Result<Arc<ModuleDefinition>> {
        if let Some(module) = self.modules.borrow().get(module_name) {
            return Ok(Arc::clone(module));
        }

        let (path, is_package) = self
            .locate_module(module_name)
            .ok_or_else(|| Error::ModuleNotFound {
                module: module_name.to_string(),
            })?;
        let module = Arc::new(self.parse_module(module_name, &path, is_package)?);
        debug!(
            "Loaded module {} from {} ({} classes)",
            module_name,
            path.display(),
            module.classes.len()
        );

        self.modules
            .borrow_mut()
            .insert(module_name.to_string(), Arc::clone(&module));
        Ok(module)
    }

    fn parse_module(
        &self,
        module_name: &str,
        path: &Path,
        is_package: bool,
    ) -> Result<ModuleDefinition> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let file_path = path.to_string_lossy().to_string();
        self.manager
            .extract_module(module_name, &file_path, &content, is_package)
            .map_err(|e| Error::parse(file_path, 0, format!("{:#}", e)))
    }

    /// Look a name up in a module's namespace: local class first, then imports
    fn lookup_class(
        &self,
        module: &ModuleDefinition,
        class_name: &str,
        in_progress: &mut Vec<String>,
    ) -> Result<Arc<ClassObject>> {
        if let Some(definition) = module.class(class_name) {
            return self.build_class(module, definition, in_progress);
        }
        self.lookup_import(module, class_name, in_progress)
    }

    /// Follow a `from x import Name` binding to the class it names
    fn lookup_import(
        &self,
        module: &ModuleDefinition,
        class_name: &str,
        in_progress: &mut Vec<String>,
    ) -> Result<Arc<ClassObject>> {
        let not_found = || Error::ClassNotFound {
            module: module.name.clone(),
            class: class_name.to_string(),
        };

        let Some(ImportBinding::Member {
            module: source_module,
            name,
        }) = module.import(class_name)
        else {
            return Err(not_found());
        };

        let source = match self.load_module(source_module) {
            Ok(source) => source,
            Err(Error::ModuleNotFound { .. }) => return Err(not_found()),
            Err(e) => return Err(e),
        };
        // `from a import a` style re-exports must not loop back on themselves
        if source.name == module.name && name == class_name {
            return Err(not_found());
        }
        self.lookup_class(&source, name, in_progress)
    }

    fn build_class(
        &self,
        module: &ModuleDefinition,
        definition: &ClassDefinition,
        in_progress: &mut Vec<String>,
    ) -> Result<Arc<ClassObject>> {
        let key = format!("{}.{}", module.name, definition.name);
        if let Some(class) = self.classes.borrow().get(&key) {
            return Ok(Arc::clone(class));
        }
        if in_progress.contains(&key) {
            return Err(Error::InconsistentHierarchy { class: key });
        }

        in_progress.push(key.clone());
        let bases = definition
            .bases
            .iter()
            .map(|base| self.resolve_base(module, definition, base, in_progress))
            .collect::<Result<Vec<_>>>();
        in_progress.pop();
        let bases = bases?;

        let init = definition.init.as_ref().map(|init| InitMethod {
            owner: key.clone(),
            parameters: init.parameters.clone(),
            body: InitBody::Source(init.source_lines.clone()),
        });
        let class = Arc::new(ClassObject::new(
            module.name.clone(),
            definition.name.clone(),
            &bases,
            init,
            definition.documentation.clone(),
        )?);
        debug!(
            "Resolved class {} with MRO [{}]",
            key,
            class
                .ancestors()
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        self.classes.borrow_mut().insert(key, Arc::clone(&class));
        Ok(class)
    }

    /// Resolve one base class expression in the defining module's namespace
    ///
    /// Bases that cannot be found anywhere on the search path become opaque
    /// classes: they still take part in the MRO but expose no constructor.
    fn resolve_base(
        &self,
        module: &ModuleDefinition,
        definition: &ClassDefinition,
        base: &str,
        in_progress: &mut Vec<String>,
    ) -> Result<Arc<ClassObject>> {
        let (target_module, class_name) = match base.rsplit_once('.') {
            Some((prefix, class_name)) => (Some(self.qualify_prefix(module, prefix)), class_name),
            None => (None, base),
        };

        let resolved = match target_module {
            Some(ref target) => self
                .load_module(target)
                .and_then(|source| self.lookup_class(&source, class_name, in_progress)),
            None => match module
                .classes
                .iter()
                .rev()
                .find(|c| c.name == class_name && c.line < definition.line)
            {
                // A class defined earlier in the same module
                Some(local) => self.build_class(module, local, in_progress),
                None => self.lookup_import(module, class_name, in_progress),
            },
        };

        match resolved {
            Ok(class) => Ok(class),
            Err(Error::ModuleNotFound { .. }) | Err(Error::ClassNotFound { .. }) => {
                let opaque_module = target_module.unwrap_or_else(|| BUILTINS_MODULE.to_string());
                if opaque_module != BUILTINS_MODULE {
                    warn!(
                        "Base {} of {}.{} is not on the search path; treating it as opaque",
                        base, module.name, definition.name
                    );
                }
                Ok(Arc::new(ClassObject::opaque(opaque_module, class_name)))
            }
            Err(e) => Err(e),
        }
    }

    /// Turn the module part of a dotted base (`np.linalg` in `np.linalg.Base`)
    /// into an absolute module name using the module's import aliases
    fn qualify_prefix(&self, module: &ModuleDefinition, prefix: &str) -> String {
        let (root, rest) = match prefix.split_once('.') {
            Some((root, rest)) => (root, Some(rest)),
            None => (prefix, None),
        };
        let root_module = match module.import(root) {
            Some(ImportBinding::Module { module }) => module.clone(),
            Some(ImportBinding::Member { module, name }) => {
                if module.is_empty() {
                    name.clone()
                } else {
                    format!("{}.{}", module, name)
                }
            }
            None => root.to_string(),
        };
        match rest {
            Some(rest) => format!("{}.{}", root_module, rest),
            None => root_module,
        }
    }
}

impl ClassRegistry for SourceRegistry {
    fn get_class(&self, module_name: &str, class_name: &str) -> Result<Arc<ClassObject>> {
        let module = self.load_module(module_name)?;
        let mut in_progress = Vec::new();
        self.lookup_class(&module, class_name, &mut in_progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "sim/__init__.py", "from .parts import Lens\n");
        write(
            root,
            "sim/core.py",
            r#"
class Component(object):
    def __init__(self, name, enabled=True):
        self.name = name
"#,
        );
        write(
            root,
            "sim/parts.py",
            r#"
import numpy as np
from . import core
from sim.core import Component as Base

class Lens(Base):
    def __init__(self, focal, **kwargs):
        Base.__init__(self, focal, **kwargs)

class Mirror(core.Component):
    pass

class Filter(np.ndarray):
    pass
"#,
        );
        dir
    }

    #[test]
    fn test_resolves_aliased_and_relative_bases() {
        let dir = fixture();
        let registry = SourceRegistry::new(vec![dir.path().to_path_buf()]);

        let lens = registry.get_class("sim.parts", "Lens").unwrap();
        let mro: Vec<_> = lens.ancestors().iter().map(|c| c.qualified_name()).collect();
        assert_eq!(mro, vec!["sim.core.Component", "builtins.object"]);

        let mirror = registry.get_class("sim.parts", "Mirror").unwrap();
        assert_eq!(mirror.ancestors()[0].qualified_name(), "sim.core.Component");
        assert_eq!(
            mirror.constructor().map(|i| i.owner.as_str()),
            Some("sim.core.Component")
        );
    }

    #[test]
    fn test_package_reexport_and_external_base() {
        let dir = fixture();
        let registry = SourceRegistry::new(vec![dir.path().to_path_buf()]);

        let lens = registry.get_class("sim", "Lens").unwrap();
        assert_eq!(lens.qualified_name(), "sim.parts.Lens");

        let filter = registry.get_class("sim.parts", "Filter").unwrap();
        assert_eq!(filter.ancestors()[0].qualified_name(), "numpy.ndarray");
        assert!(filter.constructor().is_none());
    }

    #[test]
    fn test_missing_module_and_class() {
        let dir = fixture();
        let registry = SourceRegistry::new(vec![dir.path().to_path_buf()]);

        assert!(matches!(
            registry.get_class("sim.nothing", "Lens"),
            Err(Error::ModuleNotFound { module }) if module == "sim.nothing"
        ));
        assert!(matches!(
            registry.get_class("sim.parts", "Prism"),
            Err(Error::ClassNotFound { module, class }) if module == "sim.parts" && class == "Prism"
        ));
    }

    #[test]
    fn test_class_shadowing_its_imported_base() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "base.py",
            "class Widget:\n    def __init__(self, size=1):\n        pass\n",
        );
        write(
            dir.path(),
            "ui.py",
            "from base import Widget\n\nclass Widget(Widget):\n    pass\n",
        );
        let registry = SourceRegistry::new(vec![dir.path().to_path_buf()]);

        let widget = registry.get_class("ui", "Widget").unwrap();
        assert_eq!(widget.ancestors()[0].qualified_name(), "base.Widget");
    }
}
