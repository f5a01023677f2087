/// Import statement extraction
/// Handles import, from...import, and aliased imports as name bindings
use super::super::base::ImportBinding;
use super::helpers;
use super::PythonExtractor;
use tree_sitter::Node;

/// Extract name bindings from an import or import_from statement
pub fn extract_imports(extractor: &PythonExtractor, node: Node) -> Vec<(String, ImportBinding)> {
    let mut imports = Vec::new();

    match node.kind() {
        "import_statement" => {
            // import a.b, import a.b as c
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                match child.kind() {
                    "dotted_name" => {
                        // `import a.b` binds `a`, attribute access walks the rest
                        let module = extractor.base().get_node_text(&child);
                        let root = module.split('.').next().unwrap_or_default().to_string();
                        imports.push((root.clone(), ImportBinding::Module { module: root }));
                    }
                    "aliased_import" => {
                        if let Some((module, alias)) = extract_alias(extractor, &child) {
                            imports.push((alias, ImportBinding::Module { module }));
                        }
                    }
                    _ => {}
                }
            }
        }
        "import_from_statement" => {
            // from module import name1, name2 as alias
            let Some(module_node) = node.child_by_field_name("module_name") else {
                return imports;
            };
            let module_text = extractor.base().get_node_text(&module_node);
            let package = if extractor.is_package() {
                extractor.module_name().to_string()
            } else {
                extractor
                    .module_name()
                    .rsplit_once('.')
                    .map(|(pkg, _)| pkg.to_string())
                    .unwrap_or_default()
            };
            let module = helpers::resolve_relative_module(&package, &module_text);

            // Find all import names after the 'import' keyword
            let mut found_import_keyword = false;
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "import" {
                    found_import_keyword = true;
                    continue;
                }
                if !found_import_keyword {
                    continue;
                }

                match child.kind() {
                    "dotted_name" => {
                        let name = extractor.base().get_node_text(&child);
                        imports.push((
                            name.clone(),
                            ImportBinding::Member {
                                module: module.clone(),
                                name,
                            },
                        ));
                    }
                    "aliased_import" => {
                        if let Some((name, alias)) = extract_alias(extractor, &child) {
                            imports.push((
                                alias,
                                ImportBinding::Member {
                                    module: module.clone(),
                                    name,
                                },
                            ));
                        }
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }

    imports
}

/// Extract (name, alias) from an aliased_import node
fn extract_alias(extractor: &PythonExtractor, node: &Node) -> Option<(String, String)> {
    let name = node.child_by_field_name("name")?;
    let alias = node.child_by_field_name("alias")?;
    Some((
        extractor.base().get_node_text(&name),
        extractor.base().get_node_text(&alias),
    ))
}
