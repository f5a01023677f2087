/// Function signatures and parameter extraction
/// Turns a `parameters` node into ordered names, defaults, and parameter kinds
use super::helpers;
use super::PythonExtractor;
use crate::extractors::base::{Parameter, ParameterKind};
use tree_sitter::Node;

/// Extract function parameters from a parameters node
pub fn extract_parameters(extractor: &PythonExtractor, parameters_node: &Node) -> Vec<Parameter> {
    let mut params = Vec::new();
    let base = extractor.base();
    // Everything after `*` or `*args` can only be passed by keyword
    let mut keyword_only = false;
    let regular = |keyword_only: bool| {
        if keyword_only {
            ParameterKind::KeywordOnly
        } else {
            ParameterKind::Regular
        }
    };

    let mut cursor = parameters_node.walk();
    for child in parameters_node.children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                params.push(Parameter {
                    name: base.get_node_text(&child),
                    default: None,
                    kind: regular(keyword_only),
                });
            }
            "typed_parameter" => {
                // name: type, or *args: type / **kwargs: type
                let Some(target) = child.named_child(0) else {
                    continue;
                };
                match target.kind() {
                    "list_splat_pattern" => {
                        keyword_only = true;
                        params.push(splat_parameter(extractor, &target, ParameterKind::VarPositional));
                    }
                    "dictionary_splat_pattern" => {
                        params.push(splat_parameter(extractor, &target, ParameterKind::VarKeyword));
                    }
                    _ => params.push(Parameter {
                        name: base.get_node_text(&target),
                        default: None,
                        kind: regular(keyword_only),
                    }),
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                // name = value, name: type = value
                let name = child
                    .child_by_field_name("name")
                    .map(|name_node| base.get_node_text(&name_node))
                    .unwrap_or_default();
                let default = child
                    .child_by_field_name("value")
                    .map(|value_node| helpers::render_default_value(extractor, &value_node));
                params.push(Parameter {
                    name,
                    default,
                    kind: regular(keyword_only),
                });
            }
            "list_splat_pattern" => {
                keyword_only = true;
                params.push(splat_parameter(extractor, &child, ParameterKind::VarPositional));
            }
            "dictionary_splat_pattern" => {
                params.push(splat_parameter(extractor, &child, ParameterKind::VarKeyword));
            }
            "keyword_separator" => {
                keyword_only = true;
            }
            _ => {}
        }
    }

    params
}

/// `*args` / `**kwargs` keep the bare name
fn splat_parameter(extractor: &PythonExtractor, node: &Node, kind: ParameterKind) -> Parameter {
    let text = extractor.base().get_node_text(node);
    Parameter {
        name: text.trim_start_matches('*').trim().to_string(),
        default: None,
        kind,
    }
}
