/// Class extraction for Python
/// Handles class definitions, their `__init__` method, and docstrings
use super::super::base::{ClassDefinition, InitDefinition};
use super::PythonExtractor;
use super::{helpers, signatures};
use tree_sitter::Node;

/// Extract a class definition from a class_definition node
pub(super) fn extract_class(extractor: &PythonExtractor, node: Node) -> ClassDefinition {
    let name = node
        .child_by_field_name("name")
        .map(|name_node| extractor.base().get_node_text(&name_node))
        .unwrap_or_else(|| "Anonymous".to_string());

    let bases = node
        .child_by_field_name("superclasses")
        .map(|superclasses| helpers::extract_base_list(extractor, &superclasses))
        .unwrap_or_default();

    let init =
        find_init_method(extractor, &node).map(|init_node| extract_init(extractor, init_node));
    let documentation = extract_docstring_lines(extractor, &node);

    ClassDefinition {
        name,
        bases,
        init,
        documentation,
        line: node.start_position().row + 1,
    }
}

/// Find the `__init__` defined directly in a class body
///
/// A later definition replaces an earlier one, as it would at class creation.
fn find_init_method<'a>(extractor: &PythonExtractor, class_node: &Node<'a>) -> Option<Node<'a>> {
    let body = class_node.child_by_field_name("body")?;
    let mut found = None;

    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        let function = match child.kind() {
            "function_definition" => Some(child),
            "decorated_definition" => child
                .child_by_field_name("definition")
                .filter(|definition| definition.kind() == "function_definition"),
            _ => None,
        };
        let is_init = function
            .and_then(|function| function.child_by_field_name("name"))
            .map(|name| extractor.base().get_node_text(&name) == "__init__")
            .unwrap_or(false);
        if is_init {
            found = function;
        }
    }

    found
}

/// Extract parameters and source lines of an `__init__` function_definition node
fn extract_init(extractor: &PythonExtractor, node: Node) -> InitDefinition {
    let parameters = node
        .child_by_field_name("parameters")
        .map(|parameters_node| signatures::extract_parameters(extractor, &parameters_node))
        .unwrap_or_default();

    InitDefinition {
        parameters,
        source_lines: extractor.base().get_node_lines(&node),
    }
}

/// Extract the raw docstring lines of a class
///
/// The docstring is the string expression that opens the class body. Lines are
/// returned trimmed with their quote delimiters kept, one entry per source line.
pub(super) fn extract_docstring_lines(extractor: &PythonExtractor, node: &Node) -> Vec<String> {
    let Some(body_node) = node.child_by_field_name("body") else {
        return Vec::new();
    };

    let mut cursor = body_node.walk();
    let first_statement = body_node
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");

    let Some(statement) = first_statement else {
        return Vec::new();
    };
    if statement.kind() != "expression_statement" {
        return Vec::new();
    }

    match statement.named_child(0) {
        Some(expr) if expr.kind() == "string" => extractor
            .base()
            .get_node_text(&expr)
            .lines()
            .map(|line| line.trim().to_string())
            .collect(),
        _ => Vec::new(),
    }
}
