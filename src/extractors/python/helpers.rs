/// Helper utilities for Python extraction
/// Includes base-class lists, string literal handling, and relative import resolution
use super::PythonExtractor;
use crate::extractors::base::BaseExtractor;
use tree_sitter::Node;

/// Extract base class expressions from a superclasses (argument_list) node
///
/// Keyword arguments such as `metaclass=Meta` are not bases and are skipped.
/// Generic bases like `Generic[T]` contribute their subscripted value.
pub fn extract_base_list(extractor: &PythonExtractor, node: &Node) -> Vec<String> {
    let mut bases = Vec::new();
    let base = extractor.base();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" | "attribute" => {
                bases.push(base.get_node_text(&child));
            }
            "subscript" => {
                if let Some(value) = child.child_by_field_name("value") {
                    bases.push(base.get_node_text(&value));
                }
            }
            _ => {}
        }
    }

    bases
}

/// Helper to strip string delimiters (quotes) from Python strings
/// Handles triple quotes (""" or '''), double quotes ("), and single quotes (')
pub fn strip_string_delimiters(s: &str) -> String {
    // Try delimiters in order: triple quotes first (3 chars), then single quotes (1 char)
    let delimiters = [("\"\"\"", 3), ("'''", 3), ("\"", 1), ("'", 1)];

    for (delimiter, strip_count) in &delimiters {
        if s.starts_with(delimiter) && s.ends_with(delimiter) && s.len() >= strip_count * 2 {
            return s[*strip_count..s.len() - strip_count].to_string();
        }
    }

    // No matching delimiter found, return as-is
    s.to_string()
}

/// Render a default value node the way `str()` would show the evaluated value
///
/// Plain string literals lose their quotes; prefixed strings (f"", b"", r"")
/// and every other expression keep their source text, whitespace collapsed.
pub fn render_default_value(extractor: &PythonExtractor, node: &Node) -> String {
    let text = extractor.base().get_node_text(node);
    if node.kind() == "string" && text.starts_with(['"', '\'']) {
        return strip_string_delimiters(&text);
    }
    BaseExtractor::normalize_whitespace(&text)
}

/// Resolve the module text of a `from ... import` statement to an absolute name
///
/// `package` is the package the importing module lives in. Each leading dot
/// beyond the first climbs one package level.
pub fn resolve_relative_module(package: &str, module_text: &str) -> String {
    let dots = module_text.chars().take_while(|c| *c == '.').count();
    if dots == 0 {
        return module_text.to_string();
    }

    let remainder = &module_text[dots..];
    let mut parts: Vec<&str> = package.split('.').filter(|p| !p.is_empty()).collect();
    for _ in 1..dots {
        parts.pop();
    }
    if !remainder.is_empty() {
        parts.push(remainder);
    }
    parts.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_string_delimiters() {
        assert_eq!(strip_string_delimiters("\"\"\"doc\"\"\""), "doc");
        assert_eq!(strip_string_delimiters("'x'"), "x");
        assert_eq!(strip_string_delimiters("None"), "None");
    }

    #[test]
    fn test_resolve_relative_module() {
        assert_eq!(resolve_relative_module("sim.parts", ".base"), "sim.parts.base");
        assert_eq!(resolve_relative_module("sim.parts", "..core"), "sim.core");
        assert_eq!(resolve_relative_module("sim.parts", "."), "sim.parts");
        assert_eq!(resolve_relative_module("sim.parts", "numpy"), "numpy");
        assert_eq!(resolve_relative_module("", ".sibling"), "sibling");
    }
}
