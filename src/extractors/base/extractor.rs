// BaseExtractor implementation for class2config
//
// Holds the source text of one module and answers "what does this node say"
// questions for the language extractors.

use tracing::debug;
use tree_sitter::Node;

/// Base implementation for language extractors
pub struct BaseExtractor {
    pub language: String,
    pub file_path: String,
    pub content: String,
}

impl BaseExtractor {
    pub fn new(language: String, file_path: String, content: String) -> Self {
        debug!("BaseExtractor for '{}' ({} bytes)", file_path, content.len());
        Self {
            language,
            file_path,
            content,
        }
    }

    /// Get text from a tree-sitter node
    pub fn get_node_text(&self, node: &Node) -> String {
        let start_byte = node.start_byte();
        let end_byte = node.end_byte();

        // Use byte slice but handle UTF-8 boundaries properly
        let content_bytes = self.content.as_bytes();
        if start_byte < content_bytes.len() && end_byte <= content_bytes.len() {
            String::from_utf8_lossy(&content_bytes[start_byte..end_byte]).to_string()
        } else {
            String::new()
        }
    }

    /// Get the complete source lines a node spans, first line included in full
    ///
    /// Unlike `get_node_text` this keeps the indentation of the first line, so a
    /// method body comes back exactly as it reads in the file.
    pub fn get_node_lines(&self, node: &Node) -> Vec<String> {
        let start_row = node.start_position().row;
        let end = node.end_position();
        // A node that ends on column 0 stops at the previous line's newline
        let end_row = if end.column == 0 && end.row > start_row {
            end.row - 1
        } else {
            end.row
        };

        self.content
            .lines()
            .skip(start_row)
            .take(end_row.saturating_sub(start_row) + 1)
            .map(str::to_string)
            .collect()
    }

    /// Collapse every whitespace run (newlines included) into a single space
    pub fn normalize_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::parse_python;

    #[test]
    fn test_node_lines_keep_indentation() {
        let code = "class A:\n    def __init__(self):\n        pass\n";
        let tree = parse_python(code).unwrap();
        let base = BaseExtractor::new("python".into(), "a.py".into(), code.into());

        let class_node = tree.root_node().child(0).unwrap();
        let body = class_node.child_by_field_name("body").unwrap();
        let init = body.named_child(0).unwrap();

        assert_eq!(
            base.get_node_lines(&init),
            vec!["    def __init__(self):", "        pass"]
        );
        assert!(base.get_node_text(&init).starts_with("def __init__"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            BaseExtractor::normalize_whitespace("(1,\n     2)"),
            "(1, 2)"
        );
    }
}
