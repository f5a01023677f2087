//! Language Support - tree-sitter configuration for Python sources
//!
//! ALL tree-sitter language setup goes through here so the registry and the
//! tests parse modules the same way.

use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::{Parser, Tree};

/// Get the tree-sitter language for Python
pub fn get_tree_sitter_language() -> tree_sitter::Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Detect whether a path is a Python source file
pub fn is_python_source(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("py") | Some("pyw")
    )
}

/// Parse Python source text into a tree-sitter tree
///
/// tree-sitter is error tolerant: syntax errors produce ERROR nodes rather than
/// a failure, so `Err` here means the parser itself could not run.
pub fn parse_python(content: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&get_tree_sitter_language())
        .context("Failed to load the tree-sitter Python grammar")?;
    parser
        .parse(content, None)
        .context("tree-sitter returned no tree for Python source")
}
