//! Super-Call Parser - forwarding calls to ancestor constructors
//!
//! Works on the text of a constructor body, line by line: any line mentioning
//! `init` starts a candidate, following lines are joined until parentheses
//! balance, and complete `Name.__init__(...)` expressions become records.

use super::{parse_arg_string, SuperCallRecord};
use crate::registry::{ClassObject, InitBody, InitMethod};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

/// `Ancestor.__init__(` or `pkg.Ancestor.__init__(`
static NAMED_INIT_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<callee>[A-Za-z_][A-Za-z0-9_]*(?:\s*\.\s*[A-Za-z_][A-Za-z0-9_]*)*)\s*\.\s*__init__\s*\(")
        .unwrap()
});

/// `super().__init__(` or `super(Cls, self).__init__(`
static SUPER_INIT_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bsuper\s*\([^()]*\)\s*\.\s*__init__\s*\(").unwrap());

/// Collect the complete call expressions of an init body that mention `init`
///
/// `lines` starts with the `def` line, which (with any continuation lines of
/// a multi-line declaration) is skipped. A candidate whose parentheses never
/// balance before the body ends is dropped.
pub fn extract_super_init_calls(lines: &[String]) -> Vec<String> {
    let mut init_calls = Vec::new();
    if lines.is_empty() {
        return init_calls;
    }

    let mut index = declaration_end(lines) + 1;
    while index < lines.len() {
        let line = lines[index].trim();
        if !line.contains("init") {
            index += 1;
            continue;
        }

        let mut call = line.to_string();
        while paren_balance(&call) != 0 {
            index += 1;
            match lines.get(index) {
                Some(next) => {
                    call.push(' ');
                    call.push_str(next.trim());
                }
                None => {
                    debug!("Unbalanced init call at end of body: {}", call);
                    return init_calls;
                }
            }
        }

        init_calls.push(call);
        index += 1;
    }

    init_calls
}

/// Scan the constructor of `class` for forwarding calls, keyed by ancestor name
///
/// Classes without a constructor yield an empty map. When the same ancestor
/// is called more than once the last call wins.
pub fn scan(class: &ClassObject) -> HashMap<String, SuperCallRecord> {
    let Some(init) = class.constructor() else {
        return HashMap::new();
    };

    let lines = match &init.body {
        InitBody::Declared(records) => return records.clone(),
        InitBody::Source(lines) => lines,
    };

    let mut records = HashMap::new();
    for call in extract_super_init_calls(lines) {
        let Some(record) = parse_init_call(class, init, &call) else {
            debug!("Ignoring line without an ancestor __init__ call: {}", call);
            continue;
        };
        debug!(
            "Found forwarding call from {} to {}",
            init.owner, record.ancestor_name
        );
        records.insert(record.ancestor_name.clone(), record);
    }
    records
}

/// Turn one joined call expression into a record
fn parse_init_call(class: &ClassObject, init: &InitMethod, call: &str) -> Option<SuperCallRecord> {
    if let Some(found) = SUPER_INIT_CALL.find(call) {
        let ancestor = super_target(class, init)?;
        let arguments = balanced_arguments(&call[found.end()..]);
        return Some(SuperCallRecord::new(ancestor, parse_arg_string(arguments, false)));
    }

    let captures = NAMED_INIT_CALL.captures(call)?;
    let callee = captures.name("callee")?.as_str();
    let ancestor = callee.rsplit('.').next().unwrap_or(callee).trim();
    let whole = captures.get(0)?;
    let arguments = balanced_arguments(&call[whole.end()..]);
    Some(SuperCallRecord::new(ancestor, parse_arg_string(arguments, true)))
}

/// The class `super()` refers to inside the constructor's defining class
fn super_target(class: &ClassObject, init: &InitMethod) -> Option<String> {
    if class.qualified_name() == init.owner {
        return class.ancestors().first().map(|a| a.name.clone());
    }
    let ancestors = class.ancestors();
    let owner_index = ancestors
        .iter()
        .position(|ancestor| ancestor.qualified_name() == init.owner)?;
    ancestors.get(owner_index + 1).map(|a| a.name.clone())
}

/// Text up to the parenthesis that closes an already opened one
fn balanced_arguments(text: &str) -> &str {
    let mut depth = 1usize;
    for (offset, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return &text[..offset];
                }
            }
            _ => {}
        }
    }
    text
}

/// Open minus closed parentheses
fn paren_balance(text: &str) -> isize {
    let open = text.matches('(').count() as isize;
    let closed = text.matches(')').count() as isize;
    open - closed
}

/// Index of the last line of the `def` statement
fn declaration_end(lines: &[String]) -> usize {
    let mut balance = 0isize;
    for (index, line) in lines.iter().enumerate() {
        balance += paren_balance(line);
        if balance <= 0 {
            return index;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ClassRegistry, SourceRegistry};
    use std::fs;
    use tempfile::TempDir;

    fn lines(code: &str) -> Vec<String> {
        code.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_multiline_call_is_joined() {
        let body = lines(
            "    def __init__(self, a, **kwargs):\n\
             \x20       Base.__init__(self,\n\
             \x20                     a,\n\
             \x20                     size=3)\n\
             \x20       self.a = a\n",
        );
        assert_eq!(
            extract_super_init_calls(&body),
            vec!["Base.__init__(self, a, size=3)"]
        );
    }

    #[test]
    fn test_multiline_declaration_and_last_line_call() {
        let body = lines(
            "def __init__(self,\n\
             \x20            init_value=1):\n\
             \x20   Base.__init__(self)",
        );
        assert_eq!(extract_super_init_calls(&body), vec!["Base.__init__(self)"]);
    }

    #[test]
    fn test_unbalanced_call_is_dropped() {
        let body = lines("def __init__(self):\n    Base.__init__(self,\n");
        assert!(extract_super_init_calls(&body).is_empty());
    }

    fn registry_with(code: &str) -> (TempDir, SourceRegistry) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("shapes.py"), code).unwrap();
        let registry = SourceRegistry::new(vec![dir.path().to_path_buf()]);
        (dir, registry)
    }

    #[test]
    fn test_scan_named_and_super_calls() {
        let code = r#"
class Root:
    def __init__(self, r=0):
        pass

class Base(Root):
    def __init__(self, b=1, **kwargs):
        super().__init__(**kwargs)

class Mixin:
    def __init__(self, m=2):
        pass

class Shape(Base, Mixin):
    def __init__(self, x, **kwargs):
        self.initialized = True
        shapes.Base.__init__(self, x, b = 4)
        Mixin.__init__(self)
        Mixin.__init__(self, m=9)
"#;
        let (_dir, registry) = registry_with(code);

        let shape = registry.get_class("shapes", "Shape").unwrap();
        let calls = scan(&shape);
        assert_eq!(calls.len(), 2);

        let base = &calls["Base"];
        assert_eq!(base.arguments.positional_args, vec!["x"]);
        assert_eq!(base.arguments.default_args, vec!["b"]);
        assert_eq!(base.arguments.default_values, vec!["4"]);

        // Last call to the same ancestor wins
        assert_eq!(calls["Mixin"].arguments.default_args, vec!["m"]);

        let base_class = registry.get_class("shapes", "Base").unwrap();
        let base_calls = scan(&base_class);
        let root = &base_calls["Root"];
        assert_eq!(root.arguments.forwarded_mappings, vec!["**kwargs"]);
        assert!(root.arguments.positional_args.is_empty());
    }

    #[test]
    fn test_scan_without_constructor() {
        let (_dir, registry) = registry_with("class Empty:\n    pass\n");
        let empty = registry.get_class("shapes", "Empty").unwrap();
        assert!(scan(&empty).is_empty());
    }
}
