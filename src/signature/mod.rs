//! Signature engine - the configurable surface of a class constructor
//!
//! - `extractor`: a class's own constructor parameters
//! - `arguments`: classification of literal argument text
//! - `super_calls`: forwarding calls to ancestor constructors
//! - `resolver`: merges the class signature with forwarded ancestor defaults

pub mod arguments;
pub mod extractor;
pub mod resolver;
pub mod super_calls;

pub use arguments::{parse_arg_string, ParsedArguments};
pub use extractor::{extract, required_arguments};
pub use resolver::{resolve, unconsumed_defaults};
pub use super_calls::{extract_super_init_calls, scan};

use serde::{Deserialize, Serialize};

/// Constructor parameters split into required names and defaulted names
///
/// `default_values[i]` belongs to `default_args[i]`. Names are unique across
/// both lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSignature {
    pub positional_args: Vec<String>,
    pub default_args: Vec<String>,
    pub default_values: Vec<String>,
}

impl ClassSignature {
    /// Whether `name` is already a positional or default parameter
    pub fn contains(&self, name: &str) -> bool {
        self.positional_args.iter().any(|arg| arg == name)
            || self.default_args.iter().any(|arg| arg == name)
    }

    pub fn push_default(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.default_args.push(name.into());
        self.default_values.push(value.into());
    }

    /// (name, value) pairs in declaration order
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.default_args
            .iter()
            .map(String::as_str)
            .zip(self.default_values.iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.positional_args.is_empty() && self.default_args.is_empty()
    }
}

/// One forwarding call found in a constructor body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperCallRecord {
    pub ancestor_name: String,
    #[serde(flatten)]
    pub arguments: ParsedArguments,
}

impl SuperCallRecord {
    pub fn new(ancestor_name: impl Into<String>, arguments: ParsedArguments) -> Self {
        Self {
            ancestor_name: ancestor_name.into(),
            arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_defaults_stay_aligned() {
        let mut signature = ClassSignature {
            positional_args: vec!["a".to_string()],
            ..Default::default()
        };
        signature.push_default("c", "1");
        signature.push_default("d", "2");

        assert!(signature.contains("a"));
        assert!(signature.contains("d"));
        assert!(!signature.contains("e"));
        assert_eq!(
            signature.defaults().collect::<Vec<_>>(),
            vec![("c", "1"), ("d", "2")]
        );
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = SuperCallRecord::new("Base", parse_arg_string("self, x", true));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ancestor_name"], "Base");
        assert_eq!(json["positional_args"][0], "x");
    }
}
