//! Argument-text parsing
//!
//! Classifies the comma separated entries of a literal argument list. Nested
//! calls, list literals and dict literals inside the text are not supported:
//! their commas split entries like any other.

use serde::{Deserialize, Serialize};

/// The buckets an argument list is sorted into
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArguments {
    /// Entries without `=` or a star prefix
    pub positional_args: Vec<String>,
    /// Names of `name=value` entries, in order
    pub default_args: Vec<String>,
    /// Values of `name=value` entries, aligned with `default_args`
    pub default_values: Vec<String>,
    /// `*seq` entries, star kept
    pub forwarded_sequences: Vec<String>,
    /// `**mapping` entries, stars kept
    pub forwarded_mappings: Vec<String>,
}

/// Parse argument text such as `self, x, y=5, *args, **kwargs`
///
/// With `drop_first` the first entry (the explicit self of a forwarding call)
/// is discarded. Empty entries, as left by a trailing comma, are ignored.
pub fn parse_arg_string(text: &str, drop_first: bool) -> ParsedArguments {
    let mut parsed = ParsedArguments::default();

    let entries = text.split(',').skip(usize::from(drop_first));
    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        if entry.starts_with("**") {
            parsed.forwarded_mappings.push(entry.to_string());
        } else if entry.starts_with('*') {
            parsed.forwarded_sequences.push(entry.to_string());
        } else if let Some((name, value)) = entry.split_once('=') {
            parsed.default_args.push(name.trim().to_string());
            parsed.default_values.push(value.trim().to_string());
        } else {
            parsed.positional_args.push(entry.to_string());
        }
    }

    parsed
}
