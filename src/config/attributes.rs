//! Applying a config section to an object as attributes

use super::container::ConfigContainer;
use crate::error::{Error, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

/// Anything that accepts named text attributes
pub trait SetAttribute {
    fn set_attribute(&mut self, key: &str, value: &str);
}

impl SetAttribute for HashMap<String, String> {
    fn set_attribute(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }
}

impl SetAttribute for BTreeMap<String, String> {
    fn set_attribute(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }
}

impl SetAttribute for serde_json::Map<String, serde_json::Value> {
    fn set_attribute(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    }
}

type KeyTransform<T> = Box<dyn Fn(&mut T, &str, &str) -> String>;

/// A key pattern and the action taken for keys it matches
///
/// The transform receives the target, the current key and the value, and
/// returns the key to continue with. Returning a different key tells
/// `apply_section` the rule has handled the option itself.
pub struct KeyRule<T: ?Sized> {
    pattern: Regex,
    transform: KeyTransform<T>,
}

impl<T: ?Sized> KeyRule<T> {
    pub fn new<F>(pattern: Regex, transform: F) -> Self
    where
        F: Fn(&mut T, &str, &str) -> String + 'static,
    {
        Self {
            pattern,
            transform: Box::new(transform),
        }
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn apply(&self, target: &mut T, key: &str, value: &str) -> String {
        if self.pattern.is_match(key) {
            (self.transform)(target, key, value)
        } else {
            key.to_string()
        }
    }
}

/// Set every live option of `section` as an attribute of `target`
///
/// A missing section is ignored, unless `safe` is set, in which case it is a
/// `MissingSection` error. With `key_rules`, each key is passed through the
/// rules in turn; options whose key ends up changed are not assigned.
pub fn apply_section<T>(
    target: &mut T,
    container: &ConfigContainer,
    section: &str,
    key_rules: Option<&[KeyRule<T>]>,
    safe: bool,
) -> Result<()>
where
    T: SetAttribute + ?Sized,
{
    let Some(found) = container.section(section) else {
        if safe {
            return Err(Error::MissingSection {
                section: section.to_string(),
            });
        }
        return Ok(());
    };

    for (key, value) in found.live_options() {
        if let Some(rules) = key_rules {
            let mut current = key.to_string();
            for rule in rules {
                current = rule.apply(target, &current, value);
            }
            if current != key {
                continue;
            }
        }
        target.set_attribute(key, value);
    }
    Ok(())
}
