//! Signature Extractor - a class's own constructor parameters

use super::ClassSignature;
use crate::extractors::base::ParameterKind;
use crate::registry::ClassObject;

/// Extract the constructor signature of `class` without merging ancestors
///
/// The implicit self is skipped, and so are `*args`/`**kwargs`. A class with
/// no introspectable constructor yields an empty signature.
pub fn extract(class: &ClassObject) -> ClassSignature {
    let mut signature = ClassSignature::default();
    let Some(init) = class.constructor() else {
        return signature;
    };

    for parameter in init.parameters.iter().skip(1) {
        if parameter.is_variadic() {
            continue;
        }
        match &parameter.default {
            Some(value) => signature.push_default(&parameter.name, value),
            None => signature.positional_args.push(parameter.name.clone()),
        }
    }

    signature
}

/// Required constructor parameters as (positional, keyword-only) name lists
///
/// Parameters declared after a bare `*` or `*args` cannot be passed by
/// position even when they have no default.
pub fn required_arguments(class: &ClassObject) -> (Vec<String>, Vec<String>) {
    let Some(init) = class.constructor() else {
        return (Vec::new(), Vec::new());
    };

    let mut positional = Vec::new();
    let mut keyword_only = Vec::new();
    for parameter in init.parameters.iter().skip(1) {
        if parameter.is_variadic() || parameter.default.is_some() {
            continue;
        }
        if parameter.kind == ParameterKind::KeywordOnly {
            keyword_only.push(parameter.name.clone());
        } else {
            positional.push(parameter.name.clone());
        }
    }
    (positional, keyword_only)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ClassManifest, ClassRegistry, ManifestRegistry};

    #[test]
    fn test_splits_required_and_defaulted() {
        let mut registry = ManifestRegistry::new();
        registry.register(
            ClassManifest::new("m", "Sphere")
                .param("radius")
                .default_param("material", "glass")
                .param("center")
                .var_keyword("kwargs"),
        );
        let sphere = registry.get_class("m", "Sphere").unwrap();

        let signature = extract(&sphere);
        assert_eq!(signature.positional_args, vec!["radius", "center"]);
        assert_eq!(signature.default_args, vec!["material"]);
        assert_eq!(signature.default_values, vec!["glass"]);
    }

    #[test]
    fn test_keyword_only_required_is_split_out() {
        let mut registry = ManifestRegistry::new();
        registry.register(
            ClassManifest::new("m", "Det")
                .param("width")
                .keyword_only("mode")
                .keyword_only_default("gain", "1"),
        );
        let det = registry.get_class("m", "Det").unwrap();

        assert_eq!(extract(&det).positional_args, vec!["width", "mode"]);
        let (positional, keyword_only) = required_arguments(&det);
        assert_eq!(positional, vec!["width"]);
        assert_eq!(keyword_only, vec!["mode"]);
    }

    #[test]
    fn test_no_constructor_is_empty() {
        let object = ClassObject::opaque("builtins", "object");
        assert!(extract(&object).is_empty());
        assert_eq!(required_arguments(&object), (Vec::new(), Vec::new()));
    }
}
