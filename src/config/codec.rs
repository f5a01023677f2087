//! Config Codec - classes to config sections and back
//!
//! Export writes the resolved signature of a class into a new section:
//! documentation as comments, the two bookkeeping options, one blank option
//! per required argument and one commented-out option per inferred default.
//!
//! Import reads sections back into constructor calls. Only the class's own
//! required arguments are read positionally, except keyword-only ones; every
//! other live option is a keyword override.

use super::container::{ConfigContainer, ConfigFormat, ConfigSection};
use crate::error::{Error, Result};
use crate::registry::{ClassObject, ClassRegistry};
use crate::signature::{required_arguments, resolve};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Option recording the module a section is imported from
pub const MODULE_NAME_KEY: &str = "config2class_import_module_name";
/// Option recording the class a section instantiates
pub const CLASS_NAME_KEY: &str = "config2class_import_class_name";

/// Add a section for `module_name.class_name` to `container`
///
/// The section is named `instance_name`, or the class name when absent. The
/// class is resolved before anything is written, so a failed lookup or an
/// existing section leaves the container untouched.
pub fn export_into<R: ClassRegistry>(
    registry: &R,
    container: &mut ConfigContainer,
    module_name: &str,
    class_name: &str,
    instance_name: Option<&str>,
) -> Result<()> {
    let section_name = instance_name.unwrap_or(class_name);
    if container.has_section(section_name) {
        return Err(Error::SectionAlreadyExists {
            section: section_name.to_string(),
        });
    }

    let class = registry.get_class(module_name, class_name)?;
    let signature = resolve(&class);
    let documentation: Vec<String> = class.documentation_lines().collect();

    let section = container.add_section(section_name)?;
    section.comment_lines = documentation;
    section.set(MODULE_NAME_KEY, module_name);
    section.set(CLASS_NAME_KEY, class_name);
    for arg in &signature.positional_args {
        section.set(arg.as_str(), "");
    }
    for (arg, value) in signature.defaults() {
        section.set(format!("#{}", arg), value);
    }

    info!(
        "Exported {}.{} as [{}] ({} required, {} defaults)",
        module_name,
        class_name,
        section_name,
        signature.positional_args.len(),
        signature.default_args.len()
    );
    Ok(())
}

/// Export one class, starting a new container when none is given
pub fn export_class_as_config<R: ClassRegistry>(
    registry: &R,
    module_name: &str,
    class_name: &str,
    instance_name: Option<&str>,
    container: Option<ConfigContainer>,
) -> Result<ConfigContainer> {
    let mut container = container.unwrap_or_default();
    export_into(registry, &mut container, module_name, class_name, instance_name)?;
    Ok(container)
}

/// The constructor call one section stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorCall {
    pub module_name: String,
    pub class_name: String,
    pub section: String,
    /// Values of the class's required positional arguments, in declaration order
    pub positional: Vec<String>,
    /// Every other live option, passed through as text
    pub keywords: BTreeMap<String, String>,
}

/// Turns a planned constructor call into an instance
pub trait Instantiator {
    type Output;

    fn instantiate(&mut self, class: &ClassObject, call: &ConstructorCall) -> Result<Self::Output>;
}

impl<F, T> Instantiator for F
where
    F: FnMut(&ClassObject, &ConstructorCall) -> Result<T>,
{
    type Output = T;

    fn instantiate(&mut self, class: &ClassObject, call: &ConstructorCall) -> Result<T> {
        self(class, call)
    }
}

/// Instantiator that hands back the call plan itself
#[derive(Debug, Clone, Copy, Default)]
pub struct CallPlanner;

impl Instantiator for CallPlanner {
    type Output = ConstructorCall;

    fn instantiate(&mut self, _class: &ClassObject, call: &ConstructorCall) -> Result<ConstructorCall> {
        Ok(call.clone())
    }
}

/// Module and class named by a section's bookkeeping options
fn bookkeeping(section: &ConfigSection) -> Result<(&str, &str)> {
    match (section.get(MODULE_NAME_KEY), section.get(CLASS_NAME_KEY)) {
        (Some(module_name), Some(class_name)) => Ok((module_name, class_name)),
        _ => Err(Error::MissingBookkeepingOptions {
            section: section.name.clone(),
        }),
    }
}

/// Resolve the class of a section and read its call arguments
fn plan_call<R: ClassRegistry>(
    registry: &R,
    section: &ConfigSection,
) -> Result<(Arc<ClassObject>, ConstructorCall)> {
    let (module_name, class_name) = bookkeeping(section)?;
    let class = registry.get_class(module_name, class_name)?;
    let (required, keyword_only) = required_arguments(&class);
    let missing = |arg: &String| Error::MissingOption {
        section: section.name.clone(),
        option: arg.clone(),
    };

    let positional = required
        .iter()
        .map(|arg| section.get(arg).map(str::to_string).ok_or_else(|| missing(arg)))
        .collect::<Result<Vec<_>>>()?;
    if let Some(arg) = keyword_only.iter().find(|arg| !section.has_option(arg)) {
        return Err(missing(arg));
    }

    let keywords = section
        .live_options()
        .filter(|(key, _)| *key != MODULE_NAME_KEY && *key != CLASS_NAME_KEY)
        .filter(|(key, _)| !required.iter().any(|arg| arg == key))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    let call = ConstructorCall {
        module_name: module_name.to_string(),
        class_name: class_name.to_string(),
        section: section.name.clone(),
        positional,
        keywords,
    };
    Ok((class, call))
}

/// Instantiate the class one section describes
pub fn import_class_from_config_section<R, I>(
    registry: &R,
    container: &ConfigContainer,
    section_name: &str,
    instantiator: &mut I,
) -> Result<I::Output>
where
    R: ClassRegistry,
    I: Instantiator,
{
    let section = container
        .section(section_name)
        .ok_or_else(|| Error::MissingSection {
            section: section_name.to_string(),
        })?;
    let (class, call) = plan_call(registry, section)?;
    debug!("Instantiating [{}] as {}", call.section, class.qualified_name());
    instantiator.instantiate(&class, &call)
}

/// Instantiate every section of `container`, keyed by section name
///
/// All sections are checked and planned before the first instantiation, so a
/// bad section anywhere means nothing is instantiated.
pub fn import_classes_from_container<R, I>(
    registry: &R,
    container: &ConfigContainer,
    instantiator: &mut I,
) -> Result<HashMap<String, I::Output>>
where
    R: ClassRegistry,
    I: Instantiator,
{
    for section in container.sections() {
        bookkeeping(section)?;
    }

    let plans = container
        .sections()
        .map(|section| plan_call(registry, section))
        .collect::<Result<Vec<_>>>()?;

    let mut instances = HashMap::with_capacity(plans.len());
    for (class, call) in plans {
        debug!("Instantiating [{}] as {}", call.section, class.qualified_name());
        let instance = instantiator.instantiate(&class, &call)?;
        instances.insert(call.section, instance);
    }
    Ok(instances)
}

/// Read `path` with `format` and instantiate every section
pub fn import_classes_from_config_file<R, F, I>(
    registry: &R,
    path: &Path,
    format: &F,
    instantiator: &mut I,
) -> Result<HashMap<String, I::Output>>
where
    R: ClassRegistry,
    F: ConfigFormat + ?Sized,
    I: Instantiator,
{
    let container = format.read(path)?;
    info!(
        "Importing {} sections from {}",
        container.len(),
        path.display()
    );
    import_classes_from_container(registry, &container, instantiator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IniFormat;
    use crate::registry::{ClassManifest, ManifestRegistry};
    use tempfile::TempDir;

    fn registry() -> ManifestRegistry {
        let mut registry = ManifestRegistry::new();
        registry
            .register(
                ClassManifest::new("shapes", "Foo")
                    .param("a")
                    .param("b")
                    .default_param("c", "1")
                    .default_param("d", "2")
                    .doc_line("\"\"\"")
                    .doc_line("A foo.")
                    .doc_line("\"\"\""),
            )
            .register(
                ClassManifest::new("shapes", "Base")
                    .param("size")
                    .default_param("color", "red"),
            )
            .register(
                ClassManifest::new("shapes", "Det")
                    .param("width")
                    .keyword_only("mode")
                    .keyword_only_default("gain", "1"),
            )
            .register(
                ClassManifest::new("shapes", "Child")
                    .base("Base")
                    .param("size")
                    .var_keyword("kwargs")
                    .forwards_to("Base", "self, size, **kwargs"),
            );
        registry
    }

    #[test]
    fn test_export_layout() {
        let container = export_class_as_config(&registry(), "shapes", "Foo", None, None).unwrap();
        let section = container.section("Foo").unwrap();

        assert_eq!(section.comment_lines, vec!["\"\"\"", "A foo.", "\"\"\""]);
        assert_eq!(
            section.options().collect::<Vec<_>>(),
            vec![
                (MODULE_NAME_KEY, "shapes"),
                (CLASS_NAME_KEY, "Foo"),
                ("a", ""),
                ("b", ""),
                ("#c", "1"),
                ("#d", "2"),
            ]
        );
    }

    #[test]
    fn test_export_into_existing_section_fails_untouched() {
        let registry = registry();
        let mut container = ConfigContainer::new();
        container.add_section("Foo").unwrap().set("keep", "me");
        let before = container.clone();

        let err = export_into(&registry, &mut container, "shapes", "Foo", Some("Foo")).unwrap_err();
        assert!(matches!(err, Error::SectionAlreadyExists { .. }));
        assert_eq!(container, before);
    }

    #[test]
    fn test_export_unknown_class_leaves_container() {
        let mut container = ConfigContainer::new();
        let err = export_into(&registry(), &mut container, "shapes", "Nope", None).unwrap_err();
        assert!(matches!(err, Error::ClassNotFound { .. }));
        assert!(container.is_empty());
    }

    #[test]
    fn test_round_trip_through_file() {
        let registry = registry();
        let mut container = export_class_as_config(&registry, "shapes", "Foo", Some("first"), None).unwrap();
        let section = container.section_mut("first").unwrap();
        section.set("a", "10");
        section.set("b", "20");

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("foo.ini");
        IniFormat.write(&container, &path).unwrap();

        let calls =
            import_classes_from_config_file(&registry, &path, &IniFormat, &mut CallPlanner).unwrap();
        let call = &calls["first"];
        assert_eq!(call.class_name, "Foo");
        assert_eq!(call.positional, vec!["10", "20"]);
        assert!(call.keywords.is_empty());
    }

    #[test]
    fn test_uncommented_default_becomes_keyword() {
        let registry = registry();
        let text = format!(
            "[Kid]\n{} = shapes\n{} = Child\nsize = 3\ncolor = blue\n",
            MODULE_NAME_KEY, CLASS_NAME_KEY
        );
        let container = IniFormat.parse(&text, "kid.ini").unwrap();

        let call =
            import_class_from_config_section(&registry, &container, "Kid", &mut CallPlanner).unwrap();
        assert_eq!(call.positional, vec!["3"]);
        assert_eq!(call.keywords.get("color").map(String::as_str), Some("blue"));
        assert_eq!(call.keywords.len(), 1);
    }

    #[test]
    fn test_missing_bookkeeping_instantiates_nothing() {
        let registry = registry();
        let text = format!(
            "[Good]\n{m} = shapes\n{c} = Base\nsize = 1\n\n[Bad]\n{m} = shapes\nsize = 2\n",
            m = MODULE_NAME_KEY,
            c = CLASS_NAME_KEY
        );
        let container = IniFormat.parse(&text, "bad.ini").unwrap();

        let mut created = Vec::new();
        let mut record = |_: &ClassObject, call: &ConstructorCall| -> Result<()> {
            created.push(call.section.clone());
            Ok(())
        };
        let err = import_classes_from_container(&registry, &container, &mut record).unwrap_err();

        match err {
            Error::MissingBookkeepingOptions { section } => assert_eq!(section, "Bad"),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(created.is_empty());
    }

    fn optics() -> crate::registry::SourceRegistry {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_samples/python");
        crate::registry::SourceRegistry::new(vec![root])
    }

    #[test]
    fn test_export_source_class() {
        let container =
            export_class_as_config(&optics(), "optics.lenses", "Lens", Some("objective"), None).unwrap();

        assert_eq!(
            container.to_ini_string(),
            "[objective]\n\
             ;\"\"\"\n\
             ;A thin lens.\n\
             ;focal_length: focal length in mm\n\
             ;\"\"\"\n\
             config2class_import_module_name = optics.lenses\n\
             config2class_import_class_name = Lens\n\
             focal_length =\n\
             #aperture = 2.8\n\
             #coating = mgf2\n\
             #position = 0.0\n\
             #enabled = True\n"
        );
    }

    #[test]
    fn test_import_bench_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_samples/python/optics_bench.ini");
        let calls =
            import_classes_from_config_file(&optics(), &path, &IniFormat, &mut CallPlanner).unwrap();

        assert_eq!(calls.len(), 2);
        let objective = &calls["objective"];
        assert_eq!(objective.positional, vec!["50"]);
        assert_eq!(
            objective.keywords.iter().collect::<Vec<_>>(),
            vec![(&"coating".to_string(), &"none".to_string())]
        );
        assert_eq!(calls["fold"].class_name, "Mirror");
        assert_eq!(calls["fold"].positional, vec!["120"]);
    }

    #[test]
    fn test_missing_required_option() {
        let registry = registry();
        let text = format!(
            "[Sized]\n{} = shapes\n{} = Base\n",
            MODULE_NAME_KEY, CLASS_NAME_KEY
        );
        let container = IniFormat.parse(&text, "sized.ini").unwrap();

        let err =
            import_class_from_config_section(&registry, &container, "Sized", &mut CallPlanner)
                .unwrap_err();
        assert!(matches!(err, Error::MissingOption { ref option, .. } if option == "size"));
    }

    #[test]
    fn test_keyword_only_required_is_passed_by_name() {
        let registry = registry();
        let exported = export_class_as_config(&registry, "shapes", "Det", Some("d"), None).unwrap();
        assert_eq!(
            exported.section("d").unwrap().options().skip(2).collect::<Vec<_>>(),
            vec![("width", ""), ("mode", ""), ("#gain", "1")]
        );

        let text = format!(
            "[d]\n{} = shapes\n{} = Det\nwidth = 1\nmode = fast\n",
            MODULE_NAME_KEY, CLASS_NAME_KEY
        );
        let container = IniFormat.parse(&text, "det.ini").unwrap();
        let call = import_class_from_config_section(&registry, &container, "d", &mut CallPlanner).unwrap();
        assert_eq!(call.positional, vec!["1"]);
        assert_eq!(
            call.keywords.iter().collect::<Vec<_>>(),
            vec![(&"mode".to_string(), &"fast".to_string())]
        );
    }

    #[test]
    fn test_missing_keyword_only_required_option() {
        let registry = registry();
        let text = format!(
            "[d]\n{} = shapes\n{} = Det\nwidth = 1\n",
            MODULE_NAME_KEY, CLASS_NAME_KEY
        );
        let container = IniFormat.parse(&text, "det.ini").unwrap();

        let err = import_class_from_config_section(&registry, &container, "d", &mut CallPlanner).unwrap_err();
        assert!(matches!(err, Error::MissingOption { ref option, .. } if option == "mode"));
    }

    #[test]
    fn test_multiline_default_survives_file_round_trip() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("notes.py"),
            "class Note:\n    def __init__(self, title, body=\"\"\"first\nsecond\"\"\"):\n        self.title = title\n",
        )
        .unwrap();
        let registry = crate::registry::SourceRegistry::new(vec![dir.path().to_path_buf()]);

        let container = export_class_as_config(&registry, "notes", "Note", None, None).unwrap();
        let path = dir.path().join("note.ini");
        IniFormat.write(&container, &path).unwrap();

        let read = IniFormat.read(&path).unwrap();
        let note = read.section("Note").unwrap();
        assert_eq!(note.get("title"), Some(""));

        let calls = import_classes_from_container(&registry, &read, &mut CallPlanner).unwrap();
        assert_eq!(calls["Note"].positional, vec![""]);
        assert!(calls["Note"].keywords.is_empty());
    }
}
