//! Config Codec and the container it reads and writes
//!
//! - `container`: sections, options and the INI text format
//! - `codec`: export of resolved signatures, import of constructor calls
//! - `attributes`: applying a section to an object as attributes

pub mod attributes;
pub mod codec;
pub mod container;

pub use attributes::{apply_section, KeyRule, SetAttribute};
pub use codec::{
    export_class_as_config, export_into, import_class_from_config_section,
    import_classes_from_config_file, import_classes_from_container, CallPlanner,
    ConstructorCall, Instantiator, CLASS_NAME_KEY, MODULE_NAME_KEY,
};
pub use container::{is_comment_key, ConfigContainer, ConfigFormat, ConfigSection, IniFormat};
