// PyO3 Bindings Module
//
// Exposes export, argument parsing and signature resolution to Python as the
// `class2config_core` extension module (built with the `python` feature).

mod api;

// Re-export for lib.rs
pub use api::{export_class_as_config, parse_arg_string, resolve_signature};
