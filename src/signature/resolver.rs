//! Signature Resolver - the effective constructor signature of a class
//!
//! The class's own signature is extended with the defaults of every ancestor
//! its constructor forwards to, minus the defaults the forwarding call already
//! fills in. This is a best-effort reconstruction from the literal call text:
//! surplus positional entries are assumed to fill the ancestor's leading
//! defaults in order.
//!
//! Counting surplus positionals as consumed goes further than dropping only
//! the defaults a call names explicitly. It is a deliberate extension: a
//! default filled by position would otherwise be exported a second time.

use super::{extract, scan, ClassSignature, SuperCallRecord};
use crate::registry::ClassObject;
use tracing::debug;

/// Merge the class signature with unconsumed defaults of forwarded-to ancestors
pub fn resolve(class: &ClassObject) -> ClassSignature {
    let mut resolved = extract(class);
    let forwards = scan(class);

    for ancestor in class.ancestors() {
        let Some(record) = forwards.get(&ancestor.name) else {
            continue;
        };

        let defined = extract(ancestor);
        for (name, value) in unconsumed_defaults(&defined, record) {
            if resolved.contains(name) {
                continue;
            }
            debug!(
                "{}: exposing {}={} from {}",
                class.qualified_name(),
                name,
                value,
                ancestor.qualified_name()
            );
            resolved.push_default(name, value);
        }
    }

    resolved
}

/// Defaults of `defined` that the forwarding call in `record` leaves open
///
/// A default is consumed when the call names it (`name=value`) or when a
/// positional entry beyond the ancestor's required count lands on it.
pub fn unconsumed_defaults<'a>(
    defined: &'a ClassSignature,
    record: &SuperCallRecord,
) -> Vec<(&'a str, &'a str)> {
    let surplus = record
        .arguments
        .positional_args
        .len()
        .saturating_sub(defined.positional_args.len());

    defined
        .defaults()
        .skip(surplus)
        .filter(|(name, _)| !record.arguments.default_args.iter().any(|arg| arg == name))
        .collect()
}
