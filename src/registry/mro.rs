//! C3 linearisation of a class hierarchy

use super::ClassObject;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Compute the ancestors of a class with the given direct bases, in MRO order
///
/// The class itself is not part of the result. Classes are identified by
/// qualified name. Fails when no consistent order exists, for example
/// `class C(A, B)` next to `class D(B, A)` joined by `class E(C, D)`.
pub fn linearize(class: &str, bases: &[Arc<ClassObject>]) -> Result<Vec<Arc<ClassObject>>> {
    let mut sequences: Vec<Vec<Arc<ClassObject>>> = bases
        .iter()
        .map(|base| {
            let mut linearization = Vec::with_capacity(base.mro.len() + 1);
            linearization.push(Arc::clone(base));
            linearization.extend(base.mro.iter().cloned());
            linearization
        })
        .collect();
    sequences.push(bases.to_vec());

    let mut result: Vec<Arc<ClassObject>> = Vec::new();
    loop {
        sequences.retain(|sequence| !sequence.is_empty());
        if sequences.is_empty() {
            return Ok(result);
        }

        // A good head appears in no sequence's tail
        let candidate = sequences
            .iter()
            .map(|sequence| &sequence[0])
            .find(|head| {
                let key = head.qualified_name();
                !sequences
                    .iter()
                    .any(|sequence| sequence[1..].iter().any(|c| c.qualified_name() == key))
            })
            .cloned();

        let Some(candidate) = candidate else {
            return Err(Error::InconsistentHierarchy {
                class: class.to_string(),
            });
        };

        let key = candidate.qualified_name();
        if key == class {
            return Err(Error::InconsistentHierarchy {
                class: class.to_string(),
            });
        }
        for sequence in sequences.iter_mut() {
            if sequence[0].qualified_name() == key {
                sequence.remove(0);
            }
        }
        result.push(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, bases: &[Arc<ClassObject>]) -> Arc<ClassObject> {
        Arc::new(ClassObject::new("m", name, bases, None, Vec::new()).unwrap())
    }

    fn names(mro: &[Arc<ClassObject>]) -> Vec<&str> {
        mro.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_diamond() {
        let object = Arc::new(ClassObject::opaque("builtins", "object"));
        let a = class("A", &[object.clone()]);
        let b = class("B", &[a.clone()]);
        let c = class("C", &[a.clone()]);
        let d = class("D", &[b, c]);

        assert_eq!(names(&d.mro), vec!["B", "C", "A", "object"]);
    }

    #[test]
    fn test_single_chain() {
        let a = class("A", &[]);
        let b = class("B", &[a]);
        let c = class("C", &[b]);
        assert_eq!(names(&c.mro), vec!["B", "A"]);
    }

    #[test]
    fn test_inconsistent_order_is_rejected() {
        let a = class("A", &[]);
        let b = class("B", &[]);
        let c = class("C", &[a.clone(), b.clone()]);
        let d = class("D", &[b, a]);

        let err = ClassObject::new("m", "E", &[c, d], None, Vec::new()).unwrap_err();
        assert!(matches!(err, Error::InconsistentHierarchy { class } if class == "m.E"));
    }
}
