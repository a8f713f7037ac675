//! Type matching queries.
//!
//! These are the stateless functions the processor wrappers and the
//! dispatcher use to decide which processors apply to a value. All of them
//! operate on [`TypeDescriptor`] values and degrade gracefully: unresolvable
//! type information yields "matches the most general case", never an error.

use crate::types::{MAX_SUPERTYPE_DEPTH, RawType, TypeDescriptor};

/// Returns whether `target`'s raw type is assignable from `candidate`.
///
/// The call is not symmetric: the left side is always the declared target,
/// the right side always the candidate raw type being tested.
pub fn is_raw_assignable(target: &TypeDescriptor, candidate: &RawType) -> bool {
    target.raw_type().is_assignable_from(candidate)
}

/// Walks the supertype chain of `source` looking for `ancestor` and returns
/// the generic parameter in force at that point.
///
/// The chain walk starts at `source`'s own raw type and follows supertype
/// links. At the first ancestor equal to `ancestor`, the generic parameter
/// bound on `source` is returned, degrading to [`TypeDescriptor::any`] when
/// `source` is unparameterized. Returns `None` when the chain terminates at
/// the universal root, runs out, or exceeds [`MAX_SUPERTYPE_DEPTH`].
pub fn find_super_generic(source: &TypeDescriptor, ancestor: &RawType) -> Option<TypeDescriptor> {
    let mut current = source.raw_type();

    for _ in 0..MAX_SUPERTYPE_DEPTH {
        if current.is_any() {
            return None;
        }
        if current == ancestor {
            return Some(source.generic_or_any());
        }
        current = current.supertype()?;
    }

    None
}

/// Reconciles a declared type against the raw type of a live value.
///
/// When the raw types agree by name the declared descriptor is kept, since
/// it may carry generic information the live value cannot express. When they
/// disagree the live type wins and a raw-only descriptor of `actual` is
/// returned.
pub fn effective_type(declared: &TypeDescriptor, actual: &'static RawType) -> TypeDescriptor {
    if declared.raw_type() == actual {
        declared.clone()
    } else {
        TypeDescriptor::of(actual)
    }
}
