//! Type descriptors for the Anneal pipeline.
//!
//! Processor selection needs to answer containment and assignability queries
//! about the values flowing through the pipeline, without any runtime
//! reflection. This module provides the two data types those queries run on:
//!
//! - [`RawType`] - a named type identifier with an optional single-parent
//!   supertype link. Raw types are declared once as `static` values and
//!   referenced by address, so a type graph is ordinary linked data.
//! - [`TypeDescriptor`] - a raw type plus an optional single generic
//!   parameter, e.g. `collection<item<widget>>`.
//!
//! # Built-in shape types
//!
//! The pipeline recognizes a bounded set of wrapper shapes, declared here as
//! statics: [`REPRESENTATION`] (the links-bearing base), [`ITEM`] (scalar
//! wrapper), [`COLLECTION`] (container wrapper), [`EMBEDDED`] (placeholder
//! element) and [`ENTITY`] (transport envelope marker). Domain crates declare
//! their own raw types for payload content:
//!
//! ```rust,ignore
//! use anneal_core::RawType;
//!
//! static PART: RawType = RawType::root("part");
//! static BOLT: RawType = RawType::extending("bolt", &PART);
//! ```
//!
//! # Degradation
//!
//! Missing type information is never an error. The universal [`ANY`] type
//! stands in for anything unresolvable; it is assignable from every other
//! type and therefore matches only the most general targets.

use std::fmt;

/// Upper bound on supertype chain walks.
///
/// Real type graphs are shallow; a chain longer than this is treated as
/// "no match found" rather than walked to completion.
pub const MAX_SUPERTYPE_DEPTH: usize = 64;

/// The universal type. Assignable from everything, ancestor of nothing.
pub static ANY: RawType = RawType::root("any");

/// Base shape for link-bearing wrapper values.
pub static REPRESENTATION: RawType = RawType::root("representation");

/// The scalar wrapper shape: one content value plus links.
pub static ITEM: RawType = RawType::extending("item", &REPRESENTATION);

/// The container wrapper shape: an ordered element sequence plus links.
pub static COLLECTION: RawType = RawType::extending("collection", &REPRESENTATION);

/// The embedded placeholder shape used inside collections.
pub static EMBEDDED: RawType = RawType::root("embedded");

/// The transport envelope marker. Only ever appears in declared types, where
/// the payload type is carried as the generic parameter.
pub static ENTITY: RawType = RawType::root("entity");

// =============================================================================
// RawType
// =============================================================================

/// A named type identifier with an optional supertype link.
///
/// Raw types model a single-parent hierarchy: each type has at most one
/// supertype, and chains are acyclic by construction. Identity is the name;
/// names must be unique within a type graph.
#[derive(Debug)]
pub struct RawType {
    name: &'static str,
    supertype: Option<&'static RawType>,
}

impl RawType {
    /// Declares a raw type with no supertype.
    pub const fn root(name: &'static str) -> Self {
        Self {
            name,
            supertype: None,
        }
    }

    /// Declares a raw type extending the given supertype.
    pub const fn extending(name: &'static str, supertype: &'static RawType) -> Self {
        Self {
            name,
            supertype: Some(supertype),
        }
    }

    /// Returns the name of this type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the direct supertype, if any.
    pub fn supertype(&self) -> Option<&'static RawType> {
        self.supertype
    }

    /// Returns whether this is the universal [`ANY`] type.
    pub fn is_any(&self) -> bool {
        self.name == ANY.name
    }

    /// Returns whether a value of type `candidate` can stand in for a value
    /// of this type.
    ///
    /// True when `self` is [`ANY`] or appears on `candidate`'s supertype
    /// chain. The walk is capped at [`MAX_SUPERTYPE_DEPTH`]; chains longer
    /// than that are treated as not assignable.
    pub fn is_assignable_from(&self, candidate: &RawType) -> bool {
        if self.is_any() {
            return true;
        }

        let mut current = Some(candidate);
        for _ in 0..MAX_SUPERTYPE_DEPTH {
            match current {
                Some(ty) => {
                    if ty == self {
                        return true;
                    }
                    current = ty.supertype;
                }
                None => return false,
            }
        }

        false
    }
}

impl PartialEq for RawType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for RawType {}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// =============================================================================
// TypeDescriptor
// =============================================================================

/// A raw type together with an optional single generic parameter.
///
/// Descriptors are the static type information attached to processors at
/// registration time and supplied by the producing context per request. They
/// are plain values, cheap to clone, and nestable:
///
/// ```rust,ignore
/// // collection<item<widget>>
/// let declared = TypeDescriptor::parameterized(
///     &COLLECTION,
///     TypeDescriptor::parameterized(&ITEM, TypeDescriptor::of(&WIDGET)),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    raw: &'static RawType,
    generic: Option<Box<TypeDescriptor>>,
}

impl TypeDescriptor {
    /// Creates a descriptor for a raw type with no generic parameter.
    pub fn of(raw: &'static RawType) -> Self {
        Self { raw, generic: None }
    }

    /// Creates a descriptor for a raw type with the given generic parameter.
    pub fn parameterized(raw: &'static RawType, generic: TypeDescriptor) -> Self {
        Self {
            raw,
            generic: Some(Box::new(generic)),
        }
    }

    /// The degenerate descriptor: `any`, with no generic parameter.
    pub fn any() -> Self {
        Self::of(&ANY)
    }

    /// Returns the raw type of this descriptor.
    pub fn raw_type(&self) -> &'static RawType {
        self.raw
    }

    /// Returns the generic parameter, if one is bound.
    pub fn generic(&self) -> Option<&TypeDescriptor> {
        self.generic.as_deref()
    }

    /// Returns the generic parameter, degrading to [`TypeDescriptor::any`]
    /// when none is bound.
    pub fn generic_or_any(&self) -> TypeDescriptor {
        match &self.generic {
            Some(generic) => (**generic).clone(),
            None => TypeDescriptor::any(),
        }
    }

    /// Returns whether this is the degenerate `any` descriptor.
    pub fn is_any(&self) -> bool {
        self.raw.is_any()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.generic {
            Some(generic) => write!(f, "{}<{}>", self.raw, generic),
            None => write!(f, "{}", self.raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PART: RawType = RawType::root("part");
    static BOLT: RawType = RawType::extending("bolt", &PART);
    static HEX_BOLT: RawType = RawType::extending("hex_bolt", &BOLT);
    static NUT: RawType = RawType::extending("nut", &PART);

    #[test]
    fn assignable_from_self() {
        assert!(PART.is_assignable_from(&PART));
    }

    #[test]
    fn assignable_from_subtype_chain() {
        assert!(PART.is_assignable_from(&BOLT));
        assert!(PART.is_assignable_from(&HEX_BOLT));
        assert!(BOLT.is_assignable_from(&HEX_BOLT));
    }

    #[test]
    fn not_assignable_from_supertype_or_sibling() {
        assert!(!BOLT.is_assignable_from(&PART));
        assert!(!BOLT.is_assignable_from(&NUT));
        assert!(!NUT.is_assignable_from(&HEX_BOLT));
    }

    #[test]
    fn any_is_assignable_from_everything() {
        assert!(ANY.is_assignable_from(&PART));
        assert!(ANY.is_assignable_from(&ANY));
        assert!(!PART.is_assignable_from(&ANY));
    }

    #[test]
    fn builtin_shapes_share_the_representation_base() {
        assert!(REPRESENTATION.is_assignable_from(&ITEM));
        assert!(REPRESENTATION.is_assignable_from(&COLLECTION));
        assert!(!ITEM.is_assignable_from(&COLLECTION));
        assert!(!REPRESENTATION.is_assignable_from(&EMBEDDED));
    }

    #[test]
    fn assignability_walk_is_depth_capped() {
        // Generated hierarchies can be arbitrarily deep; the walk must give
        // up rather than crawl them to the end.
        let root: &'static RawType = Box::leak(Box::new(RawType::root("gen-0")));
        let mut current = root;
        for i in 1..MAX_SUPERTYPE_DEPTH + 8 {
            let name: &'static str = Box::leak(format!("gen-{i}").into_boxed_str());
            current = Box::leak(Box::new(RawType::extending(name, current)));
        }

        assert!(!root.is_assignable_from(current));
        assert!(current.supertype().unwrap().is_assignable_from(current));
    }

    #[test]
    fn descriptor_display_nests_generics() {
        let descriptor = TypeDescriptor::parameterized(
            &COLLECTION,
            TypeDescriptor::parameterized(&ITEM, TypeDescriptor::of(&BOLT)),
        );
        assert_eq!(descriptor.to_string(), "collection<item<bolt>>");
    }

    #[test]
    fn generic_or_any_degrades() {
        let raw_only = TypeDescriptor::of(&ITEM);
        assert!(raw_only.generic_or_any().is_any());

        let bound = TypeDescriptor::parameterized(&ITEM, TypeDescriptor::of(&BOLT));
        assert_eq!(bound.generic_or_any(), TypeDescriptor::of(&BOLT));
    }
}
