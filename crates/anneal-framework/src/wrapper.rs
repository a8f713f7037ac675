//! Processor wrappers.
//!
//! A [`ProcessorWrapper`] pairs a registered processor with the matching
//! strategy its declared target type calls for. Classification happens once,
//! at registry construction; afterward a wrapper answers two questions per
//! dispatch: "does this processor apply to this (type, value) pair?" and
//! "invoke it".
//!
//! # Strategies
//!
//! - **Default** - the processor targets something general: the declared
//!   target raw type must be assignable from the effective type's raw type.
//!   No content inspection.
//! - **Item** - the processor targets the scalar wrapper shape: on top of
//!   the default rule, the effective type must be item-shaped and the
//!   wrapped content's own type must satisfy the processor's declared
//!   content type. Content-less items fail closed.
//! - **Collection** - the processor targets the container wrapper shape: on
//!   top of the default rule, the value must be a non-empty collection whose
//!   first element satisfies the processor's declared element type. Empty
//!   collections fail closed.

use std::fmt;
use std::sync::Arc;

use anneal_core::matcher::{find_super_generic, is_raw_assignable};
use anneal_core::payload::{Collection, Item, Payload};
use anneal_core::processor::{OrderResolver, Processor, priority_of};
use anneal_core::types::{COLLECTION, ITEM, TypeDescriptor};
use anneal_core::{ProcessError, ProcessResult};

/// A processor bound to its registration-time metadata.
///
/// The declared target type and the resolved priority are computed once here
/// and never re-derived.
pub struct WrappedProcessor {
    processor: Arc<dyn Processor>,
    target: TypeDescriptor,
    order: i32,
}

impl WrappedProcessor {
    fn new(processor: Arc<dyn Processor>, resolver: &dyn OrderResolver) -> Self {
        let target = processor.target_type();
        let order = priority_of(resolver, processor.as_ref());
        Self {
            processor,
            target,
            order,
        }
    }

    /// The declared target type of the underlying processor.
    pub fn target(&self) -> &TypeDescriptor {
        &self.target
    }

    /// The priority resolved at registration time. Lower runs first.
    pub fn order(&self) -> i32 {
        self.order
    }

    /// The underlying processor's name.
    pub fn name(&self) -> &str {
        self.processor.name()
    }

    fn supports_raw(&self, ty: &TypeDescriptor) -> bool {
        is_raw_assignable(&self.target, ty.raw_type())
    }

    fn invoke(&self, payload: Payload) -> ProcessResult<Payload> {
        self.processor
            .process(payload)
            .map_err(|source| ProcessError::Processor {
                processor: self.processor.name().to_string(),
                source,
            })
    }
}

/// A classified processor with its matching strategy.
pub enum ProcessorWrapper {
    /// Matches on declared raw type alone.
    Default(WrappedProcessor),
    /// Matches scalar wrappers, inspecting the wrapped content's type.
    Item(WrappedProcessor),
    /// Matches container wrappers, inspecting the first element's type.
    Collection(WrappedProcessor),
}

impl ProcessorWrapper {
    /// Classifies a processor by the raw type of its declared target.
    pub fn classify(processor: Arc<dyn Processor>, resolver: &dyn OrderResolver) -> Self {
        let wrapped = WrappedProcessor::new(processor, resolver);
        let raw = wrapped.target.raw_type();

        if ITEM.is_assignable_from(raw) {
            Self::Item(wrapped)
        } else if COLLECTION.is_assignable_from(raw) {
            Self::Collection(wrapped)
        } else {
            Self::Default(wrapped)
        }
    }

    fn inner(&self) -> &WrappedProcessor {
        match self {
            Self::Default(wrapped) | Self::Item(wrapped) | Self::Collection(wrapped) => wrapped,
        }
    }

    /// The priority resolved at registration time. Lower runs first.
    pub fn order(&self) -> i32 {
        self.inner().order()
    }

    /// The underlying processor's name.
    pub fn name(&self) -> &str {
        self.inner().name()
    }

    /// The strategy name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Default(_) => "default",
            Self::Item(_) => "item",
            Self::Collection(_) => "collection",
        }
    }

    /// Returns whether the underlying processor applies to the given
    /// effective type, additionally inspecting the value that would be
    /// handed to it.
    pub fn supports(&self, ty: &TypeDescriptor, value: &Payload) -> bool {
        match self {
            Self::Default(wrapped) => wrapped.supports_raw(ty),
            Self::Item(wrapped) => {
                ITEM.is_assignable_from(ty.raw_type())
                    && wrapped.supports_raw(ty)
                    && item_matches(value.as_item(), &wrapped.target)
            }
            Self::Collection(wrapped) => {
                COLLECTION.is_assignable_from(ty.raw_type())
                    && wrapped.supports_raw(ty)
                    && collection_matches(value.as_collection(), &wrapped.target)
            }
        }
    }

    /// Invokes the underlying processor.
    ///
    /// Callers must have checked [`supports`](Self::supports) with the same
    /// effective type first.
    pub fn invoke(&self, payload: Payload) -> ProcessResult<Payload> {
        self.inner().invoke(payload)
    }
}

impl fmt::Debug for ProcessorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorWrapper")
            .field("kind", &self.kind())
            .field("processor", &self.name())
            .field("target", &self.inner().target().to_string())
            .field("order", &self.order())
            .finish()
    }
}

/// Returns whether an item value satisfies a processor's declared target.
///
/// The item's shape must be assignable to the target, content must be
/// present, and the content's own type must satisfy the generic parameter
/// the target binds at the item shape. Everything else fails closed.
fn item_matches(item: Option<&Item>, target: &TypeDescriptor) -> bool {
    let Some(item) = item else {
        return false;
    };
    if !target.raw_type().is_assignable_from(item.raw_type()) {
        return false;
    }
    let Some(content) = item.content() else {
        return false;
    };

    match find_super_generic(target, &ITEM) {
        Some(expected) => expected.raw_type().is_assignable_from(content.raw_type()),
        None => false,
    }
}

/// Returns whether a collection value satisfies a processor's declared
/// target, judged by its first element.
fn collection_matches(collection: Option<&Collection>, target: &TypeDescriptor) -> bool {
    let Some(collection) = collection else {
        return false;
    };
    let Some(first) = collection.first() else {
        return false;
    };
    let Some(element_target) = find_super_generic(target, &COLLECTION) else {
        return false;
    };

    match first {
        Payload::Item(item) => item_matches(Some(item), &element_target),
        Payload::Embedded(embedded) => {
            element_target.raw_type().is_assignable_from(embedded.target())
        }
        _ => false,
    }
}
