//! The processor contract.
//!
//! A [`Processor`] is a registered unit of transformation over handler
//! result payloads. Each processor declares, once, the target type it wants
//! to be invoked for; the framework layer classifies processors by that
//! declaration and decides per request which ones apply.
//!
//! # Ordering
//!
//! Processors run in ascending priority order, lower first. Priority is
//! resolved through the [`OrderResolver`] collaborator so that deployments
//! with an external ordering scheme can plug their own in; the default
//! [`DeclaredOrder`] simply asks the processor itself via
//! [`Processor::order`]. Ties keep registration order.
//!
//! # Example
//!
//! ```rust,ignore
//! use anneal_core::{Item, Link, Payload, Processor, ProcessorError, TypeDescriptor};
//! use anneal_core::types::ITEM;
//!
//! struct SelfLinkProcessor;
//!
//! impl Processor for SelfLinkProcessor {
//!     fn name(&self) -> &str {
//!         "self_link"
//!     }
//!
//!     fn target_type(&self) -> TypeDescriptor {
//!         TypeDescriptor::parameterized(&ITEM, TypeDescriptor::of(&WIDGET))
//!     }
//!
//!     fn process(&self, payload: Payload) -> Result<Payload, ProcessorError> {
//!         match payload {
//!             Payload::Item(item) => Ok(item.with_link(Link::to_self("/widgets/1")).into()),
//!             other => Ok(other),
//!         }
//!     }
//! }
//! ```

use crate::payload::Payload;
use crate::types::TypeDescriptor;

/// Error type produced by a processor's own logic.
///
/// Processor failures are outside the pipeline's contract to mask; they are
/// carried to the caller unchanged as the source of a
/// [`ProcessError`](crate::error::ProcessError).
pub type ProcessorError = Box<dyn std::error::Error + Send + Sync>;

/// A registered transformation over handler result payloads.
///
/// Implementations are registered once and never mutated afterward; `process`
/// must be callable from concurrent dispatches if the registry is shared.
/// The framework guarantees that a payload handed to `process` has already
/// passed this processor's type match for the same computed effective type.
pub trait Processor: Send + Sync {
    /// A short name for diagnostics and error context.
    fn name(&self) -> &str {
        "anonymous"
    }

    /// The declared target type this processor wants to be invoked for.
    ///
    /// Consulted once at registration time; the raw type decides the
    /// processor's classification and the generic parameter drives content
    /// matching.
    fn target_type(&self) -> TypeDescriptor;

    /// Transforms the payload.
    ///
    /// The returned payload replaces the input for all lower-priority
    /// processors in the same dispatch.
    fn process(&self, payload: Payload) -> Result<Payload, ProcessorError>;

    /// The declared priority of this processor. Lower runs first.
    fn order(&self) -> i32 {
        0
    }
}

/// Collaborator that resolves a processor's priority.
pub trait OrderResolver: Send + Sync {
    /// Returns the priority of the given processor. Lower runs first.
    fn order_of(&self, processor: &dyn Processor) -> i32;
}

/// The default order resolution: the processor's own declared order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredOrder;

impl OrderResolver for DeclaredOrder {
    fn order_of(&self, processor: &dyn Processor) -> i32 {
        processor.order()
    }
}

/// Resolves the priority of a processor through the given resolver.
pub fn priority_of(resolver: &dyn OrderResolver, processor: &dyn Processor) -> i32 {
    resolver.order_of(processor)
}
