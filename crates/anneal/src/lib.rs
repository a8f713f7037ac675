//! # Anneal
//!
//! A typed post-processing pipeline for the values web handlers return.
//!
//! ## Overview
//!
//! Handlers return wrapped representations - a scalar [`Item`], an ordered
//! [`Collection`], optionally inside a transport [`Entity`]. Anneal finds
//! every registered [`Processor`] whose declared input type matches a
//! value's *actual* runtime type, applies them in deterministic priority
//! order, and reconstitutes the envelope around the processed body.
//!
//! The declared return type of a handler is only a starting point: when the
//! live value is more specific, matching follows the live value, looking
//! into scalar content and collection elements to resolve the type actually
//! in force.
//!
//! ```text
//! ┌─────────────┐     ┌────────────┐     ┌─────────────┐
//! │   Handler   │────▶│ Dispatcher │────▶│ Processor   │
//! │   result    │     │            │────▶│ Processor   │──▶ renderer
//! └─────────────┘     └────────────┘────▶│ Processor   │
//!                                        └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use anneal::prelude::*;
//! use std::sync::Arc;
//!
//! static WIDGET: RawType = RawType::root("widget");
//!
//! struct SelfLinks;
//!
//! impl Processor for SelfLinks {
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
//!
//! let dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![Arc::new(SelfLinks)]));
//! let processed = dispatcher.dispatch(result, &declared)?;
//! ```

pub use anneal_core as core;
pub use anneal_framework as framework;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use anneal::prelude::*;
/// ```
pub mod prelude {
    // Type system
    pub use anneal_core::types::{
        ANY, COLLECTION, EMBEDDED, ENTITY, ITEM, RawType, REPRESENTATION, TypeDescriptor,
    };

    // Representation model
    pub use anneal_core::{
        BoxedContent, Collection, Content, Embedded, Entity, Headers, Item, JsonContent, Link,
        Payload, ReturnValue,
    };

    // Processor contract
    pub use anneal_core::{
        DeclaredOrder, OrderResolver, ProcessError, ProcessResult, Processor, ProcessorError,
        priority_of,
    };

    // Dispatch pipeline
    pub use anneal_framework::{
        DispatchConfig, DispatchRequest, Dispatcher, PostProcessingRenderer, ProcessorRegistry,
        RenderError, RenderResult, Renderer,
    };
}
