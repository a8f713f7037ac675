//! # Anneal Core
//!
//! Foundation types for the Anneal post-processing pipeline.
//!
//! Anneal post-processes the values web handlers return: it finds every
//! registered processor whose declared input type matches a value's actual
//! runtime type, applies them in deterministic order, and reconstitutes any
//! transport envelope that wrapped the original value. This crate provides
//! the data model that makes that possible without runtime reflection.
//!
//! ## Layers
//!
//! - **Type system**: [`RawType`] and [`TypeDescriptor`] carry the static
//!   type information the pipeline matches on, as plain descriptor values
//!   ([`types`], [`matcher`]).
//! - **Representation model**: the value shapes flowing through a dispatch -
//!   [`Item`], [`Collection`], [`Embedded`], [`Payload`] - plus [`Link`]s,
//!   [`Headers`] and the [`Entity`] envelope ([`payload`], [`link`],
//!   [`response`]).
//! - **Processor contract**: the [`Processor`] trait, priority resolution
//!   via [`OrderResolver`], and link-time discovery ([`processor`],
//!   [`discovery`]).
//!
//! ```text
//! ┌─────────────┐     ┌────────────┐     ┌─────────────┐
//! │   Handler   │────▶│ Dispatcher │────▶│ Processor   │
//! │   result    │     │ (framework)│────▶│ Processor   │──▶ renderer
//! └─────────────┘     └────────────┘────▶│ Processor   │
//!                                        └─────────────┘
//! ```
//!
//! The matching and dispatch machinery itself lives in `anneal-framework`.

pub mod content;
pub mod discovery;
pub mod error;
pub mod link;
pub mod matcher;
pub mod payload;
pub mod processor;
pub mod response;
pub mod types;

pub use content::{BoxedContent, Content, JsonContent};
pub use error::{ProcessError, ProcessResult};
pub use link::{Link, SELF_REL};
pub use matcher::{effective_type, find_super_generic, is_raw_assignable};
pub use payload::{Collection, Embedded, Item, Payload};
pub use processor::{DeclaredOrder, OrderResolver, Processor, ProcessorError, priority_of};
pub use response::{Entity, Headers, ReturnValue};
pub use types::{RawType, TypeDescriptor};

// Re-exported for the discovery attribute macro.
pub use linkme;
