//! # Anneal Framework
//!
//! Processor registry and dispatch for the Anneal post-processing pipeline.
//!
//! This crate turns the foundation types of `anneal-core` into a working
//! pipeline:
//!
//! - **Wrappers**: processors classified once by their declared target type
//!   into matching strategies ([`ProcessorWrapper`])
//! - **Registry**: the priority-sorted, read-only processor set and its
//!   strict left fold ([`ProcessorRegistry`])
//! - **Dispatcher**: per-request orchestration - envelope handling, type
//!   reconciliation, collection element recursion ([`Dispatcher`])
//! - **Rendering**: the async hand-off to the downstream renderer
//!   ([`Renderer`], [`PostProcessingRenderer`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use anneal_framework::{Dispatcher, ProcessorRegistry};
//!
//! let dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![
//!     Arc::new(SelfLinkProcessor),
//!     Arc::new(PagingLinksProcessor),
//! ]));
//!
//! let processed = dispatcher.dispatch(result, &declared)?;
//! ```
//!
//! Matching decisions inspect live values, not just declared types: a
//! handler declared to return `item<base>` whose body actually holds a
//! `derived` content value is routed to the processors registered for
//! `item<derived>`.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod header_links;
pub mod registry;
pub mod render;
pub mod wrapper;

pub use config::DispatchConfig;
pub use dispatcher::{DispatchRequest, Dispatcher};
pub use error::{RenderError, RenderResult};
pub use header_links::{HeaderLinksWriter, LINK_HEADER, LinkHeaderWriter};
pub use registry::ProcessorRegistry;
pub use render::{BoxedRenderer, PostProcessingRenderer, Renderer};
pub use wrapper::{ProcessorWrapper, WrappedProcessor};
