//! The rendering boundary.
//!
//! Post-processing sits between the producing context and whatever finally
//! renders the result. The renderer is an external collaborator behind the
//! [`Renderer`] trait; [`PostProcessingRenderer`] wraps one and interposes a
//! dispatch pass on every handled value.
//!
//! ```rust,ignore
//! use anneal_framework::{PostProcessingRenderer, Renderer};
//!
//! let handler = PostProcessingRenderer::new(renderer, processors)
//!     .root_links_as_headers(true);
//!
//! if handler.supports(&declared) {
//!     handler.handle(result, &declared).await?;
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use anneal_core::processor::Processor;
use anneal_core::response::ReturnValue;
use anneal_core::types::TypeDescriptor;

use crate::dispatcher::Dispatcher;
use crate::error::RenderResult;
use crate::registry::ProcessorRegistry;

/// The downstream renderer a processed result is handed to.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Returns whether this renderer can handle results of the given
    /// declared type.
    fn supports(&self, declared: &TypeDescriptor) -> bool {
        let _ = declared;
        true
    }

    /// Renders the result.
    async fn render(&self, value: ReturnValue) -> RenderResult<()>;
}

/// Shared handle to a renderer.
pub type BoxedRenderer = Arc<dyn Renderer>;

/// A renderer decorator that post-processes every value before delegating.
pub struct PostProcessingRenderer {
    delegate: BoxedRenderer,
    dispatcher: Dispatcher,
}

impl PostProcessingRenderer {
    /// Creates a post-processing renderer around the given delegate,
    /// considering the given processors.
    pub fn new(delegate: BoxedRenderer, processors: Vec<Arc<dyn Processor>>) -> Self {
        Self::with_dispatcher(delegate, Dispatcher::new(ProcessorRegistry::new(processors)))
    }

    /// Creates a post-processing renderer around a pre-built dispatcher.
    pub fn with_dispatcher(delegate: BoxedRenderer, dispatcher: Dispatcher) -> Self {
        Self {
            delegate,
            dispatcher,
        }
    }

    /// Sets whether top-level body links are moved into headers after
    /// processing.
    pub fn root_links_as_headers(mut self, enabled: bool) -> Self {
        self.dispatcher = self.dispatcher.root_links_as_headers(enabled);
        self
    }

    /// Returns the underlying dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Returns whether the delegate can handle results of the given
    /// declared type.
    pub fn supports(&self, declared: &TypeDescriptor) -> bool {
        self.delegate.supports(declared)
    }

    /// Post-processes the result, then hands it to the delegate.
    ///
    /// Results without a processable payload reach the delegate untouched.
    pub async fn handle(&self, value: ReturnValue, declared: &TypeDescriptor) -> RenderResult<()> {
        let processed = self.dispatcher.dispatch(value, declared)?;
        self.delegate.render(processed).await
    }
}
