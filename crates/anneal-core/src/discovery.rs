//! Link-time processor discovery.
//!
//! Crates that provide processors can contribute them to a distributed slice
//! instead of threading constructor lists through application wiring:
//!
//! ```rust,ignore
//! use anneal_core::discovery::{PROCESSOR_FACTORIES, ProcessorFactoryFn};
//! use linkme::distributed_slice;
//! use std::sync::Arc;
//!
//! #[distributed_slice(PROCESSOR_FACTORIES)]
//! static SELF_LINKS: ProcessorFactoryFn = || Arc::new(SelfLinkProcessor);
//! ```
//!
//! [`collect_all`] instantiates every registered factory in link order, which
//! also fixes the tie-breaking order for processors with equal priority.

use std::sync::Arc;

use linkme::distributed_slice;
use tracing::debug;

use crate::processor::Processor;

/// Factory function contributing one processor to the discovery registry.
pub type ProcessorFactoryFn = fn() -> Arc<dyn Processor>;

/// Registry of processor factories contributed at link time.
#[distributed_slice]
pub static PROCESSOR_FACTORIES: [ProcessorFactoryFn];

/// Instantiates every processor registered in [`PROCESSOR_FACTORIES`].
pub fn collect_all() -> Vec<Arc<dyn Processor>> {
    let processors: Vec<_> = PROCESSOR_FACTORIES.iter().map(|factory| factory()).collect();
    debug!(count = processors.len(), "Collected discovered processors");
    processors
}
