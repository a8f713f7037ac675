//! Unified error types for the Anneal core.
//!
//! Type-resolution ambiguity is never an error in this pipeline; unresolvable
//! generics and empty containers degrade per the matching rules. The only
//! error that originates here is a processor's own failure, which aborts the
//! dispatch it occurred in and propagates to the caller with the original
//! error preserved as the source.

use thiserror::Error;

use crate::processor::ProcessorError;

/// Errors that can occur while applying processors to a handler result.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// A processor's own logic failed.
    #[error("processor '{processor}' failed: {source}")]
    Processor {
        /// Name of the failing processor.
        processor: String,
        /// The processor's error, unchanged.
        #[source]
        source: ProcessorError,
    },
}

/// Result type for dispatch operations.
pub type ProcessResult<T> = Result<T, ProcessError>;
