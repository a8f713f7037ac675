//! Type-erased payload content.
//!
//! Domain values carried inside [`Item`](crate::payload::Item)s and
//! collections are type-erased behind the [`Content`] trait. A content value
//! reports its own [`RawType`], which is what the matching machinery inspects
//! when declared and live types disagree, and supports downcasting back to
//! the concrete type via `as_any`.
//!
//! # Example
//!
//! ```rust,ignore
//! use anneal_core::{Content, RawType};
//! use std::any::Any;
//!
//! static WIDGET: RawType = RawType::root("widget");
//!
//! struct Widget {
//!     serial: u64,
//! }
//!
//! impl Content for Widget {
//!     fn raw_type(&self) -> &'static RawType {
//!         &WIDGET
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::types::RawType;

/// A type-erased domain value.
///
/// Implementors declare their concrete [`RawType`] once; the pipeline never
/// inspects content beyond that and the downcast hook.
pub trait Content: Any + Send + Sync {
    /// Returns the concrete raw type of this value.
    fn raw_type(&self) -> &'static RawType;

    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a content value.
///
/// Content is reference-counted so that untouched values survive processing
/// passes without copies; processors that replace content allocate a new
/// handle.
pub type BoxedContent = Arc<dyn Content>;

impl fmt::Debug for dyn Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Content")
            .field("raw_type", &self.raw_type().name())
            .finish()
    }
}

/// Content backed by a JSON document.
///
/// Adapters that receive dynamic payloads can carry them through the pipeline
/// by pairing the document with an explicitly declared raw type.
#[derive(Clone)]
pub struct JsonContent {
    raw: &'static RawType,
    value: serde_json::Value,
}

impl JsonContent {
    /// Creates JSON content with the given declared raw type.
    pub fn new(raw: &'static RawType, value: serde_json::Value) -> Self {
        Self { raw, value }
    }

    /// Returns the underlying JSON document.
    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }
}

impl Content for JsonContent {
    fn raw_type(&self) -> &'static RawType {
        self.raw
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for JsonContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonContent")
            .field("raw_type", &self.raw.name())
            .field("value", &self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static RECORD: RawType = RawType::root("record");

    #[test]
    fn json_content_reports_declared_type() {
        let content = JsonContent::new(&RECORD, json!({"id": 7}));
        assert_eq!(content.raw_type().name(), "record");
        assert_eq!(content.value()["id"], 7);
    }

    #[test]
    fn json_content_downcasts() {
        let boxed: BoxedContent = Arc::new(JsonContent::new(&RECORD, json!(null)));
        assert!(boxed.as_any().downcast_ref::<JsonContent>().is_some());
    }
}
