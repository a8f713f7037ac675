//! The dispatch pipeline.
//!
//! This module provides the [`Dispatcher`], which orchestrates one
//! post-processing pass over a handler result:
//!
//! 1. Strip any transport envelope, remembering its metadata and kind
//! 2. Fast-path out if the payload has no processable shape
//! 3. Reconcile the declared type against the live payload type
//! 4. For collections, run the registry over each element independently
//! 5. Run the registry over the (possibly element-updated) top-level value
//! 6. Rebuild the envelope with the new body and the original metadata
//!
//! ```rust,ignore
//! use anneal_framework::{Dispatcher, ProcessorRegistry};
//!
//! let dispatcher = Dispatcher::new(ProcessorRegistry::new(processors));
//!
//! let processed = dispatcher.dispatch(result, &declared)?;
//! ```
//!
//! # Type reconciliation
//!
//! The declared type supplied by the producing context may be richer than
//! what the live value exposes (it can carry generics) or staler (the value
//! may be a more specific runtime type). Reconciliation keeps the declared
//! type only when its raw type agrees with the live value's; otherwise the
//! live type wins. The same rule is applied per element inside collections,
//! with the container's declared element type as the fallback.
//!
//! The effective type is computed once, before the processor fold; a
//! processor's output never changes the matching decisions of the
//! processors after it within the same dispatch.
//!
//! # Thread safety
//!
//! `Dispatcher` is `Send + Sync`; dispatching borrows immutably, so one
//! dispatcher can serve any number of in-flight requests. No ordering is
//! imposed across concurrent dispatches, only within each one.

use std::future::{Ready, ready};
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::Service;
use tracing::{Level, debug, span};

use anneal_core::ProcessResult;
use anneal_core::matcher::{effective_type, find_super_generic};
use anneal_core::payload::Payload;
use anneal_core::response::{Entity, Headers, ReturnValue};
use anneal_core::types::{COLLECTION, ENTITY, TypeDescriptor};

use crate::config::DispatchConfig;
use crate::header_links::{HeaderLinksWriter, LinkHeaderWriter};
use crate::registry::ProcessorRegistry;

/// Orchestrates post-processing passes over handler results.
pub struct Dispatcher {
    registry: ProcessorRegistry,
    root_links_as_headers: bool,
    header_writer: Arc<dyn HeaderLinksWriter>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given registry.
    ///
    /// Link relocation is off by default and uses [`LinkHeaderWriter`] when
    /// enabled.
    pub fn new(registry: ProcessorRegistry) -> Self {
        Self {
            registry,
            root_links_as_headers: false,
            header_writer: Arc::new(LinkHeaderWriter),
        }
    }

    /// Applies a [`DispatchConfig`].
    pub fn with_config(self, config: &DispatchConfig) -> Self {
        self.root_links_as_headers(config.root_links_as_headers)
    }

    /// Sets whether top-level body links are moved into headers after
    /// processing.
    pub fn root_links_as_headers(mut self, enabled: bool) -> Self {
        self.root_links_as_headers = enabled;
        self
    }

    /// Replaces the header-links collaborator.
    pub fn header_writer(mut self, writer: Arc<dyn HeaderLinksWriter>) -> Self {
        self.header_writer = writer;
        self
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    /// Runs one post-processing pass.
    ///
    /// `declared` is the static type of the producing context; it may be
    /// envelope-shaped, in which case the payload type is taken from its
    /// generic parameter. Values without a processable shape are returned
    /// unchanged, envelope and all. Envelope metadata on the output is
    /// exactly the metadata captured from the input.
    pub fn dispatch(
        &self,
        value: ReturnValue,
        declared: &TypeDescriptor,
    ) -> ProcessResult<ReturnValue> {
        let span = span!(Level::DEBUG, "dispatch", declared = %declared);
        let _enter = span.enter();

        if !value.payload().is_processable() {
            debug!("No processable payload, passing through unchanged");
            return Ok(value);
        }

        let (envelope, payload) = match value {
            ReturnValue::Entity(entity) => {
                let (headers, status, body) = entity.into_parts();
                (Some((headers, status)), body)
            }
            ReturnValue::Body(body) => (None, body),
        };

        // Envelope-shaped declarations carry the payload type as their
        // generic parameter.
        let declared = if ENTITY.is_assignable_from(declared.raw_type()) {
            declared.generic_or_any()
        } else {
            declared.clone()
        };

        let target = effective_type(&declared, payload.raw_type());
        debug!(target = %target, "Resolved effective type");

        let payload = self.process_elements(payload, &target)?;
        let processed = self.registry.apply_all(payload, &target)?;

        Ok(self.rewrap(envelope, processed))
    }

    /// Rebuilds the transport envelope around the processed body.
    ///
    /// Metadata is exactly what was captured before processing; headers and
    /// status are never merged or rewritten here.
    fn rewrap(&self, envelope: Option<(Headers, Option<u16>)>, body: Payload) -> ReturnValue {
        match envelope {
            Some((headers, status)) => {
                let entity = Entity::from_parts(headers, status, body);
                ReturnValue::Entity(self.relocate_links(entity))
            }
            None => ReturnValue::Body(body),
        }
    }

    /// Runs the registry over each element of a collection payload.
    ///
    /// Elements are processed independently, left to right; the collection
    /// is rebuilt around the new element sequence with its own metadata
    /// untouched. Non-collection payloads pass through.
    fn process_elements(&self, payload: Payload, target: &TypeDescriptor) -> ProcessResult<Payload> {
        match payload {
            Payload::Collection(collection)
                if COLLECTION.is_assignable_from(target.raw_type()) =>
            {
                let element_declared =
                    find_super_generic(target, &COLLECTION).unwrap_or_else(TypeDescriptor::any);

                debug!(
                    element_declared = %element_declared,
                    count = collection.len(),
                    "Processing collection elements"
                );

                let collection = collection.try_map_elements(|element| {
                    let element_target = effective_type(&element_declared, element.raw_type());
                    self.registry.apply_all(element, &element_target)
                })?;

                Ok(Payload::Collection(collection))
            }
            other => Ok(other),
        }
    }

    fn relocate_links(&self, entity: Entity) -> Entity {
        if self.root_links_as_headers {
            self.header_writer.wrap(entity)
        } else {
            entity
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("root_links_as_headers", &self.root_links_as_headers)
            .finish()
    }
}

// =============================================================================
// Tower Service Implementation for Dispatcher
// =============================================================================

/// One dispatch request: a handler result and its declared type.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    /// The handler result to post-process.
    pub value: ReturnValue,
    /// The declared type of the producing context.
    pub declared: TypeDescriptor,
}

/// Tower Service implementation for the dispatcher.
///
/// Dispatch is synchronous, so the returned future is always immediately
/// ready; the impl exists to let Tower middleware be layered over dispatch.
impl Service<DispatchRequest> for Dispatcher {
    type Response = ReturnValue;
    type Error = anneal_core::ProcessError;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: DispatchRequest) -> Self::Future {
        ready(self.dispatch(request.value, &request.declared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anneal_core::content::Content;
    use anneal_core::link::Link;
    use anneal_core::payload::{Collection, Item};
    use anneal_core::processor::{Processor, ProcessorError};
    use anneal_core::response::Headers;
    use anneal_core::types::{ITEM, RawType};
    use std::any::Any;

    static WIDGET: RawType = RawType::root("widget");
    static NOTE: RawType = RawType::root("note");

    static BASE: RawType = RawType::root("base");
    static DERIVED: RawType = RawType::extending("derived", &BASE);
    static SIBLING: RawType = RawType::extending("sibling", &BASE);

    #[derive(Debug)]
    struct Widget(u64);

    impl Content for Widget {
        fn raw_type(&self) -> &'static RawType {
            &WIDGET
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Note;

    impl Content for Note {
        fn raw_type(&self) -> &'static RawType {
            &NOTE
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct DerivedValue;

    impl Content for DerivedValue {
        fn raw_type(&self) -> &'static RawType {
            &DERIVED
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Appends a link named after the processor to whatever it is given.
    struct Tagging {
        tag: &'static str,
        target: TypeDescriptor,
        order: i32,
    }

    impl Tagging {
        fn new(tag: &'static str, target: TypeDescriptor, order: i32) -> Arc<dyn Processor> {
            Arc::new(Self { tag, target, order })
        }
    }

    impl Processor for Tagging {
        fn name(&self) -> &str {
            self.tag
        }

        fn target_type(&self) -> TypeDescriptor {
            self.target.clone()
        }

        fn process(&self, payload: Payload) -> Result<Payload, ProcessorError> {
            Ok(match payload {
                Payload::Item(item) => item.with_link(Link::new(self.tag, "/tagged")).into(),
                Payload::Collection(collection) => {
                    collection.with_link(Link::new(self.tag, "/tagged")).into()
                }
                other => other,
            })
        }

        fn order(&self) -> i32 {
            self.order
        }
    }

    fn item_of(raw: &'static RawType) -> TypeDescriptor {
        TypeDescriptor::parameterized(&ITEM, TypeDescriptor::of(raw))
    }

    fn collection_of_items(raw: &'static RawType) -> TypeDescriptor {
        TypeDescriptor::parameterized(&COLLECTION, item_of(raw))
    }

    fn tags_of(payload: &Payload) -> Vec<&str> {
        match payload {
            Payload::Item(item) => item.links().iter().map(Link::rel).collect(),
            Payload::Collection(collection) => {
                collection.links().iter().map(Link::rel).collect()
            }
            _ => Vec::new(),
        }
    }

    #[test]
    fn plain_value_passes_through_as_identity() {
        let dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![Tagging::new(
            "a",
            item_of(&WIDGET),
            0,
        )]));

        let value = ReturnValue::from(Payload::plain(Note));
        let result = dispatcher
            .dispatch(value.clone(), &TypeDescriptor::any())
            .unwrap();

        assert_eq!(result, value);
    }

    #[test]
    fn matching_item_is_processed() {
        let dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![Tagging::new(
            "a",
            item_of(&WIDGET),
            0,
        )]));

        let value = ReturnValue::from(Payload::from(Item::new(Widget(1))));
        let result = dispatcher.dispatch(value, &item_of(&WIDGET)).unwrap();

        assert_eq!(tags_of(result.payload()), vec!["a"]);
    }

    #[test]
    fn fold_applies_matching_processors_in_order() {
        let dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![
            Tagging::new("p2", item_of(&WIDGET), 2),
            Tagging::new("p1", item_of(&WIDGET), 1),
        ]));

        let value = ReturnValue::from(Payload::from(Item::new(Widget(1))));
        let result = dispatcher.dispatch(value, &item_of(&WIDGET)).unwrap();

        assert_eq!(tags_of(result.payload()), vec!["p1", "p2"]);
    }

    #[test]
    fn live_content_type_overrides_declared_generic() {
        let dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![
            Tagging::new("derived", item_of(&DERIVED), 0),
            Tagging::new("sibling", item_of(&SIBLING), 1),
            Tagging::new("base", item_of(&BASE), 2),
        ]));

        // Declared as item<base>, actually holding derived content.
        let value = ReturnValue::from(Payload::from(Item::new(DerivedValue)));
        let result = dispatcher.dispatch(value, &item_of(&BASE)).unwrap();

        assert_eq!(tags_of(result.payload()), vec!["derived", "base"]);
    }

    #[test]
    fn envelope_metadata_is_preserved_verbatim() {
        let dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![Tagging::new(
            "a",
            item_of(&WIDGET),
            0,
        )]));

        let entity = Entity::with_status(201, Item::new(Widget(1)).into())
            .with_headers(Headers::new().with("X-Request", "1"));
        let declared =
            TypeDescriptor::parameterized(&ENTITY, item_of(&WIDGET));

        let result = dispatcher
            .dispatch(ReturnValue::from(entity), &declared)
            .unwrap();

        let ReturnValue::Entity(processed) = result else {
            panic!("envelope was dropped");
        };
        assert_eq!(processed.status(), Some(201));
        assert_eq!(processed.headers().get("X-Request"), Some("1"));
        assert_eq!(tags_of(processed.body()), vec!["a"]);
    }

    #[test]
    fn collection_elements_are_processed_independently() {
        let dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![Tagging::new(
            "w",
            item_of(&WIDGET),
            0,
        )]));

        // Only the middle element holds widget content.
        let collection = Collection::new(vec![
            Item::new(Note).into(),
            Item::new(Widget(2)).into(),
            Item::new(Note).into(),
        ]);
        let value = ReturnValue::from(Payload::from(collection.clone()));

        let result = dispatcher
            .dispatch(value, &collection_of_items(&WIDGET))
            .unwrap();

        let Payload::Collection(processed) = result.payload() else {
            panic!("collection shape changed");
        };
        assert_eq!(processed.len(), 3);
        assert_eq!(processed.elements()[0], collection.elements()[0]);
        assert_eq!(tags_of(&processed.elements()[1]), vec!["w"]);
        assert_eq!(processed.elements()[2], collection.elements()[2]);
    }

    #[test]
    fn empty_collection_matches_only_default_processors() {
        let dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![
            Tagging::new("elements", collection_of_items(&WIDGET), 0),
            Tagging::new(
                "shape",
                TypeDescriptor::of(&anneal_core::types::REPRESENTATION),
                1,
            ),
        ]));

        let value = ReturnValue::from(Payload::from(Collection::empty()));
        let result = dispatcher
            .dispatch(value, &collection_of_items(&WIDGET))
            .unwrap();

        assert_eq!(tags_of(result.payload()), vec!["shape"]);
    }

    #[test]
    fn element_and_collection_processors_compose() {
        // Element-level processor tags each widget item; collection-level
        // processor tags the container, judged by its first element.
        let dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![
            Tagging::new("a", item_of(&WIDGET), 0),
            Tagging::new("b", collection_of_items(&WIDGET), 1),
        ]));

        let collection = Collection::new(vec![
            Item::new(Widget(1)).into(),
            Item::new(Widget(2)).into(),
        ]);
        let value = ReturnValue::from(Payload::from(collection));

        let result = dispatcher
            .dispatch(value, &collection_of_items(&WIDGET))
            .unwrap();

        let Payload::Collection(processed) = result.payload() else {
            panic!("collection shape changed");
        };
        assert_eq!(tags_of(result.payload()), vec!["b"]);
        assert_eq!(tags_of(&processed.elements()[0]), vec!["a"]);
        assert_eq!(tags_of(&processed.elements()[1]), vec!["a"]);
    }

    #[test]
    fn root_links_move_to_headers_when_enabled() {
        let dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![Tagging::new(
            "a",
            item_of(&WIDGET),
            0,
        )]))
        .with_config(&DispatchConfig {
            root_links_as_headers: true,
        });

        let entity = Entity::new(Item::new(Widget(1)).into());
        let declared = TypeDescriptor::parameterized(&ENTITY, item_of(&WIDGET));

        let result = dispatcher
            .dispatch(ReturnValue::from(entity), &declared)
            .unwrap();

        let ReturnValue::Entity(processed) = result else {
            panic!("envelope was dropped");
        };
        assert_eq!(
            processed.headers().get("Link"),
            Some("</tagged>; rel=\"a\"")
        );
        assert!(tags_of(processed.body()).is_empty());
    }

    #[test]
    fn bare_results_never_touch_headers() {
        let dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![Tagging::new(
            "a",
            item_of(&WIDGET),
            0,
        )]))
        .root_links_as_headers(true);

        let value = ReturnValue::from(Payload::from(Item::new(Widget(1))));
        let result = dispatcher.dispatch(value, &item_of(&WIDGET)).unwrap();

        assert!(!result.is_entity());
        assert_eq!(tags_of(result.payload()), vec!["a"]);
    }

    #[test]
    fn service_call_dispatches() {
        let mut dispatcher = Dispatcher::new(ProcessorRegistry::new(vec![Tagging::new(
            "a",
            item_of(&WIDGET),
            0,
        )]));

        let request = DispatchRequest {
            value: ReturnValue::from(Payload::from(Item::new(Widget(1)))),
            declared: item_of(&WIDGET),
        };

        let result = tokio_test::block_on(tower::Service::call(&mut dispatcher, request)).unwrap();
        assert_eq!(tags_of(result.payload()), vec!["a"]);
    }
}
