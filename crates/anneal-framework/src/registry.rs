//! The processor registry.
//!
//! A [`ProcessorRegistry`] holds the classified, priority-sorted list of
//! wrapped processors. It is built once from the full set of available
//! processors and read-only afterward, so it can be shared freely across
//! concurrent dispatches.
//!
//! # Fold semantics
//!
//! [`apply_all`](ProcessorRegistry::apply_all) is a strict left fold, not a
//! fixpoint. Wrappers are visited once, in ascending priority order; each
//! supporting wrapper replaces the current value, and later wrappers see
//! that replacement. The effective type is computed by the caller before
//! the fold and never recomputed mid-fold: only the value threads through.

use std::sync::Arc;

use tracing::{debug, trace};

use anneal_core::discovery;
use anneal_core::payload::Payload;
use anneal_core::processor::{DeclaredOrder, OrderResolver, Processor};
use anneal_core::types::TypeDescriptor;
use anneal_core::ProcessResult;

use crate::wrapper::ProcessorWrapper;

/// The ordered, classified set of registered processors.
pub struct ProcessorRegistry {
    wrappers: Vec<ProcessorWrapper>,
}

impl ProcessorRegistry {
    /// Builds a registry from the given processors using declared-order
    /// priority resolution.
    pub fn new(processors: Vec<Arc<dyn Processor>>) -> Self {
        Self::with_resolver(processors, &DeclaredOrder)
    }

    /// Builds a registry from the given processors and order resolver.
    ///
    /// Each processor is classified once by its declared target type, then
    /// the list is sorted by ascending priority. The sort is stable, so
    /// processors with equal priority keep their registration order.
    pub fn with_resolver(
        processors: Vec<Arc<dyn Processor>>,
        resolver: &dyn OrderResolver,
    ) -> Self {
        let mut wrappers: Vec<_> = processors
            .into_iter()
            .map(|processor| ProcessorWrapper::classify(processor, resolver))
            .collect();

        wrappers.sort_by_key(ProcessorWrapper::order);

        debug!(count = wrappers.len(), "Classified processor registry");

        Self { wrappers }
    }

    /// Builds a registry from the processors contributed to the link-time
    /// discovery slice.
    pub fn from_discovered() -> Self {
        Self::new(discovery::collect_all())
    }

    /// Returns the number of registered processors.
    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    /// Returns whether the registry has no processors.
    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    /// Returns the classified wrappers in application order.
    pub fn wrappers(&self) -> &[ProcessorWrapper] {
        &self.wrappers
    }

    /// Applies every supporting processor to the payload, in order.
    ///
    /// `ty` is the effective type computed for the payload before the fold;
    /// matching decisions for every wrapper are made against it, while the
    /// payload itself threads through replacements. A processor failure
    /// aborts the fold and propagates.
    pub fn apply_all(&self, payload: Payload, ty: &TypeDescriptor) -> ProcessResult<Payload> {
        let mut current = payload;

        for wrapper in &self.wrappers {
            if wrapper.supports(ty, &current) {
                trace!(
                    processor = wrapper.name(),
                    kind = wrapper.kind(),
                    "Applying processor"
                );
                current = wrapper.invoke(current)?;
            } else {
                trace!(
                    processor = wrapper.name(),
                    kind = wrapper.kind(),
                    "Processor does not apply, skipping"
                );
            }
        }

        Ok(current)
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("processor_count", &self.wrappers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anneal_core::content::Content;
    use anneal_core::payload::Item;
    use anneal_core::processor::ProcessorError;
    use anneal_core::types::{ITEM, RawType};
    use std::any::Any;
    use std::sync::Mutex;

    static WIDGET: RawType = RawType::root("widget");

    struct Widget;

    impl Content for Widget {
        fn raw_type(&self) -> &'static RawType {
            &WIDGET
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Recording {
        label: &'static str,
        order: i32,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Processor for Recording {
        fn name(&self) -> &str {
            self.label
        }

        fn target_type(&self) -> TypeDescriptor {
            TypeDescriptor::parameterized(&ITEM, TypeDescriptor::of(&WIDGET))
        }

        fn process(&self, payload: Payload) -> Result<Payload, ProcessorError> {
            self.log.lock().unwrap().push(self.label);
            Ok(payload)
        }

        fn order(&self) -> i32 {
            self.order
        }
    }

    struct Failing;

    impl Processor for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn target_type(&self) -> TypeDescriptor {
            TypeDescriptor::parameterized(&ITEM, TypeDescriptor::of(&WIDGET))
        }

        fn process(&self, _payload: Payload) -> Result<Payload, ProcessorError> {
            Err("boom".into())
        }
    }

    fn recording(
        label: &'static str,
        order: i32,
        log: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Arc<dyn Processor> {
        Arc::new(Recording {
            label,
            order,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn fold_runs_in_ascending_priority_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ProcessorRegistry::new(vec![
            recording("second", 2, &log),
            recording("first", 1, &log),
        ]);

        let value: Payload = Item::new(Widget).into();
        registry
            .apply_all(value, &TypeDescriptor::of(&ITEM))
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn equal_priority_keeps_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ProcessorRegistry::new(vec![
            recording("a", 0, &log),
            recording("b", 0, &log),
            recording("c", -1, &log),
        ]);

        let value: Payload = Item::new(Widget).into();
        registry
            .apply_all(value, &TypeDescriptor::of(&ITEM))
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["c", "a", "b"]);
    }

    #[test]
    fn unmatched_value_passes_through_untouched() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ProcessorRegistry::new(vec![recording("only", 0, &log)]);

        let value: Payload = Item::empty().into();
        let result = registry
            .apply_all(value.clone(), &TypeDescriptor::of(&ITEM))
            .unwrap();

        assert_eq!(result, value);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn processor_failure_aborts_with_name_context() {
        let registry = ProcessorRegistry::new(vec![Arc::new(Failing) as Arc<dyn Processor>]);

        let value: Payload = Item::new(Widget).into();
        let err = registry
            .apply_all(value, &TypeDescriptor::of(&ITEM))
            .unwrap_err();

        assert!(err.to_string().contains("failing"));
        assert!(err.to_string().contains("boom"));
    }
}
