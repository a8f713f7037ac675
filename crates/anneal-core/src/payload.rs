//! The representation model: the value shapes the pipeline recognizes.
//!
//! A [`Payload`] is the body of a handler result. The pipeline distinguishes
//! four shapes:
//!
//! - [`Item`] - scalar wrapper: one optional content value plus links.
//! - [`Collection`] - container wrapper: an ordered sequence of payload
//!   elements plus collection-level links.
//! - [`Embedded`] - a placeholder element that names a relation target type
//!   without carrying a processable wrapper; participates only in
//!   collection first-element matching.
//! - [`Payload::Value`] - plain content; never processed, always passed
//!   through unchanged.
//!
//! Wrapper values carry an explicit shape [`RawType`] so that custom
//! subtypes of the built-in shapes (say, a paged collection) keep their
//! identity through type matching. Collections are never mutated in place:
//! processing rebuilds them from the original metadata and a replacement
//! element sequence.
//!
//! Equality on wrapper values compares content by handle identity, which is
//! what "untouched" means after a processing pass: elements no processor
//! replaced still share their original content.

use std::sync::Arc;

use crate::content::{BoxedContent, Content};
use crate::link::Link;
use crate::types::{COLLECTION, EMBEDDED, ITEM, RawType, TypeDescriptor};

// =============================================================================
// Item
// =============================================================================

/// A scalar wrapper: one content value plus relation links.
#[derive(Debug, Clone)]
pub struct Item {
    raw: &'static RawType,
    content: Option<BoxedContent>,
    links: Vec<Link>,
}

impl Item {
    /// Creates an item wrapping the given content.
    pub fn new(content: impl Content + 'static) -> Self {
        Self::from_arc(Arc::new(content))
    }

    /// Creates an item from an existing content handle.
    pub fn from_arc(content: BoxedContent) -> Self {
        Self {
            raw: &ITEM,
            content: Some(content),
            links: Vec::new(),
        }
    }

    /// Creates an item with no content.
    ///
    /// Content-less items are valid values but never match scalar-classified
    /// processors.
    pub fn empty() -> Self {
        Self {
            raw: &ITEM,
            content: None,
            links: Vec::new(),
        }
    }

    /// Overrides the shape type of this item.
    ///
    /// The given raw type should have [`ITEM`] on its supertype chain.
    pub fn with_shape(mut self, raw: &'static RawType) -> Self {
        self.raw = raw;
        self
    }

    /// Adds a link (builder form).
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Returns the concrete shape type of this item.
    pub fn raw_type(&self) -> &'static RawType {
        self.raw
    }

    /// Returns the wrapped content, if present.
    pub fn content(&self) -> Option<&dyn Content> {
        self.content.as_deref()
    }

    /// Returns the wrapped content handle, if present.
    pub fn content_arc(&self) -> Option<&BoxedContent> {
        self.content.as_ref()
    }

    /// Downcasts the wrapped content to a concrete type.
    pub fn content_as<T: Content>(&self) -> Option<&T> {
        self.content()?.as_any().downcast_ref()
    }

    /// Replaces the wrapped content.
    pub fn set_content(&mut self, content: BoxedContent) {
        self.content = Some(content);
    }

    /// Returns the links attached to this item.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Adds a link.
    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Removes and returns all links.
    pub fn take_links(&mut self) -> Vec<Link> {
        std::mem::take(&mut self.links)
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
            && self.links == other.links
            && match (&self.content, &other.content) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

// =============================================================================
// Collection
// =============================================================================

/// A container wrapper: ordered payload elements plus collection-level links.
#[derive(Debug, Clone)]
pub struct Collection {
    raw: &'static RawType,
    elements: Vec<Payload>,
    links: Vec<Link>,
}

impl Collection {
    /// Creates a collection over the given elements.
    pub fn new(elements: Vec<Payload>) -> Self {
        Self {
            raw: &COLLECTION,
            elements,
            links: Vec::new(),
        }
    }

    /// Creates a collection with no elements.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Overrides the shape type of this collection.
    ///
    /// The given raw type should have [`COLLECTION`] on its supertype chain.
    pub fn with_shape(mut self, raw: &'static RawType) -> Self {
        self.raw = raw;
        self
    }

    /// Adds a link (builder form).
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Returns the concrete shape type of this collection.
    pub fn raw_type(&self) -> &'static RawType {
        self.raw
    }

    /// Returns the elements in order.
    pub fn elements(&self) -> &[Payload] {
        &self.elements
    }

    /// Returns the first element, if any.
    pub fn first(&self) -> Option<&Payload> {
        self.elements.first()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns whether this collection has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the links attached to this collection.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Adds a link.
    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Removes and returns all links.
    pub fn take_links(&mut self) -> Vec<Link> {
        std::mem::take(&mut self.links)
    }

    /// Rebuilds this collection with each element replaced by the result of
    /// `f`, preserving shape, links, ordering and length.
    ///
    /// The element sequence is replaced wholesale; the original backing
    /// storage is consumed, never shared with the result.
    pub fn try_map_elements<F, E>(self, f: F) -> Result<Self, E>
    where
        F: FnMut(Payload) -> Result<Payload, E>,
    {
        let Self {
            raw,
            elements,
            links,
        } = self;

        let elements = elements
            .into_iter()
            .map(f)
            .collect::<Result<Vec<_>, E>>()?;

        Ok(Self {
            raw,
            elements,
            links,
        })
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.links == other.links && self.elements == other.elements
    }
}

// =============================================================================
// Embedded
// =============================================================================

/// A placeholder element naming a relation target type.
///
/// Embedded values stand in for related resources inside a collection. They
/// are never processed themselves; collection matching consults their target
/// type when they appear as the first element.
#[derive(Debug, Clone)]
pub struct Embedded {
    rel: String,
    target: &'static RawType,
    value: Option<BoxedContent>,
}

impl Embedded {
    /// Creates an embedded placeholder for the given relation and target type.
    pub fn new(rel: impl Into<String>, target: &'static RawType) -> Self {
        Self {
            rel: rel.into(),
            target,
            value: None,
        }
    }

    /// Attaches the embedded value itself.
    pub fn with_value(mut self, value: BoxedContent) -> Self {
        self.value = Some(value);
        self
    }

    /// Returns the relation name.
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// Returns the relation target type.
    pub fn target(&self) -> &'static RawType {
        self.target
    }

    /// Returns the embedded value, if attached.
    pub fn value(&self) -> Option<&dyn Content> {
        self.value.as_deref()
    }
}

impl PartialEq for Embedded {
    fn eq(&self, other: &Self) -> bool {
        self.rel == other.rel
            && self.target == other.target
            && match (&self.value, &other.value) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

// =============================================================================
// Payload
// =============================================================================

/// The body of a handler result.
#[derive(Debug, Clone)]
pub enum Payload {
    /// A scalar wrapper.
    Item(Item),
    /// A container wrapper.
    Collection(Collection),
    /// An embedded placeholder element.
    Embedded(Embedded),
    /// Plain content with no wrapper; passed through unchanged.
    Value(BoxedContent),
}

impl Payload {
    /// Wraps content as a plain value payload.
    pub fn plain(content: impl Content + 'static) -> Self {
        Self::Value(Arc::new(content))
    }

    /// Returns the concrete raw type of this payload.
    pub fn raw_type(&self) -> &'static RawType {
        match self {
            Self::Item(item) => item.raw_type(),
            Self::Collection(collection) => collection.raw_type(),
            Self::Embedded(_) => &EMBEDDED,
            Self::Value(content) => content.raw_type(),
        }
    }

    /// Returns a raw-only descriptor of this payload's type.
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of(self.raw_type())
    }

    /// Returns whether this payload has a shape the pipeline processes.
    ///
    /// Only scalar and container wrappers are processable; everything else
    /// takes the passthrough fast path.
    pub fn is_processable(&self) -> bool {
        matches!(self, Self::Item(_) | Self::Collection(_))
    }

    /// Returns the item wrapper, if this payload is one.
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Self::Item(item) => Some(item),
            _ => None,
        }
    }

    /// Returns the collection wrapper, if this payload is one.
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Item(a), Self::Item(b)) => a == b,
            (Self::Collection(a), Self::Collection(b)) => a == b,
            (Self::Embedded(a), Self::Embedded(b)) => a == b,
            (Self::Value(a), Self::Value(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Item> for Payload {
    fn from(item: Item) -> Self {
        Self::Item(item)
    }
}

impl From<Collection> for Payload {
    fn from(collection: Collection) -> Self {
        Self::Collection(collection)
    }
}

impl From<Embedded> for Payload {
    fn from(embedded: Embedded) -> Self {
        Self::Embedded(embedded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    static WIDGET: RawType = RawType::root("widget");
    static PAGED: RawType = RawType::extending("paged", &COLLECTION);

    struct Widget(u64);

    impl Content for Widget {
        fn raw_type(&self) -> &'static RawType {
            &WIDGET
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn item_reports_shape_and_content_type() {
        let item = Item::new(Widget(1));
        assert_eq!(item.raw_type(), &ITEM);
        assert_eq!(item.content().unwrap().raw_type(), &WIDGET);
        assert_eq!(item.content_as::<Widget>().unwrap().0, 1);
    }

    #[test]
    fn empty_item_has_no_content() {
        assert!(Item::empty().content().is_none());
    }

    #[test]
    fn payload_raw_types() {
        assert_eq!(Payload::from(Item::new(Widget(1))).raw_type(), &ITEM);
        assert_eq!(Payload::from(Collection::empty()).raw_type(), &COLLECTION);
        assert_eq!(
            Payload::from(Collection::empty().with_shape(&PAGED)).raw_type(),
            &PAGED
        );
        assert_eq!(Payload::plain(Widget(1)).raw_type(), &WIDGET);
    }

    #[test]
    fn processable_shapes() {
        assert!(Payload::from(Item::empty()).is_processable());
        assert!(Payload::from(Collection::empty()).is_processable());
        assert!(!Payload::plain(Widget(1)).is_processable());
        assert!(!Payload::from(Embedded::new("widgets", &WIDGET)).is_processable());
    }

    #[test]
    fn clone_shares_content_identity() {
        let item = Item::new(Widget(7));
        let copy = item.clone();
        assert_eq!(item, copy);
    }

    #[test]
    fn replaced_content_breaks_equality() {
        let item = Item::new(Widget(7));
        let mut replaced = item.clone();
        replaced.set_content(Arc::new(Widget(7)));
        assert_ne!(item, replaced);
    }

    #[test]
    fn map_elements_preserves_metadata_and_order() {
        let collection = Collection::new(vec![
            Item::new(Widget(1)).into(),
            Item::new(Widget(2)).into(),
        ])
        .with_shape(&PAGED)
        .with_link(Link::new("next", "/widgets?page=2"));

        let rebuilt = collection
            .clone()
            .try_map_elements(Ok::<_, ()>)
            .unwrap();

        assert_eq!(rebuilt.raw_type(), &PAGED);
        assert_eq!(rebuilt.links(), collection.links());
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt, collection);
    }
}
