//! Moving top-level links into transport headers.
//!
//! When enabled on the dispatcher, the result of a processing pass has its
//! top-level relation links drained out of the body and written into the
//! envelope's headers. The dispatcher only decides *whether* to do this; the
//! how is behind the [`HeaderLinksWriter`] collaborator.

use anneal_core::payload::Payload;
use anneal_core::response::Entity;

/// The header name links are written under.
pub const LINK_HEADER: &str = "Link";

/// Collaborator that relocates a result's top-level links into headers.
pub trait HeaderLinksWriter: Send + Sync {
    /// Returns the entity with body links moved into transport headers.
    fn wrap(&self, entity: Entity) -> Entity;
}

/// Default writer: drains body links into RFC 8288 `Link` header values.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkHeaderWriter;

impl HeaderLinksWriter for LinkHeaderWriter {
    fn wrap(&self, entity: Entity) -> Entity {
        let (mut headers, status, mut body) = entity.into_parts();

        let links = match &mut body {
            Payload::Item(item) => item.take_links(),
            Payload::Collection(collection) => collection.take_links(),
            _ => Vec::new(),
        };

        for link in links {
            headers.append(LINK_HEADER, link.to_header_value());
        }

        Entity::from_parts(headers, status, body)
    }
}
