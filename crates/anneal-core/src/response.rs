//! Transport envelopes around handler results.
//!
//! A handler may return its payload bare, or wrapped in an [`Entity`]
//! carrying transport metadata. The dispatcher strips the envelope before
//! processing and rebuilds it afterward with the new body and the original
//! metadata, verbatim.

use crate::payload::Payload;

// =============================================================================
// Headers
// =============================================================================

/// An insertion-ordered header multimap.
///
/// Lookups are case-insensitive on the header name; iteration preserves
/// insertion order. Multiple values under one name are kept as separate
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header entry.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Appends a header entry (builder form).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// Returns the first value under the given name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns all values under the given name, in insertion order.
    pub fn get_all(&self, name: &str) -> impl Iterator<Item = &str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(&name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns whether any entry exists under the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Entity
// =============================================================================

/// A transport envelope: headers, an optional status code and one body.
///
/// An entity without a status models the plain envelope kind; one with a
/// status models the status-bearing kind. The distinction is preserved
/// through a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    headers: Headers,
    status: Option<u16>,
    body: Payload,
}

impl Entity {
    /// Creates a plain entity around the given body.
    pub fn new(body: Payload) -> Self {
        Self {
            headers: Headers::new(),
            status: None,
            body,
        }
    }

    /// Creates a status-bearing entity around the given body.
    pub fn with_status(status: u16, body: Payload) -> Self {
        Self {
            headers: Headers::new(),
            status: Some(status),
            body,
        }
    }

    /// Replaces the headers (builder form).
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Returns the headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the status code, if this is a status-bearing entity.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the body.
    pub fn body(&self) -> &Payload {
        &self.body
    }

    /// Decomposes this entity into metadata and body.
    pub fn into_parts(self) -> (Headers, Option<u16>, Payload) {
        (self.headers, self.status, self.body)
    }

    /// Rebuilds an entity from metadata and a body.
    pub fn from_parts(headers: Headers, status: Option<u16>, body: Payload) -> Self {
        Self {
            headers,
            status,
            body,
        }
    }
}

// =============================================================================
// ReturnValue
// =============================================================================

/// A handler result: a bare payload, or a payload inside an envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnValue {
    /// A bare payload with no envelope.
    Body(Payload),
    /// A payload wrapped in a transport envelope.
    Entity(Entity),
}

impl ReturnValue {
    /// Returns the inner payload, looking through any envelope.
    pub fn payload(&self) -> &Payload {
        match self {
            Self::Body(payload) => payload,
            Self::Entity(entity) => entity.body(),
        }
    }

    /// Returns whether this result carries an envelope.
    pub fn is_entity(&self) -> bool {
        matches!(self, Self::Entity(_))
    }
}

impl From<Payload> for ReturnValue {
    fn from(payload: Payload) -> Self {
        Self::Body(payload)
    }
}

impl From<Entity> for ReturnValue {
    fn from(entity: Entity) -> Self {
        Self::Entity(entity)
    }
}
