//! Dispatch configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the dispatch pipeline.
///
/// Deserializable so deployments can source it from their configuration
/// files alongside the rest of their stack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Move top-level relation links from the result body into transport
    /// headers after processing. Only applies to enveloped results.
    pub root_links_as_headers: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_links_in_body() {
        let config: DispatchConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.root_links_as_headers);
    }

    #[test]
    fn parses_override() {
        let config: DispatchConfig =
            serde_json::from_str(r#"{"root_links_as_headers": true}"#).unwrap();
        assert!(config.root_links_as_headers);
    }
}
