//! orderlens-dom — DOM snapshot types for the order lookup view
//!
//! Defines the JSON DOM tree the server broadcasts to browsers. The HTML
//! renderer consumes the same type for SSR, so both paints agree on structure.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single node in the snapshot tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    /// HTML tag name (e.g. "div", "button", "input")
    pub tag: String,

    /// Stable identity for DOM reuse across snapshots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// HTML attributes (class, value, placeholder, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<HashMap<String, String>>,

    /// Map of DOM event name → action name (e.g. "click" → "fetch_order")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<HashMap<String, String>>,

    /// Text content for leaf nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Child nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DomNode>>,
}

/// A complete snapshot wrapping the root DomNode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub root: DomNode,
}

impl DomNode {
    /// Create an empty element node
    pub fn elem(tag: &str) -> Self {
        DomNode {
            tag: tag.to_string(),
            key: None,
            attrs: None,
            events: None,
            text: None,
            children: None,
        }
    }

    /// Create a leaf text node
    pub fn text(tag: &str, content: &str) -> Self {
        DomNode {
            text: Some(content.to_string()),
            ..DomNode::elem(tag)
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_event(mut self, event: &str, action: &str) -> Self {
        self.events
            .get_or_insert_with(HashMap::new)
            .insert(event.to_string(), action.to_string());
        self
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.as_ref()?.get(name).map(|s| s.as_str())
    }

    /// Get an event action by event name
    pub fn event(&self, name: &str) -> Option<&str> {
        self.events.as_ref()?.get(name).map(|s| s.as_str())
    }

    /// Iterate over children (empty slice if none)
    pub fn children_iter(&self) -> &[DomNode] {
        match &self.children {
            Some(c) => c,
            None => &[],
        }
    }

    /// Depth-first lookup by key
    pub fn find_key(&self, key: &str) -> Option<&DomNode> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children_iter().iter().find_map(|c| c.find_key(key))
    }
}

impl Snapshot {
    pub fn new(root: DomNode) -> Self {
        Snapshot { root }
    }

    /// Serialize to the wire format sent over SSE / action responses.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"root":{"tag":"div"}}"#.to_string())
    }
}

/// Parse a snapshot from a JSON string
pub fn parse_snapshot(json: &str) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_round_trip() {
        let root = DomNode::elem("div")
            .with_key("app")
            .with_attr("class", "lookup-card")
            .with_child(DomNode::text("h1", "Order data"))
            .with_child(
                DomNode::elem("button")
                    .with_key("fetch-btn")
                    .with_event("click", "fetch_order"),
            );

        let snap = parse_snapshot(&Snapshot::new(root).to_json()).unwrap();
        assert_eq!(snap.root.tag, "div");
        assert_eq!(snap.root.attr("class"), Some("lookup-card"));
        assert_eq!(snap.root.children_iter().len(), 2);
        assert_eq!(
            snap.root.children_iter()[1].event("click"),
            Some("fetch_order")
        );
    }

    #[test]
    fn test_find_key() {
        let root = DomNode::elem("div").with_key("app").with_child(
            DomNode::elem("div")
                .with_key("result")
                .with_child(DomNode::text("pre", "hello").with_key("result-text")),
        );
        let node = root.find_key("result-text").unwrap();
        assert_eq!(node.text.as_deref(), Some("hello"));
        assert!(root.find_key("missing").is_none());
    }

    #[test]
    fn test_optional_fields_skipped() {
        let json = Snapshot::new(DomNode::text("p", "hi")).to_json();
        assert!(!json.contains("attrs"));
        assert!(!json.contains("children"));
        assert!(json.contains(r#""text":"hi""#));
    }
}
