//! Channel hierarchy document
//!
//! The hierarchy is loaded once per session and never modified afterwards.
//! It is stored verbatim so that views receive exactly the document the
//! source served. `ChannelNode` is a borrowed, read-only view used to walk it.
//!
//! A node is a JSON object with an optional display name (`name`, `label`,
//! `title` or `channel_name`, first match wins) and an optional `children`
//! array. The top level is either an array of nodes or a single node. Entries
//! that do not look like nodes are skipped rather than rejected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::ChannelName;

const NAME_KEYS: [&str; 4] = ["name", "label", "title", "channel_name"];

/// The hierarchical channel document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelTree(Value);

impl ChannelTree {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Top-level nodes.
    pub fn nodes(&self) -> Vec<ChannelNode<'_>> {
        nodes_in(&self.0)
    }

    /// Names of all leaf nodes, depth-first in document order.
    pub fn channel_names(&self) -> Vec<ChannelName> {
        let mut names = Vec::new();
        for node in self.nodes() {
            node.collect_leaves(&mut names);
        }
        names
    }

    pub fn contains_channel(&self, name: &str) -> bool {
        self.channel_names().iter().any(|c| c.as_str() == name)
    }
}

/// Borrowed view of one node of a [`ChannelTree`].
#[derive(Debug, Clone, Copy)]
pub struct ChannelNode<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> ChannelNode<'a> {
    pub fn name(&self) -> Option<&'a str> {
        NAME_KEYS
            .iter()
            .find_map(|key| self.fields.get(*key).and_then(Value::as_str))
    }

    pub fn children(&self) -> Vec<ChannelNode<'a>> {
        match self.fields.get("children") {
            Some(children) => nodes_in(children),
            None => Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Raw JSON object backing this node.
    pub fn fields(&self) -> &'a Map<String, Value> {
        self.fields
    }

    fn collect_leaves(&self, out: &mut Vec<ChannelName>) {
        let children = self.children();
        if children.is_empty() {
            if let Some(name) = self.name() {
                out.push(ChannelName::from(name));
            }
            return;
        }
        for child in children {
            child.collect_leaves(out);
        }
    }
}

fn nodes_in(value: &Value) -> Vec<ChannelNode<'_>> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_object().map(|fields| ChannelNode { fields }))
            .collect(),
        Value::Object(fields) => vec![ChannelNode { fields }],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> ChannelTree {
        ChannelTree::from_value(json!([
            {
                "label": "Magnetics",
                "children": [
                    {"label": "ip", "path": "/Data/ip.json"},
                    {"label": "bt", "path": "/Data/bt.json"}
                ]
            },
            {
                "label": "Density",
                "children": [
                    {"name": "ne", "children": []},
                    42
                ]
            }
        ]))
    }

    #[test]
    fn test_channel_names_depth_first() {
        let names: Vec<String> = sample_tree()
            .channel_names()
            .into_iter()
            .map(ChannelName::into_string)
            .collect();
        assert_eq!(names, vec!["ip", "bt", "ne"]);
    }

    #[test]
    fn test_nodes_and_children() {
        let tree = sample_tree();
        let nodes = tree.nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].name(), Some("Magnetics"));
        assert!(!nodes[0].is_leaf());
        assert_eq!(nodes[0].children()[0].fields()["path"], json!("/Data/ip.json"));
        // non-object child is skipped
        assert_eq!(nodes[1].children().len(), 1);
    }

    #[test]
    fn test_single_root_object() {
        let tree = ChannelTree::from_value(json!({
            "title": "root",
            "children": [{"channel_name": "ch1"}]
        }));
        assert!(tree.contains_channel("ch1"));
        assert!(!tree.contains_channel("root"));
    }

    #[test]
    fn test_document_kept_verbatim() {
        let raw = json!({"unexpected": true});
        let tree: ChannelTree = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(tree.as_value(), &raw);
        assert!(tree.channel_names().is_empty());
        assert_eq!(tree.into_value(), raw);
    }
}
