use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::dom_tree::{self, Document, NodeRef};

/// Indexes for fast element lookup on a parsed page.
#[derive(Debug, Default)]
pub struct DomIndices {
    /// Maps an element's "id" attribute to the first node carrying it.
    pub id_map: HashMap<String, NodeRef>,
    /// Maps a class name to all nodes that have that class.
    pub class_map: HashMap<String, Vec<NodeRef>>,
    /// Maps a lowercase tag name (e.g., "div") to all nodes with that tag.
    pub tag_map: HashMap<String, Vec<NodeRef>>,
}

impl DomIndices {
    /// Build the indices for the entire document.
    pub fn build(document: &Document) -> Self {
        let mut indices = DomIndices::default();
        for node in dom_tree::descendant_elements(&document.root) {
            indices.insert(&node);
        }
        indices
    }

    pub fn by_id(&self, id: &str) -> Option<NodeRef> {
        self.id_map.get(id).cloned()
    }

    pub fn by_class(&self, class_name: &str) -> &[NodeRef] {
        self.class_map.get(class_name).map_or(&[], Vec::as_slice)
    }

    pub fn by_tag(&self, tag: &str) -> &[NodeRef] {
        self.tag_map
            .get(&tag.to_ascii_lowercase())
            .map_or(&[], Vec::as_slice)
    }

    fn insert(&mut self, node: &NodeRef) {
        let node_ref = node.borrow();
        let Some(elem) = node_ref.as_element() else {
            return;
        };
        self.tag_map
            .entry(elem.tag.to_ascii_lowercase())
            .or_default()
            .push(Rc::clone(node));

        // getElementById returns the first match in tree order.
        if let Some(id_value) = elem.id() {
            self.id_map
                .entry(id_value.to_string())
                .or_insert_with(|| Rc::clone(node));
        }
        for class in elem.classes() {
            self.class_map
                .entry(class.to_string())
                .or_default()
                .push(Rc::clone(node));
        }
    }
}
