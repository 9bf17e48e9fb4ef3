//! This module contains functions and types for parsing HTML into a custom DOM tree.
//!
//! It uses html5ever as the HTML parser and builds a DOM tree defined in the
//! `crate::dom::dom_tree` module.

use crate::dom::dom_tree::{self, Node, NodeRef};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{
    interface::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink},
    Attribute, LocalName, Namespace, QualName,
};
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Creates a DOM tree from the provided HTML content.
///
/// # Arguments
///
/// * `html_content` - A string slice containing the HTML to parse.
///
/// # Returns
///
/// A `dom_tree::Document` representing the parsed HTML.
pub fn create_dom_tree(html_content: &str) -> dom_tree::Document {
    let tree_sink = StyleScopeTreeSink::new();
    html5ever::parse_document(tree_sink, Default::default()).one(html_content.to_string())
}

/// A custom TreeSink for building the DOM tree used by the inspector.
///
/// It holds the Document being built, the current quirks mode and a count of
/// recoverable parse errors seen so far.
pub struct StyleScopeTreeSink {
    document: dom_tree::Document,
    quirks_mode: Cell<QuirksMode>,
    parse_errors: Cell<usize>,
}

impl StyleScopeTreeSink {
    /// Creates a new `StyleScopeTreeSink` with an empty document.
    pub fn new() -> Self {
        Self {
            document: dom_tree::new_document(),
            quirks_mode: Cell::new(QuirksMode::NoQuirks),
            parse_errors: Cell::new(0),
        }
    }
}

impl Default for StyleScopeTreeSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned element name handed back to html5ever.
#[derive(Debug)]
pub struct OwnedElemName {
    ns: Namespace,
    local: LocalName,
}

impl ElemName for OwnedElemName {
    fn local_name(&self) -> &LocalName {
        &self.local
    }

    fn ns(&self) -> &Namespace {
        &self.ns
    }
}

fn new_node(node: Node) -> NodeRef {
    Rc::new(RefCell::new(node))
}

/// Appends `child` under `parent`, merging adjacent text like a browser does.
fn append_child(parent: &NodeRef, child: NodeOrText<NodeRef>) {
    let mut parent_borrow = parent.borrow_mut();
    let Some(children) = parent_borrow.children_mut() else {
        // Text and comment nodes cannot have children.
        return;
    };
    match child {
        NodeOrText::AppendText(text) => {
            if let Some(last) = children.last() {
                if let Node::Text(existing) = &mut *last.borrow_mut() {
                    existing.push_str(&text);
                    return;
                }
            }
            children.push(new_node(Node::Text(text.to_string())));
        }
        NodeOrText::AppendNode(node) => {
            if let Node::Element(ref mut elem) = *node.borrow_mut() {
                elem.parent = Some(Rc::downgrade(parent));
            }
            children.push(node);
        }
    }
}

/// Detaches `target` from its parent element or document root.
fn detach(target: &NodeRef) {
    if let Some(parent) = dom_tree::parent_of(target) {
        if let Some(children) = parent.borrow_mut().children_mut() {
            children.retain(|child| !Rc::ptr_eq(child, target));
        }
    }
    if let Node::Element(ref mut elem) = *target.borrow_mut() {
        elem.parent = None;
    }
}

impl TreeSink for StyleScopeTreeSink {
    type Handle = NodeRef;
    type Output = dom_tree::Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    /// Finalizes and returns the constructed Document.
    fn finish(self) -> Self::Output {
        if self.parse_errors.get() > 0 {
            log::debug!("html parsed with {} recoverable errors", self.parse_errors.get());
        }
        self.document
    }

    /// Called when a parsing error occurs. html5ever always recovers.
    fn parse_error(&self, msg: Cow<'static, str>) {
        self.parse_errors.set(self.parse_errors.get() + 1);
        log::trace!("html parse error: {}", msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.document.root.clone()
    }

    /// Returns the element name for the given element handle.
    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match &*target.borrow() {
            Node::Element(elem) => OwnedElemName {
                ns: elem.qual_name.ns.clone(),
                local: elem.qual_name.local.clone(),
            },
            // html5ever only asks for names of elements; answer with an empty name otherwise.
            _ => OwnedElemName {
                ns: Namespace::from(HTML_NAMESPACE),
                local: LocalName::from(""),
            },
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let mut element = dom_tree::ElementNode::new(name.local.to_string(), name);
        element.attributes = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        new_node(Node::Element(element))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        new_node(Node::Comment(text.to_string()))
    }

    /// Processing instructions are kept as comments; they never carry styles.
    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        new_node(Node::Comment(format!("{} {}", target, data)))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        append_child(parent, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if dom_tree::parent_of(element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            append_child(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        *self.document.doctype.borrow_mut() = Some(dom_tree::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        });
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {}

    /// Template contents live directly under the template element.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        self.quirks_mode.set(mode);
    }

    /// Inserts a node before `sibling`; used for foster parenting around tables.
    fn append_before_sibling(&self, sibling: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let Some(parent) = dom_tree::parent_of(sibling) else {
            return;
        };
        let mut parent_borrow = parent.borrow_mut();
        let Some(children) = parent_borrow.children_mut() else {
            return;
        };
        let Some(position) = children.iter().position(|c| Rc::ptr_eq(c, sibling)) else {
            return;
        };
        match child {
            NodeOrText::AppendText(text) => {
                if position > 0 {
                    if let Node::Text(existing) = &mut *children[position - 1].borrow_mut() {
                        existing.push_str(&text);
                        return;
                    }
                }
                children.insert(position, new_node(Node::Text(text.to_string())));
            }
            NodeOrText::AppendNode(node) => {
                if let Node::Element(ref mut elem) = *node.borrow_mut() {
                    elem.parent = Some(Rc::downgrade(&parent));
                }
                children.insert(position, node);
            }
        }
    }

    /// Adds attributes to the target node if they are missing.
    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        if let Node::Element(elem_node) = &mut *target.borrow_mut() {
            for attr in attrs {
                let key = attr.name.local.to_string();
                if !elem_node.attributes.iter().any(|(k, _)| k == &key) {
                    elem_node.attributes.push((key, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        detach(target);
    }

    /// Moves every child of `node` under `new_parent`, keeping their order.
    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let moved = match node.borrow_mut().children_mut() {
            Some(children) => std::mem::take(children),
            None => return,
        };
        for child in moved {
            append_child(new_parent, NodeOrText::AppendNode(child));
        }
    }
}
