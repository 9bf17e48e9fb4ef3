use html5ever::QualName;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub mod dom_tree {
    use super::*;

    /// Shared handle to a node of the tree.
    pub type NodeRef = Rc<RefCell<Node>>;

    #[derive(Debug)]
    pub enum Node {
        DocumentRoot(DocumentRootNode),
        Element(ElementNode),
        Text(String),
        Comment(String),
    }

    #[derive(Debug, Default)]
    pub struct DocumentRootNode {
        pub children: Vec<NodeRef>,
    }

    #[derive(Debug)]
    pub struct ElementNode {
        pub tag: String,
        pub qual_name: QualName,
        pub attributes: Vec<(String, String)>,
        pub children: Vec<NodeRef>,
        /// Weak so the tree never forms an Rc cycle.
        pub parent: Option<Weak<RefCell<Node>>>,
    }

    #[derive(Debug)]
    pub struct Document {
        pub root: NodeRef,
        pub doctype: RefCell<Option<Doctype>>,
    }

    #[derive(Debug, Clone)]
    pub struct Doctype {
        pub name: String,
        pub public_id: String,
        pub system_id: String,
    }

    impl DocumentRootNode {
        pub fn new() -> Self {
            DocumentRootNode {
                children: Vec::new(),
            }
        }
    }

    impl ElementNode {
        pub fn new(tag: String, qual_name: QualName) -> Self {
            ElementNode {
                tag,
                qual_name,
                attributes: Vec::new(),
                children: Vec::new(),
                parent: None,
            }
        }

        /// Attribute lookup; names compare ASCII case-insensitively like HTML does.
        pub fn attribute(&self, name: &str) -> Option<&str> {
            self.attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        }

        pub fn id(&self) -> Option<&str> {
            self.attribute("id").filter(|id| !id.is_empty())
        }

        pub fn classes(&self) -> impl Iterator<Item = &str> {
            self.attribute("class").unwrap_or("").split_whitespace()
        }

        pub fn has_class(&self, class_name: &str) -> bool {
            self.classes().any(|class| class == class_name)
        }
    }

    impl Node {
        pub fn as_element(&self) -> Option<&ElementNode> {
            match self {
                Node::Element(elem) => Some(elem),
                _ => None,
            }
        }

        pub fn children(&self) -> &[NodeRef] {
            match self {
                Node::DocumentRoot(root) => &root.children,
                Node::Element(elem) => &elem.children,
                Node::Text(_) | Node::Comment(_) => &[],
            }
        }

        pub fn children_mut(&mut self) -> Option<&mut Vec<NodeRef>> {
            match self {
                Node::DocumentRoot(root) => Some(&mut root.children),
                Node::Element(elem) => Some(&mut elem.children),
                Node::Text(_) | Node::Comment(_) => None,
            }
        }

        pub fn is_element(&self) -> bool {
            matches!(self, Node::Element(_))
        }
    }

    /// Unlinks descendants one by one; dropping a deep tree recursively
    /// would exhaust the stack.
    impl Drop for Node {
        fn drop(&mut self) {
            let Some(children) = self.children_mut() else {
                return;
            };
            let mut pending = std::mem::take(children);
            while let Some(node) = pending.pop() {
                // Still reachable from elsewhere: leave its subtree intact.
                if Rc::strong_count(&node) > 1 {
                    continue;
                }
                if let Some(grandchildren) = node.borrow_mut().children_mut() {
                    pending.append(grandchildren);
                }
            }
        }
    }

    /// Parent of an element node, if it is still alive. Text nodes carry no parent pointer.
    pub fn parent_of(node: &NodeRef) -> Option<NodeRef> {
        match &*node.borrow() {
            Node::Element(elem) => elem.parent.as_ref().and_then(Weak::upgrade),
            _ => None,
        }
    }

    /// The parent only when it is itself an element (the document root is not).
    pub fn parent_element(node: &NodeRef) -> Option<NodeRef> {
        parent_of(node).filter(|parent| parent.borrow().is_element())
    }

    /// Element siblings that come before `node`, nearest first.
    pub fn previous_element_siblings(node: &NodeRef) -> Vec<NodeRef> {
        let Some(parent) = parent_of(node) else {
            return Vec::new();
        };
        let parent = parent.borrow();
        let siblings = parent.children();
        let Some(position) = siblings.iter().position(|child| Rc::ptr_eq(child, node)) else {
            return Vec::new();
        };
        siblings[..position]
            .iter()
            .rev()
            .filter(|sibling| sibling.borrow().is_element())
            .cloned()
            .collect()
    }

    /// Element siblings that come after `node`, nearest first.
    pub fn next_element_siblings(node: &NodeRef) -> Vec<NodeRef> {
        let Some(parent) = parent_of(node) else {
            return Vec::new();
        };
        let parent = parent.borrow();
        let siblings = parent.children();
        let Some(position) = siblings.iter().position(|child| Rc::ptr_eq(child, node)) else {
            return Vec::new();
        };
        siblings[position + 1..]
            .iter()
            .filter(|sibling| sibling.borrow().is_element())
            .cloned()
            .collect()
    }

    /// Concatenated text of the direct text children, e.g. the body of a `<style>`.
    pub fn text_content(node: &NodeRef) -> String {
        let mut text = String::new();
        for child in node.borrow().children() {
            if let Node::Text(chunk) = &*child.borrow() {
                text.push_str(chunk);
            }
        }
        text
    }

    /// All element nodes under `node` in document (pre-)order.
    pub fn descendant_elements(node: &NodeRef) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeRef> = node.borrow().children().iter().rev().cloned().collect();
        while let Some(current) = stack.pop() {
            let current_ref = current.borrow();
            stack.extend(current_ref.children().iter().rev().cloned());
            if current_ref.is_element() {
                drop(current_ref);
                out.push(current);
            }
        }
        out
    }

    pub fn new_document() -> Document {
        Document {
            root: Rc::new(RefCell::new(Node::DocumentRoot(DocumentRootNode::new()))),
            doctype: RefCell::new(None),
        }
    }
}
