//! Immutable in-memory tree for tests, benches and prototypes.
//!
//! Nodes are built bottom-up with [`SimpleNodeBuilder`]; `build` links every child,
//! attribute and namespace node to its parent. Handles compare by pointer, so two
//! structurally equal elements are still distinct nodes. Document order comes from
//! [`compare_by_ancestry`].
//!
//! ```
//! use platynui_locpath::simple::{attr, elem, text};
//! use platynui_locpath::{TreeNode, XdmNode};
//!
//! // <list kind="todo"><entry>Write</entry><entry done="yes"/></list>
//! let list = elem("list")
//!     .attr(attr("kind", "todo"))
//!     .child(elem("entry").child(text("Write")))
//!     .child(elem("entry").attr(attr("done", "yes")))
//!     .build();
//!
//! assert_eq!(list.local_name().as_deref(), Some("list"));
//! assert_eq!(list.children().len(), 2);
//! assert_eq!(list.string_value(), "Write");
//! assert_ne!(list.children()[0], list.children()[1]);
//! ```
use core::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use crate::error::Error;
use crate::model::{NodeKind, QName, TreeNode, XdmNode, compare_by_ancestry};

pub(crate) struct Inner {
    kind: NodeKind,
    name: Option<QName>,
    value: Option<String>, // text / attribute / comment / PI data / namespace URI
    parent: OnceLock<Weak<Inner>>,
    attributes: Vec<SimpleNode>,
    namespaces: Vec<SimpleNode>,
    children: Vec<SimpleNode>,
}

/// Shared handle to a node of a built tree.
#[derive(Clone)]
pub struct SimpleNode(pub(crate) Arc<Inner>);

impl PartialEq for SimpleNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for SimpleNode {}
impl std::hash::Hash for SimpleNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for SimpleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleNode")
            .field("kind", &self.0.kind)
            .field("name", &self.0.name.as_ref().map(|q| q.local.as_str()))
            .field("value", &self.0.value)
            .finish()
    }
}

impl SimpleNode {
    fn leaf(kind: NodeKind, name: Option<QName>, value: Option<String>) -> Self {
        SimpleNode(Arc::new(Inner {
            kind,
            name,
            value,
            parent: OnceLock::new(),
            attributes: Vec::new(),
            namespaces: Vec::new(),
            children: Vec::new(),
        }))
    }

    pub fn document() -> SimpleNodeBuilder {
        SimpleNodeBuilder::new(NodeKind::Document, None)
    }
    pub fn element(name: &str) -> SimpleNodeBuilder {
        SimpleNodeBuilder::new(NodeKind::Element, Some(QName::local(name)))
    }
    pub fn element_ns(ns_uri: &str, name: &str) -> SimpleNodeBuilder {
        SimpleNodeBuilder::new(NodeKind::Element, Some(QName::with_ns(ns_uri, name)))
    }
    pub fn attribute(name: &str, value: &str) -> SimpleNode {
        SimpleNode::leaf(NodeKind::Attribute, Some(QName::local(name)), Some(value.to_string()))
    }
    pub fn attribute_ns(ns_uri: &str, name: &str, value: &str) -> SimpleNode {
        SimpleNode::leaf(NodeKind::Attribute, Some(QName::with_ns(ns_uri, name)), Some(value.to_string()))
    }
    pub fn text(value: &str) -> SimpleNode {
        SimpleNode::leaf(NodeKind::Text, None, Some(value.to_string()))
    }
    pub fn comment(value: &str) -> SimpleNode {
        SimpleNode::leaf(NodeKind::Comment, None, Some(value.to_string()))
    }
    pub fn pi(target: &str, data: &str) -> SimpleNode {
        SimpleNode::leaf(NodeKind::ProcessingInstruction, Some(QName::local(target)), Some(data.to_string()))
    }
    /// Namespace node binding `prefix` to `uri`. Its name is the prefix; its expanded
    /// name has no namespace.
    pub fn namespace(prefix: &str, uri: &str) -> SimpleNode {
        let name = QName { prefix: Some(prefix.to_string()), local: prefix.to_string(), ns_uri: None };
        SimpleNode::leaf(NodeKind::Namespace, Some(name), Some(uri.to_string()))
    }

    pub fn value(&self) -> Option<&str> {
        self.0.value.as_deref()
    }

    pub fn string_value(&self) -> String {
        match self.0.kind {
            NodeKind::Element | NodeKind::Document => {
                let mut out = String::new();
                let mut stack = vec![self.clone()];
                while let Some(n) = stack.pop() {
                    if n.0.kind == NodeKind::Text {
                        out.push_str(n.value().unwrap_or_default());
                    }
                    stack.extend(n.0.children.iter().rev().cloned());
                }
                out
            }
            _ => self.value().unwrap_or_default().to_string(),
        }
    }

    /// Resolve a namespace prefix by walking the ancestor chain (including self).
    pub fn lookup_namespace_uri(&self, prefix: &str) -> Option<String> {
        let mut cur = Some(self.clone());
        while let Some(n) = cur {
            if let Some(found) = n.0.namespaces.iter().find(|ns| ns.local_name().as_deref() == Some(prefix)) {
                return found.value().map(str::to_string);
            }
            cur = n.parent();
        }
        None
    }
}

pub struct SimpleNodeBuilder {
    kind: NodeKind,
    name: Option<QName>,
    pending_children: Vec<SimpleNode>,
    pending_attrs: Vec<SimpleNode>,
    pending_ns: Vec<SimpleNode>,
}

impl SimpleNodeBuilder {
    fn new(kind: NodeKind, name: Option<QName>) -> Self {
        Self { kind, name, pending_children: Vec::new(), pending_attrs: Vec::new(), pending_ns: Vec::new() }
    }

    pub fn child(mut self, child: impl Into<SimpleNodeOrBuilder>) -> Self {
        self.pending_children.push(child.into().into_node());
        self
    }
    pub fn children<I: IntoIterator<Item = SimpleNodeOrBuilder>>(mut self, it: I) -> Self {
        self.pending_children.extend(it.into_iter().map(SimpleNodeOrBuilder::into_node));
        self
    }
    pub fn attr(mut self, attr: SimpleNode) -> Self {
        debug_assert!(attr.kind() == NodeKind::Attribute);
        self.pending_attrs.push(attr);
        self
    }
    pub fn namespace(mut self, ns: SimpleNode) -> Self {
        debug_assert!(ns.kind() == NodeKind::Namespace);
        self.pending_ns.push(ns);
        self
    }

    /// Finalize the node and link every pending child, attribute and namespace to it.
    ///
    /// A node can only be attached once; attaching an already parented node keeps its
    /// first parent.
    pub fn build(self) -> SimpleNode {
        let node = SimpleNode(Arc::new(Inner {
            kind: self.kind,
            name: self.name,
            value: None,
            parent: OnceLock::new(),
            attributes: self.pending_attrs,
            namespaces: self.pending_ns,
            children: self.pending_children,
        }));
        let inner = &node.0;
        for n in inner.attributes.iter().chain(&inner.namespaces).chain(&inner.children) {
            let _ = n.0.parent.set(Arc::downgrade(inner));
        }
        node
    }
}

pub enum SimpleNodeOrBuilder {
    Built(SimpleNode),
    Builder(SimpleNodeBuilder),
}

impl SimpleNodeOrBuilder {
    fn into_node(self) -> SimpleNode {
        match self {
            SimpleNodeOrBuilder::Built(n) => n,
            SimpleNodeOrBuilder::Builder(b) => b.build(),
        }
    }
}

impl From<SimpleNode> for SimpleNodeOrBuilder {
    fn from(n: SimpleNode) -> Self {
        SimpleNodeOrBuilder::Built(n)
    }
}
impl From<SimpleNodeBuilder> for SimpleNodeOrBuilder {
    fn from(b: SimpleNodeBuilder) -> Self {
        SimpleNodeOrBuilder::Builder(b)
    }
}

// short names for building fixtures
pub fn doc() -> SimpleNodeBuilder {
    SimpleNode::document()
}
pub fn elem(name: &str) -> SimpleNodeBuilder {
    SimpleNode::element(name)
}
pub fn elem_ns(ns_uri: &str, name: &str) -> SimpleNodeBuilder {
    SimpleNode::element_ns(ns_uri, name)
}
pub fn attr(name: &str, v: &str) -> SimpleNode {
    SimpleNode::attribute(name, v)
}
pub fn attr_ns(ns_uri: &str, name: &str, v: &str) -> SimpleNode {
    SimpleNode::attribute_ns(ns_uri, name, v)
}
pub fn text(v: &str) -> SimpleNode {
    SimpleNode::text(v)
}
pub fn comment(v: &str) -> SimpleNode {
    SimpleNode::comment(v)
}
pub fn pi(target: &str, data: &str) -> SimpleNode {
    SimpleNode::pi(target, data)
}
pub fn ns(prefix: &str, uri: &str) -> SimpleNode {
    SimpleNode::namespace(prefix, uri)
}

impl XdmNode for SimpleNode {
    fn kind(&self) -> NodeKind {
        self.0.kind
    }
    fn name(&self) -> Option<QName> {
        self.0.name.clone()
    }
    fn compare_document_order(&self, other: &Self) -> Result<Ordering, Error> {
        compare_by_ancestry(self, other)
    }
}

impl TreeNode for SimpleNode {
    fn parent(&self) -> Option<Self> {
        self.0.parent.get().and_then(Weak::upgrade).map(SimpleNode)
    }
    fn children(&self) -> Vec<Self> {
        self.0.children.clone()
    }
    fn attributes(&self) -> Vec<Self> {
        self.0.attributes.clone()
    }
    fn namespaces(&self) -> Vec<Self> {
        self.0.namespaces.clone()
    }
}
