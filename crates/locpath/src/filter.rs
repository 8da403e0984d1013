//! Node tests (kind and optional name) and the filters a step may apply to its axis output.

use string_cache::DefaultAtom;

use crate::error::Error;
use crate::model::{NodeKind, XdmNode};
use crate::position::PositionFilter;
use crate::sequence::NodeSeq;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NameTest {
    // None: the node must not have a namespace
    ns_uri: Option<DefaultAtom>,
    // None: any name
    local: Option<DefaultAtom>,
}

/// Matches nodes by kind and, optionally, by namespace URI and local name.
///
/// A type-only test (`NodeTest::kind`) accepts every node of the kind. A name test
/// (`NodeTest::name`) additionally requires the node's namespace to equal the configured
/// one, where an unset namespace means "no namespace", and the node's name to equal the
/// configured local name when one is set. The name of a processing instruction is its
/// target; the name of a namespace node is its prefix.
///
/// Nodes of another kind are simply not matched; `matches` never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeTest {
    kind: NodeKind,
    name: Option<NameTest>,
}

impl NodeTest {
    pub fn kind(kind: NodeKind) -> Self {
        Self { kind, name: None }
    }

    /// Name test for `kind`.
    ///
    /// Rejected combinations:
    /// - kinds without names (document, text, comment);
    /// - processing instructions with a namespace (they only have a target).
    pub fn name(kind: NodeKind, ns_uri: Option<&str>, local: Option<&str>) -> Result<Self, Error> {
        if !kind.is_named() {
            tracing::debug!(?kind, "rejecting name test on unnamed node kind");
            return Err(Error::invalid_node_test(format!("{kind:?} nodes have no name to test")));
        }
        if kind == NodeKind::ProcessingInstruction && ns_uri.is_some() {
            tracing::debug!(?ns_uri, ?local, "rejecting namespaced processing-instruction test");
            let msg = if local.is_some() {
                "processing-instruction test takes a target, not a namespace and name"
            } else {
                "processing-instruction test cannot carry a namespace"
            };
            return Err(Error::invalid_node_test(msg));
        }
        Ok(Self {
            kind,
            name: Some(NameTest { ns_uri: ns_uri.map(DefaultAtom::from), local: local.map(DefaultAtom::from) }),
        })
    }

    /// Element in no namespace with the given local name.
    pub fn element(local: &str) -> Self {
        Self::named(NodeKind::Element, None, Some(local))
    }

    pub fn element_ns(ns_uri: &str, local: &str) -> Self {
        Self::named(NodeKind::Element, Some(ns_uri), Some(local))
    }

    pub fn attribute(local: &str) -> Self {
        Self::named(NodeKind::Attribute, None, Some(local))
    }

    pub fn processing_instruction(target: &str) -> Self {
        Self::named(NodeKind::ProcessingInstruction, None, Some(target))
    }

    // Infallible for the kinds used by the shorthand constructors above.
    fn named(kind: NodeKind, ns_uri: Option<&str>, local: Option<&str>) -> Self {
        Self {
            kind,
            name: Some(NameTest { ns_uri: ns_uri.map(DefaultAtom::from), local: local.map(DefaultAtom::from) }),
        }
    }

    pub fn node_kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_type_only(&self) -> bool {
        self.name.is_none()
    }

    pub fn ns_uri(&self) -> Option<&str> {
        self.name.as_ref().and_then(|n| n.ns_uri.as_deref())
    }

    pub fn local(&self) -> Option<&str> {
        self.name.as_ref().and_then(|n| n.local.as_deref())
    }

    pub fn matches<N: XdmNode>(&self, node: &N) -> bool {
        if node.kind() != self.kind {
            return false;
        }
        let Some(test) = &self.name else {
            return true;
        };
        let ns_matches = match (&test.ns_uri, node.namespace_uri()) {
            (None, None) => true,
            (Some(want), Some(have)) => have.as_str() == &**want,
            _ => false,
        };
        if !ns_matches {
            return false;
        }
        match &test.local {
            None => true,
            Some(want) => node.local_name().is_some_and(|have| have.as_str() == &**want),
        }
    }
}

/// What a step applies to its raw axis output before predicates run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    Node(NodeTest),
    Position(PositionFilter),
}

impl Filter {
    pub fn apply<N: XdmNode>(&self, seq: NodeSeq<N>) -> NodeSeq<N> {
        match self {
            Filter::Node(test) => {
                let test = test.clone();
                // errors pass through so the caller sees them
                Box::new(seq.filter(move |item| item.as_ref().map_or(true, |n| test.matches(n))))
            }
            Filter::Position(pos) => Box::new(pos.apply(seq)),
        }
    }
}

impl From<NodeTest> for Filter {
    fn from(test: NodeTest) -> Self {
        Filter::Node(test)
    }
}

impl From<PositionFilter> for Filter {
    fn from(pos: PositionFilter) -> Self {
        Filter::Position(pos)
    }
}
