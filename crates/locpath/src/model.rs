use core::cmp::Ordering;
use core::hash::Hash;

use smallvec::SmallVec;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
    Namespace,
}

impl NodeKind {
    /// Kinds whose nodes carry a name that a name test can inspect.
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            NodeKind::Element | NodeKind::Attribute | NodeKind::Namespace | NodeKind::ProcessingInstruction
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
    pub ns_uri: Option<String>,
}

impl QName {
    pub fn local(local: impl Into<String>) -> Self {
        Self { prefix: None, local: local.into(), ns_uri: None }
    }

    pub fn with_ns(ns_uri: impl Into<String>, local: impl Into<String>) -> Self {
        Self { prefix: None, local: local.into(), ns_uri: Some(ns_uri.into()) }
    }
}

/// A node handle as seen by the evaluation engine.
///
/// Handles are cheap to clone and compare by identity: two handles are equal (and hash
/// equally) iff they denote the same node of the same tree. The engine never owns the
/// tree; it only moves handles between cursors.
pub trait XdmNode: Clone + Eq + Hash + core::fmt::Debug + 'static {
    fn kind(&self) -> NodeKind;

    /// Raw name data supplied by the adapter. For namespace nodes `local` is the prefix,
    /// for processing instructions it is the target.
    fn name(&self) -> Option<QName>;

    /// Total document order between nodes. Adapters must supply it; there is no
    /// default because handle ordering is not document order in general.
    fn compare_document_order(&self, other: &Self) -> Result<Ordering, Error>;

    /// Optional hint for document order comparisons. If every node of a sequence provides
    /// a key, set operations sort by key instead of calling the comparator.
    fn doc_order_key(&self) -> Option<u64> {
        None
    }

    /// Namespace URI of the node's expanded name.
    ///
    /// Namespace nodes and processing instructions never have one.
    fn namespace_uri(&self) -> Option<String> {
        match self.kind() {
            NodeKind::Element | NodeKind::Attribute => self.name().and_then(|q| q.ns_uri),
            NodeKind::Namespace
            | NodeKind::ProcessingInstruction
            | NodeKind::Document
            | NodeKind::Text
            | NodeKind::Comment => None,
        }
    }

    /// Local name for elements, attributes and namespace nodes (the prefix); target for
    /// processing instructions; `None` for everything else.
    fn local_name(&self) -> Option<String> {
        match self.kind() {
            NodeKind::Element | NodeKind::Attribute | NodeKind::Namespace | NodeKind::ProcessingInstruction => {
                self.name().map(|q| q.local)
            }
            NodeKind::Document | NodeKind::Text | NodeKind::Comment => None,
        }
    }
}

/// Navigation used by the built-in axes in [`crate::axes`].
pub trait TreeNode: XdmNode {
    fn parent(&self) -> Option<Self>;
    fn children(&self) -> Vec<Self>;
    fn attributes(&self) -> Vec<Self>;
    fn namespaces(&self) -> Vec<Self> {
        Vec::new()
    }
}

/// Document order derived from tree structure alone, for adapters without a cheaper
/// source of order.
///
/// An ancestor precedes its descendants. Below their deepest common ancestor the two
/// branches are ordered by their position among that ancestor's namespace nodes,
/// attributes and children, in that order. Nodes without a common root fail with
/// `err:FOER0000`.
pub fn compare_by_ancestry<N: TreeNode>(a: &N, b: &N) -> Result<Ordering, Error> {
    if a == b {
        return Ok(Ordering::Equal);
    }
    let pa = path_to_root(a.clone());
    let pb = path_to_root(b.clone());
    let shared = pa.iter().zip(pb.iter()).take_while(|(x, y)| x == y).count();
    if shared == 0 {
        return Err(Error::dynamic("nodes from different roots have no document order"));
    }
    let (Some(branch_a), Some(branch_b)) = (pa.get(shared), pb.get(shared)) else {
        // one path is a prefix of the other: the shorter one belongs to the ancestor
        return Ok(pa.len().cmp(&pb.len()));
    };
    let owner = &pa[shared - 1];
    let rank = |branch: &N| {
        owner
            .namespaces()
            .into_iter()
            .chain(owner.attributes())
            .chain(owner.children())
            .position(|n| &n == branch)
    };
    match (rank(branch_a), rank(branch_b)) {
        (Some(x), Some(y)) => Ok(x.cmp(&y)),
        _ => Err(Error::dynamic("node is not listed by its parent")),
    }
}

/// Nodes from the root down to `node` (inclusive).
pub(crate) fn path_to_root<N: TreeNode>(node: N) -> SmallVec<[N; 16]> {
    let mut path: SmallVec<[N; 16]> = core::iter::successors(Some(node), |n: &N| n.parent()).collect();
    path.reverse();
    path
}
