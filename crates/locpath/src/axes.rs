//! Streaming implementations of the thirteen XPath axes over any [`TreeNode`].
//!
//! Forward axes yield in document order, reverse axes (`parent`, `ancestor`,
//! `ancestor-or-self`, `preceding-sibling`, `preceding`) in reverse document order, so the
//! first item is always the one nearest to the context node. Sibling lists are fetched once
//! per context node; deep traversals (`descendant`, `following`, `preceding`) keep a stack
//! of sibling iterators and fetch each visited node's children once.

use std::sync::Arc;

use smallvec::SmallVec;
use string_cache::DefaultAtom;

use crate::model::{NodeKind, TreeNode};
use crate::sequence::{NodeResult, NodeSeq};
use crate::step::AxisFn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Parent,
    Ancestor,
    AncestorOrSelf,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
    SelfAxis,
    Attribute,
    Namespace,
}

impl Axis {
    pub fn is_reverse(&self) -> bool {
        matches!(
            self,
            Axis::Parent | Axis::Ancestor | Axis::AncestorOrSelf | Axis::PrecedingSibling | Axis::Preceding
        )
    }

    pub fn cursor<N: TreeNode>(&self, node: &N) -> AxisCursor<N> {
        AxisCursor::new(*self, node.clone())
    }

    pub fn into_fn<N: TreeNode>(self) -> AxisFn<N> {
        Arc::new(move |node: &N| -> NodeSeq<N> { Box::new(self.cursor(node)) })
    }
}

/// Cursor over one axis from one context node.
pub struct AxisCursor<N> {
    node: N,
    state: AxisState<N>,
}

enum AxisState<N> {
    // Pre-fetched list (children, attributes, sibling ranges)
    List(std::vec::IntoIter<N>),
    SelfOnce { emitted: bool },
    Parent { done: bool },
    Ancestors { current: Option<N> },
    // Pre-order walk; the stack holds pending subtree roots, next one on top
    Descend { stack: Vec<N> },
    // Pre-order walk over the sibling lists still ahead, innermost on top
    Following { stack: Vec<std::vec::IntoIter<N>> },
    // Reverse pre-order walk; each frame's owner is emitted once its children are done.
    // Frames for the context node's ancestors have no owner.
    Preceding { stack: Vec<(Option<N>, std::vec::IntoIter<N>)> },
    Namespaces { seen: SmallVec<[DefaultAtom; 8]>, current: Option<N>, buf: std::vec::IntoIter<N> },
}

impl<N: TreeNode> AxisCursor<N> {
    fn new(axis: Axis, node: N) -> Self {
        let state = match axis {
            Axis::SelfAxis => AxisState::SelfOnce { emitted: false },
            Axis::Child => AxisState::List(node.children().into_iter()),
            Axis::Attribute => {
                let attrs = if node.kind() == NodeKind::Element { node.attributes() } else { Vec::new() };
                AxisState::List(attrs.into_iter())
            }
            Axis::Parent => AxisState::Parent { done: false },
            Axis::Ancestor => AxisState::Ancestors { current: node.parent() },
            Axis::AncestorOrSelf => AxisState::Ancestors { current: Some(node.clone()) },
            Axis::Descendant => {
                let mut stack = node.children();
                stack.reverse();
                AxisState::Descend { stack }
            }
            Axis::DescendantOrSelf => AxisState::Descend { stack: vec![node.clone()] },
            Axis::FollowingSibling => {
                let (_, after) = split_siblings(&node);
                AxisState::List(after.into_iter())
            }
            Axis::PrecedingSibling => {
                let (mut before, _) = split_siblings(&node);
                before.reverse();
                AxisState::List(before.into_iter())
            }
            Axis::Following => {
                let (anchor, owned) = anchor_of(&node);
                let mut stack: Vec<_> = sibling_levels(anchor.clone()).map(|(_, after)| after.into_iter()).collect();
                stack.reverse();
                if owned && let Some(owner) = anchor {
                    // following:: of an attribute starts inside its owner element
                    stack.push(owner.children().into_iter());
                }
                AxisState::Following { stack }
            }
            Axis::Preceding => {
                let (anchor, _) = anchor_of(&node);
                let mut stack: Vec<_> = sibling_levels(anchor)
                    .map(|(mut before, _)| {
                        before.reverse();
                        (None, before.into_iter())
                    })
                    .collect();
                stack.reverse();
                AxisState::Preceding { stack }
            }
            Axis::Namespace => {
                let current = if node.kind() == NodeKind::Element { Some(node.clone()) } else { None };
                AxisState::Namespaces { seen: SmallVec::new(), current, buf: Vec::new().into_iter() }
            }
        };
        Self { node, state }
    }

    fn next_node(&mut self) -> Option<N> {
        match &mut self.state {
            AxisState::List(it) => it.next(),
            AxisState::SelfOnce { emitted } => {
                if *emitted {
                    return None;
                }
                *emitted = true;
                Some(self.node.clone())
            }
            AxisState::Parent { done } => {
                if *done {
                    return None;
                }
                *done = true;
                self.node.parent()
            }
            AxisState::Ancestors { current } => {
                let cur = current.take()?;
                *current = cur.parent();
                Some(cur)
            }
            AxisState::Descend { stack } => {
                let cur = stack.pop()?;
                stack.extend(cur.children().into_iter().rev());
                Some(cur)
            }
            AxisState::Following { stack } => loop {
                let top = stack.last_mut()?;
                match top.next() {
                    Some(cur) => {
                        let children = cur.children();
                        if !children.is_empty() {
                            stack.push(children.into_iter());
                        }
                        return Some(cur);
                    }
                    None => {
                        stack.pop();
                    }
                }
            },
            AxisState::Preceding { stack } => loop {
                let (_, siblings) = stack.last_mut()?;
                match siblings.next() {
                    Some(cur) => {
                        let mut children = cur.children();
                        children.reverse();
                        stack.push((Some(cur), children.into_iter()));
                    }
                    None => {
                        if let Some((Some(owner), _)) = stack.pop() {
                            return Some(owner);
                        }
                    }
                }
            },
            AxisState::Namespaces { seen, current, buf } => loop {
                if let Some(n) = buf.next() {
                    return Some(n);
                }
                // refill from the nearest element that still has unseen prefixes
                let cur = current.take()?;
                *current = cur.parent();
                if cur.kind() != NodeKind::Element {
                    continue;
                }
                let mut fresh = Vec::new();
                for ns in cur.namespaces() {
                    let prefix = DefaultAtom::from(ns.local_name().unwrap_or_default().as_str());
                    if !seen.contains(&prefix) {
                        seen.push(prefix);
                        fresh.push(ns);
                    }
                }
                *buf = fresh.into_iter();
            },
        }
    }
}

impl<N: TreeNode> Iterator for AxisCursor<N> {
    type Item = NodeResult<N>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_node().map(Ok)
    }
}

/// Where `following`/`preceding` are anchored: attribute and namespace nodes use their
/// owner element. The flag is set when the anchor is such an owner.
fn anchor_of<N: TreeNode>(node: &N) -> (Option<N>, bool) {
    match node.kind() {
        NodeKind::Attribute | NodeKind::Namespace => (node.parent(), true),
        _ => (Some(node.clone()), false),
    }
}

/// For `node` and each of its ancestors, innermost first: the siblings before and after it.
fn sibling_levels<N: TreeNode>(node: Option<N>) -> impl Iterator<Item = (Vec<N>, Vec<N>)> {
    core::iter::successors(node, |n: &N| n.parent()).map(|n| split_siblings(&n))
}

/// Children of `node`'s parent before and after `node`. Both are empty for attributes,
/// namespace nodes and roots.
fn split_siblings<N: TreeNode>(node: &N) -> (Vec<N>, Vec<N>) {
    let Some(parent) = node.parent() else {
        return (Vec::new(), Vec::new());
    };
    let mut sibs = parent.children();
    match sibs.iter().position(|s| s == node) {
        Some(idx) => {
            let after = sibs.split_off(idx + 1);
            sibs.truncate(idx);
            (sibs, after)
        }
        None => (Vec::new(), Vec::new()),
    }
}
