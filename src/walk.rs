use crate::tree::{Node, Node::*};

/// A node visited during a depth first walk.
#[derive(Debug, Copy, Clone)]
pub struct Visit<'a> {
    /// Position of the node in the pre-order sequence of the walk.
    pub index: usize,
    pub node: &'a Node,
    /// Pre-order index of the parent, `None` for the node the walk started from.
    pub parent: Option<usize>,
    /// Distance from the node the walk started from.
    pub depth: usize,
}

/// Iterator that walks a tree depth first in pre-order, left child before
/// right child.
///
/// This doesn't recurse, so it is safe to use on trees of any depth. It is
/// used wherever a whole tree has to be inspected, before we know if the tree
/// is shallow enough for the recursive algorithms.
pub struct DepthIterator<'a> {
    stack: Vec<(&'a Node, Option<usize>, usize)>,
    next_index: usize,
}

impl<'a> DepthIterator<'a> {
    pub fn new(root: &'a Node) -> DepthIterator<'a> {
        DepthIterator {
            stack: vec![(root, None, 0)],
            next_index: 0,
        }
    }
}

impl<'a> Iterator for DepthIterator<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, parent, depth) = self.stack.pop()?;
        let index = self.next_index;
        self.next_index += 1;
        match node {
            Constant(_) | Variable(_) => {}
            Function(_, input) => {
                self.stack.push((input, Some(index), depth + 1));
            }
            Operator(_, _, lhs, rhs) => {
                // Pushing rhs first because last in first out.
                self.stack.push((rhs, Some(index), depth + 1));
                self.stack.push((lhs, Some(index), depth + 1));
            }
        }
        Some(Visit {
            index,
            node,
            parent,
            depth,
        })
    }
}

impl Node {
    /// Walk the subtree of this node depth first.
    pub fn walk(&self) -> DepthIterator<'_> {
        DepthIterator::new(self)
    }
}
