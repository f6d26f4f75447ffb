//! Arena-backed [red-black][1] [tree][2]
//!
//! [1]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
//! [2]: https://en.wikipedia.org/wiki/Binary_search_tree
//!
//! Nodes are stored in an [`Arena`] and refer to each other by [`NodeId`].
//! The `children` links express ownership; `parent` is a back-link that every
//! relinking operation keeps in sync.
//!
//! This module knows nothing about duplicate keys. Callers search first and
//! only call [`RawTree::insert_at`] with a vacant position.
use core::{borrow::Borrow, cmp::Ordering};

use crate::utils::arena::{Arena, NodeId};


#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub key: K,
    pub value: V,
    children: [Option<NodeId>; 2],
    parent: Option<NodeId>,
    color: Color,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Color {
    Black,
    Red,
}

pub(crate) type IsRightChild = bool;

const NO_SIBLING: &str = "black height deficit without a sibling";
const NO_RED_NEPHEW: &str = "red nephew does not exist";

/// A child slot of a node, possibly empty.
pub(crate) type Position = (NodeId, IsRightChild);

/// The outcome of [`RawTree::search`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Search {
    Found(NodeId),
    /// The key would be inserted at this position. `None` means the tree is
    /// empty.
    Vacant(Option<Position>),
}

#[derive(Clone)]
pub(crate) struct RawTree<K, V> {
    nodes: Arena<Node<K, V>>,
    root: Option<NodeId>,
}

impl<K, V> RawTree<K, V> {
    pub const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.nodes[id]
    }

    /// Release all nodes. The arena drops them in bulk, so this doesn't
    /// recurse no matter how the tree is shaped.
    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
    }

    /// Find the node whose key equals `key`, or the position where such a
    /// node would be attached.
    pub fn search<Q>(&self, key: &Q) -> Search
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut parent = if let Some(root) = self.root {
            root
        } else {
            return Search::Vacant(None);
        };
        loop {
            let node = &self.nodes[parent];
            let side: IsRightChild = match key.cmp(node.key.borrow()) {
                Ordering::Less => false,
                Ordering::Greater => true,
                Ordering::Equal => return Search::Found(parent),
            };
            if let Some(child) = node.children[side as usize] {
                parent = child;
            } else {
                return Search::Vacant(Some((parent, side)));
            }
        }
    }

    /// Find the node whose key equals `key`.
    #[inline]
    pub fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(key) {
            Search::Found(id) => Some(id),
            Search::Vacant(_) => None,
        }
    }

    /// Create a node and attach it at `position`, then restore the
    /// red-black invariants.
    ///
    /// `position` must be the vacant slot reported by [`Self::search`] for
    /// `key`, and no mutation may have happened in between. Otherwise the
    /// ordering invariant will be broken.
    pub fn insert_at(&mut self, position: Option<Position>, key: K, value: V) -> NodeId {
        let node = self.nodes.alloc(Node {
            key,
            value,
            children: [None, None],
            parent: position.map(|(parent, _)| parent),
            color: Color::Red,
        });

        if let Some((parent, side)) = position {
            let child_cell = &mut self.nodes[parent].children[side as usize];
            debug_assert_eq!(*child_cell, None);
            *child_cell = Some(node);
        } else {
            debug_assert_eq!(self.root, None);
            self.root = Some(node);
        }

        self.insert_fixup(node);

        node
    }

    /// Detach `node` from the tree, restore the red-black invariants, and
    /// release the node.
    pub fn remove(&mut self, node: NodeId) -> (K, V) {
        self.delete_node(node);
        let Node { key, value, .. } = self.nodes.free(node);
        (key, value)
    }

    /// Get the side of `parent` that `child` is attached to.
    #[inline]
    fn side_of(&self, parent: NodeId, child: NodeId) -> IsRightChild {
        let children = &self.nodes[parent].children;
        debug_assert!(children.contains(&Some(child)));
        children[1] == Some(child)
    }

    /// A nil node is considered to be black.
    #[inline]
    fn is_red(&self, node: Option<NodeId>) -> bool {
        node.map_or(false, |n| self.nodes[n].color == Color::Red)
    }

    /// Find the minimum (leftmost) node in the tree.
    #[inline]
    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|root| self.min(root))
    }

    /// Find the in-order successor of `node`.
    pub fn successor(&self, node: NodeId) -> Option<NodeId> {
        if let Some(child) = self.nodes[node].children[1] {
            return Some(self.min(child));
        }

        let mut node = node;
        loop {
            // There's none if we reach the root
            let parent = self.nodes[node].parent?;
            if self.nodes[parent].children[0] == Some(node) {
                return Some(parent);
            }
            node = parent;
        }
    }

    /// Find the minimum (leftmost) node in the subtree rooted by `node`.
    #[inline]
    fn min(&self, mut node: NodeId) -> NodeId {
        while let Some(child) = self.nodes[node].children[0] {
            node = child;
        }
        node
    }

    /// Point the slot that currently holds `old` (a child slot of `parent`,
    /// or the root) to `new`. Doesn't update `new`'s parent link.
    #[inline]
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        let child_cell = if let Some(parent) = parent {
            let side = self.side_of(parent, old);
            &mut self.nodes[parent].children[side as usize]
        } else {
            &mut self.root
        };
        debug_assert_eq!(*child_cell, Some(old));
        *child_cell = new;
    }

    /// Rotate a node. `dir` specifies `node`'s position after rotation, i.e.,
    /// `false` is a left rotation and `true` is a right rotation.
    fn rotate(&mut self, node: NodeId, dir: IsRightChild) {
        let idir = (!dir) as usize;
        let dir = dir as usize;

        //          node            new_root
        //          /  \            /  \
        //         /    \          /    \
        //  new_root    y   ==>   x     node
        //    /  \                      /  \
        //   x  mid                    mid  y

        let new_root = self.nodes[node].children[idir].expect("post-rotation root does not exist");
        let mid = self.nodes[new_root].children[dir];
        let parent = self.nodes[node].parent;

        self.nodes[node].children[idir] = mid;
        if let Some(mid) = mid {
            self.nodes[mid].parent = Some(node);
        }

        // Update the subtree's parent's child pointer
        self.replace_child(parent, node, Some(new_root));
        self.nodes[new_root].parent = parent;

        self.nodes[new_root].children[dir] = Some(node);
        self.nodes[node].parent = Some(new_root);
    }

    /// Put the subtree rooted by `new` in the place of the subtree rooted by
    /// `old`. `old`'s own links are left as they are.
    fn transplant(&mut self, old: NodeId, new: Option<NodeId>) {
        let parent = self.nodes[old].parent;
        self.replace_child(parent, old, new);
        if let Some(new) = new {
            self.nodes[new].parent = parent;
        }
    }

    fn insert_fixup(&mut self, node: NodeId) {
        let mut node = node;
        while let Some(next) = self.insert_fixup_step(node) {
            node = next;
        }

        // The root might have been repainted red by the last step
        if let Some(root) = self.root {
            self.nodes[root].color = Color::Black;
        }
    }

    /// Resolve a red-red violation between the red `node` and its parent, if
    /// any. Returns the node that might now be violating the color invariant.
    fn insert_fixup_step(&mut self, node: NodeId) -> Option<NodeId> {
        debug_assert_eq!(self.nodes[node].color, Color::Red);

        // Color invariant fulfilled?
        let mut parent = self.nodes[node].parent?;
        if self.nodes[parent].color == Color::Black {
            return None;
        }

        // `parent` is red, so it's not supposed to be the root. If it is,
        // repaint it black, increasing the black height by one and restoring
        // the color invariant.
        let grandparent = if let Some(grandparent) = self.nodes[parent].parent {
            grandparent
        } else {
            self.nodes[parent].color = Color::Black;
            return None;
        };

        // Due to the color invariant, `grandparent` must be black.
        debug_assert_eq!(self.nodes[grandparent].color, Color::Black);

        let parent_side = self.side_of(grandparent, parent);
        let uncle = self.nodes[grandparent].children[(!parent_side) as usize];

        if let Some(uncle) = uncle.filter(|&u| self.nodes[u].color == Color::Red) {
            // Both `parent` and `uncle` are red. Repaint them to black and
            // `grandparent` to red. (This doesn't change `grandparent`'s
            // subtree's black height.)
            self.nodes[parent].color = Color::Black;
            self.nodes[uncle].color = Color::Black;
            self.nodes[grandparent].color = Color::Red;

            // `grandparent` might now violate the color invariant
            return Some(grandparent);
        }

        // `parent` is red, but `uncle` is black (or nil). If `node` is an
        // inner grandchild, make it an outer one first.
        if self.side_of(parent, node) != parent_side {
            self.rotate(parent, parent_side);

            // The rotation flips the relationship between `node` and
            // `parent`
            parent = node;
        }

        // Push `grandparent` to `uncle`'s side, making `parent` the parent of
        // both of the red nodes. Repaint to restore the black heights.
        self.nodes[parent].color = Color::Black;
        self.nodes[grandparent].color = Color::Red;
        self.rotate(grandparent, !parent_side);

        None
    }

    /// Detach `node` from the tree and restore the red-black invariants.
    /// `node` stays in the arena.
    fn delete_node(&mut self, node: NodeId) {
        let children = self.nodes[node].children;
        match children {
            [Some(_), Some(right)] => {
                // Detach the in-order successor (which has no left child),
                // then let it take over `node`'s position. Any rotations
                // performed while detaching it only relink `node`, so its
                // links and color are read afterwards.
                let successor = self.min(right);
                self.delete_node(successor);

                let Node {
                    children, color, ..
                } = self.nodes[node];
                self.transplant(node, Some(successor));
                self.nodes[successor].color = color;
                self.nodes[successor].children = children;
                for child in children.into_iter().flatten() {
                    self.nodes[child].parent = Some(successor);
                }
            }
            [child, None] | [None, child] => {
                let parent = self.nodes[node].parent;
                let position = parent.map(|parent| (parent, self.side_of(parent, node)));

                self.transplant(node, child);

                // Removing a black node decrements its ancestors' black
                // height, violating the black height invariant
                if self.nodes[node].color == Color::Black {
                    self.delete_fixup(position);
                }
            }
        }
    }

    /// Restore the black height invariant. `position` is the slot that has
    /// one less black height than the rest of the tree. `None` means the
    /// deficit is at the root, where it doesn't matter.
    fn delete_fixup(&mut self, position: Option<Position>) {
        let mut position = position;
        while let Some((parent, side)) = position {
            // A red node can absorb the deficit by being repainted
            if self.is_red(self.nodes[parent].children[side as usize]) {
                break;
            }
            position = self.delete_fixup_step(parent, side);
        }

        let node = match position {
            Some((parent, side)) => self.nodes[parent].children[side as usize],
            None => self.root,
        };
        if let Some(node) = node {
            self.nodes[node].color = Color::Black;
        }
    }

    /// Returns the position that still has one less black height, or `None`
    /// if the invariant has been restored (or the deficit reached the root).
    fn delete_fixup_step(&mut self, parent: NodeId, side: IsRightChild) -> Option<Position> {
        //       parent
        //        /   \
        //       /     \
        //     node  sibling
        //            /   \
        //           /     \
        //  close_nephew distant_nephew
        //
        // `node`'s sibling must exist because of the black height invariant
        let (near, far) = (side as usize, (!side) as usize);

        let mut sibling = self.nodes[parent].children[far].expect(NO_SIBLING);
        if self.nodes[sibling].color == Color::Red {
            // Move `parent` into `node`'s side. `parent` adopts
            // `close_nephew`, which is black and becomes the new sibling.
            self.nodes[sibling].color = Color::Black;
            self.nodes[parent].color = Color::Red;
            self.rotate(parent, side);
            sibling = self.nodes[parent].children[far].expect(NO_SIBLING);
        }

        let close_nephew = self.nodes[sibling].children[near];
        let distant_nephew = self.nodes[sibling].children[far];

        if !self.is_red(close_nephew) && !self.is_red(distant_nephew) {
            // Repaint `sibling` to red. This rectifies the black height
            // difference between `node` and `sibling`. However, `parent`
            // still has one less black height than the rest of the tree.
            self.nodes[sibling].color = Color::Red;

            let grandparent = self.nodes[parent].parent?;
            return Some((grandparent, self.side_of(grandparent, parent)));
        }

        if !self.is_red(distant_nephew) {
            // Move `close_nephew` to `sibling`'s position. `sibling` (now the
            // distant nephew) is red.
            let close_nephew = close_nephew.expect(NO_RED_NEPHEW);
            self.nodes[close_nephew].color = Color::Black;
            self.nodes[sibling].color = Color::Red;
            self.rotate(sibling, !side);
            sibling = self.nodes[parent].children[far].expect(NO_SIBLING);
        }

        // Move `sibling` to `parent`'s position. `parent` adopts
        // `close_nephew` and gets an extra black node above `node`.
        let distant_nephew = self.nodes[sibling].children[far].expect(NO_RED_NEPHEW);
        self.nodes[sibling].color = self.nodes[parent].color;
        self.nodes[parent].color = Color::Black;
        self.nodes[distant_nephew].color = Color::Black;
        self.rotate(parent, side);

        None
    }
}
