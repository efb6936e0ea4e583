//! Dirty tracking.
//!
//! A dirty node is recomputed by the next layout pass that reaches it. Any
//! change below a node can move it, so dirtiness always travels up to the root.

use anyhow::Result;
use indextree::NodeId;
use log::trace;

use super::LayoutTree;

impl LayoutTree {
    pub fn is_dirty(&self, node: NodeId) -> bool {
        self.node(node).is_dirty
    }

    /// Tell the tree that a measured leaf's content changed.
    ///
    /// # Errors
    /// Only nodes with a measure function may be dirtied by hand; the tree
    /// tracks every other change itself.
    pub fn mark_dirty(&mut self, node: NodeId) -> Result<()> {
        let config = self.node(node).config.clone();
        config.ensure(
            self.node(node).measure.is_some(),
            Some(node),
            "Only leaf nodes with custom measure functions should manually mark themselves as dirty",
        )?;
        self.mark_dirty_and_propagate(node);
        Ok(())
    }

    /// Force a full recomputation of `node` and every descendant.
    ///
    /// Ancestors are dirtied too, so later edits below `node` still reach the root.
    pub fn mark_dirty_and_propagate_to_descendants(&mut self, node: NodeId) {
        if let Some(owner) = self.owner(node) {
            self.mark_dirty_and_propagate(owner);
        }
        let subtree: Vec<NodeId> = node.descendants(&self.arena).collect();
        for descendant in subtree {
            self.node_mut(descendant).is_dirty = true;
        }
    }

    /// Dirty `node` and its ancestors, stopping at the first one already dirty.
    pub(crate) fn mark_dirty_and_propagate(&mut self, node: NodeId) {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.node(id).is_dirty {
                break;
            }
            self.set_dirty(id, true);
            self.node_mut(id).layout.computed_flex_basis = None;
            trace!(target: "box_layout::tree", "[DIRTY] node={id:?}");
            current = self.owner(id);
        }
    }

    /// Update the flag, notifying the dirtied hook on a clean-to-dirty transition.
    pub(crate) fn set_dirty(&mut self, node: NodeId, is_dirty: bool) {
        let data = self.node_mut(node);
        if data.is_dirty == is_dirty {
            return;
        }
        data.is_dirty = is_dirty;
        if is_dirty && let Some(hook) = data.dirtied.clone() {
            hook.dirtied(node);
        }
    }
}
