//! The node tree.
//!
//! Nodes live in an [`indextree::Arena`] and are addressed by [`NodeId`]. The
//! arena's parent link is the owner back-reference: a node belongs to at most
//! one owner, and an owner's child list is ordered.
//!
//! Operations that would break the tree's contracts return an error, report
//! it through the node's config logger and leave the tree untouched. Passing
//! a freed [`NodeId`] is a host error: the arena may reuse its slot, so a
//! stale id can alias a newer node.

mod dirty;
mod style_setters;

use core::any::Any;
use std::sync::Arc;

use anyhow::Result;
use indextree::{Arena, NodeId};
use log::debug;
use smallvec::SmallVec;

use crate::callbacks::{Baseline, Dirtied, Measure};
use crate::config::ConfigRef;
use crate::enums::NodeType;
use crate::layout::LayoutResults;
use crate::node::NodeData;
use crate::style::Style;

/// Child lists are short in practice.
pub(crate) type ChildList = SmallVec<NodeId, 8>;

/// Owns every node and the layout generation counter.
#[derive(Default)]
pub struct LayoutTree {
    pub(crate) arena: Arena<NodeData>,
    /// Incremented by each call to [`LayoutTree::calculate_layout`].
    pub(crate) generation: u32,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node using the process default config.
    pub fn new_node(&mut self) -> NodeId {
        self.new_node_with_config(&ConfigRef::default_config())
    }

    pub fn new_node_with_config(&mut self, config: &ConfigRef) -> NodeId {
        let node = self.arena.new_node(NodeData::new(config.clone()));
        debug!(target: "box_layout::tree", "[TREE-NEW] node={node:?}");
        node
    }

    /// Whether `node` refers to a live node of this tree.
    pub fn contains(&self, node: NodeId) -> bool {
        self.arena.get(node).is_some_and(|entry| !entry.is_removed())
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.arena.iter().filter(|entry| !entry.is_removed()).count()
    }

    pub(crate) fn node(&self, node: NodeId) -> &NodeData {
        self.arena[node].get()
    }

    pub(crate) fn node_mut(&mut self, node: NodeId) -> &mut NodeData {
        self.arena[node].get_mut()
    }

    pub fn config(&self, node: NodeId) -> &ConfigRef {
        &self.node(node).config
    }

    pub fn style(&self, node: NodeId) -> &Style {
        &self.node(node).style
    }

    /// Geometry from the last layout pass.
    pub fn layout(&self, node: NodeId) -> &LayoutResults {
        &self.node(node).layout
    }

    pub fn owner(&self, node: NodeId) -> Option<NodeId> {
        self.arena[node].parent()
    }

    /// Same as [`Self::owner`]; a node's owner is the parent it is laid out in.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.owner(node)
    }

    pub fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        node.children(&self.arena).nth(index)
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        node.children(&self.arena).count()
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.children(&self.arena)
    }

    pub(crate) fn child_list(&self, node: NodeId) -> ChildList {
        node.children(&self.arena).collect()
    }

    /// Visit `node` and its descendants, parents before children.
    pub fn traverse_pre_order(&self, node: NodeId, mut visit: impl FnMut(NodeId)) {
        for descendant in node.descendants(&self.arena) {
            visit(descendant);
        }
    }

    /// Insert `child` at `index` among the children of `parent`.
    ///
    /// Re-inserting a child of the same parent moves it.
    ///
    /// # Errors
    /// Fails if `child` belongs to another owner, if `parent` has a measure
    /// function, if `index` is past the end, or if the insertion would
    /// create a cycle.
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
        let config = self.node(parent).config.clone();
        config.ensure(
            self.node(parent).measure.is_none(),
            Some(parent),
            "Cannot add child: Nodes with measure functions cannot have children.",
        )?;
        let current_owner = self.owner(child);
        config.ensure(
            current_owner.is_none() || current_owner == Some(parent),
            Some(child),
            "Child already has a owner, it must be removed first.",
        )?;
        config.ensure(
            !parent.ancestors(&self.arena).any(|ancestor| ancestor == child),
            Some(child),
            "Cannot insert a node into its own subtree.",
        )?;
        let is_move = current_owner == Some(parent);
        let available = self.child_count(parent) - usize::from(is_move);
        config.ensure(index <= available, Some(parent), "Child index out of range.")?;

        if is_move {
            child.detach(&mut self.arena);
        }
        self.attach_at(parent, child, index)
            .map_err(|error| config.violation(Some(child), &error.to_string()))?;
        self.mark_dirty_and_propagate(parent);
        debug!(target: "box_layout::tree", "[TREE-INSERT] parent={parent:?} child={child:?} index={index}");
        Ok(())
    }

    fn attach_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<(), indextree::NodeError> {
        match self.child(parent, index) {
            Some(sibling) => sibling.checked_insert_before(child, &mut self.arena),
            None => parent.checked_append(child, &mut self.arena),
        }
    }

    /// Detach `child` from `parent` and clear its layout.
    ///
    /// # Errors
    /// Fails if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let config = self.node(parent).config.clone();
        config.ensure(
            self.owner(child) == Some(parent),
            Some(child),
            "Cannot remove a node that is not a child of this owner.",
        )?;
        self.orphan(child);
        self.mark_dirty_and_propagate(parent);
        debug!(target: "box_layout::tree", "[TREE-REMOVE] parent={parent:?} child={child:?}");
        Ok(())
    }

    pub fn remove_all_children(&mut self, parent: NodeId) {
        let children = self.child_list(parent);
        if children.is_empty() {
            return;
        }
        for child in children {
            self.orphan(child);
        }
        self.mark_dirty_and_propagate(parent);
    }

    /// Detach a child and forget its layout, which is meaningless outside its owner.
    fn orphan(&mut self, child: NodeId) {
        child.detach(&mut self.arena);
        self.node_mut(child).layout = LayoutResults::default();
    }

    /// Replace the children of `parent` with `children`, in order.
    ///
    /// Nodes present in both the old and the new list keep their layout and
    /// measurement cache; nodes that leave are orphaned.
    ///
    /// # Errors
    /// Fails if a new child belongs to another owner, appears twice, is an
    /// ancestor of `parent`, or if `parent` has a measure function.
    pub fn set_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<()> {
        let config = self.node(parent).config.clone();
        let old = self.child_list(parent);
        if old.as_slice() == children {
            return Ok(());
        }
        config.ensure(
            children.is_empty() || self.node(parent).measure.is_none(),
            Some(parent),
            "Cannot add child: Nodes with measure functions cannot have children.",
        )?;
        for (position, &child) in children.iter().enumerate() {
            let owner = self.owner(child);
            config.ensure(
                owner.is_none() || owner == Some(parent),
                Some(child),
                "Child already has a owner, it must be removed first.",
            )?;
            config.ensure(
                !children.iter().skip(position + 1).any(|&other| other == child),
                Some(child),
                "A node cannot appear twice in a child list.",
            )?;
            config.ensure(
                !parent.ancestors(&self.arena).any(|ancestor| ancestor == child),
                Some(child),
                "Cannot insert a node into its own subtree.",
            )?;
        }

        for &previous in &old {
            if children.contains(&previous) {
                previous.detach(&mut self.arena);
            } else {
                self.orphan(previous);
            }
        }
        for &child in children {
            parent
                .checked_append(child, &mut self.arena)
                .map_err(|error| config.violation(Some(child), &error.to_string()))?;
        }
        self.mark_dirty_and_propagate(parent);
        debug!(
            target: "box_layout::tree",
            "[TREE-SET-CHILDREN] parent={parent:?} old={} new={}",
            old.len(),
            children.len()
        );
        Ok(())
    }

    /// Copy a node's style, layout, hooks and config into a new, unowned node without children.
    pub fn clone_node(&mut self, node: NodeId) -> NodeId {
        let data = self.node(node).clone();
        self.arena.new_node(data)
    }

    /// Deep copy of `node` and its descendants.
    ///
    /// When the owner's config has a clone hook, each child copy comes from
    /// the hook instead; the hook is responsible for that child's subtree.
    ///
    /// # Errors
    /// Fails if a clone hook returns a node that already has an owner.
    pub fn clone_subtree(&mut self, node: NodeId) -> Result<NodeId> {
        let copy = self.clone_node(node);
        let hook = self.node(node).config.clone_node_func();
        for (index, child) in self.child_list(node).into_iter().enumerate() {
            let child_copy = match &hook {
                Some(clone_hook) => clone_hook.clone_node(self, child, copy, index),
                None => self.clone_subtree(child)?,
            };
            self.insert_child(copy, child_copy, index)?;
        }
        Ok(copy)
    }

    /// Release a node. Its children are detached and kept alive, unowned.
    pub fn free(&mut self, node: NodeId) {
        if let Some(owner) = self.owner(node) {
            node.detach(&mut self.arena);
            self.mark_dirty_and_propagate(owner);
        }
        for child in self.child_list(node) {
            child.detach(&mut self.arena);
        }
        node.remove(&mut self.arena);
        debug!(target: "box_layout::tree", "[TREE-FREE] node={node:?}");
    }

    /// Release a node and all of its descendants, leaves first.
    pub fn free_recursive(&mut self, node: NodeId) {
        self.free_recursive_with_cleanup(node, |_, _| {});
    }

    /// Like [`Self::free_recursive`], calling `cleanup` on each node right before it is released.
    pub fn free_recursive_with_cleanup(&mut self, node: NodeId, mut cleanup: impl FnMut(&mut Self, NodeId)) {
        self.free_subtree(node, &mut cleanup);
    }

    fn free_subtree(&mut self, node: NodeId, cleanup: &mut dyn FnMut(&mut Self, NodeId)) {
        for child in self.child_list(node) {
            self.free_subtree(child, cleanup);
        }
        cleanup(self, node);
        self.free(node);
    }

    /// Restore a detached, childless node to the defaults of its config.
    ///
    /// # Errors
    /// Fails if the node still has children or an owner.
    pub fn reset(&mut self, node: NodeId) -> Result<()> {
        let config = self.node(node).config.clone();
        config.ensure(
            self.child_count(node) == 0,
            Some(node),
            "Cannot reset a node which still has children attached",
        )?;
        config.ensure(
            self.owner(node).is_none(),
            Some(node),
            "Cannot reset a node still attached to a owner",
        )?;
        *self.node_mut(node) = NodeData::new(config);
        Ok(())
    }

    /// Give `target` the style of `source`, dirtying it only if the styles differ.
    pub fn copy_style(&mut self, target: NodeId, source: NodeId) {
        if self.node(target).style == self.node(source).style {
            return;
        }
        let style = self.node(source).style.clone();
        self.set_style(target, style);
    }

    /// Replace the whole style of a node.
    pub fn set_style(&mut self, node: NodeId, style: Style) {
        if self.node(node).style == style {
            return;
        }
        self.node_mut(node).style = style;
        self.mark_dirty_and_propagate(node);
    }

    /// Make `node` a leaf sized by `measure`.
    ///
    /// # Errors
    /// Fails if the node has children.
    pub fn set_measure_func(&mut self, node: NodeId, measure: impl Measure + 'static) -> Result<()> {
        let config = self.node(node).config.clone();
        config.ensure(
            self.child_count(node) == 0,
            Some(node),
            "Cannot set measure function: Nodes with measure functions cannot have children.",
        )?;
        let data = self.node_mut(node);
        data.measure = Some(Arc::new(measure));
        data.node_type = NodeType::Text;
        Ok(())
    }

    pub fn clear_measure_func(&mut self, node: NodeId) {
        let data = self.node_mut(node);
        data.measure = None;
        data.node_type = NodeType::Default;
    }

    pub fn has_measure_func(&self, node: NodeId) -> bool {
        self.node(node).measure.is_some()
    }

    pub fn set_baseline_func(&mut self, node: NodeId, baseline: impl Baseline + 'static) {
        self.node_mut(node).baseline = Some(Arc::new(baseline));
    }

    pub fn clear_baseline_func(&mut self, node: NodeId) {
        self.node_mut(node).baseline = None;
    }

    pub fn has_baseline_func(&self, node: NodeId) -> bool {
        self.node(node).baseline.is_some()
    }

    pub fn set_dirtied_func(&mut self, node: NodeId, dirtied: impl Dirtied + 'static) {
        self.node_mut(node).dirtied = Some(Arc::new(dirtied));
    }

    pub fn clear_dirtied_func(&mut self, node: NodeId) {
        self.node_mut(node).dirtied = None;
    }

    pub fn set_context(&mut self, node: NodeId, context: Arc<dyn Any + Send + Sync>) {
        self.node_mut(node).context = Some(context);
    }

    pub fn clear_context(&mut self, node: NodeId) {
        self.node_mut(node).context = None;
    }

    pub fn context(&self, node: NodeId) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.node(node).context.as_ref()
    }

    /// Host context downcast to `T`.
    pub fn context_as<T: Any>(&self, node: NodeId) -> Option<&T> {
        self.context(node).and_then(|context| context.downcast_ref::<T>())
    }

    pub fn node_type(&self, node: NodeId) -> NodeType {
        self.node(node).node_type
    }

    pub fn set_node_type(&mut self, node: NodeId, node_type: NodeType) {
        self.node_mut(node).node_type = node_type;
    }

    pub fn is_reference_baseline(&self, node: NodeId) -> bool {
        self.node(node).is_reference_baseline
    }

    /// Make this child the one its owner's baseline is taken from.
    pub fn set_is_reference_baseline(&mut self, node: NodeId, is_reference: bool) {
        if self.node(node).is_reference_baseline == is_reference {
            return;
        }
        self.node_mut(node).is_reference_baseline = is_reference;
        self.mark_dirty_and_propagate(node);
    }

    /// Set by every layout pass that touched the node; hosts clear it after reading.
    pub fn has_new_layout(&self, node: NodeId) -> bool {
        self.node(node).has_new_layout
    }

    pub fn set_has_new_layout(&mut self, node: NodeId, has_new_layout: bool) {
        self.node_mut(node).has_new_layout = has_new_layout;
    }
}

#[cfg(test)]
mod tests;
