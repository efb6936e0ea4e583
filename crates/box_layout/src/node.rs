//! Arena payload for a single node.

use core::any::Any;
use std::sync::Arc;

use crate::callbacks::{Baseline, Dirtied, Measure};
use crate::config::ConfigRef;
use crate::enums::NodeType;
use crate::layout::LayoutResults;
use crate::style::Style;

/// Everything the tree stores per node apart from the parent/child links,
/// which live in the arena itself.
#[derive(Clone)]
pub(crate) struct NodeData {
    pub(crate) style: Style,
    pub(crate) layout: LayoutResults,
    pub(crate) config: ConfigRef,
    pub(crate) measure: Option<Arc<dyn Measure>>,
    pub(crate) baseline: Option<Arc<dyn Baseline>>,
    pub(crate) dirtied: Option<Arc<dyn Dirtied>>,
    pub(crate) context: Option<Arc<dyn Any + Send + Sync>>,
    pub(crate) node_type: NodeType,
    pub(crate) is_dirty: bool,
    pub(crate) has_new_layout: bool,
    pub(crate) is_reference_baseline: bool,
    /// Flex line the node was placed on by its owner's last pass.
    pub(crate) line_index: usize,
}

impl NodeData {
    pub(crate) fn new(config: ConfigRef) -> Self {
        let style = Style::with_web_defaults(config.use_web_defaults());
        Self {
            style,
            layout: LayoutResults::default(),
            config,
            measure: None,
            baseline: None,
            dirtied: None,
            context: None,
            node_type: NodeType::Default,
            is_dirty: false,
            has_new_layout: true,
            is_reference_baseline: false,
            line_index: 0,
        }
    }
}
