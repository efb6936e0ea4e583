//! Settings shared by every node created with them.
//!
//! A [`ConfigRef`] is a cheap handle; cloning it shares the same settings, so
//! a change made through one handle is seen by every node on its next layout.

use core::any::Any;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::Result;
use indextree::NodeId;
use log::{debug, log};
use once_cell::sync::Lazy;

use crate::enums::{ExperimentalFeature, LogLevel};
use crate::tree::LayoutTree;

/// Live [`Config`] values, the process default included.
static INSTANCE_COUNT: AtomicUsize = AtomicUsize::new(0);

static DEFAULT_CONFIG: Lazy<ConfigRef> = Lazy::new(ConfigRef::new);

/// Diagnostic sink. Purely observational; the return value is passed back to the caller.
pub trait Logger: Send + Sync {
    fn log(&self, config: &ConfigRef, node: Option<NodeId>, level: LogLevel, message: &str) -> i32;
}

impl<F> Logger for F
where
    F: Fn(&ConfigRef, Option<NodeId>, LogLevel, &str) -> i32 + Send + Sync,
{
    fn log(&self, config: &ConfigRef, node: Option<NodeId>, level: LogLevel, message: &str) -> i32 {
        self(config, node, level, message)
    }
}

/// Intercepts node duplication while a subtree is cloned.
///
/// Receives the node being copied, the new owner and the child index, and
/// returns the node to insert there. The returned node must be unowned.
pub trait CloneNode: Send + Sync {
    fn clone_node(&self, tree: &mut LayoutTree, old: NodeId, owner: NodeId, child_index: usize) -> NodeId;
}

impl<F> CloneNode for F
where
    F: Fn(&mut LayoutTree, NodeId, NodeId, usize) -> NodeId + Send + Sync,
{
    fn clone_node(&self, tree: &mut LayoutTree, old: NodeId, owner: NodeId, child_index: usize) -> NodeId {
        self(tree, old, owner, child_index)
    }
}

pub struct Config {
    experimental_features: [bool; ExperimentalFeature::COUNT],
    use_legacy_stretch_behaviour: bool,
    use_web_defaults: bool,
    point_scale_factor: f32,
    logger: Option<Arc<dyn Logger>>,
    clone_node: Option<Arc<dyn CloneNode>>,
    context: Option<Arc<dyn Any + Send + Sync>>,
    /// Bumped by every change that can alter layout results.
    revision: u64,
}

impl Config {
    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn new() -> Self {
        INSTANCE_COUNT.fetch_add(1, Ordering::Relaxed);
        Self {
            experimental_features: [false; ExperimentalFeature::COUNT],
            use_legacy_stretch_behaviour: false,
            use_web_defaults: false,
            point_scale_factor: 1.0,
            logger: None,
            clone_node: None,
            context: None,
            revision: 0,
        }
    }
}

impl Drop for Config {
    fn drop(&mut self) {
        INSTANCE_COUNT.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Shared handle to a [`Config`].
#[derive(Clone)]
pub struct ConfigRef(Arc<RwLock<Config>>);

impl Default for ConfigRef {
    /// The process-wide default config, shared by nodes created without one.
    fn default() -> Self {
        Self::default_config()
    }
}

impl fmt::Debug for ConfigRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.read();
        formatter
            .debug_struct("ConfigRef")
            .field("use_web_defaults", &config.use_web_defaults)
            .field("use_legacy_stretch_behaviour", &config.use_legacy_stretch_behaviour)
            .field("point_scale_factor", &config.point_scale_factor)
            .finish_non_exhaustive()
    }
}

impl ConfigRef {
    /// A fresh config with default settings, independent of every other.
    pub fn new() -> Self {
        Self(Arc::new(RwLock::new(Config::new())))
    }

    pub fn default_config() -> Self {
        Self::clone(&DEFAULT_CONFIG)
    }

    /// Number of configs currently alive.
    pub fn instance_count() -> usize {
        INSTANCE_COUNT.load(Ordering::Relaxed)
    }

    /// Whether both handles point at the same settings.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn read(&self) -> RwLockReadGuard<'_, Config> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Config> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy every setting of `source` into `self`. Hooks are shared, not duplicated.
    pub fn copy_from(&self, source: &Self) {
        if self.ptr_eq(source) {
            return;
        }
        let (features, legacy, web, scale, logger, clone_node, context) = {
            let other = source.read();
            (
                other.experimental_features,
                other.use_legacy_stretch_behaviour,
                other.use_web_defaults,
                other.point_scale_factor,
                other.logger.clone(),
                other.clone_node.clone(),
                other.context.clone(),
            )
        };
        let mut config = self.write();
        config.experimental_features = features;
        config.use_legacy_stretch_behaviour = legacy;
        config.use_web_defaults = web;
        config.point_scale_factor = scale;
        config.logger = logger;
        config.clone_node = clone_node;
        config.context = context;
        config.touch();
    }

    pub fn set_experimental_feature_enabled(&self, feature: ExperimentalFeature, enabled: bool) {
        let mut config = self.write();
        config.experimental_features[feature.index()] = enabled;
        config.touch();
    }

    pub fn is_experimental_feature_enabled(&self, feature: ExperimentalFeature) -> bool {
        self.read().experimental_features[feature.index()]
    }

    /// Stretch where baseline alignment has no meaning, and keep at-most
    /// containers at their full bound instead of shrinking them to content.
    pub fn set_use_legacy_stretch_behaviour(&self, enabled: bool) {
        let mut config = self.write();
        config.use_legacy_stretch_behaviour = enabled;
        config.touch();
    }

    pub fn use_legacy_stretch_behaviour(&self) -> bool {
        self.read().use_legacy_stretch_behaviour
    }

    /// Row flow, stretched lines and a shrink factor of one for nodes created afterwards.
    pub fn set_use_web_defaults(&self, enabled: bool) {
        let mut config = self.write();
        config.use_web_defaults = enabled;
        config.touch();
    }

    pub fn use_web_defaults(&self) -> bool {
        self.read().use_web_defaults
    }

    /// Physical pixels per layout point. Zero disables rounding.
    ///
    /// # Errors
    /// Returns an error for negative or NaN factors; the previous factor is kept.
    pub fn set_point_scale_factor(&self, pixels_in_point: f32) -> Result<()> {
        if pixels_in_point.is_nan() || pixels_in_point < 0.0 {
            let message = format!("Scale factor should not be less than zero, got {pixels_in_point}");
            return Err(self.violation(None, &message));
        }
        {
            let mut config = self.write();
            config.point_scale_factor = pixels_in_point;
            config.touch();
        }
        debug!(target: "box_layout::config", "[CONFIG] point_scale_factor={pixels_in_point}");
        Ok(())
    }

    pub fn point_scale_factor(&self) -> f32 {
        self.read().point_scale_factor
    }

    /// Changes whenever a setting that affects layout changes.
    pub(crate) fn revision(&self) -> u64 {
        self.read().revision
    }

    pub fn set_logger(&self, logger: impl Logger + 'static) {
        self.write().logger = Some(Arc::new(logger));
    }

    /// Drop the custom logger; messages go to the `log` facade again.
    pub fn clear_logger(&self) {
        self.write().logger = None;
    }

    pub fn set_clone_node_func(&self, clone_node: impl CloneNode + 'static) {
        self.write().clone_node = Some(Arc::new(clone_node));
    }

    pub fn clear_clone_node_func(&self) {
        self.write().clone_node = None;
    }

    pub(crate) fn clone_node_func(&self) -> Option<Arc<dyn CloneNode>> {
        self.read().clone_node.clone()
    }

    pub fn set_context(&self, context: Arc<dyn Any + Send + Sync>) {
        self.write().context = Some(context);
    }

    pub fn context(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.read().context.clone()
    }

    /// Route a message to the custom logger, or to the `log` facade when none is set.
    pub fn log(&self, node: Option<NodeId>, level: LogLevel, message: &str) -> i32 {
        let logger = self.read().logger.clone();
        if let Some(sink) = logger {
            return sink.log(self, node, level, message);
        }
        match node {
            Some(id) => log!(target: "box_layout::config", level.as_log_level(), "{id:?}: {message}"),
            None => log!(target: "box_layout::config", level.as_log_level(), "{message}"),
        }
        0
    }

    /// Report a broken contract and build the error returned to the caller.
    pub(crate) fn violation(&self, node: Option<NodeId>, message: &str) -> anyhow::Error {
        self.log(node, LogLevel::Fatal, message);
        match node {
            Some(id) => anyhow::anyhow!("{message} (node {id:?})"),
            None => anyhow::anyhow!("{message}"),
        }
    }

    /// Like [`anyhow::ensure`], but the failure is also reported through the logger.
    pub(crate) fn ensure(&self, condition: bool, node: Option<NodeId>, message: &str) -> Result<()> {
        if condition {
            return Ok(());
        }
        Err(self.violation(node, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    /// Settings changed through one handle are visible through its clones.
    ///
    /// # Panics
    /// Panics if a clone does not observe the change.
    fn clones_share_settings() {
        let config = ConfigRef::new();
        let alias = config.clone();
        config.set_use_web_defaults(true);
        assert!(alias.use_web_defaults());
        assert!(config.ptr_eq(&alias));
        assert!(!config.ptr_eq(&ConfigRef::new()));
    }

    #[test]
    /// Copying takes values and shares hooks without linking the two configs.
    ///
    /// # Panics
    /// Panics if copy semantics differ.
    fn copy_from_is_a_value_copy() -> Result<()> {
        let source = ConfigRef::new();
        source.set_experimental_feature_enabled(ExperimentalFeature::WebFlexBasis, true);
        source.set_point_scale_factor(3.0)?;
        let target = ConfigRef::new();
        target.copy_from(&source);
        assert!(target.is_experimental_feature_enabled(ExperimentalFeature::WebFlexBasis));
        assert!((target.point_scale_factor() - 3.0).abs() < 0.01);
        source.set_point_scale_factor(1.0)?;
        assert!((target.point_scale_factor() - 3.0).abs() < 0.01);
        Ok(())
    }

    #[test]
    /// Negative scale factors are refused and reported to the logger.
    ///
    /// # Panics
    /// Panics if the factor is accepted or the logger is not called.
    fn negative_scale_factor_is_rejected() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let config = ConfigRef::new();
        config.set_logger(move |_: &ConfigRef, _: Option<NodeId>, level: LogLevel, message: &str| {
            sink.lock().unwrap_or_else(PoisonError::into_inner).push((level, message.to_owned()));
            0
        });
        let refused = config.set_point_scale_factor(-1.0).err().map(|error| error.to_string());
        assert!(refused.is_some_and(|message| message.contains("less than zero")));
        assert!((config.point_scale_factor() - 1.0).abs() < 0.01);
        let messages = seen.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages.first().map(|entry| entry.0), Some(LogLevel::Fatal));
    }

    #[test]
    /// Live configs are counted, the shared default included.
    ///
    /// # Panics
    /// Panics if a live config is not counted.
    fn instance_count_includes_live_configs() {
        let _default = ConfigRef::default_config();
        let extra = ConfigRef::new();
        assert!(ConfigRef::instance_count() >= 2);
        drop(extra);
        assert!(ConfigRef::instance_count() >= 1);
    }
}
