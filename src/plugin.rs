use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::ArcStr;
use crate::error::ConfigError;
use crate::project::Project;

/// Identity of a plugin, e.g. `java`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginId(ArcStr);

impl PluginId {
    pub fn new(id: impl Into<ArcStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PluginId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PluginId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Something that can be applied to a [`Project`].
pub trait Plugin {
    fn id(&self) -> PluginId;

    fn apply(&self, project: &mut Project) -> Result<(), ConfigError>;
}

pub(crate) type Handler = Box<dyn FnOnce(&mut Project) -> Result<(), ConfigError>>;

/// Applied plugins plus the handlers waiting for plugins not yet applied.
///
/// Every plugin is applied at most once per project, and every handler runs
/// at most once.
#[derive(Default)]
pub struct PluginContainer {
    applied: Vec<PluginId>,
    handlers: HashMap<PluginId, Vec<Handler>>,
}

impl PluginContainer {
    pub fn has_plugin(&self, id: &PluginId) -> bool {
        self.applied.contains(id)
    }

    pub(crate) fn mark_applied(&mut self, id: PluginId) {
        self.applied.push(id);
    }

    pub(crate) fn queue(&mut self, id: PluginId, handler: Handler) {
        self.handlers.entry(id).or_default().push(handler);
    }

    pub(crate) fn take_handlers(&mut self, id: &PluginId) -> Vec<Handler> {
        self.handlers.remove(id).unwrap_or_default()
    }

    /// Number of handlers still waiting for `id`.
    pub fn pending(&self, id: &PluginId) -> usize {
        self.handlers.get(id).map_or(0, Vec::len)
    }
}
