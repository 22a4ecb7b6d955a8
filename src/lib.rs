#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub mod aot;
mod attributes;
mod boot;
mod configuration;
mod core;
mod error;
mod files;
mod java;
mod plugin;
mod project;
mod settings;
mod source_set;
mod task;
mod utils;

pub use crate::aot::{AotPlugin, AotState};
pub use crate::attributes::{Attribute, AttributeSet, Named, copy_attributes};
pub use crate::boot::{BootPlugin, ResolveMainClassName};
pub use crate::configuration::{
    ConfigurationContainer, ConfigurationDef, Dependency, DependencyConfiguration,
};
pub use crate::core::{ArcStr, Property, Provider};
pub use crate::error::*;
pub use crate::files::{FileCollection, FileElement, Layout, Location};
pub use crate::java::{Classes, JavaCompile, JavaPlugin, ProcessResources};
pub use crate::plugin::{Plugin, PluginContainer, PluginId};
pub use crate::project::Project;
pub use crate::settings::ProjectSettings;
pub use crate::source_set::{SourceDirectorySet, SourceSet, SourceSetContainer, SourceSetOutput};
pub use crate::task::{AsAny, ExecutionPlan, Task, TaskContainer, TaskHandle, TaskRef};
pub use crate::utils::init_logging;
