//! The companion application plugin.
//!
//! It contributes the `resolveMainClassName` task, the source of the
//! application entry point consumed by ahead-of-time processing.

use crate::core::Provider;
use crate::error::ConfigError;
use crate::files::Location;
use crate::plugin::{Plugin, PluginId};
use crate::project::Project;
use crate::task::Task;

/// Resolves the fully qualified name of the application's main class.
#[derive(Debug, Default)]
pub struct ResolveMainClassName {
    pub configured_main_class: Option<Provider<String>>,
    pub output_file: Option<Location>,
}

impl ResolveMainClassName {
    /// The resolved main class name, as a lazy value.
    pub fn read_main_class_name(&self) -> Provider<String> {
        match &self.configured_main_class {
            Some(main_class) => main_class.clone(),
            None => Provider::of(String::new()),
        }
    }
}

impl Task for ResolveMainClassName {
    fn missing_input(&self) -> Option<&'static str> {
        self.output_file.is_none().then_some("outputFile")
    }
}

#[derive(Debug, Default, Clone)]
pub struct BootPlugin {
    main_class: Option<String>,
}

impl BootPlugin {
    pub const ID: &'static str = "boot";
    pub const RESOLVE_MAIN_CLASS_NAME_TASK_NAME: &'static str = "resolveMainClassName";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn main_class(mut self, main_class: impl Into<String>) -> Self {
        self.main_class = Some(main_class.into());
        self
    }
}

impl Plugin for BootPlugin {
    fn id(&self) -> PluginId {
        PluginId::new(Self::ID)
    }

    fn apply(&self, project: &mut Project) -> Result<(), ConfigError> {
        let main_class = self.main_class.clone().map(Provider::of);
        let output_file = project
            .layout()
            .build_directory_dir("resolvedMainClassName");

        project.tasks.register(
            Self::RESOLVE_MAIN_CLASS_NAME_TASK_NAME,
            ResolveMainClassName::default(),
            move |task| {
                task.configured_main_class = main_class;
                task.output_file = Some(output_file);
            },
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_resolve_main_class_name_lazily() {
        let mut project = Project::new("demo");
        project
            .apply(BootPlugin::new().main_class("com.example.App"))
            .unwrap();

        let handle = project
            .tasks
            .named_typed::<ResolveMainClassName>(BootPlugin::RESOLVE_MAIN_CLASS_NAME_TASK_NAME)
            .unwrap();
        assert!(!handle.is_realized());

        let main_class = handle.flat_map(ResolveMainClassName::read_main_class_name);
        assert!(!handle.is_realized());
        assert_eq!(main_class.get(), "com.example.App");
        assert!(handle.is_realized());
    }

    #[test]
    fn test_without_main_class() {
        let task = ResolveMainClassName::default();
        assert_eq!(task.read_main_class_name().get(), "");
        assert_eq!(task.missing_input(), Some("outputFile"));
    }
}
