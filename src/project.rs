use std::collections::HashSet;

use camino::Utf8PathBuf;

use crate::configuration::{ConfigurationContainer, Dependency};
use crate::core::{ArcStr, Property};
use crate::error::ConfigError;
use crate::files::{FileCollection, FileElement, Layout};
use crate::plugin::{Handler, Plugin, PluginContainer, PluginId};
use crate::settings::ProjectSettings;
use crate::source_set::SourceSetContainer;
use crate::task::{ExecutionPlan, TaskContainer};

/// The build description of a single project.
///
/// A project owns the registries of source sets, configurations and tasks.
/// Plugins populate them during configuration; nothing is ever executed.
pub struct Project {
    name: ArcStr,
    group: Property<String>,
    layout: Layout,
    pub configurations: ConfigurationContainer,
    pub source_sets: SourceSetContainer,
    pub tasks: TaskContainer,
    plugins: PluginContainer,
}

impl Project {
    /// A project named `name` in the current directory, building to `build`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_settings(ProjectSettings {
            name: name.into(),
            ..ProjectSettings::default()
        })
    }

    pub fn from_settings(settings: ProjectSettings) -> Self {
        Self {
            name: settings.name.into(),
            group: Property::new(settings.group),
            layout: Layout::new(settings.project_dir, settings.build_dir),
            configurations: ConfigurationContainer::new(),
            source_sets: SourceSetContainer::new(),
            tasks: TaskContainer::new(),
            plugins: PluginContainer::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &Property<String> {
        &self.group
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn plugins(&self) -> &PluginContainer {
        &self.plugins
    }

    pub fn has_plugin(&self, id: &PluginId) -> bool {
        self.plugins.has_plugin(id)
    }

    /// Applies `plugin` unless it has been applied already, then runs every
    /// handler that was waiting for it.
    pub fn apply<P: Plugin>(&mut self, plugin: P) -> Result<(), ConfigError> {
        let id = plugin.id();
        if self.plugins.has_plugin(&id) {
            tracing::debug!(plugin = %id, "plugin already applied");
            return Ok(());
        }

        let span = tracing::info_span!("apply", plugin = %id, project = %self.name);
        let _enter = span.enter();

        self.plugins.mark_applied(id.clone());
        plugin.apply(self)?;

        for handler in self.plugins.take_handlers(&id) {
            handler(self)?;
        }

        Ok(())
    }

    /// Runs `handler` once the plugin `id` is applied, right away if it
    /// already is.
    pub fn with_plugin<F>(&mut self, id: PluginId, handler: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut Project) -> Result<(), ConfigError> + 'static,
    {
        if self.plugins.has_plugin(&id) {
            return handler(self);
        }

        let handler: Handler = Box::new(handler);
        self.plugins.queue(id, handler);
        Ok(())
    }

    /// Creates a conventional source set with its configurations and tasks.
    pub fn create_source_set(&mut self, name: &str) -> Result<(), ConfigError> {
        crate::java::add_source_set(self, name)
    }

    pub fn add_dependency(&mut self, configuration: &str, dependency: Dependency) -> Result<(), ConfigError> {
        self.configurations.add_dependency(configuration, dependency)
    }

    /// Turns `files` into concrete paths.
    ///
    /// Configurations contribute the local files declared anywhere in their
    /// hierarchy. Module dependencies are left to the host's resolver.
    pub fn resolve_files(&self, files: &FileCollection) -> Result<Vec<Utf8PathBuf>, ConfigError> {
        let mut resolved = Vec::new();
        let mut visited = HashSet::new();
        self.collect_files(files, &mut resolved, &mut visited)?;
        Ok(resolved)
    }

    fn collect_files(
        &self,
        files: &FileCollection,
        resolved: &mut Vec<Utf8PathBuf>,
        visited: &mut HashSet<ArcStr>,
    ) -> Result<(), ConfigError> {
        for element in files.elements() {
            match element {
                FileElement::Output(name) => {
                    let output = self.source_sets.get(name)?.output.get();
                    for dir in &output.classes_dirs {
                        push_unique(resolved, self.layout.resolve(dir));
                    }
                    push_unique(resolved, self.layout.resolve(&output.resources_dir));
                }
                FileElement::Dir(location) => push_unique(resolved, self.layout.resolve(location)),
                FileElement::Configuration(name) => {
                    if !visited.insert(name.clone()) {
                        continue;
                    }
                    for dependency in self.configurations.dependency_closure(name)? {
                        if let Dependency::Files(files) = dependency {
                            self.collect_files(&files, resolved, visited)?;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Realizes every task and orders the task graph.
    pub fn finalize(&self) -> Result<ExecutionPlan, ConfigError> {
        self.tasks.finalize()
    }
}

fn push_unique(resolved: &mut Vec<Utf8PathBuf>, path: Utf8PathBuf) {
    if !resolved.contains(&path) {
        resolved.push(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::Location;
    use crate::java::JavaPlugin;

    #[test]
    fn test_from_settings() {
        let project = Project::from_settings(ProjectSettings {
            name: "demo".into(),
            group: "com.example".into(),
            project_dir: "/work/demo".into(),
            build_dir: "out".into(),
        });

        assert_eq!(project.name(), "demo");
        assert!(!project.has_plugin(&PluginId::new(JavaPlugin::ID)));
        assert_eq!(project.group().get(), "com.example");
        assert_eq!(
            project.layout().resolve(&Location::build("classes")),
            Utf8PathBuf::from("/work/demo/out/classes")
        );
    }

    #[test]
    fn test_resolve_files_through_configurations() {
        let mut project = Project::from_settings(ProjectSettings {
            name: "demo".into(),
            project_dir: "/work/demo".into(),
            ..ProjectSettings::default()
        });
        project.apply(JavaPlugin).unwrap();
        assert!(project.has_plugin(&PluginId::new(JavaPlugin::ID)));
        project
            .add_dependency(
                "runtimeOnly",
                Dependency::Files(FileCollection::dir(Location::build("generated/extra"))),
            )
            .unwrap();
        project
            .add_dependency("implementation", Dependency::module("org.example:lib:1.0"))
            .unwrap();

        let main = project.source_sets.get("main").unwrap();
        let files = project.resolve_files(&main.runtime_classpath.get()).unwrap();

        assert_eq!(
            files,
            vec![
                Utf8PathBuf::from("/work/demo/build/classes/java/main"),
                Utf8PathBuf::from("/work/demo/build/resources/main"),
                Utf8PathBuf::from("/work/demo/build/generated/extra"),
            ]
        );
    }
}
