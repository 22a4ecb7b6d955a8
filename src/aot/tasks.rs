//! Task types for ahead-of-time processing.
//!
//! The processing step itself is external: these types only describe what it
//! reads and where it writes.

use crate::core::{ArcStr, Provider};
use crate::files::{FileCollection, Location};
use crate::task::Task;

/// Inputs and outputs shared by both processing tasks.
#[derive(Debug, Clone, Default)]
pub struct AotTaskSpec {
    pub sources_output: Option<Location>,
    pub resources_output: Option<Location>,
    pub classes_output: Option<Location>,
    pub group_id: Option<Provider<String>>,
    pub artifact_id: Option<Provider<String>>,
    /// Compiled classes that are processed.
    pub classpath_roots: FileCollection,
    /// Name of the processing classpath configuration.
    pub classpath: Option<ArcStr>,
}

impl AotTaskSpec {
    fn missing_input(&self) -> Option<&'static str> {
        if self.sources_output.is_none() {
            Some("sourcesOutput")
        } else if self.resources_output.is_none() {
            Some("resourcesOutput")
        } else if self.classes_output.is_none() {
            Some("classesOutput")
        } else if self.group_id.is_none() {
            Some("groupId")
        } else if self.artifact_id.is_none() {
            Some("artifactId")
        } else if self.classpath_roots.is_empty() {
            Some("classpathRoots")
        } else if self.classpath.is_none() {
            Some("classpath")
        } else {
            None
        }
    }
}

/// Generates sources, resources and classes for the application.
#[derive(Debug, Clone, Default)]
pub struct ProcessAot {
    pub spec: AotTaskSpec,
    pub application_class: Option<Provider<String>>,
}

impl Task for ProcessAot {
    fn missing_input(&self) -> Option<&'static str> {
        self.spec
            .missing_input()
            .or_else(|| self.application_class.is_none().then_some("applicationClass"))
    }
}

/// Generates sources, resources and classes for the tests.
#[derive(Debug, Clone, Default)]
pub struct ProcessTestAot {
    pub spec: AotTaskSpec,
    /// Configuration holding the test dependencies as declared.
    pub test_runtime_classpath: Option<ArcStr>,
}

impl Task for ProcessTestAot {
    fn missing_input(&self) -> Option<&'static str> {
        self.spec
            .missing_input()
            .or_else(|| self.test_runtime_classpath.is_none().then_some("testRuntimeClasspath"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> AotTaskSpec {
        AotTaskSpec {
            sources_output: Some(Location::project("build/generated/aotSources")),
            resources_output: Some(Location::project("build/generated/aotResources")),
            classes_output: Some(Location::build("generated/aotClasses")),
            group_id: Some(Provider::of("com.example".into())),
            artifact_id: Some(Provider::of("demo".into())),
            classpath_roots: FileCollection::dir(Location::build("classes/java/main")),
            classpath: Some("processAotClasspath".into()),
        }
    }

    #[test]
    fn test_missing_inputs() {
        let mut task = ProcessAot::default();
        assert_eq!(task.missing_input(), Some("sourcesOutput"));

        task.spec = complete();
        assert_eq!(task.missing_input(), Some("applicationClass"));

        task.application_class = Some(Provider::of("com.example.App".into()));
        assert_eq!(task.missing_input(), None);

        task.spec.classpath_roots = FileCollection::new();
        assert_eq!(task.missing_input(), Some("classpathRoots"));
    }

    #[test]
    fn test_missing_test_runtime_classpath() {
        let mut task = ProcessTestAot {
            spec: complete(),
            test_runtime_classpath: None,
        };
        assert_eq!(task.missing_input(), Some("testRuntimeClasspath"));

        task.test_runtime_classpath = Some("testImplementation".into());
        assert_eq!(task.missing_input(), None);
    }
}
