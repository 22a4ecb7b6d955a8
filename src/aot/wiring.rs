use crate::aot::tasks::{AotTaskSpec, ProcessAot, ProcessTestAot};
use crate::aot::{PROCESS_AOT_TASK_NAME, PROCESS_TEST_AOT_TASK_NAME};
use crate::boot::{BootPlugin, ResolveMainClassName};
use crate::configuration::Dependency;
use crate::core::{ArcStr, Provider};
use crate::error::ConfigError;
use crate::files::{FileCollection, FileElement, Location};
use crate::project::Project;
use crate::task::TaskRef;

/// Which of the two processing tasks is being wired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingKind {
    /// Processes the application itself.
    Main,
    /// Processes the tests. `main` names the source set of the application
    /// under test, whose output is put on the processing classpath as well.
    Test { main: ArcStr },
}

impl ProcessingKind {
    pub fn task_name(&self) -> &'static str {
        match self {
            ProcessingKind::Main => PROCESS_AOT_TASK_NAME,
            ProcessingKind::Test { .. } => PROCESS_TEST_AOT_TASK_NAME,
        }
    }
}

/// Where a processing task writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AotOutputs {
    pub sources_dir: Location,
    pub resources_dir: Location,
    pub classes_dir: Location,
}

impl AotOutputs {
    /// Outputs for the derived source set `derived`: its first source and
    /// resource directories plus `generated/<derived>Classes` in the build
    /// directory.
    pub fn for_source_set(project: &Project, task: &str, derived: &str) -> Result<Self, ConfigError> {
        let source_set = project.source_sets.get(derived)?;
        let missing = |property| ConfigError::MissingTaskInput {
            task: task.into(),
            property,
        };

        Ok(Self {
            sources_dir: source_set.java.first().cloned().ok_or_else(|| missing("sourcesOutput"))?,
            resources_dir: source_set
                .resources
                .first()
                .cloned()
                .ok_or_else(|| missing("resourcesOutput"))?,
            classes_dir: project
                .layout()
                .build_directory_dir(format!("generated/{derived}Classes")),
        })
    }
}

/// Registers the processing task of `kind` and links it into the graph.
///
/// The task processes the compiled classes of `input` using the processing
/// classpath `classpath` and writes the content of `derived`. The compile
/// and resource tasks of `derived` are made to depend on it. The task body
/// is configured lazily; nothing is read from the project until the task is
/// realized.
pub fn wire_processing_task(
    project: &mut Project,
    kind: ProcessingKind,
    derived: &str,
    input: &str,
    classpath: &str,
    outputs: AotOutputs,
) -> Result<TaskRef, ConfigError> {
    let derived_set = project.source_sets.get(derived)?;
    let compile = project.tasks.named(&derived_set.compile_java_task_name())?;
    let process_resources = project
        .tasks
        .named(&derived_set.process_resources_task_name())?;
    let derived_compile_classpath = derived_set.compile_classpath_configuration_name();
    let derived_implementation = derived_set.implementation_configuration_name();

    let input_set = project.source_sets.get(input)?;
    let classpath_roots: FileCollection = input_set
        .output
        .get()
        .classes_dirs
        .into_iter()
        .map(FileElement::Dir)
        .collect();
    let input_implementation = input_set.implementation_configuration_name();

    let application_class = match kind {
        ProcessingKind::Main => Some(
            project
                .tasks
                .named_typed::<ResolveMainClassName>(BootPlugin::RESOLVE_MAIN_CLASS_NAME_TASK_NAME)?
                .flat_map(ResolveMainClassName::read_main_class_name),
        ),
        ProcessingKind::Test { .. } => None,
    };

    if let ProcessingKind::Test { main } = &kind {
        project.add_dependency(classpath, Dependency::Files(FileCollection::output(main.clone())))?;
    }
    project.add_dependency(classpath, Dependency::Files(FileCollection::output(input)))?;

    project
        .source_sets
        .get(input)?
        .runtime_classpath
        .update(|runtime| runtime.add(FileElement::Dir(outputs.classes_dir.clone())));

    project
        .configurations
        .extends_from(&derived_compile_classpath, classpath)?;

    let artifact_id = {
        let name: ArcStr = project.name().into();
        Provider::new(move || name.to_string())
    };
    let spec = AotTaskSpec {
        sources_output: Some(outputs.sources_dir),
        resources_output: Some(outputs.resources_dir),
        classes_output: Some(outputs.classes_dir.clone()),
        group_id: Some(project.group().provider()),
        artifact_id: Some(artifact_id),
        classpath_roots,
        classpath: Some(classpath.into()),
    };

    let task_name = kind.task_name();
    let task = match kind {
        ProcessingKind::Main => project
            .tasks
            .register(task_name, ProcessAot::default(), move |task| {
                task.spec = spec;
                task.application_class = application_class;
            })?
            .task_ref(),
        ProcessingKind::Test { .. } => project
            .tasks
            .register(task_name, ProcessTestAot::default(), move |task| {
                task.spec = spec;
                task.test_runtime_classpath = Some(input_implementation.into());
            })?
            .task_ref(),
    };

    project.add_dependency(
        &derived_implementation,
        Dependency::Files(FileCollection::dir(outputs.classes_dir)),
    )?;

    project.tasks.depends_on(&compile, &task);
    project.tasks.depends_on(&process_resources, &task);

    tracing::info!(task = task_name, source_set = derived, from = input, "registered processing task");
    Ok(task)
}
