//! The host's Java conventions: source sets with their classpath
//! configurations and compile tasks.

use crate::attributes::{Attribute, Named};
use crate::core::ArcStr;
use crate::error::ConfigError;
use crate::files::{FileCollection, FileElement, Location};
use crate::plugin::{Plugin, PluginId};
use crate::project::Project;
use crate::source_set::SourceSet;
use crate::task::Task;

/// Compiles the java sources of a source set.
#[derive(Debug, Clone)]
pub struct JavaCompile {
    pub source_set: ArcStr,
    pub classpath: FileCollection,
    pub destination: Vec<Location>,
}

impl Task for JavaCompile {}

/// Copies the resources of a source set into its output.
#[derive(Debug, Clone)]
pub struct ProcessResources {
    pub source_set: ArcStr,
    pub destination: Option<Location>,
}

impl Task for ProcessResources {
    fn missing_input(&self) -> Option<&'static str> {
        self.destination.is_none().then_some("destinationDir")
    }
}

/// Lifecycle task assembling the classes of a source set.
#[derive(Debug, Clone)]
pub struct Classes {
    pub source_set: ArcStr,
}

impl Task for Classes {}

/// Applies the Java conventions and creates the `main` and `test` source sets.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaPlugin;

impl JavaPlugin {
    pub const ID: &'static str = "java";
}

impl Plugin for JavaPlugin {
    fn id(&self) -> PluginId {
        PluginId::new(Self::ID)
    }

    fn apply(&self, project: &mut Project) -> Result<(), ConfigError> {
        add_source_set(project, SourceSet::MAIN)?;
        add_source_set(project, SourceSet::TEST)?;

        let main = project.source_sets.get(SourceSet::MAIN)?;
        let test = project.source_sets.get(SourceSet::TEST)?;

        test.compile_classpath.update(|classpath| {
            *classpath = FileCollection::output(SourceSet::MAIN).plus(std::mem::take(classpath));
        });
        test.runtime_classpath
            .update(|classpath| classpath.add(FileElement::Output(SourceSet::MAIN.into())));

        let test_implementation = test.implementation_configuration_name();
        let test_runtime_only = test.runtime_only_configuration_name();

        project
            .configurations
            .extends_from(&test_implementation, &main.implementation_configuration_name())?;
        project
            .configurations
            .extends_from(&test_runtime_only, &main.runtime_only_configuration_name())?;

        Ok(())
    }
}

/// Creates a source set laid out by convention, together with its
/// configurations and tasks.
///
/// The name is checked before anything is created, so a duplicate name
/// leaves the project untouched.
pub(crate) fn add_source_set(project: &mut Project, name: &str) -> Result<(), ConfigError> {
    if project.source_sets.contains(name) {
        return Err(ConfigError::DuplicateUnitName(name.into()));
    }

    let source_set = SourceSet::new(name);
    let implementation = source_set.implementation_configuration_name();
    let compile_only = source_set.compile_only_configuration_name();
    let runtime_only = source_set.runtime_only_configuration_name();
    let compile_classpath = source_set.compile_classpath_configuration_name();
    let runtime_classpath = source_set.runtime_classpath_configuration_name();

    let configurations = &mut project.configurations;

    for (bucket, description) in [
        (&implementation, "Implementation only dependencies"),
        (&compile_only, "Compile only dependencies"),
        (&runtime_only, "Runtime only dependencies"),
    ] {
        configurations.create(bucket, |c| {
            c.can_be_consumed(false)
                .can_be_resolved(false)
                .description(format!("{description} for source set '{name}'."));
            Ok(())
        })?;
    }

    configurations.create(&compile_classpath, |c| {
        c.can_be_consumed(false)
            .description(format!("Compile classpath for source set '{name}'."))
            .attributes(|a| {
                a.attribute(Attribute::usage(), Named::new(Named::JAVA_API))
                    .attribute(Attribute::library_elements(), Named::new(Named::CLASSES));
            });
        c.extends_from(&compile_only)?.extends_from(&implementation)?;
        Ok(())
    })?;

    configurations.create(&runtime_classpath, |c| {
        c.can_be_consumed(false)
            .description(format!("Runtime classpath of source set '{name}'."))
            .attributes(|a| {
                a.attribute(Attribute::usage(), Named::new(Named::JAVA_RUNTIME))
                    .attribute(Attribute::library_elements(), Named::new(Named::JAR));
            });
        c.extends_from(&runtime_only)?.extends_from(&implementation)?;
        Ok(())
    })?;

    source_set
        .compile_classpath
        .set(FileCollection::configuration(compile_classpath.as_str()));
    source_set.runtime_classpath.set(
        FileCollection::output(name).plus(FileCollection::configuration(runtime_classpath.as_str())),
    );

    let owner: ArcStr = name.into();
    let compile = project.tasks.register(
        &source_set.compile_java_task_name(),
        JavaCompile {
            source_set: owner.clone(),
            classpath: FileCollection::new(),
            destination: Vec::new(),
        },
        {
            let classpath = source_set.compile_classpath.clone();
            let output = source_set.output.clone();
            move |task| {
                task.classpath = classpath.get();
                task.destination = output.get().classes_dirs;
            }
        },
    )?;
    let process_resources = project.tasks.register(
        &source_set.process_resources_task_name(),
        ProcessResources {
            source_set: owner.clone(),
            destination: None,
        },
        {
            let output = source_set.output.clone();
            move |task| task.destination = Some(output.get().resources_dir)
        },
    )?;
    let classes = project.tasks.register(
        &source_set.classes_task_name(),
        Classes { source_set: owner },
        |_| {},
    )?;

    project
        .tasks
        .depends_on(&classes.task_ref(), &compile.task_ref());
    project
        .tasks
        .depends_on(&classes.task_ref(), &process_resources.task_ref());

    project.source_sets.insert(source_set)?;
    tracing::info!(source_set = name, "created source set");

    Ok(())
}
